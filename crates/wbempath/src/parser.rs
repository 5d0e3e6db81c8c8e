//! Decomposes path text into a [`PathBuffer`].
//!
//! The grammar is `[\\server]{\namespace}[:Class[.keys]]`, with `/` accepted
//! wherever `\` is. Parsing is lenient: any text is accepted, and the only
//! failure is a refused allocation.

use alloc::{string::String, vec::Vec};

use log::warn;

use crate::{
    PathBuffer, PathError,
    heap::{self, Heap, Unbounded},
};

#[inline]
const fn is_separator(b: u8) -> bool {
    b == b'\\' || b == b'/'
}

/// Index of the first byte at or after `from` matching `stop`, or the length
/// of `bytes`.
fn scan(bytes: &[u8], from: usize, stop: impl Fn(u8) -> bool) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| stop(b))
        .map_or(bytes.len(), |offset| from + offset)
}

/// Parses `text` using the global allocator.
///
/// # Errors
///
/// Returns [`PathError::OutOfMemory`] if an allocation fails.
pub fn parse(text: &str) -> Result<PathBuffer, PathError> {
    parse_in(text, &mut Unbounded)
}

/// Parses `text`, claiming every allocation from `heap`.
///
/// On failure every component allocated so far is dropped; nothing partial is
/// returned.
///
/// # Errors
///
/// Returns [`PathError::OutOfMemory`] if `heap` refuses a claim or an
/// allocation fails.
pub fn parse_in<H: Heap + ?Sized>(text: &str, heap: &mut H) -> Result<PathBuffer, PathError> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let mut server = None;
    if text.starts_with(r"\\") || text.starts_with("//") {
        let end = scan(bytes, 2, is_separator);
        server = Some(heap::copy_str(heap, &text[2..end])?);
        pos = end;
    }

    let span_end = scan(bytes, pos, |b| b == b':');
    let span = &text[pos..span_end];
    let has_colon = span_end < bytes.len();
    let has_separator = span.bytes().any(is_separator);

    let mut namespaces = Vec::new();
    let class_start = if server.is_none() && !has_colon && !has_separator {
        // A lone identifier is a relative class path.
        (!span.is_empty()).then_some(pos)
    } else {
        let leading = server.is_none() && span.bytes().next().is_some_and(|b| !is_separator(b));
        split_namespaces(span, leading, heap, &mut namespaces)?;
        has_colon.then_some(span_end + 1)
    };

    let mut class_name = None;
    let mut has_key_list = false;
    if let Some(start) = class_start {
        let end = scan(bytes, start, |b| b == b'.');
        class_name = Some(heap::copy_str(heap, &text[start..end])?);
        if end < bytes.len() {
            warn!(target: "wbempath", "key lists are not supported, ignoring {:?}", &text[end..]);
            has_key_list = true;
        }
    }

    let text = heap::copy_str(heap, text)?;
    Ok(PathBuffer {
        text: Some(text),
        server,
        namespaces,
        class_name,
        has_key_list,
    })
}

/// Pushes one segment per separator in `span`, each running to the next
/// separator or the end of the span. With `leading`, the run before the first
/// separator is a segment as well.
fn split_namespaces<H: Heap + ?Sized>(
    span: &str,
    leading: bool,
    heap: &mut H,
    out: &mut Vec<String>,
) -> Result<(), PathError> {
    let bytes = span.as_bytes();
    if leading {
        let end = scan(bytes, 0, is_separator);
        let segment = heap::copy_str(heap, &span[..end])?;
        heap::push(heap, out, segment)?;
    }
    for (idx, _) in bytes.iter().enumerate().filter(|&(_, &b)| is_separator(b)) {
        let end = scan(bytes, idx + 1, is_separator);
        let segment = heap::copy_str(heap, &span[idx + 1..end])?;
        heap::push(heap, out, segment)?;
    }
    Ok(())
}
