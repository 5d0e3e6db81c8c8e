//! Renders projections of a [`PathBuffer`].

use alloc::string::String;
use core::fmt;

use crate::{
    OutputMode, PathBuffer, PathError,
    heap::{self, Heap, Unbounded},
};

const SEPARATOR: char = '\\';
const LOCAL_SERVER: &str = r"\\.";

/// A rendered path along with its length in UTF-16 code units, the unit used
/// by the wide-string buffer protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rendered {
    text: String,
    len: usize,
}

impl Rendered {
    fn new(text: String) -> Self {
        let len = text.encode_utf16().count();
        Self { text, len }
    }

    /// The rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units, excluding any terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the rendering is present but empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unwraps the rendered text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders `buffer` in `mode` using the global allocator.
///
/// # Errors
///
/// Returns [`PathError::OutOfMemory`] if an allocation fails.
pub fn build(buffer: &PathBuffer, mode: OutputMode) -> Result<Option<Rendered>, PathError> {
    build_in(buffer, mode, &mut Unbounded)
}

/// Renders `buffer` in `mode`, claiming every allocation from `heap`.
///
/// `Ok(None)` means the projection has no source data: [`OutputMode::RelativeOnly`]
/// without a class, or [`OutputMode::Original`] before any text was set. It is
/// distinct from a present, empty rendering.
///
/// # Errors
///
/// Returns [`PathError::OutOfMemory`] if `heap` refuses a claim or an
/// allocation fails. Intermediate strings are dropped.
pub fn build_in<H: Heap + ?Sized>(
    buffer: &PathBuffer,
    mode: OutputMode,
    heap: &mut H,
) -> Result<Option<Rendered>, PathError> {
    let class = buffer.rendered_class();
    let text = match mode {
        OutputMode::Default => {
            let namespace = build_namespace(buffer, false, heap)?;
            match class {
                Some(class) => Some(heap::concat(heap, &[&namespace, ":", class])?),
                None => Some(namespace),
            }
        }
        OutputMode::RelativeOnly => class.map(|class| heap::copy_str(heap, class)).transpose()?,
        OutputMode::ServerToo => {
            let namespace = build_namespace(buffer, true, heap)?;
            let server = build_server(buffer, heap)?;
            Some(match class {
                Some(class) => heap::concat(heap, &[&server, &namespace, ":", class])?,
                None => heap::concat(heap, &[&server, &namespace])?,
            })
        }
        OutputMode::ServerAndNamespaceOnly => {
            let namespace = build_namespace(buffer, true, heap)?;
            let server = build_server(buffer, heap)?;
            Some(heap::concat(heap, &[&server, &namespace])?)
        }
        OutputMode::NamespaceOnly => Some(build_namespace(buffer, false, heap)?),
        OutputMode::Original => buffer
            .text()
            .map(|text| heap::copy_str(heap, text))
            .transpose()?,
    };
    Ok(text.map(Rendered::new))
}

/// Joins the namespace segments with `\`. The leading separator is only
/// emitted when the namespace follows a server.
fn build_namespace<H: Heap + ?Sized>(
    buffer: &PathBuffer,
    leading_separator: bool,
    heap: &mut H,
) -> Result<String, PathError> {
    let namespaces = buffer.namespaces();
    let separators = match namespaces.len() {
        0 => 0,
        n if leading_separator => n,
        n => n - 1,
    };
    let len = separators + namespaces.iter().map(String::len).sum::<usize>();

    let mut out = heap::string_with_capacity(heap, len)?;
    for (idx, segment) in namespaces.iter().enumerate() {
        if idx > 0 || leading_separator {
            out.push(SEPARATOR);
        }
        out.push_str(segment);
    }
    Ok(out)
}

/// `\\server`, or `\\.` for the local machine.
fn build_server<H: Heap + ?Sized>(buffer: &PathBuffer, heap: &mut H) -> Result<String, PathError> {
    match buffer.rendered_server() {
        Some(server) => heap::concat(heap, &[r"\\", server]),
        None => heap::copy_str(heap, LOCAL_SERVER),
    }
}

/// Encodes `rendered` as a NUL-terminated UTF-16 string.
pub(crate) fn encode_wide(rendered: Option<&Rendered>, out: &mut [u16]) {
    let mut written = 0;
    if let Some(rendered) = rendered {
        for (slot, unit) in out.iter_mut().zip(rendered.text.encode_utf16()) {
            *slot = unit;
            written += 1;
        }
    }
    out[written] = 0;
}

/// Decodes a UTF-16 buffer up to its first NUL.
#[must_use]
pub fn decode_wide(units: &[u16]) -> Option<String> {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    char::decode_utf16(units[..end].iter().copied())
        .collect::<Result<String, _>>()
        .ok()
}
