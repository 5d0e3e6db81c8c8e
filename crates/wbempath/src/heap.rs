//! Allocation accounting for the parser and builder.
//!
//! Every allocation site first claims its size from a [`Heap`] and then
//! allocates with `try_reserve_exact`, so a refused claim and a failed
//! reservation both surface as [`PathError::OutOfMemory`]. Values built before
//! the failure are owned locals and are dropped on the way out.

use alloc::{string::String, vec::Vec};
use core::mem::size_of;

use crate::PathError;

/// Grants or refuses allocations made while parsing or rendering a path.
pub trait Heap {
    /// Claims `bytes` for the allocation about to happen.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutOfMemory`] when the allocation must not happen.
    fn claim(&mut self, bytes: usize) -> Result<(), PathError>;
}

impl<H: Heap + ?Sized> Heap for &mut H {
    fn claim(&mut self, bytes: usize) -> Result<(), PathError> {
        (**self).claim(bytes)
    }
}

/// Grants every claim; only the global allocator can refuse.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl Heap for Unbounded {
    fn claim(&mut self, _bytes: usize) -> Result<(), PathError> {
        Ok(())
    }
}

/// Refuses claims once the running total would exceed a byte limit.
#[derive(Debug, Clone, Copy)]
pub struct MemoryLimit {
    limit: usize,
    used: usize,
}

impl MemoryLimit {
    /// Creates a heap allowing at most `limit` bytes in total.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Bytes granted so far.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }
}

impl Heap for MemoryLimit {
    fn claim(&mut self, bytes: usize) -> Result<(), PathError> {
        let total = self
            .used
            .checked_add(bytes)
            .filter(|total| *total <= self.limit)
            .ok_or(PathError::OutOfMemory)?;
        self.used = total;
        Ok(())
    }
}

/// Refuses exactly one claim, the `site`-th (zero based), and grants all
/// others.
///
/// Used to simulate allocation exhaustion at each allocation site in turn.
#[cfg(any(test, feature = "fuzzing"))]
#[derive(Debug, Clone, Copy)]
pub struct FailAt {
    site: usize,
    seen: usize,
}

#[cfg(any(test, feature = "fuzzing"))]
impl FailAt {
    /// Creates a heap refusing the claim with index `site`.
    #[must_use]
    pub const fn new(site: usize) -> Self {
        Self { site, seen: 0 }
    }

    /// Number of claims observed, including the refused one.
    #[must_use]
    pub const fn seen(&self) -> usize {
        self.seen
    }

    /// Whether the refused site has been reached.
    #[must_use]
    pub const fn tripped(&self) -> bool {
        self.seen > self.site
    }
}

#[cfg(any(test, feature = "fuzzing"))]
impl Heap for FailAt {
    fn claim(&mut self, _bytes: usize) -> Result<(), PathError> {
        let current = self.seen;
        self.seen += 1;
        if current == self.site {
            Err(PathError::OutOfMemory)
        } else {
            Ok(())
        }
    }
}

/// Allocates an empty string able to hold `capacity` bytes.
pub(crate) fn string_with_capacity<H: Heap + ?Sized>(
    heap: &mut H,
    capacity: usize,
) -> Result<String, PathError> {
    heap.claim(capacity)?;
    let mut out = String::new();
    out.try_reserve_exact(capacity)?;
    Ok(out)
}

/// Copies `value` into a freshly allocated string.
pub(crate) fn copy_str<H: Heap + ?Sized>(heap: &mut H, value: &str) -> Result<String, PathError> {
    let mut out = string_with_capacity(heap, value.len())?;
    out.push_str(value);
    Ok(out)
}

/// Concatenates `parts` into one exactly sized string.
pub(crate) fn concat<H: Heap + ?Sized>(heap: &mut H, parts: &[&str]) -> Result<String, PathError> {
    let len = parts.iter().map(|part| part.len()).sum();
    let mut out = string_with_capacity(heap, len)?;
    for part in parts {
        out.push_str(part);
    }
    Ok(out)
}

/// Appends `value`, growing `vec` by exactly one slot when it is full.
pub(crate) fn push<H: Heap + ?Sized, T>(
    heap: &mut H,
    vec: &mut Vec<T>,
    value: T,
) -> Result<(), PathError> {
    if vec.len() == vec.capacity() {
        heap.claim(size_of::<T>())?;
        vec.try_reserve_exact(1)?;
    }
    vec.push(value);
    Ok(())
}
