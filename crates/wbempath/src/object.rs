use alloc::string::String;
use core::convert::Infallible;

use log::{error, trace, warn};

use crate::{
    CreateMode, OutputMode, PathBuffer, PathError, PathOptions,
    builder::{self, Rendered},
    heap::Heap,
    parser,
};

fn not_implemented<T>(operation: &str) -> Result<T, PathError> {
    warn!(target: "wbempath", "{operation} is not implemented");
    Err(PathError::NotImplemented)
}

/// The capability set of an `IWbemPath` object.
///
/// Only text parsing, text rendering and the namespace count are required.
/// Every other operation defaults to [`PathError::NotImplemented`] and leaves
/// the object untouched, so an implementation that supports more of the
/// interface overrides just those methods.
///
/// Wide-string outputs follow the two-call protocol of [`ObjectPath::get_text`]:
/// `capacity` is read as the caller's buffer size in UTF-16 units and written
/// with the required size, terminator included.
pub trait ObjectPath {
    /// Parses `text`, replacing all current state.
    ///
    /// The previous state is released before parsing, so a failed call leaves
    /// the object empty.
    ///
    /// # Errors
    ///
    /// [`PathError::InvalidParameter`] if `mode` is empty or `text` is `None`;
    /// [`PathError::OutOfMemory`] if an allocation fails.
    fn set_text(&mut self, mode: CreateMode, text: Option<&str>) -> Result<(), PathError>;

    /// Renders the projection selected by the raw `WBEMPATH_GET_*` `flags`.
    ///
    /// If `*capacity` is smaller than the rendering plus its terminator, the
    /// required size is written to `*capacity` and nothing is copied.
    /// Otherwise the NUL-terminated UTF-16 text is copied into `buffer`. A
    /// projection with no source data copies just the terminator.
    ///
    /// # Errors
    ///
    /// [`PathError::InvalidParameter`] if `flags` names no supported
    /// projection, or if the capacity suffices but `buffer` is missing or
    /// shorter than the required size; [`PathError::OutOfMemory`] if rendering
    /// fails to allocate.
    fn get_text(
        &self,
        flags: i32,
        capacity: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<(), PathError>;

    /// Number of namespace segments in the current path.
    ///
    /// # Errors
    ///
    /// Implementations may fail; [`WbemPath`] never does.
    fn namespace_count(&self) -> Result<u32, PathError>;

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_info(&self, _requested: u32) -> Result<u64, PathError> {
        not_implemented("get_info")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn set_server(&mut self, _name: &str) -> Result<(), PathError> {
        not_implemented("set_server")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_server(&self, _capacity: &mut u32, _buffer: Option<&mut [u16]>) -> Result<(), PathError> {
        not_implemented("get_server")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn set_namespace_at(&mut self, _index: u32, _name: &str) -> Result<(), PathError> {
        not_implemented("set_namespace_at")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_namespace_at(
        &self,
        _index: u32,
        _capacity: &mut u32,
        _buffer: Option<&mut [u16]>,
    ) -> Result<(), PathError> {
        not_implemented("get_namespace_at")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn remove_namespace_at(&mut self, _index: u32) -> Result<(), PathError> {
        not_implemented("remove_namespace_at")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn remove_all_namespaces(&mut self) -> Result<(), PathError> {
        not_implemented("remove_all_namespaces")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn scope_count(&self) -> Result<u32, PathError> {
        not_implemented("scope_count")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn set_scope(&mut self, _index: u32, _class: &str) -> Result<(), PathError> {
        not_implemented("set_scope")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn set_scope_from_text(&mut self, _index: u32, _text: &str) -> Result<(), PathError> {
        not_implemented("set_scope_from_text")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_scope(
        &self,
        _index: u32,
        _capacity: &mut u32,
        _buffer: Option<&mut [u16]>,
    ) -> Result<(), PathError> {
        not_implemented("get_scope")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_scope_as_text(
        &self,
        _index: u32,
        _capacity: &mut u32,
        _buffer: Option<&mut [u16]>,
    ) -> Result<(), PathError> {
        not_implemented("get_scope_as_text")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn remove_scope(&mut self, _index: u32) -> Result<(), PathError> {
        not_implemented("remove_scope")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn remove_all_scopes(&mut self) -> Result<(), PathError> {
        not_implemented("remove_all_scopes")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn set_class_name(&mut self, _name: &str) -> Result<(), PathError> {
        not_implemented("set_class_name")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn get_class_name(&self, _capacity: &mut u32, _buffer: Option<&mut [u16]>) -> Result<(), PathError> {
        not_implemented("get_class_name")
    }

    /// Key lists have no representation yet, so this can never succeed.
    ///
    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn key_list(&self) -> Result<Infallible, PathError> {
        not_implemented("key_list")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn create_class_part(&mut self, _flags: i32, _name: &str) -> Result<(), PathError> {
        not_implemented("create_class_part")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn delete_class_part(&mut self, _flags: i32) -> Result<(), PathError> {
        not_implemented("delete_class_part")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn is_relative(&self, _machine: &str, _namespace: &str) -> Result<bool, PathError> {
        not_implemented("is_relative")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn is_relative_or_child(
        &self,
        _machine: &str,
        _namespace: &str,
        _flags: i32,
    ) -> Result<bool, PathError> {
        not_implemented("is_relative_or_child")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn is_local(&self, _machine: &str) -> Result<bool, PathError> {
        not_implemented("is_local")
    }

    /// # Errors
    ///
    /// Always [`PathError::NotImplemented`].
    fn is_same_class_name(&self, _class: &str) -> Result<bool, PathError> {
        not_implemented("is_same_class_name")
    }
}

/// A path object owning one [`PathBuffer`].
///
/// Nothing here is synchronised. `set_text` takes `&mut self`, so the borrow
/// checker (or [`crate::PathObject::get_mut`] for shared objects) keeps
/// mutation from overlapping reads.
#[derive(Debug, Default)]
pub struct WbemPath {
    buffer: PathBuffer,
    options: PathOptions,
}

impl WbemPath {
    /// Creates an empty path object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty path object with `options`.
    #[must_use]
    pub fn with_options(options: PathOptions) -> Self {
        Self {
            buffer: PathBuffer::new(),
            options,
        }
    }

    /// The components parsed by the last successful `set_text`.
    #[must_use]
    pub fn buffer(&self) -> &PathBuffer {
        &self.buffer
    }

    /// The options this object was created with.
    #[must_use]
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// [`ObjectPath::set_text`], claiming allocations from `heap` instead of
    /// the configured memory limit.
    ///
    /// # Errors
    ///
    /// As for [`ObjectPath::set_text`].
    pub fn set_text_in<H: Heap + ?Sized>(
        &mut self,
        mode: CreateMode,
        text: Option<&str>,
        heap: &mut H,
    ) -> Result<(), PathError> {
        trace!(target: "wbempath", "set_text {:#x} {text:?}", mode.bits());

        let text = match text {
            Some(text) if !mode.is_empty() => text,
            _ => return Err(PathError::InvalidParameter),
        };

        self.buffer.clear();
        self.buffer = parser::parse_in(text, heap)?;
        Ok(())
    }

    /// Renders `mode` as a string; `None` when the projection has no source
    /// data.
    ///
    /// # Errors
    ///
    /// [`PathError::OutOfMemory`] if rendering fails to allocate.
    pub fn text(&self, mode: OutputMode) -> Result<Option<String>, PathError> {
        let rendered = self.render_in(mode, &mut self.options.heap())?;
        Ok(rendered.map(Rendered::into_string))
    }

    /// Renders `mode`, claiming allocations from `heap`.
    ///
    /// # Errors
    ///
    /// [`PathError::OutOfMemory`] if `heap` refuses a claim.
    pub fn render_in<H: Heap + ?Sized>(
        &self,
        mode: OutputMode,
        heap: &mut H,
    ) -> Result<Option<Rendered>, PathError> {
        builder::build_in(&self.buffer, mode, heap)
    }

    /// [`ObjectPath::get_text`], claiming allocations from `heap`.
    ///
    /// # Errors
    ///
    /// As for [`ObjectPath::get_text`].
    pub fn get_text_in<H: Heap + ?Sized>(
        &self,
        flags: i32,
        capacity: &mut u32,
        buffer: Option<&mut [u16]>,
        heap: &mut H,
    ) -> Result<(), PathError> {
        trace!(target: "wbempath", "get_text {flags:#x} capacity {capacity}");

        let Some(mode) = OutputMode::from_flags(flags) else {
            error!(target: "wbempath", "unhandled flags {flags:#x}");
            return Err(PathError::InvalidParameter);
        };

        let rendered = self.render_in(mode, heap)?;
        let required = rendered.as_ref().map_or(0, Rendered::len) + 1;
        let required_units = u32::try_from(required).map_err(|_| PathError::OutOfMemory)?;

        if *capacity < required_units {
            *capacity = required_units;
            return Ok(());
        }

        let out = buffer
            .and_then(|buffer| buffer.get_mut(..required))
            .ok_or(PathError::InvalidParameter)?;
        builder::encode_wide(rendered.as_ref(), out);
        *capacity = required_units;

        trace!(target: "wbempath", "<-- {:?}", rendered.as_ref().map(Rendered::as_str));
        Ok(())
    }
}

impl ObjectPath for WbemPath {
    fn set_text(&mut self, mode: CreateMode, text: Option<&str>) -> Result<(), PathError> {
        let mut heap = self.options.heap();
        self.set_text_in(mode, text, &mut heap)
    }

    fn get_text(
        &self,
        flags: i32,
        capacity: &mut u32,
        buffer: Option<&mut [u16]>,
    ) -> Result<(), PathError> {
        self.get_text_in(flags, capacity, buffer, &mut self.options.heap())
    }

    fn namespace_count(&self) -> Result<u32, PathError> {
        trace!(target: "wbempath", "namespace_count");
        Ok(u32::try_from(self.buffer.namespace_count()).unwrap_or(u32::MAX))
    }
}

impl Drop for WbemPath {
    fn drop(&mut self) {
        trace!(target: "wbempath", "destroying {:p}", self);
    }
}
