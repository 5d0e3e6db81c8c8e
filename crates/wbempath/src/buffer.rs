use alloc::{string::String, vec::Vec};
use core::str::FromStr;

use crate::{PathError, parser};

/// The decomposed components of a path text.
///
/// A buffer is either empty or the complete result of one successful parse;
/// it is never partially populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathBuffer {
    pub(crate) text: Option<String>,
    pub(crate) server: Option<String>,
    pub(crate) namespaces: Vec<String>,
    pub(crate) class_name: Option<String>,
    pub(crate) has_key_list: bool,
}

impl PathBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: None,
            server: None,
            namespaces: Vec::new(),
            class_name: None,
            has_key_list: false,
        }
    }

    /// Releases every component and returns to the empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Whether no text has been parsed into this buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }

    /// The text exactly as it was parsed.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The server name, or `None` when the text had no `\\` prefix.
    ///
    /// A prefix directly followed by a separator yields `Some("")`.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Namespace segments, left to right. Empty segments are preserved.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Number of namespace segments.
    #[must_use]
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// The class name; `Some("")` when the text ends in a bare `:`.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Whether a key list followed the class name. Key lists are not parsed;
    /// their text survives only in [`PathBuffer::text`].
    #[must_use]
    pub fn has_key_list(&self) -> bool {
        self.has_key_list
    }

    /// The class name as rendered: an empty class renders as no class.
    pub(crate) fn rendered_class(&self) -> Option<&str> {
        self.class_name().filter(|class| !class.is_empty())
    }

    /// The server name as rendered: an empty server renders as the local
    /// machine.
    pub(crate) fn rendered_server(&self) -> Option<&str> {
        self.server().filter(|server| !server.is_empty())
    }
}

impl FromStr for PathBuffer {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}
