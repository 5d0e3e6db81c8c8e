use crate::{PathError, heap::MemoryLimit};

/// `WBEMPATH_COMPRESSED`. Recognised by `IWbemPath` but not supported here.
pub const WBEMPATH_COMPRESSED: i32 = 0x01;
/// `WBEMPATH_GET_RELATIVE_ONLY`
pub const WBEMPATH_GET_RELATIVE_ONLY: i32 = 0x02;
/// `WBEMPATH_GET_SERVER_TOO`
pub const WBEMPATH_GET_SERVER_TOO: i32 = 0x04;
/// `WBEMPATH_GET_SERVER_AND_NAMESPACE_ONLY`
pub const WBEMPATH_GET_SERVER_AND_NAMESPACE_ONLY: i32 = 0x08;
/// `WBEMPATH_GET_NAMESPACE_ONLY`
pub const WBEMPATH_GET_NAMESPACE_ONLY: i32 = 0x10;
/// `WBEMPATH_GET_ORIGINAL`
pub const WBEMPATH_GET_ORIGINAL: i32 = 0x20;

/// Selects which projection of a parsed path is rendered.
///
/// The discriminants are the `WBEMPATH_GET_*` flag values accepted by
/// `GetText`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputMode {
    /// `root\cimv2:Class`
    #[default]
    Default = 0,
    /// `Class` alone; nothing when there is no class.
    RelativeOnly = WBEMPATH_GET_RELATIVE_ONLY,
    /// `\\server\root\cimv2:Class`, with `\\.` standing in for a missing
    /// server.
    ServerToo = WBEMPATH_GET_SERVER_TOO,
    /// `\\server\root\cimv2`
    ServerAndNamespaceOnly = WBEMPATH_GET_SERVER_AND_NAMESPACE_ONLY,
    /// `root\cimv2`
    NamespaceOnly = WBEMPATH_GET_NAMESPACE_ONLY,
    /// The text exactly as it was set; nothing when no text was set.
    Original = WBEMPATH_GET_ORIGINAL,
}

impl OutputMode {
    /// Every mode, in flag order.
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::RelativeOnly,
        Self::ServerToo,
        Self::ServerAndNamespaceOnly,
        Self::NamespaceOnly,
        Self::Original,
    ];

    /// The raw `WBEMPATH_GET_*` flag value.
    #[must_use]
    pub const fn flags(self) -> i32 {
        self as i32
    }

    /// Maps a raw flag value to a mode. Combined or unknown flags, and
    /// `WBEMPATH_COMPRESSED`, have no mode.
    #[must_use]
    pub const fn from_flags(flags: i32) -> Option<Self> {
        Some(match flags {
            0 => Self::Default,
            WBEMPATH_GET_RELATIVE_ONLY => Self::RelativeOnly,
            WBEMPATH_GET_SERVER_TOO => Self::ServerToo,
            WBEMPATH_GET_SERVER_AND_NAMESPACE_ONLY => Self::ServerAndNamespaceOnly,
            WBEMPATH_GET_NAMESPACE_ONLY => Self::NamespaceOnly,
            WBEMPATH_GET_ORIGINAL => Self::Original,
            _ => return None,
        })
    }
}

impl TryFrom<i32> for OutputMode {
    type Error = PathError;

    fn try_from(flags: i32) -> Result<Self, Self::Error> {
        Self::from_flags(flags).ok_or(PathError::InvalidParameter)
    }
}

bitflags::bitflags! {
    /// The `WBEMPATH_CREATE_*` flags passed to `SetText`.
    ///
    /// Only an empty mode is rejected; the individual flags do not change how
    /// text is parsed.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreateMode: u32 {
        /// `WBEMPATH_CREATE_ACCEPT_RELATIVE`
        const ACCEPT_RELATIVE = 0x01;
        /// `WBEMPATH_CREATE_ACCEPT_ABSOLUTE`
        const ACCEPT_ABSOLUTE = 0x02;
        /// `WBEMPATH_CREATE_ACCEPT_ALL`
        const ACCEPT_ALL = 0x04;
        /// `WBEMPATH_TREAT_SINGLE_IDENT_AS_NS`
        const TREAT_SINGLE_IDENT_AS_NS = 0x08;
    }
}

impl Default for CreateMode {
    fn default() -> Self {
        Self::ACCEPT_ALL
    }
}

/// Configuration for a [`crate::WbemPath`].
///
/// # Default
///
/// No memory limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathOptions {
    /// Upper bound, in bytes, on what a single parse or render may allocate.
    ///
    /// When a `set_text` or `get_text` call would exceed it, the call fails
    /// with [`PathError::OutOfMemory`] and, for `set_text`, the object is
    /// left empty.
    ///
    /// # Default
    ///
    /// `None`, unbounded.
    pub memory_limit: Option<usize>,
}

impl PathOptions {
    /// A fresh heap enforcing these options for one operation.
    pub(crate) const fn heap(&self) -> MemoryLimit {
        match self.memory_limit {
            Some(limit) => MemoryLimit::new(limit),
            None => MemoryLimit::new(usize::MAX),
        }
    }
}
