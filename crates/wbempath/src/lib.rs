//! Parsing and rendering of WBEM object paths.
//!
//! A path such as `\\server\root\cimv2:Win32_Process` is decomposed into a
//! server, an ordered list of namespace segments and a class name, and can be
//! rendered back in several projections:
//!
//! ```rust
//! use wbempath::{CreateMode, ObjectPath, OutputMode, WbemPath};
//!
//! let mut path = WbemPath::new();
//! path.set_text(CreateMode::ACCEPT_ALL, Some(r"root\cimv2:Win32_Process"))?;
//!
//! assert_eq!(path.namespace_count()?, 2);
//! assert_eq!(
//!     path.text(OutputMode::ServerAndNamespaceOnly)?.as_deref(),
//!     Some(r"\\.\root\cimv2")
//! );
//! assert_eq!(path.text(OutputMode::RelativeOnly)?.as_deref(), Some("Win32_Process"));
//! # Ok::<(), wbempath::PathError>(())
//! ```
//!
//! Key lists (`.Name="value"` after the class) are not parsed. They are kept
//! in the original text and flagged by [`PathBuffer::has_key_list`].

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod builder;
mod error;
mod handle;
pub mod heap;
mod object;
mod options;
mod parser;


pub use buffer::PathBuffer;
pub use builder::{Rendered, build, build_in, decode_wide};
pub use error::PathError;
pub use handle::{IID_IUNKNOWN, IID_IWBEMPATH, PathObject};
pub use object::{ObjectPath, WbemPath};
pub use options::{
    CreateMode, OutputMode, PathOptions, WBEMPATH_COMPRESSED, WBEMPATH_GET_NAMESPACE_ONLY,
    WBEMPATH_GET_ORIGINAL, WBEMPATH_GET_RELATIVE_ONLY, WBEMPATH_GET_SERVER_AND_NAMESPACE_ONLY,
    WBEMPATH_GET_SERVER_TOO,
};
pub use parser::{parse, parse_in};
pub use uuid::Uuid;
