use alloc::sync::Arc;
use core::ops::Deref;

use log::{trace, warn};
use uuid::Uuid;

use crate::{PathError, PathOptions, WbemPath};

/// `IID_IUnknown`
pub const IID_IUNKNOWN: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_c000_0000_0000_0046);
/// `IID_IWbemPath`
pub const IID_IWBEMPATH: Uuid = Uuid::from_u128(0x3bc1_5af2_736c_477e_9e51_238a_f866_7dcc);

/// A counted reference to a shared [`WbemPath`].
///
/// Every handle is one reference. [`PathObject::acquire`] adds one and
/// [`PathObject::release`] gives one back; the path and its buffer are
/// dropped exactly once, when the last handle goes. The count is atomic, so
/// handles may be sent to other threads.
///
/// Reads go through [`Deref`]. Mutation needs [`PathObject::get_mut`], which
/// only succeeds for the sole handle, so `set_text` can never race a read.
#[derive(Debug)]
pub struct PathObject {
    inner: Arc<WbemPath>,
}

impl PathObject {
    /// Creates an empty path object holding one reference.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(PathOptions::default())
    }

    /// Creates an empty path object with `options`, holding one reference.
    #[must_use]
    pub fn with_options(options: PathOptions) -> Self {
        let inner = Arc::new(WbemPath::with_options(options));
        trace!(target: "wbempath", "created {:p}", Arc::as_ptr(&inner));
        Self { inner }
    }

    /// Takes another reference to the same object.
    #[must_use]
    pub fn acquire(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Current number of references.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Gives up this reference and returns how many remain.
    ///
    /// Zero means this call destroyed the object. Other values are a snapshot
    /// and may already be stale if other threads hold references.
    pub fn release(self) -> usize {
        let remaining = Arc::strong_count(&self.inner).saturating_sub(1);
        match Arc::into_inner(self.inner) {
            Some(path) => {
                drop(path);
                0
            }
            None => remaining.max(1),
        }
    }

    /// Returns a new reference if `iid` names an interface this object
    /// implements.
    ///
    /// # Errors
    ///
    /// [`PathError::NoSuchInterface`] for any interface other than
    /// `IUnknown` and `IWbemPath`.
    pub fn query_interface(&self, iid: &Uuid) -> Result<Self, PathError> {
        trace!(target: "wbempath", "query_interface {:p} {iid}", Arc::as_ptr(&self.inner));

        if *iid == IID_IUNKNOWN || *iid == IID_IWBEMPATH {
            Ok(self.acquire())
        } else {
            warn!(target: "wbempath", "interface {iid} not implemented");
            Err(PathError::NoSuchInterface)
        }
    }

    /// Exclusive access to the path, available only while this is the sole
    /// reference.
    pub fn get_mut(&mut self) -> Option<&mut WbemPath> {
        Arc::get_mut(&mut self.inner)
    }

    /// Whether both handles refer to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for PathObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PathObject {
    fn clone(&self) -> Self {
        self.acquire()
    }
}

impl Deref for PathObject {
    type Target = WbemPath;

    fn deref(&self) -> &WbemPath {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{CreateMode, ObjectPath, OutputMode};

    #[test]
    fn starts_with_one_reference() {
        let path = PathObject::new();
        assert_eq!(path.ref_count(), 1);
        assert_eq!(path.release(), 0);
    }

    #[test]
    fn acquire_and_release_track_count() {
        let first = PathObject::new();
        let second = first.acquire();
        let third = second.clone();
        assert_eq!(first.ref_count(), 3);
        assert!(first.ptr_eq(&third));

        assert_eq!(third.release(), 2);
        assert_eq!(second.release(), 1);
        assert_eq!(first.ref_count(), 1);
        assert_eq!(first.release(), 0);
    }

    #[test]
    fn query_interface_matches_supported_ids() {
        let path = PathObject::new();
        let unknown = path.query_interface(&IID_IUNKNOWN).unwrap();
        let wbem = path.query_interface(&IID_IWBEMPATH).unwrap();
        assert!(unknown.ptr_eq(&path));
        assert!(wbem.ptr_eq(&path));
        assert_eq!(path.ref_count(), 3);

        // IWbemPathKeyList
        let key_list = Uuid::from_u128(0x9ae6_2877_7544_4bb0_aa26_a138_2465_9ed6);
        assert_eq!(
            path.query_interface(&key_list).map(|_| ()),
            Err(PathError::NoSuchInterface)
        );
        assert_eq!(path.ref_count(), 3);
    }

    #[test]
    fn mutation_requires_sole_reference() {
        let mut path = PathObject::new();
        path.get_mut()
            .unwrap()
            .set_text(CreateMode::ACCEPT_ALL, Some(r"\\server\root:Cls"))
            .unwrap();

        let reader = path.acquire();
        assert!(path.get_mut().is_none());
        assert_eq!(reader.text(OutputMode::RelativeOnly).unwrap().as_deref(), Some("Cls"));

        assert_eq!(reader.release(), 1);
        assert!(path.get_mut().is_some());
    }

    #[test]
    fn references_cross_threads() {
        let mut path = PathObject::new();
        path.get_mut()
            .unwrap()
            .set_text(CreateMode::ACCEPT_ALL, Some(r"\\server\root\cimv2:Cls"))
            .unwrap();

        let workers: std::vec::Vec<_> = (0..4)
            .map(|_| {
                let handle = path.acquire();
                thread::spawn(move || {
                    let count = handle.namespace_count().unwrap();
                    handle.release();
                    count
                })
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().unwrap(), 2);
        }
        assert_eq!(path.ref_count(), 1);
    }
}
