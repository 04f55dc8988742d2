//! Backend trait definitions.
//!
//! A `PermissionBackend` reads and writes the nine-bit mode of a single
//! object in terms of whatever the host platform stores natively. Exactly one
//! backend is chosen at startup and handed to every caller.

use std::path::Path;

use crate::error::Result;
use crate::mode::{Mode, ObjectType};

/// Core trait for platform permission backends.
///
/// Callers have already established that `path` exists and classified it;
/// backends only translate.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::sync::Mutex;
///
/// use xmode_core::{Mode, ObjectType, PermissionBackend, Result};
///
/// struct FixedBackend(Mutex<Mode>);
///
/// impl PermissionBackend for FixedBackend {
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
///
///     fn read_mode(&self, _path: &Path, _object_type: ObjectType) -> Result<Mode> {
///         Ok(*self.0.lock().unwrap())
///     }
///
///     fn write_mode(&self, _path: &Path, _object_type: ObjectType, mode: Mode) -> Result<()> {
///         *self.0.lock().unwrap() = mode;
///         Ok(())
///     }
/// }
///
/// let backend = FixedBackend(Mutex::new(Mode::EMPTY));
/// backend.write_mode(Path::new("x"), ObjectType::File, Mode::ALL).unwrap();
/// assert_eq!(backend.read_mode(Path::new("x"), ObjectType::File).unwrap(), Mode::ALL);
/// ```
pub trait PermissionBackend: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Read the effective mode of an existing object.
    ///
    /// # Arguments
    ///
    /// * `path` - The object to inspect.
    /// * `object_type` - Whether the object is a file or a directory.
    ///
    /// # Returns
    ///
    /// * `Ok(Mode)` with the object's permissions.
    /// * `Err(Error::Translation)` if the platform could not be queried.
    fn read_mode(&self, path: &Path, object_type: ObjectType) -> Result<Mode>;

    /// Replace the permissions of an existing object so that reading them back
    /// yields exactly `mode`.
    ///
    /// # Arguments
    ///
    /// * `path` - The object to modify.
    /// * `object_type` - Whether the object is a file or a directory.
    /// * `mode` - The permissions to apply.
    fn write_mode(&self, path: &Path, object_type: ObjectType, mode: Mode) -> Result<()>;
}

impl<B: PermissionBackend + ?Sized> PermissionBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_mode(&self, path: &Path, object_type: ObjectType) -> Result<Mode> {
        (**self).read_mode(path, object_type)
    }

    fn write_mode(&self, path: &Path, object_type: ObjectType, mode: Mode) -> Result<()> {
        (**self).write_mode(path, object_type, mode)
    }
}
