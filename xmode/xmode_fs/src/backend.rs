//! Permission backends and their selection at startup.

use std::fs;
use std::io;
use std::path::Path;

use xmode_acl::{AclStore, AclTranslator};
use xmode_core::{Error, Mode, ObjectType, PermissionBackend, Result, XmodeConfig};

/// Backend for hosts whose native permission field is the nine-bit mode.
///
/// Reads return the low nine bits of the native mode; writes replace the
/// whole permission field, so setuid, setgid and sticky bits are cleared.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeModeBackend;

fn io_error(path: &Path, error: io::Error) -> Error {
    if error.kind() == io::ErrorKind::NotFound {
        Error::NotFound(path.to_path_buf())
    } else {
        Error::Io(error)
    }
}

#[cfg(unix)]
impl PermissionBackend for NativeModeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn read_mode(&self, path: &Path, _object_type: ObjectType) -> Result<Mode> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        Ok(Mode::from_bits_truncate(metadata.permissions().mode()))
    }

    fn write_mode(&self, path: &Path, _object_type: ObjectType, mode: Mode) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(u32::from(mode)))
            .map_err(|e| io_error(path, e))
    }
}

#[cfg(not(unix))]
impl PermissionBackend for NativeModeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn read_mode(&self, path: &Path, _object_type: ObjectType) -> Result<Mode> {
        fs::metadata(path).map_err(|e| io_error(path, e))?;
        Err(Error::Unsupported(
            "this platform has no native nine-bit mode".to_string(),
        ))
    }

    fn write_mode(&self, path: &Path, _object_type: ObjectType, _mode: Mode) -> Result<()> {
        fs::metadata(path).map_err(|e| io_error(path, e))?;
        Err(Error::Unsupported(
            "this platform has no native nine-bit mode".to_string(),
        ))
    }
}

/// The backend for the host platform, chosen once and injected into every
/// caller.
pub enum PlatformBackend {
    /// The native field is the mode itself
    NativeMode(NativeModeBackend),

    /// The native model is an access-control list
    AclBased(AclTranslator<Box<dyn AclStore>>),
}

impl PlatformBackend {
    /// Select the backend for the running platform.
    #[cfg(windows)]
    pub fn detect(config: &XmodeConfig) -> Self {
        let store: Box<dyn AclStore> = Box::new(xmode_acl::WindowsAclStore::new());
        Self::AclBased(AclTranslator::new(store, config))
    }

    /// Select the backend for the running platform.
    #[cfg(not(windows))]
    pub fn detect(_config: &XmodeConfig) -> Self {
        Self::NativeMode(NativeModeBackend)
    }

    /// An ACL backend over an arbitrary store.
    pub fn acl(store: Box<dyn AclStore>, config: &XmodeConfig) -> Self {
        Self::AclBased(AclTranslator::new(store, config))
    }

    fn inner(&self) -> &dyn PermissionBackend {
        match self {
            Self::NativeMode(backend) => backend,
            Self::AclBased(backend) => backend,
        }
    }
}

impl PermissionBackend for PlatformBackend {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn read_mode(&self, path: &Path, object_type: ObjectType) -> Result<Mode> {
        self.inner().read_mode(path, object_type)
    }

    fn write_mode(&self, path: &Path, object_type: ObjectType, mode: Mode) -> Result<()> {
        self.inner().write_mode(path, object_type, mode)
    }
}
