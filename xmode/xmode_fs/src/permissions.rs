use std::path::Path;

use tracing::debug;

use xmode_core::{Mode, ModeRequest, ObjectType, PermissionBackend, Result, XmodeConfig};

use crate::backend::PlatformBackend;

/// Get and set the modes of filesystem objects through one backend.
///
/// Every operation checks that the path exists before touching it, so a
/// missing path is reported as `Error::NotFound` and nothing is modified.
pub struct Permissions<B = PlatformBackend> {
    backend: B,
    pub(crate) follow_symlinks: bool,
}

impl Permissions<PlatformBackend> {
    /// Permissions over the backend detected for the running platform
    pub fn detect(config: &XmodeConfig) -> Self {
        Self::with_config(PlatformBackend::detect(config), config)
    }
}

impl<B: PermissionBackend> Permissions<B> {
    /// Create a new facade over `backend` with default settings
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            follow_symlinks: false,
        }
    }

    /// Create a new facade over `backend` using `config`
    pub fn with_config(backend: B, config: &XmodeConfig) -> Self {
        Self {
            backend,
            follow_symlinks: config.follow_symlinks,
        }
    }

    /// The backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether `path` is a file or a directory
    pub fn get_object_type(&self, path: &Path) -> Result<ObjectType> {
        xmode_core::get_object_type(path)
    }

    /// The effective mode of `path`
    pub fn get_mode(&self, path: &Path) -> Result<Mode> {
        let object_type = self.get_object_type(path)?;
        self.backend.read_mode(path, object_type)
    }

    /// Set the mode of `path`.
    ///
    /// A symbolic request is evaluated against the current mode of `path`.
    pub fn set_mode(&self, path: &Path, request: &ModeRequest) -> Result<()> {
        let object_type = self.get_object_type(path)?;
        self.apply(path, object_type, request)
    }

    pub(crate) fn apply(
        &self,
        path: &Path,
        object_type: ObjectType,
        request: &ModeRequest,
    ) -> Result<()> {
        let current = if request.needs_current() {
            self.backend.read_mode(path, object_type)?
        } else {
            Mode::EMPTY
        };
        let mode = request.resolve(current)?;

        debug!(
            "Setting mode of {} {} to {} via {}",
            object_type,
            path.display(),
            mode,
            self.backend.name()
        );
        self.backend.write_mode(path, object_type, mode)
    }
}
