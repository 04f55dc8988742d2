//! Bottom-up application of modes to whole trees.

use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use xmode_core::{Error, ModeRequest, ObjectType, PermissionBackend, Result};

use crate::permissions::Permissions;

fn walk_error(error: walkdir::Error) -> Error {
    let path = error.path().map(Path::to_path_buf);
    let error = io::Error::from(error);
    match path {
        Some(path) if error.kind() == io::ErrorKind::NotFound => Error::NotFound(path),
        _ => Error::Io(error),
    }
}

impl<B: PermissionBackend> Permissions<B> {
    /// Apply `file_mode` to every file and `dir_mode` to every directory
    /// under `root`, including `root` itself.
    ///
    /// `dir_mode` defaults to `file_mode`. A directory is changed only after
    /// everything beneath it, and `root` is changed last, so narrowing a
    /// directory never blocks the rest of the walk. When `root` is a file only
    /// `file_mode` is applied to it.
    ///
    /// Symbolic links are skipped unless the configuration asks for them to
    /// be followed.
    pub fn set_mode_recursive(
        &self,
        root: &Path,
        file_mode: &ModeRequest,
        dir_mode: Option<&ModeRequest>,
    ) -> Result<()> {
        let dir_mode = dir_mode.unwrap_or(file_mode);

        if self.get_object_type(root)? == ObjectType::File {
            return self.apply(root, ObjectType::File, file_mode);
        }

        info!(
            "Applying {} to files and {} to directories under {}",
            file_mode,
            dir_mode,
            root.display()
        );

        let walker = WalkDir::new(root)
            .min_depth(1)
            .contents_first(true)
            .follow_links(self.follow_symlinks);

        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                debug!("Skipping symbolic link {}", entry.path().display());
                continue;
            }

            if file_type.is_dir() {
                self.apply(entry.path(), ObjectType::Directory, dir_mode)?;
            } else {
                self.apply(entry.path(), ObjectType::File, file_mode)?;
            }
        }

        self.apply(root, ObjectType::Directory, dir_mode)
    }
}
