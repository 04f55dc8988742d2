//! The `set` command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use xmode_core::{ModeRequest, PermissionBackend};
use xmode_fs::Permissions;

/// Arguments for the set command
#[derive(Args)]
pub struct SetArgs {
    /// Recurse into directories, changing each directory after its contents
    #[clap(short = 'R', long)]
    pub recursive: bool,

    /// Mode for directories when recursing (defaults to MODE)
    #[clap(
        long,
        value_name = "MODE",
        requires = "recursive",
        allow_hyphen_values = true
    )]
    pub dir_mode: Option<ModeRequest>,

    /// Octal mode (e.g. 640) or symbolic expression (e.g. u+x,go-w)
    #[clap(allow_hyphen_values = true)]
    pub mode: ModeRequest,

    /// Paths to change
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Implementation of the set command
pub fn execute<B: PermissionBackend>(
    args: &SetArgs,
    permissions: &Permissions<B>,
) -> anyhow::Result<()> {
    for path in &args.paths {
        if args.recursive {
            permissions
                .set_mode_recursive(path, &args.mode, args.dir_mode.as_ref())
                .with_context(|| {
                    format!("failed to set mode of {} recursively", path.display())
                })?;
        } else {
            permissions
                .set_mode(path, &args.mode)
                .with_context(|| format!("failed to set mode of {}", path.display()))?;
        }
    }

    Ok(())
}
