//! The `get` command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use xmode_core::PermissionBackend;
use xmode_fs::Permissions;

/// Arguments for the get command
#[derive(Args)]
pub struct GetArgs {
    /// Paths to inspect
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Implementation of the get command.
///
/// Prints one line per path: octal mode, `rwx` rendering, object type, path.
pub fn execute<B: PermissionBackend>(
    args: &GetArgs,
    permissions: &Permissions<B>,
) -> anyhow::Result<()> {
    for path in &args.paths {
        let object_type = permissions
            .get_object_type(path)
            .with_context(|| format!("cannot inspect {}", path.display()))?;
        let mode = permissions
            .get_mode(path)
            .with_context(|| format!("failed to read mode of {}", path.display()))?;

        println!(
            "{} {} {} {}",
            mode,
            mode.to_rwx_string(),
            object_type,
            path.display()
        );
    }

    Ok(())
}
