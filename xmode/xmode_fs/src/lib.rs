//! # xmode FS
//!
//! Platform-uniform mode operations on real filesystem objects.
//!
//! [`Permissions`] is the entry point: it wraps one [`PermissionBackend`],
//! chosen once at startup by [`PlatformBackend::detect`], and offers
//! `get_mode`, `set_mode`, `get_object_type` and `set_mode_recursive`.
//!
//! ```no_run
//! use std::path::Path;
//! use xmode_core::{ModeRequest, XmodeConfig};
//! use xmode_fs::Permissions;
//!
//! # fn main() -> xmode_core::Result<()> {
//! let permissions = Permissions::detect(&XmodeConfig::default());
//! permissions.set_mode(Path::new("deploy.sh"), &ModeRequest::parse("u+x")?)?;
//! permissions.set_mode_recursive(
//!     Path::new("private"),
//!     &ModeRequest::parse("600")?,
//!     Some(&ModeRequest::parse("700")?),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! [`PermissionBackend`]: xmode_core::PermissionBackend

pub mod backend;
pub mod permissions;
pub mod recursive;

pub use backend::{NativeModeBackend, PlatformBackend};
pub use permissions::Permissions;
