//! # xmode Core
//!
//! `xmode_core` provides the platform-independent half of xmode: the nine-bit
//! permission model, the chmod-style symbolic expression evaluator, the error
//! taxonomy shared by every crate, and the trait that platform backends
//! implement.
//!
//! ## Permission Model
//!
//! A [`Mode`] is a nine-bit value split into three fields, one per
//! [`Subject`] (owner, group, other), each holding read/write/execute bits:
//!
//! ```text
//!   owner   group   other
//!   r w x   r w x   r w x
//!   8 7 6   5 4 3   2 1 0
//! ```
//!
//! Backends translate this value to and from whatever the host platform stores
//! natively. On POSIX hosts that is the identity; on ACL hosts it is a full
//! translation (see the `xmode_acl` crate).
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all xmode components
//! - **mode**: `Mode`, `Subject`, `Operation`, `ObjectType`
//! - **symbolic**: symbolic expression parsing and evaluation, `ModeRequest`
//! - **traits**: the `PermissionBackend` interface
//! - **utils**: configuration and logging helpers
//!
//! ## Example
//!
//! ```
//! use xmode_core::{get_effective_mode, Mode};
//!
//! let mode = Mode::from_bits_truncate(0o644);
//! let mode = get_effective_mode(mode, "u+x,go-r").unwrap();
//! assert_eq!(mode.bits(), 0o700);
//! ```

pub mod error;
pub mod mode;
pub mod symbolic;
pub mod traits;
pub mod utils;

pub use error::{ConfigError, Error, FormatError, Result, TranslationError};
pub use mode::{get_object_type, Mode, ObjectType, Operation, Subject};
pub use symbolic::{get_effective_mode, ModeRequest, Operator, SymbolicClause, Who};
pub use traits::PermissionBackend;
pub use utils::{LogLevel, PrincipalName, XmodeConfig};
