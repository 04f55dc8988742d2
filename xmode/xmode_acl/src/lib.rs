//! # xmode ACL
//!
//! Translation between nine-bit modes and the access-control lists of ACL
//! platforms.
//!
//! An ACL host has no owner/group/other triple. It has a list of entries,
//! each granting (or denying) a mask of fine-grained rights to one identity.
//! This crate maps the two models onto each other:
//!
//! - every (subject, operation) pair is mapped to a fixed bundle of rights,
//!   with separate tables for files and directories (`rights`)
//! - the owner and group of a mode are the object's owner and primary group;
//!   "other" is a configured built-in group
//! - reading grants an operation only when an entry holds the whole bundle
//! - writing replaces the entry list with exactly one entry per subject that
//!   has any bits, plus the system principal's entry if one existed
//!
//! ## Crate Structure
//!
//! - **mask**: access rights and entry flags
//! - **rights**: the rights tables
//! - **ace**: identities and entries
//! - **store**: the `AclStore` interface with in-memory and Windows
//!   implementations
//! - **translator**: `AclTranslator`, the `PermissionBackend` for ACL hosts

pub mod ace;
pub mod mask;
pub mod rights;
pub mod store;
pub mod translator;

pub use ace::{AccessControlEntry, AceKind, Sid};
pub use mask::{AccessMask, AceFlags};
pub use rights::{RightsTable, DIRECTORY_RIGHTS, FILE_RIGHTS};
pub use store::{AclStore, InMemoryAclStore, SecurityDescriptor};
#[cfg(windows)]
pub use store::WindowsAclStore;
pub use translator::{AclTranslator, SubjectIdentities};
