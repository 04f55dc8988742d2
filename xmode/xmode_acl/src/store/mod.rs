mod in_memory;
#[cfg(windows)]
mod windows;

use std::path::Path;
use std::sync::Arc;

use xmode_core::{PrincipalName, Result};

use crate::ace::{AccessControlEntry, Sid};

pub use in_memory::{InMemoryAclStore, SecurityDescriptor};
#[cfg(windows)]
pub use windows::WindowsAclStore;

/// Access to the security descriptors of filesystem objects.
///
/// This is everything the translator needs from an ACL platform: the owner
/// and group identities of an object, its discretionary entry list, a way to
/// replace that list in one update, and identity/name resolution.
pub trait AclStore: Send + Sync {
    /// Identity of the object's owner
    fn owner(&self, path: &Path) -> Result<Sid>;

    /// Identity of the object's primary group
    fn group(&self, path: &Path) -> Result<Sid>;

    /// Every entry of the object's discretionary access-control list, in
    /// order, including inherited ones
    fn read_entries(&self, path: &Path) -> Result<Vec<AccessControlEntry>>;

    /// Replace the object's entry list with `entries` as a single update.
    ///
    /// The new list is protected: entries inheritable from parent containers
    /// are not merged in. Only the object itself changes; the inherited
    /// entries of its descendants are left as they are.
    fn replace_entries(&self, path: &Path, entries: &[AccessControlEntry]) -> Result<()>;

    /// Identity of a named account
    fn lookup_account(&self, name: &str) -> Result<Sid>;

    /// Account an identity belongs to.
    ///
    /// Returns `Error::UnresolvedIdentity` when the identity refers to an
    /// account that no longer exists.
    fn resolve(&self, sid: &Sid) -> Result<PrincipalName>;
}

impl<S: AclStore + ?Sized> AclStore for Box<S> {
    fn owner(&self, path: &Path) -> Result<Sid> {
        (**self).owner(path)
    }

    fn group(&self, path: &Path) -> Result<Sid> {
        (**self).group(path)
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<AccessControlEntry>> {
        (**self).read_entries(path)
    }

    fn replace_entries(&self, path: &Path, entries: &[AccessControlEntry]) -> Result<()> {
        (**self).replace_entries(path, entries)
    }

    fn lookup_account(&self, name: &str) -> Result<Sid> {
        (**self).lookup_account(name)
    }

    fn resolve(&self, sid: &Sid) -> Result<PrincipalName> {
        (**self).resolve(sid)
    }
}

impl<S: AclStore + ?Sized> AclStore for Arc<S> {
    fn owner(&self, path: &Path) -> Result<Sid> {
        (**self).owner(path)
    }

    fn group(&self, path: &Path) -> Result<Sid> {
        (**self).group(path)
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<AccessControlEntry>> {
        (**self).read_entries(path)
    }

    fn replace_entries(&self, path: &Path, entries: &[AccessControlEntry]) -> Result<()> {
        (**self).replace_entries(path, entries)
    }

    fn lookup_account(&self, name: &str) -> Result<Sid> {
        (**self).lookup_account(name)
    }

    fn resolve(&self, sid: &Sid) -> Result<PrincipalName> {
        (**self).resolve(sid)
    }
}
