use std::path::{Path, PathBuf};

use dashmap::DashMap;

use xmode_core::{Error, PrincipalName, Result, TranslationError};

use super::AclStore;
use crate::ace::{AccessControlEntry, Sid};
use crate::mask::{AccessMask, AceFlags};

/// Owner, group and entry list of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityDescriptor {
    pub owner: Sid,
    pub group: Sid,
    pub entries: Vec<AccessControlEntry>,
    /// Whether inheritable entries from parents are blocked
    pub protected: bool,
}

/// An in-memory implementation of the AclStore trait
///
/// Descriptors are keyed by path exactly as given. An object that has never
/// been written gets a default descriptor: the store's default owner and
/// group and a single inherited full-control entry for the local system
/// account. The store is seeded with the well-known accounts `SYSTEM`,
/// `Users` and `Administrators` and with the default owner and group.
pub struct InMemoryAclStore {
    /// Map from path to descriptor
    descriptors: DashMap<PathBuf, SecurityDescriptor>,

    /// Resolvable accounts
    accounts: DashMap<Sid, PrincipalName>,

    /// Number of committed replacements per path
    writes: DashMap<PathBuf, usize>,

    default_owner: Sid,
    default_group: Sid,
}

impl InMemoryAclStore {
    /// Identity of the default owner, `WORKSTATION\alice`.
    pub const DEFAULT_OWNER: &'static str = "S-1-5-21-1004336348-1177238915-682003330-1001";

    /// Identity of the default group, `WORKSTATION\None`.
    pub const DEFAULT_GROUP: &'static str = "S-1-5-21-1004336348-1177238915-682003330-513";

    /// Creates a new store with the default accounts
    pub fn new() -> Self {
        let store = Self {
            descriptors: DashMap::new(),
            accounts: DashMap::new(),
            writes: DashMap::new(),
            default_owner: Sid::from(Self::DEFAULT_OWNER),
            default_group: Sid::from(Self::DEFAULT_GROUP),
        };

        store.add_account(
            Sid::from(Sid::LOCAL_SYSTEM),
            PrincipalName::new("SYSTEM", "NT AUTHORITY"),
        );
        store.add_account(
            Sid::from(Sid::BUILTIN_USERS),
            PrincipalName::new("Users", "BUILTIN"),
        );
        store.add_account(
            Sid::from(Sid::BUILTIN_ADMINISTRATORS),
            PrincipalName::new("Administrators", "BUILTIN"),
        );
        store.add_account(
            Sid::from(Self::DEFAULT_OWNER),
            PrincipalName::new("alice", "WORKSTATION"),
        );
        store.add_account(
            Sid::from(Self::DEFAULT_GROUP),
            PrincipalName::new("None", "WORKSTATION"),
        );

        store
    }

    /// Make an identity resolvable
    pub fn add_account(&self, sid: Sid, principal: PrincipalName) {
        self.accounts.insert(sid, principal);
    }

    /// Forget an account, orphaning every entry that still refers to it
    pub fn remove_account(&self, sid: &Sid) {
        self.accounts.remove(sid);
    }

    /// Install a descriptor for a path, replacing any existing one
    pub fn set_descriptor(&self, path: &Path, descriptor: SecurityDescriptor) {
        self.descriptors.insert(path.to_path_buf(), descriptor);
    }

    /// The current descriptor of a path
    pub fn descriptor(&self, path: &Path) -> SecurityDescriptor {
        self.descriptors
            .get(path)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| self.default_descriptor())
    }

    /// How many times `replace_entries` has committed for a path
    pub fn write_count(&self, path: &Path) -> usize {
        self.writes.get(path).map(|count| *count).unwrap_or(0)
    }

    fn default_descriptor(&self) -> SecurityDescriptor {
        SecurityDescriptor {
            owner: self.default_owner.clone(),
            group: self.default_group.clone(),
            entries: vec![AccessControlEntry::allow(
                Sid::from(Sid::LOCAL_SYSTEM),
                AccessMask::FILE_ALL_ACCESS,
            )
            .with_flags(AceFlags::INHERITED)],
            protected: false,
        }
    }
}

impl Default for InMemoryAclStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AclStore for InMemoryAclStore {
    fn owner(&self, path: &Path) -> Result<Sid> {
        Ok(self.descriptor(path).owner)
    }

    fn group(&self, path: &Path) -> Result<Sid> {
        Ok(self.descriptor(path).group)
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<AccessControlEntry>> {
        Ok(self.descriptor(path).entries)
    }

    fn replace_entries(&self, path: &Path, entries: &[AccessControlEntry]) -> Result<()> {
        let mut descriptor = self.descriptor(path);
        descriptor.entries = entries.to_vec();
        descriptor.protected = true;
        self.descriptors.insert(path.to_path_buf(), descriptor);

        *self.writes.entry(path.to_path_buf()).or_insert(0) += 1;
        Ok(())
    }

    fn lookup_account(&self, name: &str) -> Result<Sid> {
        self.accounts
            .iter()
            .find(|account| account.value().name.eq_ignore_ascii_case(name))
            .map(|account| account.key().clone())
            .ok_or_else(|| {
                TranslationError::AccountLookupFailed {
                    account: name.to_string(),
                    reason: "no such account".to_string(),
                }
                .into()
            })
    }

    fn resolve(&self, sid: &Sid) -> Result<PrincipalName> {
        self.accounts
            .get(sid)
            .map(|account| account.value().clone())
            .ok_or_else(|| Error::UnresolvedIdentity(sid.to_string()))
    }
}
