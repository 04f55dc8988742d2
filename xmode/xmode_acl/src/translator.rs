//! Translation between nine-bit modes and access-control lists.
//!
//! # Read path
//!
//! The owner, group and "other" identities are resolved once. Every
//! allow-type entry is then resolved to its account; entries of the system
//! principal are skipped, orphaned ones are reported and skipped, and the
//! rest are attributed to a subject by identity (owner, then group, then
//! other). An entry grants an operation only if its mask contains the whole
//! rights bundle for that operation. Grants from several entries for the same
//! subject are OR-ed together.
//!
//! # Write path
//!
//! The entry list is rewritten, never patched. Only allow-type entries are
//! candidates for keeping: the last allow entry of the system principal
//! survives, and system-principal entries of any other type (deny, audit) are
//! dropped with everything else. An entry whose identity fails to resolve for
//! any reason is simply not the system principal. One explicit,
//! non-inheriting allow entry is then added per subject whose field is
//! non-zero, and the whole list is committed in one update.
//!
//! Deny entries are neither interpreted on read nor produced on write.

use std::path::Path;

use tracing::{debug, trace, warn};

use xmode_core::{
    Error, Mode, ObjectType, PermissionBackend, PrincipalName, Result, Subject, XmodeConfig,
};

use crate::ace::{AccessControlEntry, Sid};
use crate::rights::RightsTable;
use crate::store::AclStore;

/// Identities standing for the three subjects of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectIdentities {
    pub owner: Sid,
    pub group: Sid,
    /// The configured stand-in for "everyone else"; not the true complement
    /// of owner and group
    pub other: Sid,
}

impl SubjectIdentities {
    /// The identity used for `subject`.
    pub fn sid(&self, subject: Subject) -> &Sid {
        match subject {
            Subject::Owner => &self.owner,
            Subject::Group => &self.group,
            Subject::Other => &self.other,
        }
    }

    /// The subject an entry for `sid` is attributed to.
    ///
    /// Any identity that is neither the owner nor the group counts as other.
    pub fn subject_of(&self, sid: &Sid) -> Subject {
        if *sid == self.owner {
            Subject::Owner
        } else if *sid == self.group {
            Subject::Group
        } else {
            Subject::Other
        }
    }
}

/// How an entry's identity resolved
enum EntryIdentity {
    System,
    Account,
    Orphaned,
}

/// Permission backend for platforms whose native model is an
/// access-control list.
pub struct AclTranslator<S> {
    store: S,
    other_principal: String,
    system_principal: PrincipalName,
}

impl<S: AclStore> AclTranslator<S> {
    /// Creates a translator over `store` using the principals in `config`
    pub fn new(store: S, config: &XmodeConfig) -> Self {
        Self {
            store,
            other_principal: config.other_principal.clone(),
            system_principal: config.system_principal.clone(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the owner, group and other identities of an object
    pub fn identities(&self, path: &Path) -> Result<SubjectIdentities> {
        Ok(SubjectIdentities {
            owner: self.store.owner(path)?,
            group: self.store.group(path)?,
            other: self.store.lookup_account(&self.other_principal)?,
        })
    }

    fn classify(&self, entry: &AccessControlEntry) -> Result<EntryIdentity> {
        match self.store.resolve(&entry.sid) {
            Ok(account) if self.system_principal.matches(&account.name, &account.domain) => {
                Ok(EntryIdentity::System)
            }
            Ok(_) => Ok(EntryIdentity::Account),
            Err(Error::UnresolvedIdentity(_)) => Ok(EntryIdentity::Orphaned),
            Err(e) => Err(e),
        }
    }

    /// Read the mode an object's entry list grants
    pub fn get_permissions(&self, path: &Path, object_type: ObjectType) -> Result<Mode> {
        let identities = self.identities(path)?;
        let table = RightsTable::for_object(object_type);

        let mut mode = Mode::EMPTY;
        for entry in self.store.read_entries(path)? {
            if !entry.is_allow() {
                continue;
            }

            match self.classify(&entry)? {
                EntryIdentity::System => {
                    trace!("Skipping system entry {} on {}", entry.sid, path.display());
                    continue;
                }
                EntryIdentity::Orphaned => {
                    warn!(
                        "{} on {}",
                        Error::UnresolvedIdentity(entry.sid.to_string()),
                        path.display()
                    );
                    continue;
                }
                EntryIdentity::Account => {}
            }

            let subject = identities.subject_of(&entry.sid);
            mode = mode | table.mode_for(entry.mask, subject);
        }

        Ok(mode)
    }

    /// Rewrite an object's entry list so that it grants exactly `mode`
    pub fn set_permissions(&self, path: &Path, object_type: ObjectType, mode: Mode) -> Result<()> {
        let mut system_entry = None;
        for entry in self.store.read_entries(path)? {
            if !entry.is_allow() {
                continue;
            }
            match self.classify(&entry) {
                Ok(EntryIdentity::System) => system_entry = Some(entry),
                Ok(EntryIdentity::Orphaned) => {
                    debug!("Discarding orphaned entry {} on {}", entry.sid, path.display());
                }
                Ok(EntryIdentity::Account) => {}
                Err(e) => {
                    debug!("Discarding entry {} on {}: {}", entry.sid, path.display(), e);
                }
            }
        }

        let mut entries = Vec::with_capacity(4);
        if let Some(system) = system_entry {
            entries.push(AccessControlEntry::allow(system.sid, system.mask));
        }

        let identities = self.identities(path)?;
        let table = RightsTable::for_object(object_type);
        for subject in Subject::ALL {
            let mask = table.mask_for(mode, subject);
            if !mask.is_empty() {
                entries.push(AccessControlEntry::allow(
                    identities.sid(subject).clone(),
                    mask,
                ));
            }
        }

        self.store.replace_entries(path, &entries)
    }
}

impl<S: AclStore> PermissionBackend for AclTranslator<S> {
    fn name(&self) -> &'static str {
        "acl"
    }

    fn read_mode(&self, path: &Path, object_type: ObjectType) -> Result<Mode> {
        self.get_permissions(path, object_type)
    }

    fn write_mode(&self, path: &Path, object_type: ObjectType, mode: Mode) -> Result<()> {
        self.set_permissions(path, object_type, mode)
    }
}
