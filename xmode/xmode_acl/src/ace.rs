//! Access-control entries.

use std::fmt;

use crate::mask::{AccessMask, AceFlags};

/// A security identifier in its string form, e.g. `S-1-5-18`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sid(String);

impl Sid {
    /// The local system account.
    pub const LOCAL_SYSTEM: &'static str = "S-1-5-18";

    /// The built-in Users group.
    pub const BUILTIN_USERS: &'static str = "S-1-5-32-545";

    /// The built-in Administrators group.
    pub const BUILTIN_ADMINISTRATORS: &'static str = "S-1-5-32-544";

    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sid {
    fn from(sid: &str) -> Self {
        Self::new(sid)
    }
}

/// The type of an access-control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AceKind {
    AccessAllowed,
    AccessDenied,
    SystemAudit,
    SystemAlarm,
    /// Any other (object, callback, ...) entry type, by raw value
    Other(u8),
}

impl AceKind {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::AccessAllowed,
            1 => Self::AccessDenied,
            2 => Self::SystemAudit,
            3 => Self::SystemAlarm,
            other => Self::Other(other),
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::AccessAllowed => 0,
            Self::AccessDenied => 1,
            Self::SystemAudit => 2,
            Self::SystemAlarm => 3,
            Self::Other(other) => other,
        }
    }
}

/// One rule of an object's access-control list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlEntry {
    /// Entry type
    pub kind: AceKind,

    /// Inheritance flags
    pub flags: AceFlags,

    /// Rights granted or denied
    pub mask: AccessMask,

    /// Identity the entry applies to
    pub sid: Sid,
}

impl AccessControlEntry {
    /// An explicit, non-inherited allow entry.
    pub fn allow(sid: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::AccessAllowed,
            flags: AceFlags::NO_INHERITANCE,
            mask,
            sid,
        }
    }

    /// An explicit, non-inherited deny entry.
    pub fn deny(sid: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::AccessDenied,
            flags: AceFlags::NO_INHERITANCE,
            mask,
            sid,
        }
    }

    /// Replace the inheritance flags.
    pub fn with_flags(mut self, flags: AceFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_allow(&self) -> bool {
        self.kind == AceKind::AccessAllowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ace_kind_raw_values() {
        for raw in 0..=8u8 {
            assert_eq!(AceKind::from_raw(raw).as_raw(), raw);
        }
        assert_eq!(AceKind::from_raw(1), AceKind::AccessDenied);
    }

    #[test]
    fn test_constructors() {
        let entry =
            AccessControlEntry::allow(Sid::from(Sid::LOCAL_SYSTEM), AccessMask::FILE_ALL_ACCESS);
        assert!(entry.is_allow());
        assert!(entry.flags.is_empty());

        let entry = AccessControlEntry::deny(Sid::from("S-1-1-0"), AccessMask::DELETE)
            .with_flags(AceFlags::INHERITED);
        assert!(!entry.is_allow());
        assert_eq!(entry.flags, AceFlags::INHERITED);
        assert_eq!(entry.sid.to_string(), "S-1-1-0");
    }
}
