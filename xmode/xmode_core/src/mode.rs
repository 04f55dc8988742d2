//! The nine-bit permission model.
//!
//! This module defines [`Mode`] together with the two axes it is indexed by,
//! [`Subject`] and [`Operation`], and [`ObjectType`], which backends use to
//! pick the right rights table for an object.

use std::fmt;
use std::fs;
use std::io;
use std::ops::{BitAnd, BitOr, Not};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, FormatError, Result};

/// One of the three permission-bearing roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    /// The owning user
    Owner,

    /// The owning group
    Group,

    /// Everyone else
    Other,
}

impl Subject {
    /// All subjects, in field order from high bits to low bits.
    pub const ALL: [Subject; 3] = [Subject::Owner, Subject::Group, Subject::Other];

    /// Bit offset of this subject's three-bit field within a mode.
    pub const fn shift(self) -> u32 {
        match self {
            Self::Owner => 6,
            Self::Group => 3,
            Self::Other => 0,
        }
    }

    /// Mask selecting this subject's field (0o700, 0o070 or 0o007).
    pub const fn field_mask(self) -> u16 {
        0o7 << self.shift()
    }

    /// The `ugo` letter for this subject.
    pub const fn letter(self) -> char {
        match self {
            Self::Owner => 'u',
            Self::Group => 'g',
            Self::Other => 'o',
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "owner",
            Self::Group => "group",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One of the three coarse operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Read,
    Write,
    Execute,
}

impl Operation {
    /// All operations, in field order from high bit to low bit.
    pub const ALL: [Operation; 3] = [Operation::Read, Operation::Write, Operation::Execute];

    /// The bit for this operation within a three-bit field (4, 2 or 1).
    pub const fn bit(self) -> u16 {
        match self {
            Self::Read => 0o4,
            Self::Write => 0o2,
            Self::Execute => 0o1,
        }
    }

    /// The `rwx` letter for this operation.
    pub const fn letter(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
            Self::Execute => 'x',
        }
    }

    /// Maps an `rwx` letter back to its operation.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            'x' => Some(Self::Execute),
            _ => None,
        }
    }
}

/// Whether a filesystem object is a plain file or a container.
///
/// ACL platforms model mutation of a container (adding and removing children,
/// traversal) with different rights than mutation of file contents, so the
/// object type selects which rights table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    File,
    Directory,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Classify a path as a file or a directory.
///
/// Symbolic links are followed. Anything that is not a directory is treated
/// as a file.
///
/// # Errors
///
/// * `Error::NotFound` if the path (or a link's target) does not exist.
/// * `Error::Io` for any other metadata failure.
pub fn get_object_type(path: &Path) -> Result<ObjectType> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(ObjectType::Directory),
        Ok(_) => Ok(ObjectType::File),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(path.to_path_buf())),
        Err(e) => Err(Error::Io(e)),
    }
}

/// A nine-bit permission value.
///
/// Only the low nine bits are ever set; every constructor and operator keeps
/// that invariant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Mode(u16);

impl Mode {
    /// The permission bits.
    pub const MASK: u16 = 0o777;

    /// No permissions.
    pub const EMPTY: Mode = Mode(0);

    /// Every permission for every subject.
    pub const ALL: Mode = Mode(Self::MASK);

    /// Length of the `rwxrwxrwx` rendering.
    pub const RWX_LEN: usize = 9;

    /// Create a mode, discarding any bits above the nine permission bits.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Mode((bits & Self::MASK as u32) as u16)
    }

    /// Create a mode, rejecting values with bits above the permission bits.
    pub fn new(bits: u32) -> std::result::Result<Self, FormatError> {
        if bits & !(Self::MASK as u32) != 0 {
            return Err(FormatError::OutOfRange(bits));
        }
        Ok(Mode(bits as u16))
    }

    /// The raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The three-bit field of `subject`, shifted down to 0..=7.
    pub const fn field(self, subject: Subject) -> u16 {
        (self.0 >> subject.shift()) & 0o7
    }

    /// Replace the field of `subject` with `perms` (0..=7).
    pub const fn with_field(self, subject: Subject, perms: u16) -> Self {
        let cleared = self.0 & !subject.field_mask();
        Mode(cleared | ((perms & 0o7) << subject.shift()))
    }

    /// The single bit for `operation` performed by `subject`.
    pub const fn bit(subject: Subject, operation: Operation) -> Self {
        Mode(operation.bit() << subject.shift())
    }

    /// Whether `subject` may perform `operation`.
    pub const fn allows(self, subject: Subject, operation: Operation) -> bool {
        self.0 & Self::bit(subject, operation).0 != 0
    }

    /// Grant `operation` to `subject`.
    pub fn insert(&mut self, subject: Subject, operation: Operation) {
        self.0 |= Self::bit(subject, operation).0;
    }

    /// Parse an octal string such as `"755"` or `"0o640"`.
    pub fn from_octal_str(text: &str) -> std::result::Result<Self, FormatError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(FormatError::InvalidOctal(text.to_string()));
        }
        let bits = u32::from_str_radix(digits, 8)
            .map_err(|_| FormatError::InvalidOctal(text.to_string()))?;
        Self::new(bits)
    }

    /// Parse an `ls`-style rendering such as `"rwxr-x---"`.
    ///
    /// The string must be exactly nine characters; each position holds either
    /// its letter or `-`.
    pub fn from_rwx_str(text: &str) -> std::result::Result<Self, FormatError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != Self::RWX_LEN {
            return Err(FormatError::WrongLength {
                value: text.to_string(),
                expected: Self::RWX_LEN,
                actual: chars.len(),
            });
        }

        let mut mode = Mode::EMPTY;
        for (position, (subject, operation)) in Self::positions().enumerate() {
            match chars[position] {
                '-' => {}
                c if c == operation.letter() => mode.insert(subject, operation),
                found => {
                    return Err(FormatError::InvalidCharacter {
                        value: text.to_string(),
                        position,
                        found,
                    })
                }
            }
        }
        Ok(mode)
    }

    /// Render as `rwxr-x---`.
    pub fn to_rwx_string(self) -> String {
        Self::positions()
            .map(|(subject, operation)| {
                if self.allows(subject, operation) {
                    operation.letter()
                } else {
                    '-'
                }
            })
            .collect()
    }

    fn positions() -> impl Iterator<Item = (Subject, Operation)> {
        Subject::ALL
            .into_iter()
            .flat_map(|subject| Operation::ALL.into_iter().map(move |op| (subject, op)))
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitAnd for Mode {
    type Output = Mode;

    fn bitand(self, rhs: Mode) -> Mode {
        Mode(self.0 & rhs.0)
    }
}

impl Not for Mode {
    type Output = Mode;

    fn not(self) -> Mode {
        Mode(!self.0 & Self::MASK)
    }
}

impl TryFrom<u32> for Mode {
    type Error = FormatError;

    fn try_from(bits: u32) -> std::result::Result<Self, Self::Error> {
        Mode::new(bits)
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> u32 {
        mode.0 as u32
    }
}

impl FromStr for Mode {
    type Err = FormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Mode::from_octal_str(s)
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode({:#05o})", self.0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

impl fmt::Octal for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let mode = Mode::from_bits_truncate(0o751);
        assert_eq!(mode.field(Subject::Owner), 0o7);
        assert_eq!(mode.field(Subject::Group), 0o5);
        assert_eq!(mode.field(Subject::Other), 0o1);

        assert!(mode.allows(Subject::Group, Operation::Read));
        assert!(!mode.allows(Subject::Group, Operation::Write));
        assert!(mode.allows(Subject::Other, Operation::Execute));
        assert_eq!(Subject::Group.field_mask(), 0o070);
    }

    #[test]
    fn test_with_field() {
        let mode = Mode::from_bits_truncate(0o755).with_field(Subject::Group, 0o0);
        assert_eq!(mode.bits(), 0o705);

        let mode = mode.with_field(Subject::Other, 0o17);
        assert_eq!(mode.bits(), 0o707);
    }

    #[test]
    fn test_range_enforced() {
        assert_eq!(Mode::from_bits_truncate(0o4755).bits(), 0o755);
        assert_eq!(Mode::new(0o1000), Err(FormatError::OutOfRange(0o1000)));
        assert!(Mode::try_from(0o777u32).is_ok());
        assert_eq!((!Mode::from_bits_truncate(0o700)).bits(), 0o077);
    }

    #[test]
    fn test_octal_parsing() {
        assert_eq!("755".parse::<Mode>().unwrap().bits(), 0o755);
        assert_eq!(Mode::from_octal_str("0o640").unwrap().bits(), 0o640);
        assert_eq!(Mode::from_octal_str("0").unwrap(), Mode::EMPTY);
        assert!(matches!(
            Mode::from_octal_str("789"),
            Err(FormatError::InvalidOctal(_))
        ));
        assert!(matches!(
            Mode::from_octal_str(""),
            Err(FormatError::InvalidOctal(_))
        ));
        assert!(matches!(
            Mode::from_octal_str("1777"),
            Err(FormatError::OutOfRange(0o1777))
        ));
    }

    #[test]
    fn test_rwx_rendering() {
        assert_eq!(Mode::from_bits_truncate(0o750).to_rwx_string(), "rwxr-x---");
        assert_eq!(Mode::EMPTY.to_rwx_string(), "---------");
        assert_eq!(Mode::from_rwx_str("rw-r--r--").unwrap().bits(), 0o644);

        for bits in 0..=0o777 {
            let mode = Mode::from_bits_truncate(bits);
            assert_eq!(Mode::from_rwx_str(&mode.to_rwx_string()).unwrap(), mode);
        }
    }

    #[test]
    fn test_rwx_parsing_errors() {
        assert_eq!(
            Mode::from_rwx_str("rwx"),
            Err(FormatError::WrongLength {
                value: "rwx".to_string(),
                expected: 9,
                actual: 3,
            })
        );
        assert!(matches!(
            Mode::from_rwx_str("rwxr-xr-xx"),
            Err(FormatError::WrongLength { actual: 10, .. })
        ));
        assert!(matches!(
            Mode::from_rwx_str("rwxrwxrwr"),
            Err(FormatError::InvalidCharacter {
                position: 8,
                found: 'r',
                ..
            })
        ));
    }

    #[test]
    fn test_display() {
        let mode = Mode::from_bits_truncate(0o64);
        assert_eq!(mode.to_string(), "064");
        assert_eq!(format!("{:o}", mode), "64");
        assert_eq!(format!("{:?}", mode), "Mode(0o064)");
    }

    #[test]
    fn test_object_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "contents").unwrap();

        assert_eq!(get_object_type(dir.path()).unwrap(), ObjectType::Directory);
        assert_eq!(get_object_type(&file).unwrap(), ObjectType::File);
        assert!(matches!(
            get_object_type(&dir.path().join("missing")),
            Err(Error::NotFound(_))
        ));
    }
}
