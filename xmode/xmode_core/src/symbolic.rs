//! Symbolic mode expressions.
//!
//! An expression is one or more clauses joined by `,`. Each clause has the
//! shape `[ugoa]*[-+=][rwx]*`:
//!
//! - `whom` selects subjects; empty means all of them, and `a` is an alias
//!   for `ugo`.
//! - `+` adds the listed permissions, `-` removes them, `=` makes the selected
//!   fields exactly the listed permissions and leaves the other fields alone.
//!
//! Clauses apply strictly left to right, each one seeing the mode produced by
//! the clause before it. Evaluation stops at the first malformed clause.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::FormatError;
use crate::mode::{Mode, Operation, Subject};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// The set of subjects a clause applies to
    pub struct Who: u8 {
        const OWNER = 0b100;
        const GROUP = 0b010;
        const OTHER = 0b001;
    }
}

impl Who {
    /// Whether `subject` is selected.
    pub fn selects(self, subject: Subject) -> bool {
        self.contains(Self::from(subject))
    }
}

impl From<Subject> for Who {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Owner => Who::OWNER,
            Subject::Group => Who::GROUP,
            Subject::Other => Who::OTHER,
        }
    }
}

/// How a clause combines its permissions with the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,

    /// `-`
    Remove,

    /// `=`
    Assign,
}

impl Operator {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Remove),
            '=' => Some(Self::Assign),
            _ => None,
        }
    }

    /// The character that denotes this operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Remove => '-',
            Self::Assign => '=',
        }
    }
}

/// One `[whom][operator][perms]` segment of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolicClause {
    whom: Who,
    operator: Operator,
    /// `rwx` value in 0..=7
    perms: u16,
}

impl SymbolicClause {
    /// Build a clause from its parts.
    pub fn new(whom: Who, operator: Operator, perms: &[Operation]) -> Self {
        let perms = perms.iter().fold(0, |acc, op| acc | op.bit());
        Self {
            whom,
            operator,
            perms,
        }
    }

    /// Parse a single clause; surrounding whitespace is ignored.
    pub fn parse(clause: &str) -> Result<Self, FormatError> {
        Self::parse_within(clause, clause)
    }

    fn parse_within(clause: &str, expression: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedClause {
            expression: expression.to_string(),
            clause: clause.to_string(),
        };

        let mut chars = clause.trim().chars().peekable();

        let mut whom = Who::empty();
        while let Some(&c) = chars.peek() {
            let selected = match c {
                'u' => Who::OWNER,
                'g' => Who::GROUP,
                'o' => Who::OTHER,
                'a' => Who::all(),
                _ => break,
            };
            whom |= selected;
            chars.next();
        }
        if whom.is_empty() {
            whom = Who::all();
        }

        let operator = chars
            .next()
            .and_then(Operator::from_symbol)
            .ok_or_else(malformed)?;

        let mut perms = 0;
        for c in chars {
            perms |= Operation::from_letter(c).ok_or_else(malformed)?.bit();
        }

        Ok(Self {
            whom,
            operator,
            perms,
        })
    }

    /// Subjects this clause applies to.
    pub fn whom(&self) -> Who {
        self.whom
    }

    /// The clause operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The permission bits placed in every selected subject's field.
    pub fn mask(&self) -> Mode {
        Subject::ALL
            .into_iter()
            .filter(|subject| self.whom.selects(*subject))
            .fold(Mode::EMPTY, |mask, subject| {
                mask.with_field(subject, self.perms)
            })
    }

    /// Apply this clause to `current`.
    pub fn apply(&self, current: Mode) -> Mode {
        let mask = self.mask();
        match self.operator {
            Operator::Add => current | mask,
            Operator::Remove => current & !mask,
            Operator::Assign => {
                let preserved = Subject::ALL
                    .into_iter()
                    .filter(|subject| !self.whom.selects(*subject))
                    .fold(Mode::EMPTY, |kept, subject| {
                        kept | (current & Mode::from_bits_truncate(subject.field_mask() as u32))
                    });
                preserved | mask
            }
        }
    }
}

impl FromStr for SymbolicClause {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SymbolicClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for subject in Subject::ALL {
            if self.whom.selects(subject) {
                write!(f, "{}", subject.letter())?;
            }
        }
        write!(f, "{}", self.operator.symbol())?;
        for op in Operation::ALL {
            if self.perms & op.bit() != 0 {
                write!(f, "{}", op.letter())?;
            }
        }
        Ok(())
    }
}

/// Parse every clause of `expression`, stopping at the first malformed one.
pub fn parse_expression(expression: &str) -> Result<Vec<SymbolicClause>, FormatError> {
    expression
        .split(',')
        .map(|clause| SymbolicClause::parse_within(clause, expression))
        .collect()
}

/// Compute the mode produced by applying `expression` to `current`.
///
/// Clauses fold left to right. A malformed clause aborts the evaluation with
/// `FormatError::MalformedClause`; clauses before it have already been folded
/// but the partial result is discarded, so nothing observes it.
///
/// # Examples
///
/// ```
/// use xmode_core::{get_effective_mode, Mode};
///
/// let mode = Mode::from_bits_truncate(0b111_000_000);
/// assert_eq!(get_effective_mode(mode, "g+x").unwrap().bits(), 0b111_001_000);
/// ```
pub fn get_effective_mode(current: Mode, expression: &str) -> Result<Mode, FormatError> {
    expression.split(',').try_fold(current, |mode, clause| {
        Ok(SymbolicClause::parse_within(clause, expression)?.apply(mode))
    })
}

/// Whether `text` should be read as a symbolic expression rather than octal.
pub fn is_symbolic(text: &str) -> bool {
    text.contains(['+', '-', '='])
}

/// A requested mode: either a concrete value or an expression relative to the
/// current mode of the object it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeRequest {
    /// Set exactly this mode
    Absolute(Mode),

    /// Evaluate this expression against the object's current mode
    Symbolic(String),
}

impl ModeRequest {
    /// Parse a textual request.
    ///
    /// Text containing `+`, `-` or `=` is symbolic and is validated here, so a
    /// malformed expression is rejected before any object is touched.
    /// Anything else must be an octal number.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        if is_symbolic(text) {
            parse_expression(text)?;
            Ok(Self::Symbolic(text.to_string()))
        } else {
            Ok(Self::Absolute(Mode::from_octal_str(text)?))
        }
    }

    /// Whether the result depends on the object's current mode.
    pub fn needs_current(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }

    /// The concrete mode this request produces for an object whose mode is
    /// currently `current`.
    pub fn resolve(&self, current: Mode) -> Result<Mode, FormatError> {
        match self {
            Self::Absolute(mode) => Ok(*mode),
            Self::Symbolic(expression) => get_effective_mode(current, expression),
        }
    }
}

impl From<Mode> for ModeRequest {
    fn from(mode: Mode) -> Self {
        Self::Absolute(mode)
    }
}

impl FromStr for ModeRequest {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(mode) => write!(f, "{}", mode),
            Self::Symbolic(expression) => f.write_str(expression),
        }
    }
}
