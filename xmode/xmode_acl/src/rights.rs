//! Rights bundles.
//!
//! A rights bundle is the set of fine-grained rights that together stand for
//! one coarse operation. There is one table per object type, indexed by
//! subject and operation. Directory rights carry their own names (list,
//! add file, add subdirectory, traverse), but the read and write bundles
//! come out as the same bits as the file bundles; only execute differs,
//! since traversal does not include reading attributes.
//!
//! The bundles are chosen so that no bundle is contained in the union of the
//! other two for the same object type. That makes the mode-to-mask mapping
//! injective, which the round trip between the two models relies on.

use xmode_core::{Mode, ObjectType, Operation, Subject};

use crate::mask::AccessMask;

const FILE_READ: AccessMask = AccessMask::FILE_GENERIC_READ;

const FILE_WRITE: AccessMask = AccessMask::FILE_GENERIC_WRITE
    .union(AccessMask::FILE_DELETE_CHILD)
    .union(AccessMask::DELETE)
    .union(AccessMask::WRITE_DAC)
    .union(AccessMask::WRITE_OWNER);

const FILE_EXECUTE: AccessMask = AccessMask::FILE_GENERIC_EXECUTE;

const DIR_READ: AccessMask = AccessMask::FILE_LIST_DIRECTORY
    .union(AccessMask::FILE_READ_EA)
    .union(AccessMask::FILE_READ_ATTRIBUTES)
    .union(AccessMask::READ_CONTROL)
    .union(AccessMask::SYNCHRONIZE);

const DIR_WRITE: AccessMask = AccessMask::FILE_ADD_FILE
    .union(AccessMask::FILE_ADD_SUBDIRECTORY)
    .union(AccessMask::FILE_WRITE_EA)
    .union(AccessMask::FILE_DELETE_CHILD)
    .union(AccessMask::FILE_WRITE_ATTRIBUTES)
    .union(AccessMask::DELETE)
    .union(AccessMask::READ_CONTROL)
    .union(AccessMask::WRITE_DAC)
    .union(AccessMask::WRITE_OWNER)
    .union(AccessMask::SYNCHRONIZE);

const DIR_EXECUTE: AccessMask = AccessMask::FILE_TRAVERSE
    .union(AccessMask::READ_CONTROL)
    .union(AccessMask::SYNCHRONIZE);

/// Rights bundles for one object type, indexed by subject then operation.
#[derive(Debug)]
pub struct RightsTable {
    object_type: ObjectType,
    bundles: [[AccessMask; 3]; 3],
}

/// Bundles for file objects.
pub static FILE_RIGHTS: RightsTable =
    RightsTable::uniform(ObjectType::File, [FILE_READ, FILE_WRITE, FILE_EXECUTE]);

/// Bundles for directory objects.
pub static DIRECTORY_RIGHTS: RightsTable =
    RightsTable::uniform(ObjectType::Directory, [DIR_READ, DIR_WRITE, DIR_EXECUTE]);

impl RightsTable {
    /// A table whose rows are identical for every subject.
    const fn uniform(object_type: ObjectType, row: [AccessMask; 3]) -> Self {
        Self {
            object_type,
            bundles: [row, row, row],
        }
    }

    /// The table that applies to `object_type`.
    pub fn for_object(object_type: ObjectType) -> &'static RightsTable {
        match object_type {
            ObjectType::File => &FILE_RIGHTS,
            ObjectType::Directory => &DIRECTORY_RIGHTS,
        }
    }

    /// The object type this table describes.
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// The bundle representing `operation` for `subject`.
    pub fn bundle(&self, subject: Subject, operation: Operation) -> AccessMask {
        self.bundles[subject_index(subject)][operation_index(operation)]
    }

    /// The access mask granting `subject` what its field of `mode` allows.
    pub fn mask_for(&self, mode: Mode, subject: Subject) -> AccessMask {
        Operation::ALL
            .into_iter()
            .filter(|op| mode.allows(subject, *op))
            .fold(AccessMask::empty(), |mask, op| {
                mask | self.bundle(subject, op)
            })
    }

    /// The bits of `subject`'s field that `mask` fully grants.
    ///
    /// A bundle counts only if every one of its rights is present; partial
    /// overlap grants nothing.
    pub fn mode_for(&self, mask: AccessMask, subject: Subject) -> Mode {
        let mut mode = Mode::EMPTY;
        for op in Operation::ALL {
            if mask.contains(self.bundle(subject, op)) {
                mode.insert(subject, op);
            }
        }
        mode
    }
}

fn subject_index(subject: Subject) -> usize {
    match subject {
        Subject::Owner => 0,
        Subject::Group => 1,
        Subject::Other => 2,
    }
}

fn operation_index(operation: Operation) -> usize {
    match operation {
        Operation::Read => 0,
        Operation::Write => 1,
        Operation::Execute => 2,
    }
}
