//! Fine-grained access rights and entry flags.
//!
//! Values follow the Windows security model, where an access mask is a
//! 32-bit field of specific, standard and generic rights. File and directory
//! objects share the specific-right bits under different names.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Platform-native access rights carried by an access-control entry
    pub struct AccessMask: u32 {
        const FILE_READ_DATA = 0x0000_0001;
        const FILE_LIST_DIRECTORY = 0x0000_0001;
        const FILE_WRITE_DATA = 0x0000_0002;
        const FILE_ADD_FILE = 0x0000_0002;
        const FILE_APPEND_DATA = 0x0000_0004;
        const FILE_ADD_SUBDIRECTORY = 0x0000_0004;
        const FILE_READ_EA = 0x0000_0008;
        const FILE_WRITE_EA = 0x0000_0010;
        const FILE_EXECUTE = 0x0000_0020;
        const FILE_TRAVERSE = 0x0000_0020;
        const FILE_DELETE_CHILD = 0x0000_0040;
        const FILE_READ_ATTRIBUTES = 0x0000_0080;
        const FILE_WRITE_ATTRIBUTES = 0x0000_0100;

        const DELETE = 0x0001_0000;
        const READ_CONTROL = 0x0002_0000;
        const WRITE_DAC = 0x0004_0000;
        const WRITE_OWNER = 0x0008_0000;
        const SYNCHRONIZE = 0x0010_0000;

        const GENERIC_ALL = 0x1000_0000;
        const GENERIC_EXECUTE = 0x2000_0000;
        const GENERIC_WRITE = 0x4000_0000;
        const GENERIC_READ = 0x8000_0000;

        const FILE_GENERIC_READ = Self::READ_CONTROL.bits()
            | Self::FILE_READ_DATA.bits()
            | Self::FILE_READ_ATTRIBUTES.bits()
            | Self::FILE_READ_EA.bits()
            | Self::SYNCHRONIZE.bits();
        const FILE_GENERIC_WRITE = Self::READ_CONTROL.bits()
            | Self::FILE_WRITE_DATA.bits()
            | Self::FILE_WRITE_ATTRIBUTES.bits()
            | Self::FILE_WRITE_EA.bits()
            | Self::FILE_APPEND_DATA.bits()
            | Self::SYNCHRONIZE.bits();
        const FILE_GENERIC_EXECUTE = Self::READ_CONTROL.bits()
            | Self::FILE_READ_ATTRIBUTES.bits()
            | Self::FILE_EXECUTE.bits()
            | Self::SYNCHRONIZE.bits();
        const FILE_ALL_ACCESS = 0x001F_01FF;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Inheritance flags of an access-control entry
    pub struct AceFlags: u8 {
        const OBJECT_INHERIT = 0x01;
        const CONTAINER_INHERIT = 0x02;
        const NO_PROPAGATE_INHERIT = 0x04;
        const INHERIT_ONLY = 0x08;
        const INHERITED = 0x10;
    }
}

impl AceFlags {
    /// An explicit entry that neither propagates nor was propagated.
    pub const NO_INHERITANCE: AceFlags = AceFlags::empty();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_composites() {
        assert_eq!(AccessMask::FILE_GENERIC_READ.bits(), 0x0012_0089);
        assert_eq!(AccessMask::FILE_GENERIC_WRITE.bits(), 0x0012_0116);
        assert_eq!(AccessMask::FILE_GENERIC_EXECUTE.bits(), 0x0012_00A0);
        assert!(AccessMask::FILE_ALL_ACCESS.contains(AccessMask::FILE_GENERIC_WRITE));
    }

    #[test]
    fn test_directory_aliases() {
        assert_eq!(AccessMask::FILE_LIST_DIRECTORY, AccessMask::FILE_READ_DATA);
        assert_eq!(AccessMask::FILE_TRAVERSE, AccessMask::FILE_EXECUTE);
        assert!(AceFlags::NO_INHERITANCE.is_empty());
    }
}
