//! Security descriptors of local files through the Win32 security API.

use std::ffi::{c_void, OsStr};
use std::io;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use windows_sys::Win32::Foundation::{LocalFree, ERROR_NONE_MAPPED, ERROR_SUCCESS};
use windows_sys::Win32::Security::Authorization::{
    ConvertSidToStringSidW, ConvertStringSidToSidW, GetNamedSecurityInfoW, SE_FILE_OBJECT,
};
use windows_sys::Win32::Security::{
    AddAccessAllowedAceEx, AddAccessDeniedAceEx, GetAce, GetLengthSid, InitializeAcl,
    InitializeSecurityDescriptor, LookupAccountNameW, LookupAccountSidW, SetFileSecurityW,
    SetSecurityDescriptorControl, SetSecurityDescriptorDacl, ACCESS_ALLOWED_ACE, ACE_HEADER, ACL,
    ACL_REVISION, DACL_SECURITY_INFORMATION, GROUP_SECURITY_INFORMATION,
    OBJECT_SECURITY_INFORMATION, OWNER_SECURITY_INFORMATION, PSECURITY_DESCRIPTOR, PSID,
    SECURITY_DESCRIPTOR, SE_DACL_PROTECTED, SID_NAME_USE,
};
use windows_sys::Win32::System::SystemServices::SECURITY_DESCRIPTOR_REVISION;

use xmode_core::{Error, PrincipalName, Result, TranslationError};

use super::AclStore;
use crate::ace::{AccessControlEntry, AceKind, Sid};
use crate::mask::{AccessMask, AceFlags};

/// AclStore backed by the local machine's security subsystem.
#[derive(Debug, Default)]
pub struct WindowsAclStore;

impl WindowsAclStore {
    pub fn new() -> Self {
        Self
    }
}

/// A SID allocated by the system, released with `LocalFree`.
struct LocalSid(PSID);

impl Drop for LocalSid {
    fn drop(&mut self) {
        // SAFETY: allocated by ConvertStringSidToSidW and freed once.
        unsafe {
            LocalFree(self.0 as _);
        }
    }
}

/// A security descriptor returned by `GetNamedSecurityInfoW`, with the
/// pointers into it that were requested.
struct NamedSecurityInfo {
    descriptor: PSECURITY_DESCRIPTOR,
    owner: PSID,
    group: PSID,
    dacl: *mut ACL,
}

impl NamedSecurityInfo {
    fn query(path: &Path, info: OBJECT_SECURITY_INFORMATION) -> Result<Self> {
        let name = wide(path.as_os_str());
        let mut result = Self {
            descriptor: ptr::null_mut(),
            owner: ptr::null_mut(),
            group: ptr::null_mut(),
            dacl: ptr::null_mut(),
        };

        // SAFETY: every out-pointer refers to a live local; the name is
        // NUL-terminated.
        let status = unsafe {
            GetNamedSecurityInfoW(
                name.as_ptr(),
                SE_FILE_OBJECT,
                info,
                &mut result.owner,
                &mut result.group,
                &mut result.dacl,
                ptr::null_mut(),
                &mut result.descriptor,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(read_failed(path, io::Error::from_raw_os_error(status as i32)));
        }

        Ok(result)
    }
}

impl Drop for NamedSecurityInfo {
    fn drop(&mut self) {
        if !self.descriptor.is_null() {
            // SAFETY: allocated by GetNamedSecurityInfoW; the owner, group and
            // DACL pointers die with it.
            unsafe {
                LocalFree(self.descriptor as _);
            }
        }
    }
}

fn wide(text: &OsStr) -> Vec<u16> {
    text.encode_wide().chain(Some(0)).collect()
}

fn read_failed(path: &Path, error: io::Error) -> Error {
    TranslationError::ReadFailed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
    .into()
}

fn write_failed(path: &Path, reason: impl ToString) -> Error {
    TranslationError::WriteFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

fn lookup_failed(account: &str, error: io::Error) -> Error {
    TranslationError::AccountLookupFailed {
        account: account.to_string(),
        reason: error.to_string(),
    }
    .into()
}

/// # Safety
///
/// `sid` must point to a valid SID.
unsafe fn sid_to_string(sid: PSID) -> io::Result<Sid> {
    let mut raw: *mut u16 = ptr::null_mut();
    if ConvertSidToStringSidW(sid, &mut raw) == 0 {
        return Err(io::Error::last_os_error());
    }

    let mut len = 0;
    while *raw.add(len) != 0 {
        len += 1;
    }
    let text = String::from_utf16_lossy(std::slice::from_raw_parts(raw, len));
    LocalFree(raw as _);

    Ok(Sid::new(text))
}

fn string_to_sid(sid: &Sid) -> io::Result<LocalSid> {
    let text = wide(OsStr::new(sid.as_str()));
    let mut raw: PSID = ptr::null_mut();

    // SAFETY: `text` is NUL-terminated and `raw` is a live out-pointer.
    if unsafe { ConvertStringSidToSidW(text.as_ptr(), &mut raw) } == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(LocalSid(raw))
}

impl AclStore for WindowsAclStore {
    fn owner(&self, path: &Path) -> Result<Sid> {
        let info = NamedSecurityInfo::query(path, OWNER_SECURITY_INFORMATION)?;
        // SAFETY: the owner SID lives inside `info.descriptor`.
        unsafe { sid_to_string(info.owner) }.map_err(|e| read_failed(path, e))
    }

    fn group(&self, path: &Path) -> Result<Sid> {
        let info = NamedSecurityInfo::query(path, GROUP_SECURITY_INFORMATION)?;
        // SAFETY: the group SID lives inside `info.descriptor`.
        unsafe { sid_to_string(info.group) }.map_err(|e| read_failed(path, e))
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<AccessControlEntry>> {
        let info = NamedSecurityInfo::query(path, DACL_SECURITY_INFORMATION)?;
        if info.dacl.is_null() {
            return Ok(Vec::new());
        }

        // SAFETY: `info.dacl` is a valid ACL inside `info.descriptor`, and
        // GetAce hands back pointers into it. Allow, deny, audit and alarm
        // entries all share the ACCESS_ALLOWED_ACE layout.
        unsafe {
            let count = (*info.dacl).AceCount as u32;
            let mut entries = Vec::with_capacity(count as usize);

            for index in 0..count {
                let mut raw: *mut c_void = ptr::null_mut();
                if GetAce(info.dacl, index, &mut raw) == 0 {
                    return Err(read_failed(path, io::Error::last_os_error()));
                }

                let header = &*(raw as *const ACE_HEADER);
                let kind = AceKind::from_raw(header.AceType);
                if matches!(kind, AceKind::Other(_)) {
                    continue;
                }

                let ace = &*(raw as *const ACCESS_ALLOWED_ACE);
                let sid = &ace.SidStart as *const u32 as PSID;
                entries.push(AccessControlEntry {
                    kind,
                    flags: AceFlags::from_bits_retain(header.AceFlags),
                    mask: AccessMask::from_bits_retain(ace.Mask),
                    sid: sid_to_string(sid).map_err(|e| read_failed(path, e))?,
                });
            }

            Ok(entries)
        }
    }

    fn replace_entries(&self, path: &Path, entries: &[AccessControlEntry]) -> Result<()> {
        let sids = entries
            .iter()
            .map(|entry| string_to_sid(&entry.sid))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| write_failed(path, e))?;

        let ace_base = mem::size_of::<ACCESS_ALLOWED_ACE>() - mem::size_of::<u32>();
        // SAFETY: every SID came from ConvertStringSidToSidW.
        let size = mem::size_of::<ACL>()
            + sids
                .iter()
                .map(|sid| ace_base + unsafe { GetLengthSid(sid.0) } as usize)
                .sum::<usize>();

        // ACLs must be DWORD aligned.
        let mut buffer = vec![0u32; size.div_ceil(4)];
        let acl = buffer.as_mut_ptr() as *mut ACL;

        // SAFETY: `buffer` is large enough for the header and every entry
        // added below, and outlives the SetFileSecurityW call, as does
        // `descriptor`.
        unsafe {
            if InitializeAcl(acl, (buffer.len() * 4) as u32, ACL_REVISION) == 0 {
                return Err(write_failed(path, io::Error::last_os_error()));
            }

            for (entry, sid) in entries.iter().zip(&sids) {
                let flags = entry.flags.bits() as u32;
                let added = match entry.kind {
                    AceKind::AccessAllowed => {
                        AddAccessAllowedAceEx(acl, ACL_REVISION, flags, entry.mask.bits(), sid.0)
                    }
                    AceKind::AccessDenied => {
                        AddAccessDeniedAceEx(acl, ACL_REVISION, flags, entry.mask.bits(), sid.0)
                    }
                    other => {
                        return Err(write_failed(
                            path,
                            format!("cannot write entry of type {:?}", other),
                        ))
                    }
                };
                if added == 0 {
                    return Err(write_failed(path, io::Error::last_os_error()));
                }
            }

            // Only this object's descriptor is replaced. Descendants keep the
            // inherited entries they already carry.
            let mut descriptor: SECURITY_DESCRIPTOR = mem::zeroed();
            let descriptor_ptr: PSECURITY_DESCRIPTOR =
                &mut descriptor as *mut SECURITY_DESCRIPTOR as PSECURITY_DESCRIPTOR;
            let prepared =
                InitializeSecurityDescriptor(descriptor_ptr, SECURITY_DESCRIPTOR_REVISION) != 0
                    && SetSecurityDescriptorDacl(descriptor_ptr, 1, acl, 0) != 0
                    && SetSecurityDescriptorControl(
                        descriptor_ptr,
                        SE_DACL_PROTECTED,
                        SE_DACL_PROTECTED,
                    ) != 0;
            if !prepared {
                return Err(write_failed(path, io::Error::last_os_error()));
            }

            let name = wide(path.as_os_str());
            if SetFileSecurityW(name.as_ptr(), DACL_SECURITY_INFORMATION, descriptor_ptr) == 0 {
                return Err(write_failed(path, io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    fn lookup_account(&self, name: &str) -> Result<Sid> {
        let account = wide(OsStr::new(name));
        let mut sid_len = 0u32;
        let mut domain_len = 0u32;
        let mut kind: SID_NAME_USE = 0;

        // SAFETY: the first call only reports buffer sizes; the second gets
        // buffers of exactly those sizes.
        unsafe {
            LookupAccountNameW(
                ptr::null(),
                account.as_ptr(),
                ptr::null_mut(),
                &mut sid_len,
                ptr::null_mut(),
                &mut domain_len,
                &mut kind,
            );
            if sid_len == 0 {
                return Err(lookup_failed(name, io::Error::last_os_error()));
            }

            let mut sid = vec![0u8; sid_len as usize];
            let mut domain = vec![0u16; domain_len as usize];
            if LookupAccountNameW(
                ptr::null(),
                account.as_ptr(),
                sid.as_mut_ptr() as PSID,
                &mut sid_len,
                domain.as_mut_ptr(),
                &mut domain_len,
                &mut kind,
            ) == 0
            {
                return Err(lookup_failed(name, io::Error::last_os_error()));
            }

            sid_to_string(sid.as_mut_ptr() as PSID).map_err(|e| lookup_failed(name, e))
        }
    }

    fn resolve(&self, sid: &Sid) -> Result<PrincipalName> {
        let owned = string_to_sid(sid).map_err(|e| lookup_failed(sid.as_str(), e))?;
        let mut name_len = 0u32;
        let mut domain_len = 0u32;
        let mut kind: SID_NAME_USE = 0;

        // SAFETY: as in lookup_account.
        unsafe {
            LookupAccountSidW(
                ptr::null(),
                owned.0,
                ptr::null_mut(),
                &mut name_len,
                ptr::null_mut(),
                &mut domain_len,
                &mut kind,
            );
            if name_len == 0 {
                let error = io::Error::last_os_error();
                if error.raw_os_error() == Some(ERROR_NONE_MAPPED as i32) {
                    return Err(Error::UnresolvedIdentity(sid.to_string()));
                }
                return Err(lookup_failed(sid.as_str(), error));
            }

            let mut name = vec![0u16; name_len as usize];
            let mut domain = vec![0u16; domain_len as usize];
            if LookupAccountSidW(
                ptr::null(),
                owned.0,
                name.as_mut_ptr(),
                &mut name_len,
                domain.as_mut_ptr(),
                &mut domain_len,
                &mut kind,
            ) == 0
            {
                return Err(lookup_failed(sid.as_str(), io::Error::last_os_error()));
            }

            Ok(PrincipalName::new(
                String::from_utf16_lossy(&name[..name_len as usize]),
                String::from_utf16_lossy(&domain[..domain_len as usize]),
            ))
        }
    }
}
