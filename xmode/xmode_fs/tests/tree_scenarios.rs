use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use xmode_acl::{AclTranslator, InMemoryAclStore};
use xmode_core::{Error, Mode, ModeRequest, XmodeConfig};
use xmode_fs::Permissions;

/// Creates `a/{file1, b/{file2}}` in a fresh temporary directory.
fn create_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a");
    fs::create_dir_all(a.join("b")).expect("Failed to create tree");
    fs::write(a.join("file1"), b"one").expect("Failed to write file1");
    fs::write(a.join("b").join("file2"), b"two").expect("Failed to write file2");
    dir
}

fn acl_permissions(config: &XmodeConfig) -> Permissions<AclTranslator<Arc<InMemoryAclStore>>> {
    let translator = AclTranslator::new(Arc::new(InMemoryAclStore::new()), config);
    Permissions::with_config(translator, config)
}

fn mode(bits: u32) -> ModeRequest {
    ModeRequest::from(Mode::from_bits_truncate(bits))
}

fn assert_tree_modes<B: xmode_core::PermissionBackend>(
    permissions: &Permissions<B>,
    a: &Path,
    dir_bits: u16,
    file_bits: u16,
) {
    assert_eq!(permissions.get_mode(a).unwrap().bits(), dir_bits);
    assert_eq!(permissions.get_mode(&a.join("b")).unwrap().bits(), dir_bits);
    assert_eq!(permissions.get_mode(&a.join("file1")).unwrap().bits(), file_bits);
    assert_eq!(
        permissions.get_mode(&a.join("b").join("file2")).unwrap().bits(),
        file_bits
    );
}

#[test]
fn acl_recursive_tree() {
    let dir = create_tree();
    let a = dir.path().join("a");
    let permissions = acl_permissions(&XmodeConfig::default());

    permissions
        .set_mode_recursive(&a, &mode(0o600), Some(&mode(0o700)))
        .unwrap();

    assert_tree_modes(&permissions, &a, 0o700, 0o600);
    let store = permissions.backend().store();
    assert_eq!(store.write_count(&a), 1);
    assert_eq!(store.write_count(&a.join("b").join("file2")), 1);
}

#[test]
fn acl_recursive_symbolic_modes() {
    let dir = create_tree();
    let a = dir.path().join("a");
    let permissions = acl_permissions(&XmodeConfig::default());

    permissions
        .set_mode_recursive(&a, &mode(0o664), Some(&mode(0o775)))
        .unwrap();
    permissions
        .set_mode_recursive(
            &a,
            &ModeRequest::parse("u=rw,go=").unwrap(),
            Some(&ModeRequest::parse("u=rwx,go=").unwrap()),
        )
        .unwrap();

    assert_tree_modes(&permissions, &a, 0o700, 0o600);
}

#[test]
fn acl_set_mode_octal_text() {
    let dir = create_tree();
    let file = dir.path().join("a").join("file1");
    let permissions = acl_permissions(&XmodeConfig::default());

    permissions
        .set_mode(&file, &ModeRequest::parse("755").unwrap())
        .unwrap();

    assert_eq!(permissions.get_mode(&file).unwrap().bits(), 0o755);
}

#[test]
fn malformed_request_is_rejected_before_any_write() {
    let dir = create_tree();
    let file = dir.path().join("a").join("file1");
    let permissions = acl_permissions(&XmodeConfig::default());

    let request = ModeRequest::parse("zz+x");
    assert!(request.is_err());
    assert_eq!(permissions.backend().store().write_count(&file), 0);
}

#[test]
fn missing_root_is_not_found() {
    let dir = create_tree();
    let permissions = acl_permissions(&XmodeConfig::default());

    let result = permissions.set_mode_recursive(&dir.path().join("nope"), &mode(0o600), None);
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[cfg(unix)]
mod native {
    use super::*;
    use std::os::unix::fs::{symlink, PermissionsExt};
    use xmode_fs::NativeModeBackend;

    fn native_permissions(config: &XmodeConfig) -> Permissions<NativeModeBackend> {
        Permissions::with_config(NativeModeBackend, config)
    }

    #[test]
    fn set_mode_octal_text() {
        let dir = create_tree();
        let file = dir.path().join("a").join("file1");
        let permissions = native_permissions(&XmodeConfig::default());

        permissions
            .set_mode(&file, &ModeRequest::parse("755").unwrap())
            .unwrap();

        assert_eq!(permissions.get_mode(&file).unwrap().bits(), 0o755);
        let raw = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(raw & 0o777, 0o755);
    }

    #[test]
    fn recursive_tree() {
        let dir = create_tree();
        let a = dir.path().join("a");
        let permissions = native_permissions(&XmodeConfig::default());

        permissions
            .set_mode_recursive(&a, &mode(0o600), Some(&mode(0o700)))
            .unwrap();

        assert_tree_modes(&permissions, &a, 0o700, 0o600);
    }

    #[test]
    fn symlinks_are_skipped_by_default() {
        let dir = create_tree();
        let a = dir.path().join("a");
        let outside = dir.path().join("outside.txt");
        fs::write(&outside, b"outside").unwrap();
        fs::set_permissions(&outside, fs::Permissions::from_mode(0o644)).unwrap();
        symlink(&outside, a.join("link")).unwrap();

        let permissions = native_permissions(&XmodeConfig::default());
        permissions
            .set_mode_recursive(&a, &mode(0o600), Some(&mode(0o700)))
            .unwrap();

        assert_eq!(permissions.get_mode(&outside).unwrap().bits(), 0o644);
        assert_tree_modes(&permissions, &a, 0o700, 0o600);
    }

    #[test]
    fn symlinks_followed_when_configured() {
        let dir = create_tree();
        let a = dir.path().join("a");
        let outside = dir.path().join("outside.txt");
        fs::write(&outside, b"outside").unwrap();
        fs::set_permissions(&outside, fs::Permissions::from_mode(0o644)).unwrap();
        symlink(&outside, a.join("link")).unwrap();

        let config = XmodeConfig {
            follow_symlinks: true,
            ..XmodeConfig::default()
        };
        let permissions = native_permissions(&config);
        permissions
            .set_mode_recursive(&a, &mode(0o600), Some(&mode(0o700)))
            .unwrap();

        assert_eq!(permissions.get_mode(&outside).unwrap().bits(), 0o600);
    }
}
