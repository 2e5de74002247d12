//! Unit tests for filesystem utilities

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use docsync::system::{MockSystem, RealSystem, System as _};
    use docsync::utils::fs::{
        clear_directory, create_parent_directories, directory_exists, ensure_directory,
        is_directory_empty, remove_dir_safe,
    };
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn directory_exists_tst() {
        let system = MockSystem::new()
            .with_dir("/test/dir")
            .unwrap()
            .with_file("/test/file.md", b"# File")
            .unwrap();

        assert!(directory_exists(&system, Path::new("/test/dir")));
        assert!(!directory_exists(&system, Path::new("/test/file.md")));
        assert!(!directory_exists(&system, Path::new("/test/missing")));
    }

    #[test]
    fn ensure_directory_tst() {
        let system = MockSystem::new()
            .with_file("/test/file.md", b"# File")
            .unwrap();

        ensure_directory(&system, Path::new("/test/a/b/c")).unwrap();
        assert!(system.is_dir(Path::new("/test/a/b/c")));

        // Idempotent
        ensure_directory(&system, Path::new("/test/a/b/c")).unwrap();

        let err = ensure_directory(&system, Path::new("/test/file.md")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn clear_directory_tst() {
        let system = MockSystem::new()
            .with_file("/docs/api/index.md", b"index")
            .unwrap()
            .with_file("/docs/api/nested/deep/page.md", b"page")
            .unwrap()
            .with_file("/docs/other/keep.md", b"keep")
            .unwrap();

        clear_directory(&system, Path::new("/docs/api")).unwrap();

        assert!(system.is_dir(Path::new("/docs/api")));
        assert!(is_directory_empty(&system, Path::new("/docs/api")).unwrap());
        assert!(system.exists(Path::new("/docs/other/keep.md")));
    }

    #[test]
    fn clear_missing_directory_tst() {
        let system = MockSystem::new();
        clear_directory(&system, Path::new("/nowhere")).unwrap();
        assert!(!system.exists(Path::new("/nowhere")));
    }

    #[test]
    fn clear_directory_propagates_removal_failure_tst() {
        let system = MockSystem::new()
            .with_file("/docs/api/locked.md", b"locked")
            .unwrap()
            .with_unwritable("/docs/api/locked.md")
            .unwrap();

        clear_directory(&system, Path::new("/docs/api")).unwrap_err();
    }

    #[test]
    fn remove_dir_safe_tst() {
        let system = MockSystem::new()
            .with_file("/work/api/.git/HEAD", b"ref: refs/heads/main")
            .unwrap();

        remove_dir_safe(&system, Path::new("/work/api")).unwrap();
        assert!(!system.exists(Path::new("/work/api")));

        // Removing an absent directory is fine
        remove_dir_safe(&system, Path::new("/work/api")).unwrap();
    }

    #[test]
    fn create_parent_directories_tst() {
        let system = MockSystem::new().with_dir("/test").unwrap();

        let nested_file = Path::new("/test/a/b/c/file.txt");

        create_parent_directories(&system, nested_file).unwrap();
        assert!(system.is_dir(nested_file.parent().unwrap()));
        assert!(!system.exists(nested_file));
    }

    #[test]
    fn is_directory_empty_tst() {
        let system = MockSystem::new()
            .with_dir("/empty")
            .unwrap()
            .with_file("/full/file.md", b"x")
            .unwrap();

        assert!(is_directory_empty(&system, Path::new("/empty")).unwrap());
        assert!(!is_directory_empty(&system, Path::new("/full")).unwrap());
        assert!(!is_directory_empty(&system, Path::new("/missing")).unwrap());
    }

    #[test]
    fn clear_directory_real_filesystem_tst() {
        let system = RealSystem::new();
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target");

        system.create_dir_all(&target.join("sub/dir")).unwrap();
        system.write(&target.join("a.md"), b"a").unwrap();
        system.write(&target.join("sub/dir/b.md"), b"b").unwrap();

        clear_directory(&system, &target).unwrap();

        assert!(target.is_dir());
        assert!(is_directory_empty(&system, &target).unwrap());
    }
}
