//! Source tree walk and used/unused classification.

use crate::error::{Error, Result};
use crate::utils;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SOURCE_SUFFIX: &str = ".c";

/// Every file under `src_dir` whose name ends in `.c`, relative to `src_dir`.
///
/// The check is a plain suffix test on the file name, so `x.C` does not
/// qualify. Symlinked directories are not followed.
pub fn all_c_files(src_dir: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(src_dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| src_dir.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::io("walk", path, source)
        })?;
        // a link to a directory is a directory, even when not followed
        if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(SOURCE_SUFFIX) {
            files.insert(utils::relative_to(entry.path(), src_dir));
        }
    }
    Ok(files)
}

/// Files present in the tree but not compiled: `all - used`.
pub fn unused_files(all: &BTreeSet<PathBuf>, used: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    all.difference(used).cloned().collect()
}

/// Distinct containing directories of `files`.
pub fn parent_dirs(files: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    files
        .iter()
        .map(|f| f.parent().map(Path::to_path_buf).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, b"").unwrap();
    }

    #[test]
    fn test_all_c_files_is_suffix_based_and_relative() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(root, "main.c");
        touch(root, "drivers/serial/uart.c");
        touch(root, "drivers/serial/uart.h");
        touch(root, "boards/upper.C");
        touch(root, "lib/abc.c.in");
        touch(root, ".hidden/x.c");
        fs::create_dir_all(root.join("empty")).unwrap();

        let files = all_c_files(root).unwrap();
        let expected: BTreeSet<PathBuf> = [".hidden/x.c", "drivers/serial/uart.c", "main.c"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_directory_named_like_a_source_is_skipped() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("odd.c")).unwrap();
        touch(tmp.path(), "odd.c/real.c");
        let files = all_c_files(tmp.path()).unwrap();
        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from("odd.c/real.c")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_neither_followed_nor_counted() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "real/a.c");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link.c")).unwrap();
        touch(tmp.path(), "other/target.c");
        std::os::unix::fs::symlink(
            tmp.path().join("other/target.c"),
            tmp.path().join("alias.c"),
        )
        .unwrap();

        let files = all_c_files(tmp.path()).unwrap();
        let expected: BTreeSet<PathBuf> = ["alias.c", "other/target.c", "real/a.c"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(files, expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_aborts_walk() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "ok/a.c");
        touch(tmp.path(), "locked/b.c");
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // permissions are not enforced for root
        let enforced = fs::read_dir(&locked).is_err();
        let result = all_c_files(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if !enforced {
            return;
        }
        match result.unwrap_err() {
            Error::Io { stage, path, .. } => {
                assert_eq!(stage, "walk");
                assert_eq!(path, locked);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unused_is_disjoint_and_covers_all() {
        let all: BTreeSet<PathBuf> = ["a.c", "b/c.c", "d.c"].into_iter().map(PathBuf::from).collect();
        let used: BTreeSet<PathBuf> = ["a.c", "/bld/gen.c"].into_iter().map(PathBuf::from).collect();
        let unused = unused_files(&all, &used);
        assert!(unused.is_disjoint(&used));
        assert!(all.iter().all(|f| unused.contains(f) || used.contains(f)));
        assert_eq!(unused.len(), 2);
    }

    #[test]
    fn test_parent_dirs_are_distinct() {
        let used: BTreeSet<PathBuf> = ["a.c", "x/b.c", "x/c.c", "x/y/d.c"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let dirs: Vec<_> = parent_dirs(&used).into_iter().collect();
        assert_eq!(
            dirs,
            vec![PathBuf::from(""), PathBuf::from("x"), PathBuf::from("x/y")]
        );
    }
}
