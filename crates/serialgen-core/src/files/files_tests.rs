#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "// header\n").unwrap();
}

fn headers() -> Vec<String> {
    vec![".h".to_string(), ".hpp".to_string()]
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn WalkDirLister___mixed_tree___returns_sorted_headers() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "src/b.h");
    touch(dir.path(), "src/a.hpp");
    touch(dir.path(), "src/main.cpp");
    touch(dir.path(), "include/z/Point.h");

    let files = WalkDirLister::default()
        .list_files(dir.path(), &headers(), false)
        .unwrap();

    assert_eq!(
        relative(dir.path(), &files),
        vec!["include/z/Point.h", "src/a.hpp", "src/b.h"]
    );
}

#[test]
fn WalkDirLister___excluded_directories___are_pruned() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "build/gen.h");
    touch(dir.path(), ".pio/libdeps/x.h");
    touch(dir.path(), "cmake-build-debug/y.h");
    touch(dir.path(), "src/keep.h");

    let files = WalkDirLister::default()
        .list_files(dir.path(), &headers(), false)
        .unwrap();

    assert_eq!(relative(dir.path(), &files), vec!["src/keep.h"]);
}

#[test]
fn WalkDirLister___skip_exclusions___includes_everything() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "build/gen.h");
    touch(dir.path(), "src/keep.h");

    let files = WalkDirLister::default()
        .list_files(dir.path(), &headers(), true)
        .unwrap();

    assert_eq!(files.len(), 2);
}

#[test]
fn WalkDirLister___empty_extension_filter___accepts_all_files() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.h");
    touch(dir.path(), "b.txt");

    let files = WalkDirLister::default()
        .list_files(dir.path(), &[], false)
        .unwrap();

    assert_eq!(files.len(), 2);
}

#[test]
fn WalkDirLister___excluded_root___is_still_walked() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "build/src/a.h");

    let files = WalkDirLister::default()
        .list_files(&dir.path().join("build"), &headers(), false)
        .unwrap();

    assert_eq!(files.len(), 1);
}

#[test]
fn WalkDirLister___missing_root___is_an_error() {
    let dir = TempDir::new().unwrap();

    let result = WalkDirLister::default().list_files(&dir.path().join("nope"), &headers(), false);

    assert!(result.is_err());
}

#[test]
fn is_excluded___prefix_pattern___matches_by_prefix() {
    let lister = WalkDirLister::new(vec!["cmake-build-*".to_string(), "build".to_string()]);

    assert!(lister.is_excluded("cmake-build-release"));
    assert!(lister.is_excluded("build"));
    assert!(!lister.is_excluded("builder"));
}
