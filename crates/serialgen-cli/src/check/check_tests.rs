#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn check_file___valid_config___loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "annotation = \"Dto\"\nheader_extensions = [\".hh\"]\n").unwrap();

    let config = check_file(&path).unwrap();

    assert_eq!(config.header_extensions, vec![".hh"]);
}

#[test]
fn check_file___bad_extension___is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "header_extensions = [\"h\"]\n").unwrap();

    assert!(check_file(&path).is_err());
}

#[test]
fn check_file___unknown_file___is_rejected() {
    let dir = TempDir::new().unwrap();

    assert!(check_file(&dir.path().join("missing.toml")).is_err());
}
