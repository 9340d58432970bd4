// ABOUTME: Integration tests for required-tool resolution on PATH.
// ABOUTME: Uses temp-env to point PATH at scratch directories.

use kubeploy::error::Error;
use kubeploy::exec::find_executable;
use kubeploy::output::{Output, OutputMode};
use kubeploy::prereq::{check_tools, install_hint};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn install_fake(dir: &Path, name: &str, mode: u32) {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(mode);
    fs::set_permissions(&path, perms).unwrap();
}

#[test]
fn finds_executable_on_path() {
    let bin = TempDir::new().unwrap();
    install_fake(bin.path(), "kubectl", 0o755);

    temp_env::with_var("PATH", Some(bin.path()), || {
        assert_eq!(find_executable("kubectl"), Some(bin.path().join("kubectl")));
        assert_eq!(find_executable("aws"), None);
    });
}

#[test]
fn non_executable_file_is_ignored() {
    let bin = TempDir::new().unwrap();
    install_fake(bin.path(), "kubectl", 0o644);

    temp_env::with_var("PATH", Some(bin.path()), || {
        assert_eq!(find_executable("kubectl"), None);
    });
}

#[test]
fn earlier_path_entry_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    install_fake(first.path(), "aws", 0o755);
    install_fake(second.path(), "aws", 0o755);
    let path = std::env::join_paths([first.path(), second.path()]).unwrap();

    temp_env::with_var("PATH", Some(&path), || {
        assert_eq!(find_executable("aws"), Some(first.path().join("aws")));
    });
}

#[test]
fn check_tools_names_the_first_missing_tool() {
    let bin = TempDir::new().unwrap();
    install_fake(bin.path(), "kubectl", 0o755);
    let tools = vec!["kubectl".to_string(), "aws".to_string()];
    let output = Output::new(OutputMode::Quiet);

    temp_env::with_var("PATH", Some(bin.path()), || {
        let err = check_tools(&tools, find_executable, &output).unwrap_err();
        match err {
            Error::MissingDependency { tool, hint } => {
                assert_eq!(tool, "aws");
                assert_eq!(hint, install_hint("aws"));
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    });
}

#[test]
fn check_tools_passes_when_all_present() {
    let bin = TempDir::new().unwrap();
    install_fake(bin.path(), "kubectl", 0o755);
    install_fake(bin.path(), "aws", 0o755);
    let tools = vec!["kubectl".to_string(), "aws".to_string()];
    let output = Output::new(OutputMode::Quiet);

    temp_env::with_var("PATH", Some(bin.path()), || {
        assert!(check_tools(&tools, find_executable, &output).is_ok());
    });
}
