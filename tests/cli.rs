// ABOUTME: Integration tests for the kubeploy CLI commands.
// ABOUTME: Validates usage errors, exit codes, init, and the cluster-free cleanup paths.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn kubeploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("kubeploy"))
}

/// A command whose PATH resolves neither kubectl nor aws.
fn isolated_cmd(dir: &std::path::Path) -> Command {
    let empty_path = dir.join("empty-bin");
    fs::create_dir_all(&empty_path).unwrap();
    let mut cmd = kubeploy_cmd();
    cmd.current_dir(dir).env("PATH", &empty_path);
    cmd
}

#[test]
fn help_shows_commands() {
    kubeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("cleanup"))
        .stdout(predicate::str::contains("status"));
}

mod deploy {
    use super::*;

    #[test]
    fn missing_domain_prints_usage_and_exits_1() {
        kubeploy_cmd()
            .arg("deploy")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn invalid_domain_exits_1() {
        let temp_dir = tempfile::tempdir().unwrap();
        isolated_cmd(temp_dir.path())
            .args(["deploy", "a..b.com"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid domain name"));
    }

    #[test]
    fn missing_kubectl_exits_1_with_hint() {
        let temp_dir = tempfile::tempdir().unwrap();
        isolated_cmd(temp_dir.path())
            .args(["deploy", "demo.example.com"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("kubectl"));
    }

    #[test]
    fn json_mode_reports_errors_as_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        isolated_cmd(temp_dir.path())
            .args(["--json", "deploy", "a..b.com"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(r#""event":"error""#));
    }
}

mod cleanup {
    use super::*;

    #[test]
    fn help_exits_0() {
        kubeploy_cmd()
            .args(["cleanup", "-h"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--dry-run"))
            .stdout(predicate::str::contains("--restore"));
    }

    #[test]
    fn unknown_flag_exits_1() {
        kubeploy_cmd()
            .args(["cleanup", "--bogus"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--bogus"))
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn declining_confirmation_exits_0() {
        let temp_dir = tempfile::tempdir().unwrap();
        isolated_cmd(temp_dir.path())
            .arg("cleanup")
            .write_stdin("no\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Type 'yes' to continue"))
            .stdout(predicate::str::contains("Cleanup cancelled"));
    }

    #[test]
    fn restore_only_renames_backups() {
        let temp_dir = tempfile::tempdir().unwrap();
        let k8s = temp_dir.path().join("k8s");
        fs::create_dir_all(&k8s).unwrap();
        fs::write(k8s.join("ingress-template.yaml"), "edited").unwrap();
        fs::write(k8s.join("ingress-template.yaml.bak"), "pristine").unwrap();

        isolated_cmd(temp_dir.path())
            .args(["cleanup", "--restore"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored 1 backup file(s)"));

        assert_eq!(
            fs::read_to_string(k8s.join("ingress-template.yaml")).unwrap(),
            "pristine"
        );
        assert!(!k8s.join("ingress-template.yaml.bak").exists());
    }

    #[test]
    fn restore_dry_run_reports_pending_backups() {
        let temp_dir = tempfile::tempdir().unwrap();
        let k8s = temp_dir.path().join("k8s");
        fs::create_dir_all(&k8s).unwrap();
        fs::write(k8s.join("ingress-template.yaml"), "edited").unwrap();
        fs::write(k8s.join("ingress-template.yaml.bak"), "pristine").unwrap();

        isolated_cmd(temp_dir.path())
            .args(["cleanup", "--restore", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("would restore 1 backup file(s)"));

        assert_eq!(
            fs::read_to_string(k8s.join("ingress-template.yaml")).unwrap(),
            "edited"
        );
        assert!(k8s.join("ingress-template.yaml.bak").exists());
    }

    #[test]
    fn json_mode_keeps_prompt_on_the_event_stream() {
        let temp_dir = tempfile::tempdir().unwrap();
        let assert = isolated_cmd(temp_dir.path())
            .args(["--json", "cleanup"])
            .write_stdin("no\n")
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        assert!(stdout.contains(r#""event":"prompt""#), "{stdout}");
        for line in stdout.lines() {
            assert!(
                serde_json::from_str::<serde_json::Value>(line).is_ok(),
                "non-JSON line on stdout: {line}"
            );
        }
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("kubeploy.yml");

        kubeploy_cmd()
            .current_dir(temp_dir.path())
            .args(["init", "--namespace", "staging"])
            .assert()
            .success();

        assert!(config_path.exists(), "kubeploy.yml should be created");
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("namespace: staging"));
        assert!(content.contains("polling:"));
    }

    #[test]
    fn refuses_to_overwrite_existing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("kubeploy.yml"), "app: mine\n").unwrap();

        kubeploy_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        isolated_cmd(temp_dir.path())
            .args(["--config", "missing.yml", "status"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("configuration file not found"));
    }
}
