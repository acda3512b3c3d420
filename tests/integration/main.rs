//! Integration tests for scc-checker

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    pub fn checker() -> Command {
        let mut cmd = cargo_bin_cmd!("scc-checker");
        cmd.env_remove("SCC_CONFIG_FILE")
            .env_remove("SCC_WL_CACHE_LIST")
            .env("CI", "1");
        cmd
    }

    #[test]
    fn help_displays() {
        checker()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("shared class cache"));
    }

    #[test]
    fn version_displays() {
        checker()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("scc-checker"));
    }

    #[test]
    fn bad_arguments_exit_with_one() {
        checker().arg("--no-such-flag").assert().code(1);
    }

    #[test]
    fn check_without_config_fails() {
        checker()
            .args(["check", "--workload-caches", "T1"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No config file supplied"));
    }

    #[test]
    fn check_with_missing_config_file_fails() {
        checker()
            .args(["--config", "/nonexistent/run.props", "check"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Configuration file not found"));
    }

    #[test]
    fn config_show_defaults() {
        checker()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("reapMode = \"single\""));
    }

    #[test]
    fn config_path_without_file() {
        checker()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("none"));
    }
}

#[cfg(unix)]
mod fake_java_tests {
    use super::cli_tests::checker;
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const LISTING: &str = "\
Listing all caches in cacheDir /tmp/javasharedresources/

Cache name              level         cache-type      feature         layer       OS shmid       OS semid       last detach time

Compatible shared caches
T1                      Java17 64-bit persistent      cr              0                                         Mon Jan 25 10:25:00 2021
T2                      Java17 64-bit persistent      cr              0                                         Mon Jan 25 10:25:00 2021
T3                      Java17 64-bit non-persistent  cr              0           32789          12             In use
T4                      Java17 64-bit non-persistent  cr              0           32790          13             In use
other                   Java17 64-bit persistent      cr              0                                         Mon Jan 25 10:25:00 2021
";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("listing.txt"), LISTING).unwrap();

            let script = format!(
                r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    *listAllCaches*)
      cat "{listing}" >&2
      exit 1
      ;;
    *destroy*)
      name=$(echo "$arg" | sed -n 's/.*name=\([^,]*\).*/\1/p')
      echo "$name" >> "{log}"
      echo "JVMSHRC806I Compressed references shared cache \"$name\" has been destroyed" >&2
      exit 1
      ;;
  esac
done
exit 0
"#,
                listing = dir.path().join("listing.txt").display(),
                log = dir.path().join("destroyed.log").display(),
            );
            let java = dir.path().join("java");
            std::fs::write(&java, script).unwrap();
            std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();

            Self { dir }
        }

        fn path(&self, file: &str) -> PathBuf {
            self.dir.path().join(file)
        }

        fn declare(&self, name: &str, persistent: bool) -> PathBuf {
            let path = self.path(&format!("{}.props", name));
            std::fs::write(&path, format!("name={}\npersistence={}\n", name, persistent)).unwrap();
            path
        }

        fn config(&self, t3_persistent: bool, extra: &str) -> PathBuf {
            let files: Vec<String> = [("T1", true), ("T2", true), ("T3", t3_persistent), ("T4", false)]
                .iter()
                .map(|(name, persistent)| self.declare(name, *persistent).display().to_string())
                .collect();
            let path = self.path("run.props");
            std::fs::write(
                &path,
                format!(
                    "java={}\ncacheDir=default\nexpectedCacheCount=4\ncacheFiles={}\n{}",
                    self.path("java").display(),
                    files.join(" "),
                    extra
                ),
            )
            .unwrap();
            path
        }

        fn destroyed(&self) -> Vec<String> {
            read_lines(&self.path("destroyed.log"))
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn check_verifies_and_destroys_all_workload_caches() {
        let fx = Fixture::new();
        let config = fx.config(false, "delete=true\nreapMode=all\n");

        checker()
            .arg("--config")
            .arg(&config)
            .args(["check", "--workload-caches", "T1--T2--T3--T4"])
            .assert()
            .success()
            .stdout(predicate::str::contains("CacheAPIChecker COMPLETED SUCCESSFULLY"));

        assert_eq!(fx.destroyed(), vec!["T1", "T2", "T3", "T4"]);
    }

    #[test]
    fn check_destroys_one_cache_in_single_mode() {
        let fx = Fixture::new();
        let config = fx.config(false, "delete=true\n");

        checker()
            .arg("--config")
            .arg(&config)
            .arg("check")
            .env("SCC_WL_CACHE_LIST", "T1--T2--T3--T4")
            .assert()
            .success();

        assert_eq!(fx.destroyed(), vec!["T1"]);
    }

    #[test]
    fn persistence_mismatch_fails_without_destroying() {
        let fx = Fixture::new();
        let config = fx.config(true, "delete=true\nreapMode=all\n");

        checker()
            .arg("--config")
            .arg(&config)
            .args(["check", "--workload-caches", "T1--T2--T3--T4"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("VERIFICATION FAILED").and(predicate::str::contains("T3")));

        assert!(fx.destroyed().is_empty());
    }

    #[test]
    fn check_without_workload_list_fails() {
        let fx = Fixture::new();
        let config = fx.config(false, "");

        checker()
            .arg("--config")
            .arg(&config)
            .arg("check")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("No workload cache list"));
    }

    #[test]
    fn check_writes_records() {
        let fx = Fixture::new();
        let records = fx.path("records.jsonl");
        let config = fx.config(false, "");

        checker()
            .arg("--config")
            .arg(&config)
            .args(["check", "--workload-caches", "T1--T2--T3--T4", "--records"])
            .arg(&records)
            .assert()
            .success()
            .stdout(predicate::str::contains("records:"));

        let lines = read_lines(&records);
        assert!(lines.iter().any(|l| l.contains("\"cache.found\"")));
        assert!(lines.last().is_some_and(|l| l.contains("\"run.result\"")));
    }

    #[test]
    fn list_plain_filters_workload() {
        let fx = Fixture::new();
        let config = fx.config(false, "");

        checker()
            .arg("--config")
            .arg(&config)
            .args(["list", "--format", "plain", "--workload-caches", "T1--T3"])
            .assert()
            .success()
            .stdout(predicate::eq("T1\nT3\n"));
    }

    #[test]
    fn destroy_named_cache() {
        let fx = Fixture::new();
        let config = fx.config(false, "");

        checker()
            .arg("--config")
            .arg(&config)
            .args(["destroy", "T2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Destroyed T2"));

        assert_eq!(fx.destroyed(), vec!["T2"]);
    }
}
