//! Integration tests for model-forge.
//!
//! These tests verify that:
//! - Config files merge under CLI arguments
//! - The binary exits 0 on a full build and on a fully cached rebuild
//! - A broken compiler or a failed export makes the binary exit non-zero

use clap::Parser;
use common::Precision;
use forge_cli::{CliArgs, ForgeConfig, SourceKind};
use std::path::{Path, PathBuf};

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("forge.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn parse(config: &Path, extra: &[&str]) -> CliArgs {
    let mut argv = vec!["model-forge".to_string(), "--config".to_string()];
    argv.push(config.to_string_lossy().into_owned());
    argv.extend(extra.iter().map(|arg| arg.to_string()));
    CliArgs::try_parse_from(argv).unwrap()
}

#[test]
fn test_config_file_fills_unset_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
model = "detector-small"
output_dir = "/srv/engines"
precision = "int8"

[source]
kind = "hub"
hub_repo = "acme/detectors"

[compiler]
executable = "/opt/tensorrt/bin/trtexec"
timeout_secs = 1800
"#,
    );

    let config = ForgeConfig::load(&parse(&path, &[])).unwrap();

    assert_eq!(config.model, "detector-small");
    assert_eq!(config.output_dir, PathBuf::from("/srv/engines"));
    assert_eq!(config.precision, Precision::Int8);
    assert_eq!(config.source.kind, SourceKind::Hub);
    assert_eq!(config.source.hub_repo.as_deref(), Some("acme/detectors"));
    assert_eq!(config.source.hub_url, "https://huggingface.co");
    assert_eq!(config.compiler.executable, "/opt/tensorrt/bin/trtexec");
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "model = \"detector-small\"\nprecision = \"int8\"\n");

    let config = ForgeConfig::load(&parse(&path, &["--precision", "fp32", "--trtexec", "trtexec-10"])).unwrap();

    assert_eq!(config.model, "detector-small");
    assert_eq!(config.precision, Precision::Fp32);
    assert_eq!(config.compiler.executable, "trtexec-10");
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "precision = \"fp8\"\n");

    let err = ForgeConfig::load(&parse(&path, &[])).unwrap_err();
    assert!(format!("{:#}", err).contains("forge.toml"));
}

#[test]
fn test_invalid_model_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "model = \"../../etc/passwd\"\n");

    assert!(ForgeConfig::load(&parse(&path, &[])).is_err());
}

#[cfg(unix)]
mod binary {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::process::{Command, Output};

    struct Fixture {
        tools: tempfile::TempDir,
        work: tempfile::TempDir,
    }

    impl Fixture {
        fn new(trtexec_probe_exit: i32) -> Self {
            let tools = tempfile::tempdir().unwrap();
            let log = tools.path().join("calls.log");

            script(
                &tools.path().join("python"),
                &format!(
                    r#"echo python >> "{log}"
if [ -n "$4" ]; then printf 'weights' > "$4"; else printf 'graph' > "${{3%.pt}}.onnx"; fi"#,
                    log = log.display()
                ),
            );
            script(
                &tools.path().join("trtexec"),
                &format!(
                    r#"echo "trtexec $1" >> "{log}"
[ "$1" = "--version" ] && {{ echo "TensorRT v100300"; exit {probe}; }}
for arg in "$@"; do
  case "$arg" in --saveEngine=*) printf 'plan' > "${{arg#--saveEngine=}}" ;; esac
done"#,
                    log = log.display(),
                    probe = trtexec_probe_exit
                ),
            );

            Self {
                tools,
                work: tempfile::tempdir().unwrap(),
            }
        }

        /// Replaces the interpreter with one that loads weights but fails every export.
        fn failing_export(self) -> Self {
            script(
                &self.tools.path().join("python"),
                &format!(
                    r#"echo python >> "{log}"
if [ -n "$4" ]; then printf 'weights' > "$4"; else echo 'ONNX: export failure' >&2; exit 1; fi"#,
                    log = self.tools.path().join("calls.log").display()
                ),
            );
            self
        }

        fn models(&self) -> PathBuf {
            self.work.path().join("models")
        }

        fn run(&self, args: &[&str]) -> Output {
            let mut cmd = Command::new(env!("CARGO_BIN_EXE_model-forge"));
            for (key, _) in std::env::vars() {
                if key.starts_with("FORGE_") {
                    cmd.env_remove(key);
                }
            }
            cmd.current_dir(self.work.path())
                .env("RUST_LOG", "info")
                .arg("--model")
                .arg("detector-small")
                .arg("--output-dir")
                .arg(self.models())
                .arg("--python")
                .arg(self.tools.path().join("python"))
                .arg("--trtexec")
                .arg(self.tools.path().join("trtexec"))
                .args(args)
                .output()
                .unwrap()
        }

        fn calls(&self) -> usize {
            std::fs::read_to_string(self.tools.path().join("calls.log"))
                .map(|log| log.lines().count())
                .unwrap_or(0)
        }
    }

    fn script(path: &Path, body: &str) {
        std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_build_then_cached_rebuild() {
        let fixture = Fixture::new(0);

        let first = fixture.run(&["run"]);
        assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
        assert_eq!(
            entries(&fixture.models()),
            vec!["detector-small.engine", "detector-small.onnx", "detector-small.pt"]
        );
        let stdout = String::from_utf8_lossy(&first.stdout);
        assert!(stdout.trim().ends_with("detector-small.engine"));
        let calls = fixture.calls();
        assert_eq!(calls, 4);

        let second = fixture.run(&["--json"]);
        assert!(second.status.success());
        assert_eq!(fixture.calls(), calls);
        let report: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
        let outcomes: Vec<&str> = report["stages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|stage| stage["outcome"].as_str().unwrap())
            .collect();
        assert_eq!(outcomes, vec!["skipped", "skipped", "skipped"]);
    }

    #[test]
    fn test_plan_has_no_side_effects() {
        let fixture = Fixture::new(0);

        let output = fixture.run(&["plan"]);

        assert!(output.status.success());
        assert!(!fixture.models().exists());
        assert_eq!(fixture.calls(), 0);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.lines().count(), 3);
        assert!(stdout.lines().all(|line| line.contains(" run ")));
    }

    #[test]
    fn test_unavailable_compiler_exits_nonzero() {
        let fixture = Fixture::new(1);

        let output = fixture.run(&["run"]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("not available"));
        assert!(!fixture.models().join("detector-small.engine").exists());
    }

    #[test]
    fn test_failed_export_exits_nonzero() {
        let fixture = Fixture::new(0).failing_export();

        let output = fixture.run(&["run"]);

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Convert stage failed"), "{stderr}");
        assert!(stderr.contains("ONNX: export failure"), "{stderr}");
        assert_eq!(entries(&fixture.models()), vec!["detector-small.pt"]);
        assert_eq!(fixture.calls(), 2);
    }

    #[test]
    fn test_probe() {
        let ok = Fixture::new(0).run(&["probe"]);
        assert!(ok.status.success());
        assert_eq!(String::from_utf8_lossy(&ok.stdout).trim(), "TensorRT v100300");

        let broken = Fixture::new(1).run(&["probe"]);
        assert!(!broken.status.success());
    }
}
