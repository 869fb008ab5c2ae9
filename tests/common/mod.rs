// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temporary template files and a preconfigured kube-render command

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write a template file and return its path.
    pub fn write_template(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write template file");
        path
    }

    /// A kube-render command with a clean environment rooted in the temp directory.
    ///
    /// Only PATH is kept so that test variables are fully controlled.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_kube-render"));
        command.env_clear().current_dir(self.temp_dir.path());
        if let Ok(path) = std::env::var("PATH") {
            command.env("PATH", path);
        }
        command
    }

    /// Render `template` with the given environment and `--set` overrides.
    pub fn render(&self, template: &str, env: &[(&str, &str)], sets: &[&str]) -> Output {
        let path = self.write_template("template.yaml", template);
        let mut command = self.command();
        command.arg("--template").arg(&path);
        for set in sets {
            command.arg("--set").arg(set);
        }
        for (key, value) in env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute kube-render")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
