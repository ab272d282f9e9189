#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use taskdeck::RootState;
use tempfile::TempDir;

/// A throwaway data directory for one test.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.path().join("taskManagerState.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("taskdeck.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_state(&self) -> Result<RootState, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.slot_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskdeck").expect("binary");
        cmd.env_remove("RUST_LOG");
        cmd.env("TASKDECK_DIR", self.path());
        cmd
    }

    /// Run `args` with `--json` and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output)?;
        Ok(value["data"].clone())
    }
}
