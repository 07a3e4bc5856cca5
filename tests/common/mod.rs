#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Byte-level variant for fixtures that need a BOM or raw control bytes.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Writes a config pointing at the given staging/production files, with
    /// `extra` spliced in as additional JSON members.
    pub fn write_config(&self, staging: &Path, production: &Path, extra: &str) -> PathBuf {
        let output = self.temp_dir.path().join("out").join("report.csv");
        let mut body = format!(
            r#"{{ "master_file": {}, "comparison_file": {}, "output_file": {}"#,
            json_string(staging),
            json_string(production),
            json_string(&output),
        );
        if !extra.is_empty() {
            body.push_str(", ");
            body.push_str(extra);
        }
        body.push_str(" }");
        self.write("config.json", &body)
    }

    pub fn report_path(&self) -> PathBuf {
        self.temp_dir.path().join("out").join("report.csv")
    }
}

fn json_string(path: &Path) -> String {
    serde_json::to_string(path.to_str().expect("utf-8 path")).expect("encode path")
}
