use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;
use serde_json::json;

/// Rewrites a small JSON status file after each asset so an external tool can follow a run.
///
/// Does nothing when no path was given. Failing to write the file never fails the run.
/// The phase is `sheets` until the first level is processed, then `levels`.
#[derive(Debug)]
pub struct ProgressFile {
    path: Option<PathBuf>,
    phase: &'static str,
    current: usize,
    total: usize,
}

impl ProgressFile {
    pub fn new(path: Option<&Path>, total: usize) -> Self {
        ProgressFile {
            path: path.map(Path::to_path_buf),
            phase: "sheets",
            current: 0,
            total,
        }
    }

    pub fn advance(&mut self, phase: &'static str) {
        self.phase = phase;
        self.current = (self.current + 1).min(self.total);
        self.write("running");
    }

    /// Records the final status under the last phase reached.
    pub fn finish(&self, succeeded: bool) {
        self.write(if succeeded { "done" } else { "failed" });
    }

    fn write(&self, status: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let json = json!({
            "current": self.current,
            "total": self.total,
            "phase": self.phase,
            "status": status,
        });
        if let Err(e) = fs::write(path, json.to_string()) {
            warn!("could not update progress file {}: {}", path.display(), e);
        }
    }
}
