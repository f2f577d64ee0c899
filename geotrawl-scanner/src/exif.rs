use crate::error::{Result, ScanError};
use crate::ports::MetadataReader;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Tags requested from exiftool, in the order it prints them.
pub const GPS_TAG_ARGS: [&str; 4] = [
    "-gpslatitude",
    "-gpslongitude",
    "-gpslatituderef",
    "-gpslongituderef",
];

/// Reads GPS tags by shelling out to `exiftool`.
#[derive(Debug, Clone)]
pub struct ExifToolReader {
    program: String,
}

impl ExifToolReader {
    pub fn new() -> Self {
        Self::with_program("exiftool")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ExifToolReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader for ExifToolReader {
    async fn read_tags(&self, path: &Path) -> Result<String> {
        debug!("Reading tags of {} with {}", path.display(), self.program);

        let output = Command::new(&self.program)
            .args(GPS_TAG_ARGS)
            .arg(path)
            .output()
            .await
            .map_err(|e| ScanError::CommandError(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(ScanError::CommandError(format!(
                "{} exited with {} for {}",
                self.program,
                output.status,
                path.display()
            )));
        }

        // exiftool reports per-file problems on stderr with a zero exit code
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(ScanError::CommandError(format!(
                "stderr for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
