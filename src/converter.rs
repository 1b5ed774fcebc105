/*!
 * Legacy `.ppt` conversion.
 *
 * Legacy decks are converted to `.pptx` with an external office suite
 * running headless. The converted file is written next to the input.
 */

use log::{debug, error, info};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::ConversionConfig;
use crate::errors::ConversionError;

/// Converts legacy decks with `soffice --headless --convert-to pptx`
#[derive(Debug, Clone)]
pub struct LegacyConverter {
    command: String,
    timeout: Duration,
}

impl LegacyConverter {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Convert a `.ppt` file, returning the path of the produced `.pptx`
    pub async fn convert<P: AsRef<Path>>(&self, ppt_path: P) -> Result<PathBuf, ConversionError> {
        let ppt_path = ppt_path.as_ref();
        let out_dir = ppt_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        info!("Converting {} to .pptx", ppt_path.display());

        let conversion = Command::new(&self.command)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pptx")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(ppt_path)
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = conversion => {
                result.map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ConversionError::ToolMissing(self.command.clone()),
                    _ => ConversionError::Io(format!("failed to run {}: {}", self.command, e)),
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                error!("{} did not finish within {} seconds", self.command, self.timeout.as_secs());
                return Err(ConversionError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("Conversion failed ({}): {}", output.status, stderr);
            return Err(ConversionError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stem = ppt_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let converted = find_converted(&out_dir, &stem)?;
        debug!("Converted file: {}", converted.display());
        Ok(converted)
    }
}

/// Locate the converted deck: `<stem>.pptx`, else any `<stem>*.pptx` ignoring case
pub fn find_converted(dir: &Path, stem: &str) -> Result<PathBuf, ConversionError> {
    let exact = dir.join(format!("{}.pptx", stem));
    if exact.is_file() {
        return Ok(exact);
    }

    let pattern = Regex::new(&format!(r"(?i)^{}.*\.pptx$", regex::escape(stem)))
        .map_err(|e| ConversionError::Io(e.to_string()))?;

    let entries = std::fs::read_dir(dir)
        .map_err(|e| ConversionError::Io(format!("failed to list {}: {}", dir.display(), e)))?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| pattern.is_match(&name.to_string_lossy()))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ConversionError::OutputMissing(format!("{}.pptx in {}", stem, dir.display())))
}
