use anyhow::{anyhow, Result};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::app_config::ExportConfig;
use crate::errors::ScriptError;

// @module: External export program invocation

// @struct: Prepared export command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCommand {
    // @field: Program to execute
    pub program: String,

    // @field: Arguments with placeholders substituted
    pub args: Vec<String>,

    // @field: Markup file handed to the program
    pub source: PathBuf,

    // @field: Expected output file
    pub output: PathBuf,

    // @field: Timeout in seconds
    pub timeout_secs: u64,
}

impl ExportCommand {
    /// Build the command for a script. A script without a backing file has
    /// nothing the external program could read.
    pub fn prepare(config: &ExportConfig, source: Option<&Path>) -> Result<Self, ScriptError> {
        let source = source.ok_or(ScriptError::NoBackingDestination)?;
        let output = source.with_extension(&config.extension);

        let source_text = source.to_string_lossy();
        let output_text = output.to_string_lossy();
        let args = config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{source}", &source_text)
                    .replace("{output}", &output_text)
            })
            .collect();

        Ok(Self {
            program: config.program.clone(),
            args,
            source: source.to_path_buf(),
            output,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Run the program and wait for it, up to the timeout
    pub async fn run(&self) -> Result<PathBuf> {
        if !self.source.exists() {
            return Err(anyhow!("Source file does not exist: {:?}", self.source));
        }

        debug!("Running {} {}", self.program, self.args.join(" "));
        // Add timeout to prevent hanging on a stuck export program
        let export_future = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = export_future => {
                result.map_err(|e| anyhow!("Failed to execute {}: {}", self.program, e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("{} timed out after {} seconds", self.program, self.timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("Export failed: {}", stderr.trim());
            return Err(anyhow!("{} exited with {}: {}", self.program, result.status, stderr.trim()));
        }

        info!("Exported: {}", self.output.display());
        Ok(self.output.clone())
    }
}
