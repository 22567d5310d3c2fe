//! `oc adm must-gather` runs into timestamped directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};

use crate::constants::{
    DEFAULT_MUST_GATHER_PROGRAM, MUST_GATHER_DIR_PREFIX, MUST_GATHER_TIMESTAMP_FORMAT,
};
use crate::security::scrub_credentials;

/// Builder for a must-gather invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustGatherCommand {
    program: String,
    dest_dir: Option<PathBuf>,
    image_url: Option<String>,
    skip_tls_check: bool,
    kubeconfig: Option<PathBuf>,
    script_name: Option<String>,
    verify_stderr: bool,
}

impl Default for MustGatherCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_MUST_GATHER_PROGRAM.to_string(),
            dest_dir: None,
            image_url: None,
            skip_tls_check: false,
            kubeconfig: None,
            script_name: None,
            verify_stderr: true,
        }
    }
}

impl MustGatherCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// CLI to run instead of `oc`
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn dest_dir(mut self, dest_dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = Some(dest_dir.into());
        self
    }

    /// must-gather plugin image; the cluster default image is used when unset
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn skip_tls_check(mut self, skip: bool) -> Self {
        self.skip_tls_check = skip;
        self
    }

    pub fn kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    /// Script run inside the must-gather image
    pub fn script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = Some(script_name.into());
        self
    }

    /// Treat any stderr output as failure (default `true`)
    pub fn verify_stderr(mut self, verify: bool) -> Self {
        self.verify_stderr = verify;
        self
    }

    /// Arguments after the program name. The script name, if any, comes last.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["adm".to_string(), "must-gather".to_string()];

        if let Some(dest_dir) = &self.dest_dir {
            args.push(format!("--dest-dir={}", dest_dir.display()));
        }
        if let Some(image_url) = &self.image_url {
            args.push(format!("--image={}", image_url));
        }
        if self.skip_tls_check {
            args.push("--insecure-skip-tls-verify".to_string());
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        if let Some(script_name) = &self.script_name {
            args.push("--".to_string());
            args.push(script_name.clone());
        }

        args
    }

    /// Full command line, for logging
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.to_args());
        parts.join(" ")
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the command as is.
///
/// A non-zero exit status, or stderr output when `verify_stderr` is set, is
/// reported through `success = false` and logged; only failing to spawn the
/// program is an error.
pub fn run_command(command: &MustGatherCommand) -> Result<CommandOutput> {
    let command_line = command.command_line();
    info!("must-gather command: {}", scrub_credentials(&command_line));

    let output = Command::new(&command.program)
        .args(command.to_args())
        .output()
        .with_context(|| format!("Failed to execute {}", command.program))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let success = output.status.success() && !(command.verify_stderr && !stderr.is_empty());
    if !success {
        error!(
            "Failed to run {}. rc: {:?}, out: {}, error: {}",
            scrub_credentials(&command_line),
            output.status.code(),
            scrub_credentials(&stdout),
            scrub_credentials(&stderr)
        );
    }

    Ok(CommandOutput {
        success,
        stdout,
        stderr,
    })
}

/// Directory a must-gather started now would write to.
pub fn must_gather_dir(target_base_dir: &Path) -> PathBuf {
    target_base_dir.join(format!(
        "{}{}",
        MUST_GATHER_DIR_PREFIX,
        Utc::now().format(MUST_GATHER_TIMESTAMP_FORMAT)
    ))
}

/// Run must-gather, optionally into a fresh timestamped directory.
///
/// With `target_base_dir` set, `<target>/must_gather_<YYYY_mm_dd_HH_MM_SS>`
/// is created (parents included) and passed as `--dest-dir`, overriding any
/// destination already on the command. Creating it fails if it already
/// exists.
pub fn run_must_gather(
    command: MustGatherCommand,
    target_base_dir: Option<&Path>,
) -> Result<CommandOutput> {
    let command = match target_base_dir {
        Some(base) => {
            let dest_dir = must_gather_dir(base);
            fs::create_dir_all(base)
                .with_context(|| format!("Failed to create directory: {}", base.display()))?;
            fs::create_dir(&dest_dir).with_context(|| {
                format!("Failed to create must-gather directory: {}", dest_dir.display())
            })?;
            command.dest_dir(dest_dir)
        }
        None => command,
    };

    run_command(&command)
}
