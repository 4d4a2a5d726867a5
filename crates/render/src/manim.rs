//! Manim CLI invocation.
//!
//! The CLI is described by a program plus leading arguments (default
//! `python -m manim`) so it can point at a venv interpreter, a `manim`
//! binary, or a stand-in script.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mathanim_core::options::Quality;
use tokio::process::Command;

use crate::output;
use crate::subprocess::{run_command, CommandOutput};

/// Environment variable Manim reads for its media output root.
pub const MEDIA_DIR_ENV: &str = "MANIM_MEDIA_DIR";

/// Upper bound for the `--version` probe.
const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for Manim operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Manim is not properly installed or accessible: {0}")]
    NotInstalled(String),

    #[error("Manim execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Manim timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Animation file was not created for scene {scene_name}")]
    OutputMissing { scene_name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How and where to run Manim.
#[derive(Debug, Clone)]
pub struct ManimConfig {
    /// Executable to spawn, e.g. `python`.
    pub program: String,
    /// Arguments placed before the Manim arguments, e.g. `["-m", "manim"]`.
    pub base_args: Vec<String>,
    /// Value for [`MEDIA_DIR_ENV`].
    pub media_dir: PathBuf,
    /// Working directory of the render process.
    pub working_dir: PathBuf,
    /// Wall-clock limit for a single render.
    pub render_timeout: Duration,
}

pub struct ManimRunner {
    config: ManimConfig,
}

impl ManimRunner {
    pub fn new(config: ManimConfig) -> Self {
        Self { config }
    }

    /// Base command with the configured program and leading arguments.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.base_args);
        cmd
    }

    /// Run `--version` and return the reported version string.
    ///
    /// Any spawn failure, timeout, or non-zero exit is reported as
    /// [`RenderError::NotInstalled`].
    pub async fn check_installation(&self) -> Result<String, RenderError> {
        let mut cmd = self.command();
        cmd.arg("--version");

        let output = run_command(&mut cmd, VERSION_CHECK_TIMEOUT)
            .await
            .map_err(|e| {
                tracing::error!(program = %self.config.program, error = %e, "Manim command not found");
                RenderError::NotInstalled(e.to_string())
            })?;

        if !output.success() {
            tracing::error!(stderr = %output.stderr, "Manim version check failed");
            return Err(RenderError::NotInstalled(output.stderr));
        }

        let version = output.stdout.trim().to_string();
        tracing::info!(%version, "Manim version");
        Ok(version)
    }

    /// Render `scene_name` from `scene_file` at `quality`.
    ///
    /// Returns the captured process output. A non-zero exit becomes
    /// [`RenderError::ExecutionFailed`] carrying stderr.
    pub async fn render(
        &self,
        scene_file: &Path,
        scene_name: &str,
        quality: Quality,
    ) -> Result<CommandOutput, RenderError> {
        let mut cmd = self.command();
        cmd.arg(quality.flag())
            .arg(scene_file)
            .arg(scene_name)
            .env(MEDIA_DIR_ENV, &self.config.media_dir)
            .current_dir(&self.config.working_dir);

        tracing::info!(
            program = %self.config.program,
            args = ?self.config.base_args,
            flag = quality.flag(),
            scene_file = %scene_file.display(),
            scene_name,
            "Running Manim"
        );

        let output = run_command(&mut cmd, self.config.render_timeout).await?;

        if !output.success() {
            tracing::error!(exit_code = ?output.exit_code, stderr = %output.stderr, "Manim execution failed");
            return Err(RenderError::ExecutionFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        tracing::info!(duration_ms = output.duration_ms, stdout = %output.stdout, "Manim finished");
        Ok(output)
    }

    /// Render and collect the video into `output_dir`, returning its path.
    pub async fn render_into(
        &self,
        scene_file: &Path,
        scene_name: &str,
        quality: Quality,
        output_dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        self.render(scene_file, scene_name, quality).await?;
        output::collect_output(&self.config.media_dir, output_dir, scene_name).await
    }
}
