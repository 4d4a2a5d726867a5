use std::path::PathBuf;
use std::time::Duration;

use mathanim_gemini::api::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use mathanim_render::ManimConfig;

/// Origins of the local frontend dev servers.
const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:5173,http://localhost:8080,http://127.0.0.1:5173,http://127.0.0.1:8080";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `900`). Must exceed the render timeout.
    pub request_timeout_secs: u64,
    /// Working directory for render processes.
    pub base_dir: PathBuf,
    /// Root of per-animation directories served under `/videos`.
    pub videos_dir: PathBuf,
    /// Manim media output root (`MANIM_MEDIA_DIR`).
    pub media_dir: PathBuf,
    /// Scratch directory.
    pub temp_dir: PathBuf,
    /// Program used to invoke Manim (default: `python`).
    pub manim_program: String,
    /// Arguments placed before the Manim arguments (default: `-m manim`).
    pub manim_args: Vec<String>,
    /// Render subprocess timeout in seconds (default: `600`).
    pub render_timeout_secs: u64,
    /// Gemini API key; generation always falls back when unset.
    pub gemini_api_key: Option<String>,
    /// Gemini model identifier.
    pub gemini_model: String,
    /// Gemini API base URL.
    pub gemini_base_url: String,
    /// Per-call timeout for Gemini in seconds (default: `120`). A stalled
    /// call then falls back well before the HTTP timeout fires.
    pub gemini_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `5001`                           |
    /// | `CORS_ORIGINS`         | local dev servers on 5173 / 8080 |
    /// | `REQUEST_TIMEOUT_SECS` | `900`                            |
    /// | `BASE_DIR`             | current directory                |
    /// | `VIDEOS_DIR`           | `<BASE_DIR>/videos`              |
    /// | `MEDIA_DIR`            | `<BASE_DIR>/media`               |
    /// | `TEMP_DIR`             | `<BASE_DIR>/temp`                |
    /// | `MANIM_PROGRAM`        | `python`                         |
    /// | `MANIM_ARGS`           | `-m manim`                       |
    /// | `RENDER_TIMEOUT_SECS`  | `600`                            |
    /// | `GEMINI_API_KEY`       | unset                            |
    /// | `GEMINI_MODEL`         | `gemini-1.5-flash-latest`        |
    /// | `GEMINI_BASE_URL`      | Google's public endpoint         |
    /// | `GEMINI_TIMEOUT_SECS`  | `120`                            |
    ///
    /// Directory settings are made absolute: the render process runs in
    /// `BASE_DIR`, so relative paths would resolve differently there.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = var("PORT")
            .unwrap_or_else(|| "5001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let base_dir = match var("BASE_DIR") {
            Some(dir) => absolute_dir(PathBuf::from(dir)),
            None => std::env::current_dir().expect("Current directory must be accessible"),
        };
        let dir_or = |key: &str, default: &str| {
            var(key)
                .map(|dir| absolute_dir(PathBuf::from(dir)))
                .unwrap_or_else(|| base_dir.join(default))
        };
        let videos_dir = dir_or("VIDEOS_DIR", "videos");
        let media_dir = dir_or("MEDIA_DIR", "media");
        let temp_dir = dir_or("TEMP_DIR", "temp");

        let manim_program = var("MANIM_PROGRAM").unwrap_or_else(|| "python".into());
        let manim_args: Vec<String> = var("MANIM_ARGS")
            .unwrap_or_else(|| "-m manim".into())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let render_timeout_secs: u64 = var("RENDER_TIMEOUT_SECS")
            .unwrap_or_else(|| "600".into())
            .parse()
            .expect("RENDER_TIMEOUT_SECS must be a valid u64");

        let gemini_api_key = var("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());
        let gemini_model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let gemini_base_url = var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let gemini_timeout_secs: u64 = var("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GEMINI_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            base_dir,
            videos_dir,
            media_dir,
            temp_dir,
            manim_program,
            manim_args,
            render_timeout_secs,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            gemini_timeout_secs,
        }
    }

    /// Create the videos, media and temp directories if missing.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.videos_dir, &self.media_dir, &self.temp_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn manim_config(&self) -> ManimConfig {
        ManimConfig {
            program: self.manim_program.clone(),
            base_args: self.manim_args.clone(),
            media_dir: self.media_dir.clone(),
            working_dir: self.base_dir.clone(),
            render_timeout: Duration::from_secs(self.render_timeout_secs),
        }
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            request_timeout: Duration::from_secs(self.gemini_timeout_secs),
        }
    }
}

/// Resolve `path` against the current directory when relative.
fn absolute_dir(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
