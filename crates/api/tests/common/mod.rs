#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use mathanim_api::config::ServerConfig;
use mathanim_api::router::build_app_router;
use mathanim_api::state::AppState;
use mathanim_gemini::{GeminiError, TextGenerator};

/// Stand-in Manim CLI: answers `--version` and writes the scene file as the
/// "video" into the resolution directory matching the quality flag.
pub const RENDERING_CLI: &str = r#"if [ "$1" = "--version" ]; then echo "Manim Community v0.18.1"; exit 0; fi
case "$1" in
  -ql) res=480p15 ;;
  -qm) res=720p30 ;;
  -qh) res=1080p60 ;;
  *) echo "unknown flag $1" >&2; exit 2 ;;
esac
out="$MANIM_MEDIA_DIR/videos/$3/$res"
mkdir -p "$out"
cp "$2" "$out/$3.mp4""#;

/// Stand-in that exits cleanly without writing any video.
pub const SILENT_CLI: &str = r#"if [ "$1" = "--version" ]; then echo "Manim Community v0.18.1"; fi
exit 0"#;

/// Stand-in whose render fails with a Python traceback on stderr.
pub const FAILING_CLI: &str = r#"if [ "$1" = "--version" ]; then echo "Manim Community v0.18.1"; exit 0; fi
echo "NameError: name 'Circl' is not defined" >&2
exit 1"#;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Generator returning a fixed response.
pub struct CannedGenerator(pub String);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        Ok(self.0.clone())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

/// Generator that always fails, as with a missing API key.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        Err(GeminiError::MissingApiKey)
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// A typical model reply: fenced, with an import line and nested blocks.
pub const MODEL_REPLY: &str = "```python\nfrom manim import *\ncircle = Circle()\nfor i in range(2):\n    self.play(Create(circle))\n```";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Running test application plus the temp directory backing it.
///
/// The directory is removed when this value is dropped.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub dir: TempDir,
}

impl TestApp {
    pub fn videos_dir(&self) -> &Path {
        &self.config.videos_dir
    }

    /// Clone of the router for a single `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` rooted at `dir`, running Manim as
/// `program base_args...`.
pub fn test_config(dir: &Path, program: &str, base_args: Vec<String>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        base_dir: dir.to_path_buf(),
        videos_dir: dir.join("videos"),
        media_dir: dir.join("media"),
        temp_dir: dir.join("temp"),
        manim_program: program.to_string(),
        manim_args: base_args,
        render_timeout_secs: 10,
        gemini_api_key: None,
        gemini_model: "test-model".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        gemini_timeout_secs: 5,
    }
}

/// Write `body` as a shell script inside `dir` and return its path.
pub fn write_cli_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake_manim.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    path
}

/// Build the app with a fake Manim CLI (`sh <script>`) and the given generator.
pub fn build_test_app(cli_body: &str, generator: Arc<dyn TextGenerator>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let script = write_cli_script(dir.path(), cli_body);
    let config = test_config(dir.path(), "sh", vec![script.display().to_string()]);
    build_with_config(dir, config, generator)
}

/// Build the app with a Manim program that does not exist.
pub fn build_app_without_renderer(generator: Arc<dyn TextGenerator>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        "/nonexistent/mathanim-test/python",
        vec!["-m".into(), "manim".into()],
    );
    build_with_config(dir, config, generator)
}

fn build_with_config(dir: TempDir, config: ServerConfig, generator: Arc<dyn TextGenerator>) -> TestApp {
    config.ensure_directories().unwrap();
    let state = AppState::with_generator(config.clone(), generator);
    let router = build_app_router(state, &config);
    TestApp {
        router,
        config,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
