//! Server configuration.
//!
//! Built once in `main` and shared read-only through
//! [`AppState`](crate::state::AppState). Sources are layered, later ones
//! winning:
//!
//! 1. built-in defaults,
//! 2. the JSON config file (`--config`, `CHATMOCK_CONFIG`, or `./config.json`),
//! 3. `CHATMOCK_*` environment variables,
//! 4. command-line flags.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Command-line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "chatmock-server", version, about = "Mock chat backend with SSE streaming")]
pub struct Cli {
    /// Interface to bind, e.g. `127.0.0.1`.
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// Path of the JSON config file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// Runtime configuration for chatmock-server.
///
/// Every field has a default so the server starts without any file,
/// variable or flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Interface to bind (default: `"0.0.0.0"`).
    pub host: String,

    /// TCP port (default: `5001`).
    pub port: u16,

    /// Debug mode; lowers the default log level to `debug`.
    pub debug: bool,

    /// Where uploaded files are written and served from.
    pub upload_dir: PathBuf,

    /// Lower-case file extensions accepted by `POST /api/upload`.
    pub allowed_extensions: Vec<String>,

    /// Largest accepted upload body in bytes (default: 16 MiB).
    pub max_upload_bytes: usize,

    /// When `false` no CORS headers are added at all.
    pub cors_enabled: bool,

    /// Comma-separated origin allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Built web client. Served with an `index.html` fallback when it exists.
    pub frontend_dir: PathBuf,

    /// Attach fixture cookies to message responses for proxy testing.
    pub test_cookies: bool,

    /// When `false`, streams are sent without artificial delays.
    pub pacing: bool,

    /// Chance of attaching an image to a reply without image uploads.
    pub image_probability: f64,

    /// Fixed RNG seed; makes every reply for the same input identical.
    pub seed: Option<u64>,

    /// `tracing` filter string. Defaults to `info`, or `debug` in debug mode.
    pub log_level: Option<String>,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Also write logs to a daily rolling file in this directory.
    pub log_dir: Option<PathBuf>,

    /// Serve the OpenAPI document and Swagger UI.
    pub enable_swagger: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 5001,
            debug: false,
            upload_dir: PathBuf::from("uploads"),
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "pdf", "txt", "doc", "docx"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            max_upload_bytes: 16 * 1024 * 1024,
            cors_enabled: true,
            cors_allowed_origins: None,
            frontend_dir: PathBuf::from("dist"),
            test_cookies: false,
            pacing: true,
            image_probability: chatmock_core::compose::DEFAULT_IMAGE_PROBABILITY,
            seed: None,
            log_level: None,
            log_json: false,
            log_dir: None,
            enable_swagger: true,
        }
    }
}

impl Config {
    /// Build the effective configuration for this process.
    pub fn load(cli: &Cli) -> Self {
        let path = cli
            .config
            .clone()
            .or_else(|| std::env::var_os("CHATMOCK_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut cfg = Self::default();
        match read_config_file(&path) {
            Ok(Some(file)) => cfg.apply_file(file),
            Ok(None) => {}
            // Tracing is not up yet.
            Err(e) => eprintln!(
                "WARN: ignoring config file '{}': {e}; using defaults",
                path.display()
            ),
        }
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.apply_cli(cli);
        cfg
    }

    /// The filter used when `RUST_LOG` is unset.
    pub fn effective_log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.debug => "debug",
            None => "info",
        }
    }

    /// Whether `filename` ends in one of the allowed extensions.
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.allowed_extensions.iter().any(|a| *a == ext))
    }

    fn apply_file(&mut self, file: FileConfig) {
        let FileBackend {
            server,
            uploads,
            cors,
        } = file.backend;

        if let Some(host) = server.host {
            self.host = host;
        }
        if let Some(port) = server.port {
            self.port = port;
        }
        if let Some(debug) = server.debug {
            self.debug = debug;
        }
        if let Some(folder) = uploads.folder {
            self.upload_dir = folder;
        }
        if let Some(exts) = uploads.allowed_extensions {
            self.allowed_extensions = normalise_extensions(exts);
        }
        if let Some(max) = uploads.max_content_length {
            self.max_upload_bytes = max;
        }
        if let Some(enabled) = cors.enabled {
            self.cors_enabled = enabled;
        }
        if let Some(origins) = cors.allowed_origins {
            self.cors_allowed_origins = Some(origins.join(","));
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = &var;

        if let Some(host) = var("CHATMOCK_HOST") {
            self.host = host;
        }
        // `PORT` is what most hosting platforms inject.
        if let Some(port) = parse_env(var, "CHATMOCK_PORT").or_else(|| parse_env(var, "PORT")) {
            self.port = port;
        }
        if let Some(debug) = flag_env(var, "CHATMOCK_DEBUG") {
            self.debug = debug;
        }
        if let Some(dir) = var("CHATMOCK_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(exts) = var("CHATMOCK_ALLOWED_EXTENSIONS") {
            self.allowed_extensions =
                normalise_extensions(exts.split(',').map(str::to_owned).collect());
        }
        if let Some(max) = parse_env(var, "CHATMOCK_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = max;
        }
        if let Some(enabled) = flag_env(var, "CHATMOCK_CORS") {
            self.cors_enabled = enabled;
        }
        if let Some(origins) = var("CHATMOCK_CORS_ORIGINS") {
            self.cors_allowed_origins = Some(origins);
        }
        if let Some(dir) = var("CHATMOCK_FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(dir);
        }
        if let Some(enabled) = flag_env(var, "CHATMOCK_TEST_COOKIES") {
            self.test_cookies = enabled;
        }
        if let Some(enabled) = flag_env(var, "CHATMOCK_PACING") {
            self.pacing = enabled;
        }
        if let Some(p) = parse_env(var, "CHATMOCK_IMAGE_PROBABILITY") {
            self.image_probability = p;
        }
        if let Some(seed) = parse_env(var, "CHATMOCK_SEED") {
            self.seed = Some(seed);
        }
        if let Some(level) = var("CHATMOCK_LOG") {
            self.log_level = Some(level);
        }
        if let Some(json) = flag_env(var, "CHATMOCK_LOG_JSON") {
            self.log_json = json;
        }
        if let Some(dir) = var("CHATMOCK_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(enabled) = flag_env(var, "CHATMOCK_ENABLE_SWAGGER") {
            self.enable_swagger = enabled;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
    }
}

// ── config file ──────────────────────────────────────────────────────────────

/// On-disk shape, shared with the web client's `config.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    backend: FileBackend,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileBackend {
    server: FileServer,
    uploads: FileUploads,
    cors: FileCors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileServer {
    host: Option<String>,
    port: Option<u16>,
    debug: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileUploads {
    folder: Option<PathBuf>,
    allowed_extensions: Option<Vec<String>>,
    max_content_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileCors {
    enabled: Option<bool>,
    allowed_origins: Option<Vec<String>>,
}

/// `Ok(None)` when the file does not exist.
fn read_config_file(path: &Path) -> anyhow::Result<Option<FileConfig>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

// ── private helpers ──────────────────────────────────────────────────────────

type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn parse_env<T: std::str::FromStr>(var: EnvLookup<'_>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}

fn flag_env(var: EnvLookup<'_>, key: &str) -> Option<bool> {
    var(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn normalise_extensions(exts: Vec<String>) -> Vec<String> {
    exts.into_iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
