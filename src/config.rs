use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::chat::OllamaConfig;
use crate::preview::default_preview_path;
use crate::prompts::{default_prompt_files, PromptSet, DEFAULT_PROMPTS_DIR};

pub const CONFIG_FILE_NAME: &str = "ollama-translate.toml";
pub const CONFIG_ENV: &str = "OLLAMA_TRANSLATE_CONFIG";

pub const DEFAULT_URL: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_MODEL: &str = "qwen2:7b";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "debug.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointSection,
    #[serde(default)]
    pub preview: PreviewSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub prompts: PromptsSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EndpointSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PreviewSection {
    /// Fixed preview location. Relative paths resolve against the config directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct LogSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// tracing filter directive, e.g. "debug" or "ollama_translate=info". `RUST_LOG` wins.
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PromptsSection {
    #[serde(default)]
    pub translate: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub preview_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub config_path: PathBuf,
    pub ollama: OllamaConfig,
    pub preview_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: String,
    pub prompts: PromptSet,
}

impl Settings {
    pub fn resolve(overrides: Overrides) -> anyhow::Result<Self> {
        let workdir = current_dir();
        let cfg_file = overrides
            .config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(|| find_default_config(&workdir, CONFIG_FILE_NAME));

        let mut file_cfg = AppConfig::default();
        if let Some(p) = cfg_file.as_ref() {
            if p.exists() {
                file_cfg = load_config(p)?;
            }
        }
        let config_path = cfg_file.unwrap_or_else(|| exe_dir().join(CONFIG_FILE_NAME));
        Self::from_config(&config_path, &file_cfg, overrides)
    }

    pub fn from_config(
        config_path: &Path,
        cfg: &AppConfig,
        overrides: Overrides,
    ) -> anyhow::Result<Self> {
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

        let url = overrides
            .endpoint
            .or_else(|| cfg.endpoint.url.clone())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let model = overrides
            .model
            .or_else(|| cfg.endpoint.model.clone())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout = Duration::from_secs(
            cfg.endpoint
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
        );

        // Command-line paths are relative to the working directory, config paths to the config file.
        let preview_path = match overrides.preview_path {
            Some(p) => relative_to(&current_dir(), p),
            None => cfg
                .preview
                .path
                .clone()
                .map(|p| relative_to(config_dir, p))
                .unwrap_or_else(default_preview_path),
        };
        let log_path = cfg
            .log
            .path
            .clone()
            .map(|p| relative_to(config_dir, p))
            .unwrap_or_else(default_log_path);
        let log_level = cfg
            .log
            .level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let prompts = PromptSet::load(config_path, cfg).context("load prompts")?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            ollama: OllamaConfig {
                url,
                model,
                timeout,
            },
            preview_path,
            log_path,
            log_level,
            prompts,
        })
    }
}

fn relative_to(dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_relative() {
        dir.join(p)
    } else {
        p
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// `debug.log` next to the executable.
pub fn default_log_path() -> PathBuf {
    exe_dir().join(DEFAULT_LOG_FILE)
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(workdir: &Path, filename: &str) -> Option<PathBuf> {
    if let Some(p) = find_file_upwards(workdir, filename, 8) {
        return Some(p);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 10) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILE_NAME);

    let prompts_dir = dir.join(DEFAULT_PROMPTS_DIR);
    std::fs::create_dir_all(&prompts_dir)
        .with_context(|| format!("create prompts dir: {}", prompts_dir.display()))?;
    for (fname, body) in default_prompt_files() {
        let p = prompts_dir.join(fname);
        if p.exists() && !force {
            continue;
        }
        std::fs::write(&p, body).with_context(|| format!("write prompt: {}", p.display()))?;
    }

    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

pub const DEFAULT_CONFIG_TOML: &str = r#"[endpoint]
url = "http://localhost:11434/api/chat"
model = "qwen2:7b"
timeout_secs = 30

[preview]
# path = "/tmp/alfred_ollama_translate.html"

[log]
path = "debug.log"
level = "debug"

[prompts]
translate = "prompts/translate.txt"
"#;

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::{
        init_default_config, load_config, AppConfig, Overrides, Settings, DEFAULT_MODEL,
        DEFAULT_URL,
    };
    use crate::preview::default_preview_path;
    use crate::prompts::DEFAULT_TRANSLATE_TEXT;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("parse");
        let s = Settings::from_config(Path::new("/cfg/ollama-translate.toml"), &cfg, Overrides::default())
            .expect("settings");
        assert_eq!(s.ollama.url, DEFAULT_URL);
        assert_eq!(s.ollama.model, DEFAULT_MODEL);
        assert_eq!(s.ollama.timeout, Duration::from_secs(30));
        assert_eq!(s.preview_path, default_preview_path());
        assert_eq!(s.log_level, "debug");
        assert_eq!(s.prompts.translate, DEFAULT_TRANSLATE_TEXT);
    }

    #[test]
    fn overrides_win_and_paths_resolve_against_config_dir() {
        let cfg: AppConfig = toml::from_str(
            r#"
[endpoint]
model = "llama3"
timeout_secs = 5
[preview]
path = "out/preview.html"
[log]
path = "logs/t.log"
level = "info"
"#,
        )
        .expect("parse");
        let s = Settings::from_config(
            Path::new("/cfg/ollama-translate.toml"),
            &cfg,
            Overrides {
                model: Some("qwen2.5:14b".to_string()),
                endpoint: Some("http://10.0.0.2:11434/api/chat".to_string()),
                ..Overrides::default()
            },
        )
        .expect("settings");
        assert_eq!(s.ollama.model, "qwen2.5:14b");
        assert_eq!(s.ollama.url, "http://10.0.0.2:11434/api/chat");
        assert_eq!(s.ollama.timeout, Duration::from_secs(5));
        assert_eq!(s.preview_path, PathBuf::from("/cfg/out/preview.html"));
        assert_eq!(s.log_path, PathBuf::from("/cfg/logs/t.log"));
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn command_line_preview_path_is_relative_to_working_dir() {
        let cfg: AppConfig = toml::from_str("[preview]\npath = \"from-config.html\"").expect("parse");
        let s = Settings::from_config(
            Path::new("/cfg/ollama-translate.toml"),
            &cfg,
            Overrides {
                preview_path: Some(PathBuf::from("p.html")),
                ..Overrides::default()
            },
        )
        .expect("settings");
        let cwd = std::env::current_dir().expect("cwd");
        assert_eq!(s.preview_path, cwd.join("p.html"));

        let s = Settings::from_config(
            Path::new("/cfg/ollama-translate.toml"),
            &cfg,
            Overrides {
                preview_path: Some(PathBuf::from("/abs/p.html")),
                ..Overrides::default()
            },
        )
        .expect("settings");
        assert_eq!(s.preview_path, PathBuf::from("/abs/p.html"));
    }

    #[test]
    fn missing_prompt_file_is_an_error() {
        let cfg: AppConfig =
            toml::from_str("[prompts]\ntranslate = \"nope/translate.txt\"").expect("parse");
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Settings::from_config(&dir.path().join("x.toml"), &cfg, Overrides::default())
            .expect_err("missing prompt");
        assert!(format!("{err:#}").contains("prompt file not found"));
    }

    #[test]
    fn init_config_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = init_default_config(dir.path(), false).expect("init");
        assert!(dir.path().join("prompts/translate.txt").exists());

        let cfg = load_config(&cfg_path).expect("load");
        let s = Settings::from_config(&cfg_path, &cfg, Overrides::default()).expect("settings");
        assert_eq!(s.ollama.model, DEFAULT_MODEL);
        assert_eq!(s.log_path, dir.path().join("debug.log"));
        assert_eq!(s.prompts.translate, DEFAULT_TRANSLATE_TEXT);
    }

    #[test]
    fn init_config_keeps_edits_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = init_default_config(dir.path(), false).expect("init");
        std::fs::write(&cfg_path, "[endpoint]\nmodel = \"mine\"\n").expect("edit");

        init_default_config(dir.path(), false).expect("init again");
        assert_eq!(load_config(&cfg_path).expect("load").endpoint.model.as_deref(), Some("mine"));

        init_default_config(dir.path(), true).expect("force");
        assert_eq!(
            load_config(&cfg_path).expect("load").endpoint.model.as_deref(),
            Some("qwen2:7b")
        );
    }
}
