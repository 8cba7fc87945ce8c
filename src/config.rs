use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::system::source::{DEFAULT_OS_RELEASE, DEFAULT_PASSWD, DEFAULT_PROC_DIR};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub paths: PathsConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub sample_interval_ms: u64,
    pub max_processes: usize,
    pub default_sort: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            sample_interval_ms: 100,
            max_processes: 50,
            default_sort: "desc".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub proc_dir: String,
    pub os_release: String,
    pub passwd: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            proc_dir: DEFAULT_PROC_DIR.to_string(),
            os_release: DEFAULT_OS_RELEASE.to_string(),
            passwd: DEFAULT_PASSWD.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub accent: String,
    pub gauge_low: String,
    pub gauge_high: String,
    pub selection: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            accent: "#89b4fa".to_string(),
            gauge_low: "#2d5a27".to_string(),
            gauge_high: "#a12e2e".to_string(),
            selection: "#313244".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub toggle_sort: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            toggle_sort: "s".to_string(),
            refresh: "r".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procmon").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// `"q"` -> `Char('q')`, `"Enter"`/`"Esc"`/`"Space"`/`"Tab"` -> named keys.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Esc" | "Escape" => Some(KeyCode::Esc),
        "Space" => Some(KeyCode::Char(' ')),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}
