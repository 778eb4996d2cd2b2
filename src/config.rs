use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};

pub const DEFAULT_FOOTBALL_API_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_FOOTBALL_API_HOST: &str = "v3.football.api-sports.io";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

pub const APP_DIR: &str = "betmaster_terminal";

#[derive(Debug, Clone, PartialEq)]
pub struct FootballApiConfig {
    pub base_url: String,
    pub host: String,
}

impl Default for FootballApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FOOTBALL_API_BASE_URL.to_string(),
            host: DEFAULT_FOOTBALL_API_HOST.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub football: FootballApiConfig,
    pub chat: ChatConfig,
    /// Fixed sidebar date; `None` means "today" at fetch time.
    pub fixtures_date: Option<String>,
    pub config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let football = FootballApiConfig {
            base_url: env_string("FOOTBALL_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FOOTBALL_API_BASE_URL.to_string()),
            host: env_string("FOOTBALL_API_HOST")
                .unwrap_or_else(|| DEFAULT_FOOTBALL_API_HOST.to_string()),
        };

        let chat = ChatConfig {
            api_key: env_string("GEMINI_API_KEY").or_else(|| env_string("API_KEY")),
            base_url: env_string("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model: env_string("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            temperature: env::var("CHAT_TEMPERATURE")
                .ok()
                .and_then(|val| val.trim().parse::<f32>().ok())
                .filter(|val| val.is_finite())
                .unwrap_or(DEFAULT_TEMPERATURE)
                .clamp(0.0, 2.0),
        };

        Self {
            football,
            chat,
            fixtures_date: opt_date_env("FIXTURES_DATE"),
            config_dir: config_dir(),
        }
    }

    pub fn fixtures_date_or_today(&self) -> String {
        self.fixtures_date.clone().unwrap_or_else(today_utc)
    }
}

pub fn today_utc() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env_string("BETMASTER_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

pub fn state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state")
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(base) = env_string(var) {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = env_string("HOME")?;
    Some(PathBuf::from(home).join(home_fallback).join(APP_DIR))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn opt_date_env(key: &str) -> Option<String> {
    let raw = env_string(key)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
