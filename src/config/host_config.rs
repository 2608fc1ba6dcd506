// ==========================================
// SOFEM-CI 生产录入 - 宿主页面配置
// ==========================================
// 职责: 宿主页面注入的只读配置（CSRF、当前用户角色、命名 API 地址）
// 约束: 显式注入到需要它的组件,不读取全局可变状态
// ==========================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::UserRole;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置缺少字段: {0}")]
    MissingField(&'static str),

    #[error("无法解析地址: {0}（未配置 base_url）")]
    UnresolvableUrl(String),

    #[error("未找到配置文件位置")]
    NoConfigLocation,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 指向配置文件路径的环境变量
    pub const ENV_CONFIG_PATH: &str = "SOFEMCI_CONFIG";

    // 命名 API 地址（与宿主页面 urls 对象的键一致）
    pub const API_DASHBOARD: &str = "apiDashboard";
    pub const SAISIE_EXTRUSION: &str = "saisieExtrusion";

    /// 挤出表单的默认 action
    pub const DEFAULT_EXTRUSION_ACTION: &str = "/saisie/extrusion/";

    pub const DEFAULT_LOCALE: &str = "fr";
}

// ==========================================
// 当前用户
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

// ==========================================
// 客户端行为参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// 提示横幅自动消失时间
    pub alert_ttl_ms: u64,
    /// 驾驶舱轮询间隔
    pub poll_interval_secs: u64,
    /// 后端未返回 machines_total 时的机台总数
    pub machines_total_default: u32,
    pub request_timeout_secs: u64,
    /// 加载遮罩最短显示时间
    pub loader_min_display_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            alert_ttl_ms: 5_000,
            poll_interval_secs: 30,
            machines_total_default: 28,
            request_timeout_secs: 10,
            loader_min_display_ms: 0,
        }
    }
}

impl ClientSettings {
    pub fn alert_ttl(&self) -> Duration {
        Duration::from_millis(self.alert_ttl_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn loader_min_display(&self) -> Duration {
        Duration::from_millis(self.loader_min_display_ms)
    }
}

fn default_locale() -> String {
    config_keys::DEFAULT_LOCALE.to_string()
}

// ==========================================
// HostConfig - 宿主配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 后端根地址（如 http://127.0.0.1:8000）
    #[serde(default)]
    pub base_url: String,
    #[serde(alias = "csrf")]
    pub csrf_token: String,
    #[serde(default)]
    pub user: UserInfo,
    /// 命名 API 地址
    #[serde(default)]
    pub urls: HashMap<String, String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub settings: ClientSettings,
}

impl HostConfig {
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            csrf_token: csrf_token.into(),
            user: UserInfo::default(),
            urls: HashMap::new(),
            locale: default_locale(),
            settings: ClientSettings::default(),
        }
    }

    pub fn with_url(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(key.into(), url.into());
        self
    }

    /// 从 JSON 文本加载（结构与宿主页面的全局配置对象一致）
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: HostConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// 加载配置：优先环境变量 SOFEMCI_CONFIG 指定的文件,否则使用默认位置
    pub fn load() -> ConfigResult<Self> {
        let path = match std::env::var_os(config_keys::ENV_CONFIG_PATH) {
            Some(p) => PathBuf::from(p),
            None => default_config_path().ok_or(ConfigError::NoConfigLocation)?,
        };
        tracing::info!("加载配置: {}", path.display());
        Self::from_file(&path)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.csrf_token.trim().is_empty() {
            return Err(ConfigError::MissingField("csrf_token"));
        }
        Ok(())
    }

    /// 查询命名 API 地址
    pub fn url(&self, key: &str) -> Option<&str> {
        self.urls
            .get(key)
            .map(String::as_str)
            .filter(|u| !u.trim().is_empty())
    }

    /// 将相对路径拼接到 base_url；绝对地址原样返回
    pub fn resolve_url(&self, path: &str) -> ConfigResult<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.to_string());
        }
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::UnresolvableUrl(path.to_string()));
        }
        if path.starts_with('/') {
            Ok(format!("{}{}", base, path))
        } else {
            Ok(format!("{}/{}", base, path))
        }
    }
}

/// 默认配置文件位置: <config_dir>/sofemci/host.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sofemci").join("host.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_host_page_shape() {
        let json = r#"{
            "base_url": "http://usine.local:8000/",
            "csrf": "tok123",
            "user": {"role": "direction"},
            "urls": {"apiDashboard": "/api/dashboard/"}
        }"#;
        let config = HostConfig::from_json_str(json).unwrap();
        assert_eq!(config.csrf_token, "tok123");
        assert_eq!(config.user.role, UserRole::Direction);
        assert_eq!(config.locale, "fr");
        assert_eq!(config.settings, ClientSettings::default());
        assert_eq!(config.url(config_keys::API_DASHBOARD), Some("/api/dashboard/"));
        assert_eq!(config.url(config_keys::SAISIE_EXTRUSION), None);
    }

    #[test]
    fn test_missing_csrf_rejected() {
        let err = HostConfig::from_json_str(r#"{"csrf_token": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("csrf_token")));

        let err = HostConfig::from_json_str(r#"{"base_url": "x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_resolve_url() {
        let config = HostConfig::new("http://usine.local:8000/", "t");
        assert_eq!(
            config.resolve_url("/ajax/saisie/soudure/").unwrap(),
            "http://usine.local:8000/ajax/saisie/soudure/"
        );
        assert_eq!(
            config.resolve_url("api/x").unwrap(),
            "http://usine.local:8000/api/x"
        );
        assert_eq!(
            config.resolve_url("https://autre.local/y").unwrap(),
            "https://autre.local/y"
        );

        let no_base = HostConfig::new("", "t");
        assert!(matches!(
            no_base.resolve_url("/x"),
            Err(ConfigError::UnresolvableUrl(_))
        ));
    }

    #[test]
    fn test_settings_override() {
        let json = r#"{"csrf": "t", "settings": {"alert_ttl_ms": 1500}}"#;
        let config = HostConfig::from_json_str(json).unwrap();
        assert_eq!(config.settings.alert_ttl(), Duration::from_millis(1500));
        assert_eq!(config.settings.poll_interval(), Duration::from_secs(30));
    }
}
