// ==========================================
// SOFEM-CI 生产录入 - 配置层
// ==========================================
// 职责: 宿主页面配置的加载与查询
// 存储: JSON 文件（路径可由 SOFEMCI_CONFIG 指定）
// ==========================================

pub mod host_config;

// 重导出核心配置
pub use host_config::{
    config_keys, default_config_path, ClientSettings, ConfigError, ConfigResult, HostConfig,
    UserInfo,
};
