// ==========================================
// SOFEM-CI 生产录入 - 核心库
// ==========================================
// 职责: 工段录入表单的指标实时计算、提交流程、驾驶舱轮询
// 技术栈: Rust + tokio + reqwest + SQLite（本地草稿）
// 系统定位: 浏览器层的无界面实现,后端为最终校验方
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 工段与读数类型
pub mod domain;

// 引擎层 - 指标重算
pub mod engine;

// 配置层 - 宿主配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 数据仓储层 - 本地草稿
pub mod repository;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 后端契约与提交流程
pub mod api;

// 应用层 - 界面适配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlertLevel, Section, UserRole};

// 引擎
pub use engine::{DisplayedMetrics, MetricsEngine, RawFields};

// 配置
pub use config::HostConfig;

// API
pub use api::{ApiError, ApiResult, DashboardApi, DashboardPoller, SubmissionAdapter};

// 应用层
pub use app::{AppState, NotificationCenter, SectionForm};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SOFEM-CI 生产录入";
