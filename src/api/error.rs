// ==========================================
// SOFEM-CI 生产录入 - API层错误类型
// ==========================================
// 职责: 定义提交/轮询链路的错误类型，并映射为操作员可读的提示
// 分类: 本地校验（字段内联提示） / 网络与HTTP（横幅提示） / 配置
// 说明: 非法输入不是错误,由计算引擎降级为 0
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::i18n::{keys, t};
use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 本地错误
    // ==========================================
    /// 必填字段缺失或为负
    #[error("本地校验失败: {} 个字段不合法", .violations.len())]
    LocalValidation { violations: Vec<FieldViolation> },

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 网络与 HTTP 错误
    // ==========================================
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP 错误: status={status}")]
    HttpStatus { status: u16 },

    #[error("响应解析失败: {0}")]
    Decode(String),

    /// 后端返回 success=false
    #[error("后端拒绝: {message}")]
    Rejected {
        message: String,
        errors: Option<serde_json::Value>,
    },

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("未配置端点: {0}")]
    MissingEndpoint(String),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("草稿缓存错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 横幅提示文案
    pub fn user_message(&self, locale: &str) -> String {
        let key = match self {
            ApiError::LocalValidation { .. } => keys::FIELD_REQUIRED,
            ApiError::Rejected { .. } => keys::FORM_INVALID,
            ApiError::Network(_) | ApiError::HttpStatus { .. } | ApiError::Decode(_) => {
                keys::CONNECTION_ERROR
            }
            ApiError::MissingEndpoint(_) | ApiError::Config(_) => keys::MISSING_URL,
            ApiError::InvalidStateTransition { .. }
            | ApiError::Repository(_)
            | ApiError::Other(_) => keys::SERVER_ERROR,
        };
        t(locale, key)
    }

    /// 是否属于网络/HTTP 类错误
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::HttpStatus { .. } | ApiError::Decode(_)
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 字段校验违规详情
// ==========================================

/// 字段校验违规详情（内联显示在字段旁）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// 页面字段 id
    pub field_id: String,
    pub message: String,
}
