// ==========================================
// SOFEM-CI 生产录入 - 领域类型定义
// ==========================================
// 职责: 工段、用户角色、提示级别等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工段 (Section)
// ==========================================
// 四个工段独立录入、独立计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// 挤出（主录入表单，原生提交）
    Extrusion,
    /// 印刷
    Printing,
    /// 焊接
    Welding,
    /// 回收
    Recycling,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Extrusion,
        Section::Printing,
        Section::Welding,
        Section::Recycling,
    ];

    /// 后端使用的工段标识（也出现在确认提示中）
    pub fn slug(&self) -> &'static str {
        match self {
            Section::Extrusion => "extrusion",
            Section::Printing => "imprimerie",
            Section::Welding => "soudure",
            Section::Recycling => "recyclage",
        }
    }

    /// 异步提交端点；挤出表单走原生提交，返回 None
    pub fn ajax_path(&self) -> Option<&'static str> {
        match self {
            Section::Extrusion => None,
            Section::Printing => Some("/ajax/saisie/imprimerie/"),
            Section::Welding => Some("/ajax/saisie/soudure/"),
            Section::Recycling => Some("/ajax/saisie/recyclage/"),
        }
    }

    /// 页面上该工段表单的标识（草稿缓存的键）
    pub fn default_form_id(&self) -> &'static str {
        match self {
            Section::Extrusion => "productionForm",
            Section::Printing => "imprimerie-form",
            Section::Welding => "soudure-form",
            Section::Recycling => "recyclage-form",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Section> {
        let normalized = slug.trim().to_lowercase();
        Section::ALL.into_iter().find(|s| s.slug() == normalized)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 与后端 CustomUser.role 取值一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    ChefExtrusion,
    ChefSoudure,
    ChefImprimerie,
    ChefRecyclage,
    Superviseur,
    Direction,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Superviseur
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::ChefExtrusion => "chef_extrusion",
            UserRole::ChefSoudure => "chef_soudure",
            UserRole::ChefImprimerie => "chef_imprimerie",
            UserRole::ChefRecyclage => "chef_recyclage",
            UserRole::Superviseur => "superviseur",
            UserRole::Direction => "direction",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 提示级别 (Alert Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Success,
    Error,
    Info,
}

impl AlertLevel {
    /// 横幅样式标签（alert-success / alert-error / alert-info）
    pub fn css_tag(&self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Error => "error",
            AlertLevel::Info => "info",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_tag())
    }
}
