// ==========================================
// SOFEM-CI 生产录入 - 应用层
// ==========================================
// 职责: 宿主界面适配（表单状态、通知、确认）与应用状态装配
// ==========================================

pub mod form;
pub mod notifications;
pub mod prompt;
pub mod state;

// 重导出
pub use form::SectionForm;
pub use notifications::{Alert, AlertId, NotificationCenter};
pub use prompt::{OperatorPrompt, StaticPrompt};
pub use state::AppState;
