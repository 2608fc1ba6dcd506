// ==========================================
// SOFEM-CI 生产录入 - API 层
// ==========================================
// 职责: 与后端的 HTTP 契约、表单提交流程、驾驶舱轮询
// ==========================================

pub mod backend;
pub mod dashboard_api;
pub mod error;
pub mod submission;
pub mod submission_state;
pub mod validator;

// 重导出核心类型
pub use backend::{
    DashboardMetrics, HttpBackend, HttpMethod, NativeReceipt, ProductionBackend, SectionResponse,
};
pub use dashboard_api::{DashboardApi, DashboardPoller, DashboardView};
pub use error::{ApiError, ApiResult, FieldViolation};
pub use submission::{SubmissionAdapter, SubmissionOutcome, SubmissionReport, SubmitReceipt};
pub use submission_state::{SubmissionMachine, SubmissionState};
pub use validator::RequiredFieldsValidator;
