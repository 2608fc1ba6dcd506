// ==========================================
// SOFEM-CI 生产录入 - 数据仓储层
// ==========================================
// 职责: 本地草稿缓存,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod draft_repo;
pub mod error;

// 重导出核心仓储
pub use draft_repo::DraftRepository;
pub use error::{RepositoryError, RepositoryResult};
