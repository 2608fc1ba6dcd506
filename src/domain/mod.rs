// ==========================================
// SOFEM-CI 生产录入 - 领域模型层
// ==========================================
// 职责: 定义工段读数、派生指标与基础枚举
// 红线: 不含 HTTP 逻辑,不含界面逻辑
// ==========================================

pub mod reading;
pub mod types;

// 重导出核心类型
pub use reading::{
    ExtrusionMetrics, ExtrusionReading, PrintingMetrics, PrintingReading, RecyclingMetrics,
    RecyclingReading, WeldingMetrics, WeldingReading,
};
pub use types::{AlertLevel, Section, UserRole};
