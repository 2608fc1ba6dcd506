// ==========================================
// SOFEM-CI 生产录入 - 引擎层
// ==========================================
// 职责: 工段指标的纯计算,不触碰界面与网络
// 红线: 非法输入降级为 0（计数降级为 1）,绝不报错
// ==========================================

pub mod metrics;
pub mod parsing;
pub mod recompute;
pub mod schema;

// 重导出核心引擎
pub use metrics::{
    compute_extrusion, compute_printing, compute_recycling, compute_welding, format_metric,
    guarded_div, percentage, per_unit,
};
pub use parsing::{is_present_non_negative, parse_count, parse_quantity};
pub use recompute::{DisplayedMetrics, MetricsEngine, RawFields};
pub use schema::{schema_for, FieldKind, FieldSpec, SectionSchema};
