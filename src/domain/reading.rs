// ==========================================
// SOFEM-CI 生产录入 - 工段读数与派生指标
// ==========================================
// 职责: 每个工段的原始读数（Section Reading）与计算结果
// 约束: 读数只在计算时临时构建，不持久化
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 原始读数
// ==========================================

/// 挤出工段读数（kg / 台）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionReading {
    pub finished: f64,
    pub semi_finished: f64,
    pub waste: f64,
    pub raw_material: f64,
    pub machine_count: i64,
}

/// 印刷工段读数
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintingReading {
    pub finished_reels: f64,
    pub semi_finished_reels: f64,
    pub waste: f64,
}

/// 焊接工段读数（bretelles / rema / batta 为专项产品）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeldingReading {
    pub finished_reels: f64,
    pub straps: f64,
    pub rema: f64,
    pub batta: f64,
    pub waste: f64,
}

/// 回收工段读数（unit_count 为破碎机 moulinex 台数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecyclingReading {
    pub grinding: f64,
    pub black_tarp: f64,
    pub unit_count: i64,
}

// ==========================================
// 派生指标
// ==========================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionMetrics {
    pub total_production: f64,
    /// 成品率（%）
    pub yield_pct: f64,
    /// 废品率（%）
    pub waste_rate_pct: f64,
    pub per_machine: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintingMetrics {
    pub total_production: f64,
    pub waste_rate_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeldingMetrics {
    pub total_production: f64,
    /// 专项产品合计，单独展示
    pub specific_total: f64,
    pub waste_rate_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecyclingMetrics {
    pub total_production: f64,
    /// 转化率（%）
    pub transformation_rate_pct: f64,
    pub per_unit: f64,
}
