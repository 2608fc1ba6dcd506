// ==========================================
// SOFEM-CI 生产录入 - 工段指标公式
// ==========================================
// 职责: 各工段派生指标（总产量/成品率/废品率/单机产量）
// 红线: 除数为 0 时结果为 0,绝不输出 inf / NaN
// ==========================================

use crate::domain::reading::{
    ExtrusionMetrics, ExtrusionReading, PrintingMetrics, PrintingReading, RecyclingMetrics,
    RecyclingReading, WeldingMetrics, WeldingReading,
};

/// 保护除法：除数为 0 时返回 0
pub fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 百分比（保护除法）
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    100.0 * guarded_div(numerator, denominator)
}

/// 单台产量；台数非正时为 0
pub fn per_unit(total: f64, count: i64) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// 废品率 = 废品 / (产量 + 废品)
fn waste_rate(total: f64, waste: f64) -> f64 {
    percentage(waste, total + waste)
}

pub fn compute_extrusion(r: &ExtrusionReading) -> ExtrusionMetrics {
    let total = r.finished + r.semi_finished;
    ExtrusionMetrics {
        total_production: total,
        yield_pct: percentage(total, r.raw_material),
        waste_rate_pct: waste_rate(total, r.waste),
        per_machine: per_unit(total, r.machine_count),
    }
}

pub fn compute_printing(r: &PrintingReading) -> PrintingMetrics {
    let total = r.finished_reels + r.semi_finished_reels;
    PrintingMetrics {
        total_production: total,
        waste_rate_pct: waste_rate(total, r.waste),
    }
}

pub fn compute_welding(r: &WeldingReading) -> WeldingMetrics {
    let specific = r.straps + r.rema + r.batta;
    let total = r.finished_reels + specific;
    WeldingMetrics {
        total_production: total,
        specific_total: specific,
        waste_rate_pct: waste_rate(total, r.waste),
    }
}

pub fn compute_recycling(r: &RecyclingReading) -> RecyclingMetrics {
    let total = r.grinding + r.black_tarp;
    RecyclingMetrics {
        total_production: total,
        transformation_rate_pct: percentage(r.black_tarp, r.grinding),
        per_unit: per_unit(total, r.unit_count),
    }
}

/// 展示格式：按数值的精确十进制展开保留一位小数
///
/// 0.15 实际存储为 0.1499…,显示 "0.1"；恰好落在 .x5 上的值（如 6.25）远离零进位。
/// 负零与舍入后为零的负数显示为 "0.0"；非有限值显示为 "0.0"。
pub fn format_metric(value: f64) -> String {
    if !value.is_finite() {
        return "0.0".to_string();
    }
    let magnitude = value.abs();
    // 二进制下恰为 .x5 的值正好是 1/4 的奇数倍（此时 < 2^51,乘 4 精确）
    let quarters = magnitude * 4.0;
    let text = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (quarters as u64 * 5 + 1) / 2;
        format!("{}.{}", tenths / 10, tenths % 10)
    } else {
        format!("{:.1}", magnitude)
    };
    if value.is_sign_negative() && text.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        format!("-{}", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_div() {
        assert_eq!(guarded_div(10.0, 0.0), 0.0);
        assert_eq!(guarded_div(10.0, 4.0), 2.5);
        assert_eq!(percentage(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_extrusion_reference_values() {
        let m = compute_extrusion(&ExtrusionReading {
            finished: 120.0,
            semi_finished: 30.0,
            waste: 10.0,
            raw_material: 200.0,
            machine_count: 5,
        });
        assert_eq!(m.total_production, 150.0);
        assert_eq!(m.yield_pct, 75.0);
        assert_eq!(m.waste_rate_pct, 6.25);
        assert_eq!(m.per_machine, 30.0);
    }

    #[test]
    fn test_extrusion_zero_raw_material() {
        let m = compute_extrusion(&ExtrusionReading {
            finished: 50.0,
            machine_count: 1,
            ..Default::default()
        });
        assert_eq!(m.yield_pct, 0.0);
        assert_eq!(m.waste_rate_pct, 0.0);
    }

    #[test]
    fn test_waste_only_is_full_waste_rate() {
        // 产量为 0、废品不为 0：分母 = 废品，废品率 100%
        let m = compute_printing(&PrintingReading {
            waste: 8.0,
            ..Default::default()
        });
        assert_eq!(m.total_production, 0.0);
        assert_eq!(m.waste_rate_pct, 100.0);
    }

    #[test]
    fn test_welding_specific_total() {
        let m = compute_welding(&WeldingReading {
            finished_reels: 100.0,
            straps: 10.0,
            rema: 5.0,
            batta: 5.0,
            waste: 30.0,
        });
        assert_eq!(m.specific_total, 20.0);
        assert_eq!(m.total_production, 120.0);
        assert_eq!(m.waste_rate_pct, 20.0);
    }

    #[test]
    fn test_recycling_guarded_transformation() {
        let m = compute_recycling(&RecyclingReading {
            grinding: 0.0,
            black_tarp: 50.0,
            unit_count: 4,
        });
        assert_eq!(m.total_production, 50.0);
        assert_eq!(m.transformation_rate_pct, 0.0);
        assert_eq!(m.per_unit, 12.5);
    }

    #[test]
    fn test_negative_count_gives_zero_per_unit() {
        assert_eq!(per_unit(100.0, -2), 0.0);
    }

    #[test]
    fn test_format_metric_rounding() {
        assert_eq!(format_metric(6.25), "6.3");
        assert_eq!(format_metric(75.0), "75.0");
        assert_eq!(format_metric(33.333), "33.3");
        assert_eq!(format_metric(-6.25), "-6.3");
        assert_eq!(format_metric(-0.0), "0.0");
        assert_eq!(format_metric(-0.04), "0.0");
        assert_eq!(format_metric(f64::NAN), "0.0");
    }

    #[test]
    fn test_format_metric_uses_exact_expansion() {
        // 0.15 / 0.35 的二进制值略小于字面量
        assert_eq!(format_metric(0.15), "0.1");
        assert_eq!(format_metric(0.35), "0.3");
        assert_eq!(format_metric(0.25), "0.3");
        assert_eq!(format_metric(0.75), "0.8");
        assert_eq!(format_metric(0.5), "0.5");
        assert_eq!(format_metric(12.45), "12.4");
        assert_eq!(format_metric(-0.25), "-0.3");
    }

    #[test]
    fn test_format_metric_huge_finite_values() {
        let text = format_metric(1e308);
        assert!(text.starts_with("1000000000000000"));
        assert!(text.ends_with(".0"));
        assert_eq!(format_metric(f64::MAX).len(), 311);
        assert_eq!(format_metric(f64::INFINITY), "0.0");
    }
}
