// ==========================================
// SOFEM-CI 生产录入 - 输入宽松解析
// ==========================================
// 红线: 计算引擎永不报错,非法输入一律降级
// 数量字段 → 0；计数字段 → 1（避免除零）
// ==========================================

/// 解析数量字段（kg）
///
/// 缺失、空串、非数字、非有限值均视为 0；负数原样保留（由提交前校验拦截）。
pub fn parse_quantity(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// 解析计数字段（机台数、破碎机台数）
///
/// 小数向零截断；缺失、非法或为 0 时取 1。负数原样保留。
pub fn parse_count(raw: Option<&str>) -> i64 {
    let parsed = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| {
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
                    .map(|v| v.trunc() as i64)
            })
        });

    match parsed {
        Some(0) | None => 1,
        Some(n) => n,
    }
}

/// 判断必填字段是否为合法非负数
pub fn is_present_non_negative(raw: Option<&str>) -> bool {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .map(|v| v.is_finite() && v >= 0.0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_lenient() {
        assert_eq!(parse_quantity(Some("120.5")), 120.5);
        assert_eq!(parse_quantity(Some("  42 ")), 42.0);
        assert_eq!(parse_quantity(Some("")), 0.0);
        assert_eq!(parse_quantity(Some("abc")), 0.0);
        assert_eq!(parse_quantity(Some("NaN")), 0.0);
        assert_eq!(parse_quantity(Some("inf")), 0.0);
        assert_eq!(parse_quantity(None), 0.0);
    }

    #[test]
    fn test_parse_quantity_keeps_negative() {
        assert_eq!(parse_quantity(Some("-3.5")), -3.5);
    }

    #[test]
    fn test_parse_count_defaults_to_one() {
        assert_eq!(parse_count(None), 1);
        assert_eq!(parse_count(Some("")), 1);
        assert_eq!(parse_count(Some("x")), 1);
        assert_eq!(parse_count(Some("0")), 1);
        assert_eq!(parse_count(Some("5")), 5);
        assert_eq!(parse_count(Some("3.7")), 3);
        assert_eq!(parse_count(Some("-2")), -2);
    }

    #[test]
    fn test_is_present_non_negative() {
        assert!(is_present_non_negative(Some("0")));
        assert!(is_present_non_negative(Some("12.5")));
        assert!(!is_present_non_negative(Some("-1")));
        assert!(!is_present_non_negative(Some("   ")));
        assert!(!is_present_non_negative(Some("douze")));
        assert!(!is_present_non_negative(None));
    }
}
