// ==========================================
// SOFEM-CI 生产录入 - 指标重算引擎
// ==========================================
// 职责: 原始字段值（字符串） → 展示用指标（一位小数字符串）
// 触发: 监听字段每次变更 + 页面初始化一次
// 红线: 纯函数、幂等、永不失败
// ==========================================

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::instrument;

use crate::domain::reading::{ExtrusionReading, PrintingReading, RecyclingReading, WeldingReading};
use crate::domain::types::Section;
use crate::engine::metrics::{
    compute_extrusion, compute_printing, compute_recycling, compute_welding, format_metric,
};
use crate::engine::parsing::{parse_count, parse_quantity};
use crate::engine::schema::{ids, outputs};

/// 原始字段值：字段 id → 输入框中的原始字符串
pub type RawFields = BTreeMap<String, String>;

/// 展示指标：输出字段 id → 格式化后的文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayedMetrics(BTreeMap<&'static str, String>);

impl DisplayedMetrics {
    pub fn get(&self, output_id: &str) -> Option<&str> {
        self.0.get(output_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, output_id: &'static str, value: f64) {
        self.0.insert(output_id, format_metric(value));
    }
}

fn raw<'a>(fields: &'a RawFields, id: &str) -> Option<&'a str> {
    fields.get(id).map(String::as_str)
}

// ==========================================
// MetricsEngine - 指标重算引擎
// ==========================================
pub struct MetricsEngine;

impl MetricsEngine {
    /// 按工段重算全部展示指标
    #[instrument(level = "trace", skip(fields))]
    pub fn recompute(section: Section, fields: &RawFields) -> DisplayedMetrics {
        let mut out = DisplayedMetrics::default();
        match section {
            Section::Extrusion => {
                let m = compute_extrusion(&Self::extrusion_reading(fields));
                out.set(outputs::TOTAL_PRODUCTION, m.total_production);
                out.set(outputs::RENDEMENT, m.yield_pct);
                out.set(outputs::TAUX_DECHET, m.waste_rate_pct);
                out.set(outputs::PROD_PAR_MACHINE, m.per_machine);
            }
            Section::Printing => {
                let m = compute_printing(&Self::printing_reading(fields));
                out.set(outputs::IMP_TOTAL_PRODUCTION, m.total_production);
                out.set(outputs::IMP_TAUX_DECHET, m.waste_rate_pct);
            }
            Section::Welding => {
                let m = compute_welding(&Self::welding_reading(fields));
                out.set(outputs::SOU_TOTAL_PRODUCTION, m.total_production);
                out.set(outputs::SOU_TOTAL_SPECIFIQUE, m.specific_total);
                out.set(outputs::SOU_TAUX_DECHET, m.waste_rate_pct);
            }
            Section::Recycling => {
                let m = compute_recycling(&Self::recycling_reading(fields));
                out.set(outputs::REC_TOTAL_PRODUCTION, m.total_production);
                out.set(outputs::REC_PROD_PAR_MOULINEX, m.per_unit);
                out.set(outputs::REC_TAUX_TRANSFORMATION, m.transformation_rate_pct);
            }
        }
        out
    }

    pub fn extrusion_reading(fields: &RawFields) -> ExtrusionReading {
        ExtrusionReading {
            finished: parse_quantity(raw(fields, ids::PROD_FINIS)),
            semi_finished: parse_quantity(raw(fields, ids::PROD_SEMI_FINIS)),
            waste: parse_quantity(raw(fields, ids::DECHETS)),
            raw_material: parse_quantity(raw(fields, ids::MATIERE_PREMIERE)),
            machine_count: parse_count(raw(fields, ids::NB_MACHINES)),
        }
    }

    pub fn printing_reading(fields: &RawFields) -> PrintingReading {
        PrintingReading {
            finished_reels: parse_quantity(raw(fields, ids::IMP_BOBINES_FINIES)),
            semi_finished_reels: parse_quantity(raw(fields, ids::IMP_BOBINES_SEMI_FINIES)),
            waste: parse_quantity(raw(fields, ids::IMP_DECHETS)),
        }
    }

    pub fn welding_reading(fields: &RawFields) -> WeldingReading {
        WeldingReading {
            finished_reels: parse_quantity(raw(fields, ids::SOU_BOBINES_FINIES)),
            straps: parse_quantity(raw(fields, ids::SOU_BRETELLES)),
            rema: parse_quantity(raw(fields, ids::SOU_REMA)),
            batta: parse_quantity(raw(fields, ids::SOU_BATTA)),
            waste: parse_quantity(raw(fields, ids::SOU_DECHETS)),
        }
    }

    pub fn recycling_reading(fields: &RawFields) -> RecyclingReading {
        RecyclingReading {
            grinding: parse_quantity(raw(fields, ids::REC_BROYAGE)),
            black_tarp: parse_quantity(raw(fields, ids::REC_BACHE_NOIR)),
            unit_count: parse_count(raw(fields, ids::REC_NB_MOULINEX)),
        }
    }
}
