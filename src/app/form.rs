// ==========================================
// SOFEM-CI 生产录入 - 工段表单适配器
// ==========================================
// 职责: 持有表单的显式状态（原始值/附加字段/内联错误/展示指标）
// 红线: 每次监听字段变更都立即重算；展示值只由引擎产生
// ==========================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::api::error::FieldViolation;
use crate::domain::types::Section;
use crate::engine::recompute::{DisplayedMetrics, MetricsEngine, RawFields};
use crate::engine::schema::schema_for;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionForm {
    section: Section,
    form_id: String,
    /// 监听字段: 字段 id → 原始输入
    values: RawFields,
    /// 透传字段: 提交名 → 值（日期、班次等,不参与计算）
    extras: BTreeMap<String, String>,
    /// 内联错误: 字段 id → 提示
    errors: BTreeMap<String, String>,
    displayed: DisplayedMetrics,
}

impl SectionForm {
    /// 新建空表单并做一次初始计算
    pub fn new(section: Section) -> Self {
        let mut form = Self {
            section,
            form_id: section.default_form_id().to_string(),
            values: RawFields::new(),
            extras: BTreeMap::new(),
            errors: BTreeMap::new(),
            displayed: DisplayedMetrics::default(),
        };
        form.recompute();
        form
    }

    /// 预填监听字段（未知字段忽略）
    pub fn with_values<I, K, V>(section: Section, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::new(section);
        let schema = schema_for(section);
        for (k, v) in values {
            let k = k.into();
            if schema.is_watched(&k) {
                form.values.insert(k, v.into());
            } else {
                tracing::trace!(field = %k, "忽略非监听字段");
            }
        }
        form.recompute();
        form
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// 输入事件：保存原始值并重算
    ///
    /// 返回 false 表示该字段不是本工段的监听字段。
    pub fn set_value(&mut self, field_id: &str, raw: impl Into<String>) -> bool {
        if !schema_for(self.section).is_watched(field_id) {
            return false;
        }
        self.values.insert(field_id.to_string(), raw.into());
        self.recompute();
        true
    }

    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.values.get(field_id).map(String::as_str)
    }

    pub fn values(&self) -> &RawFields {
        &self.values
    }

    pub fn set_extra(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.extras.insert(name.into(), value.into());
    }

    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }

    pub fn displayed(&self) -> &DisplayedMetrics {
        &self.displayed
    }

    pub fn display(&self, output_id: &str) -> Option<&str> {
        self.displayed.get(output_id)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    pub fn mark_error(&mut self, field_id: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field_id.into(), message.into());
    }

    pub fn clear_error(&mut self, field_id: &str) {
        self.errors.remove(field_id);
    }

    /// 按校验结果刷新必填字段的内联错误
    pub fn apply_violations(&mut self, violations: &[FieldViolation]) {
        for spec in schema_for(self.section).required_fields() {
            self.clear_error(spec.id);
        }
        for v in violations {
            self.mark_error(v.field_id.clone(), v.message.clone());
        }
    }

    /// 清空所有输入与错误,并重算（展示值归零）
    pub fn reset(&mut self) {
        self.values.clear();
        self.extras.clear();
        self.errors.clear();
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.displayed = MetricsEngine::recompute(self.section, &self.values);
    }

    /// 序列化为 (提交名, 值) 列表
    ///
    /// 监听字段按 schema 顺序输出,未填写的字段不输出；附加字段随后。
    pub fn serialize(&self) -> Vec<(String, String)> {
        let schema = schema_for(self.section);
        let mut pairs: Vec<(String, String)> = schema
            .inputs
            .iter()
            .filter_map(|spec| {
                self.values
                    .get(spec.id)
                    .map(|v| (spec.name.to_string(), v.clone()))
            })
            .collect();
        pairs.extend(self.extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}
