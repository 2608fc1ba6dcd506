// ==========================================
// SOFEM-CI 生产录入 - 必填字段校验器
// ==========================================
// 职责: 提交前的本地必填校验（缺失/非数值/负数 → 违规）
// 范围: 仅校验各工段固定的必填列表,其余字段由后端最终校验
// ==========================================

use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::domain::types::Section;
use crate::engine::parsing::is_present_non_negative;
use crate::engine::recompute::RawFields;
use crate::engine::schema::schema_for;
use crate::i18n::{keys, t};

// ==========================================
// RequiredFieldsValidator - 必填字段校验器
// ==========================================
pub struct RequiredFieldsValidator {
    locale: String,
}

impl RequiredFieldsValidator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// 收集所有违规字段（按 schema 中的字段顺序）
    pub fn violations(&self, section: Section, fields: &RawFields) -> Vec<FieldViolation> {
        let message = t(&self.locale, keys::FIELD_REQUIRED);
        schema_for(section)
            .required_fields()
            .filter(|spec| !is_present_non_negative(fields.get(spec.id).map(String::as_str)))
            .map(|spec| FieldViolation {
                field_id: spec.id.to_string(),
                message: message.clone(),
            })
            .collect()
    }

    /// 校验表单
    ///
    /// # 返回
    /// - Ok(()): 所有必填字段存在且 >= 0
    /// - Err(ApiError::LocalValidation): 至少一个字段违规
    pub fn check(&self, section: Section, fields: &RawFields) -> ApiResult<()> {
        let violations = self.violations(section, fields);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::LocalValidation { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::ids;

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extrusion_required_fields() {
        let validator = RequiredFieldsValidator::new("fr");
        let raw = fields(&[(ids::PROD_FINIS, "100"), (ids::PROD_SEMI_FINIS, "-1")]);

        let violations = validator.violations(Section::Extrusion, &raw);
        let ids_found: Vec<&str> = violations.iter().map(|v| v.field_id.as_str()).collect();
        assert_eq!(ids_found, vec![ids::PROD_SEMI_FINIS, ids::MATIERE_PREMIERE]);
        assert_eq!(
            violations[0].message,
            "Ce champ est requis et doit être positif"
        );
    }

    #[test]
    fn test_optional_fields_are_not_checked() {
        let validator = RequiredFieldsValidator::new("fr");
        // 废料为负数,但不是必填字段
        let raw = fields(&[
            (ids::IMP_BOBINES_FINIES, "0"),
            (ids::IMP_BOBINES_SEMI_FINIES, "12.5"),
            (ids::IMP_DECHETS, "-3"),
        ]);
        assert!(validator.check(Section::Printing, &raw).is_ok());
    }

    #[test]
    fn test_non_numeric_fails() {
        let validator = RequiredFieldsValidator::new("en");
        let raw = fields(&[(ids::SOU_BOBINES_FINIES, "abc")]);

        match validator.check(Section::Welding, &raw) {
            Err(ApiError::LocalValidation { violations }) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field_id, ids::SOU_BOBINES_FINIES);
                assert_eq!(
                    violations[0].message,
                    "This field is required and must be positive"
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_recycling_count_is_not_required() {
        let validator = RequiredFieldsValidator::new("fr");
        let raw = fields(&[(ids::REC_BROYAGE, "40"), (ids::REC_BACHE_NOIR, " 10 ")]);
        assert!(validator.violations(Section::Recycling, &raw).is_empty());
    }
}
