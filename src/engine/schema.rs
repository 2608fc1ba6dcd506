// ==========================================
// SOFEM-CI 生产录入 - 页面字段约定
// ==========================================
// 职责: 各工段监听的输入字段、表单提交名、输出字段
// 约束: id 与页面元素 id 一致；name 与后端表单字段一致
// ==========================================

use crate::domain::types::Section;

/// 输入字段 id
pub mod ids {
    // 挤出
    pub const PROD_FINIS: &str = "prod_finis";
    pub const PROD_SEMI_FINIS: &str = "prod_semi_finis";
    pub const DECHETS: &str = "dechets";
    pub const MATIERE_PREMIERE: &str = "matiere_premiere";
    pub const NB_MACHINES: &str = "nb_machines";

    // 印刷
    pub const IMP_BOBINES_FINIES: &str = "imp_bobines_finies";
    pub const IMP_BOBINES_SEMI_FINIES: &str = "imp_bobines_semi_finies";
    pub const IMP_DECHETS: &str = "imp_dechets";

    // 焊接
    pub const SOU_BOBINES_FINIES: &str = "sou_bobines_finies";
    pub const SOU_BRETELLES: &str = "sou_bretelles";
    pub const SOU_REMA: &str = "sou_rema";
    pub const SOU_BATTA: &str = "sou_batta";
    pub const SOU_DECHETS: &str = "sou_dechets";

    // 回收
    pub const REC_BROYAGE: &str = "rec_broyage";
    pub const REC_BACHE_NOIR: &str = "rec_bache_noir";
    pub const REC_NB_MOULINEX: &str = "rec_nb_moulinex";
}

/// 输出字段 id
pub mod outputs {
    pub const TOTAL_PRODUCTION: &str = "total_production";
    pub const RENDEMENT: &str = "rendement";
    pub const TAUX_DECHET: &str = "taux_dechet";
    pub const PROD_PAR_MACHINE: &str = "prod_par_machine";

    pub const IMP_TOTAL_PRODUCTION: &str = "imp_total_production";
    pub const IMP_TAUX_DECHET: &str = "imp_taux_dechet";

    pub const SOU_TOTAL_PRODUCTION: &str = "sou_total_production";
    pub const SOU_TOTAL_SPECIFIQUE: &str = "sou_total_specifique";
    pub const SOU_TAUX_DECHET: &str = "sou_taux_dechet";

    pub const REC_TOTAL_PRODUCTION: &str = "rec_total_production";
    pub const REC_PROD_PAR_MOULINEX: &str = "rec_prod_par_moulinex";
    pub const REC_TAUX_TRANSFORMATION: &str = "rec_taux_transformation";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 数量（kg），非法输入 → 0
    Quantity,
    /// 计数（台），非法输入 → 1
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    /// 表单提交时使用的字段名
    pub name: &'static str,
    pub kind: FieldKind,
    /// 提交前必须存在且 >= 0
    pub required: bool,
}

const fn quantity(id: &'static str, name: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        id,
        name,
        kind: FieldKind::Quantity,
        required,
    }
}

const fn count(id: &'static str, name: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        name,
        kind: FieldKind::Count,
        required: false,
    }
}

#[derive(Debug)]
pub struct SectionSchema {
    pub section: Section,
    pub inputs: &'static [FieldSpec],
    pub outputs: &'static [&'static str],
}

impl SectionSchema {
    pub fn input(&self, id: &str) -> Option<&'static FieldSpec> {
        self.inputs.iter().find(|f| f.id == id)
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.input(id).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.inputs.iter().filter(|f| f.required)
    }
}

static EXTRUSION: SectionSchema = SectionSchema {
    section: Section::Extrusion,
    inputs: &[
        quantity(ids::PROD_FINIS, "production_finis_kg", true),
        quantity(ids::PROD_SEMI_FINIS, "production_semi_finis_kg", true),
        quantity(ids::DECHETS, "dechets_kg", false),
        quantity(ids::MATIERE_PREMIERE, "matiere_premiere_kg", true),
        count(ids::NB_MACHINES, "nombre_machines_actives"),
    ],
    outputs: &[
        outputs::TOTAL_PRODUCTION,
        outputs::RENDEMENT,
        outputs::TAUX_DECHET,
        outputs::PROD_PAR_MACHINE,
    ],
};

static PRINTING: SectionSchema = SectionSchema {
    section: Section::Printing,
    inputs: &[
        quantity(ids::IMP_BOBINES_FINIES, "production_bobines_finies_kg", true),
        quantity(
            ids::IMP_BOBINES_SEMI_FINIES,
            "production_bobines_semi_finies_kg",
            true,
        ),
        quantity(ids::IMP_DECHETS, "dechets_kg", false),
    ],
    outputs: &[outputs::IMP_TOTAL_PRODUCTION, outputs::IMP_TAUX_DECHET],
};

static WELDING: SectionSchema = SectionSchema {
    section: Section::Welding,
    inputs: &[
        quantity(ids::SOU_BOBINES_FINIES, "production_bobines_finies_kg", true),
        quantity(ids::SOU_BRETELLES, "production_bretelles_kg", false),
        quantity(ids::SOU_REMA, "production_rema_kg", false),
        quantity(ids::SOU_BATTA, "production_batta_kg", false),
        quantity(ids::SOU_DECHETS, "dechets_kg", false),
    ],
    outputs: &[
        outputs::SOU_TOTAL_PRODUCTION,
        outputs::SOU_TOTAL_SPECIFIQUE,
        outputs::SOU_TAUX_DECHET,
    ],
};

static RECYCLING: SectionSchema = SectionSchema {
    section: Section::Recycling,
    inputs: &[
        quantity(ids::REC_BROYAGE, "production_broyage_kg", true),
        quantity(ids::REC_BACHE_NOIR, "production_bache_noir_kg", true),
        count(ids::REC_NB_MOULINEX, "nombre_moulinex"),
    ],
    outputs: &[
        outputs::REC_TOTAL_PRODUCTION,
        outputs::REC_PROD_PAR_MOULINEX,
        outputs::REC_TAUX_TRANSFORMATION,
    ],
};

pub fn schema_for(section: Section) -> &'static SectionSchema {
    match section {
        Section::Extrusion => &EXTRUSION,
        Section::Printing => &PRINTING,
        Section::Welding => &WELDING,
        Section::Recycling => &RECYCLING,
    }
}
