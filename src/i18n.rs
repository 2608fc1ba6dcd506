// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认，与后端一致）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 语言由 HostConfig.locale 显式传入,不依赖全局 locale
// ==========================================

pub const SUPPORTED_LOCALES: [&str; 2] = ["fr", "en"];

/// 界面文案的键
pub mod keys {
    pub const FIELD_REQUIRED: &str = "form.field_required";
    pub const CONFIRM_PRODUCTION: &str = "form.confirm_production";
    pub const CONFIRM_SECTION: &str = "form.confirm_section";
    pub const FORM_INVALID: &str = "form.invalid";
    pub const FORM_SAVED: &str = "form.saved";
    pub const FORM_BUSY: &str = "form.busy";
    pub const MISSING_URL: &str = "form.missing_url";
    pub const CONNECTION_ERROR: &str = "network.connection_error";
    pub const SERVER_ERROR: &str = "network.server_error";
    pub const LOADER_PROCESSING: &str = "loader.processing";
}

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use sofemci_saisie::i18n::{keys, t};
/// let msg = t("fr", keys::FORM_INVALID);
/// ```
pub fn t(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use sofemci_saisie::i18n::{keys, t_with_args};
/// let msg = t_with_args("fr", keys::CONFIRM_SECTION, &[("section", "soudure")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
