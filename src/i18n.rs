// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文，语言由 app.locale 配置
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const AVAILABLE_LOCALES: &[&str] = &["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（不支持的语言回落到 en）
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    if AVAILABLE_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "不支持的语言，使用 en");
        rust_i18n::set_locale("en");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use production_order_reconcile::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use production_order_reconcile::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/orders.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
