// ==========================================
// 生产订单核对系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 日期识别 / Excel 日期序列号换算
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// 内置日期时间格式（按顺序尝试）
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y%m%d%H%M%S",
];

/// 内置日期格式（按顺序尝试；斜杠格式按 日/月/年 解释）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y", "%Y%m%d"];

#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    // 配置的额外格式，优先于内置格式
    extra_formats: Vec<String>,
}

impl DataCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_formats(extra_formats: Vec<String>) -> Self {
        Self { extra_formats }
    }

    /// 清洗文本字段（TRIM）
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 标准化 NULL 值（空字符串/空白/"NULL" → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value
            .map(|v| v.trim())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
            .map(|v| v.to_string())
    }

    /// 识别日期时间
    ///
    /// 顺序: 额外格式 → 内置日期时间格式 → RFC 3339 → 内置日期格式（补 00:00:00）
    pub fn parse_date_time(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();

        for fmt in &self.extra_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt);
            }
            if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
                return d.and_hms_opt(0, 0, 0);
            }
        }

        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()))
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// 识别日期（日期时间取日期部分）
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();

        for fmt in &self.extra_formats {
            if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
                return Some(d);
            }
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .or_else(|| self.parse_date_time(value).map(|dt| dt.date()))
    }

    /// Excel 日期序列号 → 日期时间（1900 日期系统，基准 1899-12-30）
    pub fn excel_serial_to_date_time(&self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let millis = (serial * 86_400_000.0).round() as i64;
        base.checked_add_signed(Duration::milliseconds(millis))
    }

    /// 日期时间 → 单元格文本（可被 parse_date_time 识别）
    pub fn format_date_time(&self, dt: NaiveDateTime) -> String {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
