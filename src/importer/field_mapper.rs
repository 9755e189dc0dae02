// ==========================================
// 生产订单核对系统 - 字段映射器实现
// ==========================================
// 职责: 按列位置取值 → 类型转换
// 订单: 全部字段严格解析，任一失败即报错
// 报工: 数值字段严格；报工时间宽松（缺失/无法识别 → 最小日期）
// ==========================================

use crate::domain::import::{RawOrderRow, RawReportRow};
use crate::domain::order::NewOrder;
use crate::domain::report::{min_production_date_time, Report};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::production_importer_trait::{FieldMapper, MappedReport};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

pub struct FieldMapperImpl {
    cleaner: DataCleaner,
}

impl FieldMapperImpl {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner::new(),
        }
    }

    pub fn with_cleaner(cleaner: DataCleaner) -> Self {
        Self { cleaner }
    }
}

impl Default for FieldMapperImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper for FieldMapperImpl {
    fn map_order(&self, row: &RawOrderRow) -> ImportResult<NewOrder> {
        let row_number = row.row_number;

        Ok(NewOrder {
            order_number: self.parse_i32(row.order_number.as_deref(), "order_number", row_number)?,
            operation_number: self.parse_i32(
                row.operation_number.as_deref(),
                "operation_number",
                row_number,
            )?,
            quantity: self.parse_f64(row.quantity.as_deref(), "quantity", row_number)?,
            due_date: self.parse_date(row.due_date.as_deref(), "due_date", row_number)?,
            product: self.require_product(row.product.as_deref(), row_number)?,
        })
    }

    fn map_report(&self, row: &RawReportRow) -> ImportResult<MappedReport> {
        let row_number = row.row_number;

        let order_number =
            self.parse_i32(row.order_number.as_deref(), "order_number", row_number)?;
        let operation_number = self.parse_i32(
            row.operation_number.as_deref(),
            "operation_number",
            row_number,
        )?;
        let quantity = self.parse_f64(row.quantity.as_deref(), "quantity", row_number)?;

        let (production_date_time, date_defaulted) =
            match self.lenient_date_time(row.production_date_time.as_deref()) {
                Some(dt) => (dt, false),
                None => {
                    debug!(
                        row = row_number,
                        value = row.production_date_time.as_deref().unwrap_or(""),
                        "报工时间缺失或无法识别，使用最小日期"
                    );
                    (min_production_date_time(), true)
                }
            };

        Ok(MappedReport {
            report: Report {
                order_number,
                operation_number,
                quantity,
                production_date_time,
            },
            date_defaulted,
        })
    }
}

impl FieldMapperImpl {
    /// 必填数值/日期字段（"NULL" 视为缺失）
    fn require_text(
        &self,
        value: Option<&str>,
        field: &str,
        row_number: usize,
    ) -> ImportResult<String> {
        self.cleaner
            .normalize_null(value)
            .ok_or_else(|| ImportError::MissingCell {
                row: row_number,
                field: field.to_string(),
            })
    }

    /// 产品名称: 仅去空白，字面 "NULL" 原样保留
    fn require_product(&self, value: Option<&str>, row_number: usize) -> ImportResult<String> {
        value
            .map(|v| self.cleaner.clean_text(v))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ImportError::MissingCell {
                row: row_number,
                field: "product".to_string(),
            })
    }

    /// 解析整数
    fn parse_i32(&self, value: Option<&str>, field: &str, row_number: usize) -> ImportResult<i32> {
        let value = self.require_text(value, field, row_number)?;
        value
            .parse::<i32>()
            .map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("无法解析为整数: {}", value),
            })
    }

    /// 解析浮点数（拒绝 NaN / 无穷）
    fn parse_f64(&self, value: Option<&str>, field: &str, row_number: usize) -> ImportResult<f64> {
        let value = self.require_text(value, field, row_number)?;
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("无法解析为浮点数: {}", value),
            }),
        }
    }

    /// 解析日期（严格）
    fn parse_date(
        &self,
        value: Option<&str>,
        field: &str,
        row_number: usize,
    ) -> ImportResult<NaiveDate> {
        let value = self.require_text(value, field, row_number)?;
        self.cleaner
            .parse_date(&value)
            .ok_or_else(|| ImportError::DateFormatError {
                row: row_number,
                field: field.to_string(),
                value,
            })
    }

    /// 解析日期时间（宽松，失败返回 None）
    fn lenient_date_time(&self, value: Option<&str>) -> Option<NaiveDateTime> {
        self.cleaner
            .normalize_null(value)
            .and_then(|v| self.cleaner.parse_date_time(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_row(cells: [&str; 6]) -> RawOrderRow {
        let to_opt = |s: &str| {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawOrderRow {
            order_number: to_opt(cells[0]),
            operation_number: to_opt(cells[1]),
            quantity: to_opt(cells[2]),
            due_date: to_opt(cells[3]),
            unused: to_opt(cells[4]),
            product: to_opt(cells[5]),
            row_number: 2,
        }
    }

    fn report_row(date: Option<&str>) -> RawReportRow {
        RawReportRow {
            order_number: Some("1".to_string()),
            operation_number: Some("10".to_string()),
            quantity: Some("40".to_string()),
            production_date_time: date.map(|d| d.to_string()),
            row_number: 5,
        }
    }

    #[test]
    fn test_map_order_success() {
        let mapper = FieldMapperImpl::new();
        let order = mapper
            .map_order(&order_row(["1", "10", "100.5", "2024-05-01", "", " Widget "]))
            .unwrap();

        assert_eq!(order.order_number, 1);
        assert_eq!(order.operation_number, 10);
        assert_eq!(order.quantity, 100.5);
        assert_eq!(order.due_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(order.product, "Widget");
    }

    #[test]
    fn test_map_order_rejects_bad_integer() {
        let mapper = FieldMapperImpl::new();
        let err = mapper
            .map_order(&order_row(["abc", "10", "100", "2024-05-01", "", "P"]))
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::TypeConversionError { ref field, .. } if field == "order_number"
        ));
        assert_eq!(err.row(), Some(2));
    }

    #[test]
    fn test_map_order_rejects_fractional_integer() {
        let mapper = FieldMapperImpl::new();
        let result = mapper.map_order(&order_row(["1.5", "10", "100", "2024-05-01", "", "P"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_map_order_rejects_bad_date() {
        let mapper = FieldMapperImpl::new();
        let err = mapper
            .map_order(&order_row(["1", "10", "100", "someday", "", "P"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { .. }));
    }

    #[test]
    fn test_map_order_missing_product() {
        let mapper = FieldMapperImpl::new();
        let err = mapper
            .map_order(&order_row(["1", "10", "100", "2024-05-01", "x", ""]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingCell { ref field, .. } if field == "product"));
    }

    #[test]
    fn test_map_order_keeps_literal_null_product() {
        let mapper = FieldMapperImpl::new();
        let order = mapper
            .map_order(&order_row(["1", "10", "100", "2024-05-01", "", " NULL "]))
            .unwrap();
        assert_eq!(order.product, "NULL");

        // 数值字段的 "NULL" 仍视为缺失
        let err = mapper
            .map_order(&order_row(["1", "10", "NULL", "2024-05-01", "", "P"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingCell { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_map_order_rejects_nan_quantity() {
        let mapper = FieldMapperImpl::new();
        let result = mapper.map_order(&order_row(["1", "10", "NaN", "2024-05-01", "", "P"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_map_report_with_date() {
        let mapper = FieldMapperImpl::new();
        let mapped = mapper.map_report(&report_row(Some("2024-05-01 08:00:00"))).unwrap();

        assert!(!mapped.date_defaulted);
        assert_eq!(mapped.report.quantity, 40.0);
        assert_eq!(
            mapped.report.production_date_time,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_map_report_defaults_missing_or_bad_date() {
        let mapper = FieldMapperImpl::new();

        for date in [None, Some("garbage")] {
            let mapped = mapper.map_report(&report_row(date)).unwrap();
            assert!(mapped.date_defaulted);
            assert_eq!(mapped.report.production_date_time, min_production_date_time());
        }
    }

    #[test]
    fn test_map_report_numeric_cells_are_strict() {
        let mapper = FieldMapperImpl::new();
        let mut row = report_row(None);
        row.quantity = Some("forty".to_string());

        assert!(mapper.map_report(&row).is_err());
    }
}
