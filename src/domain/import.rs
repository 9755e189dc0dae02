// ==========================================
// 生产订单核对系统 - 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 按列位置取值 → 此结构 → 类型转换）
// 生命周期: 仅在导入流程内
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// RawRow - 文件解析产出的一行（已转为字符串的单元格）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize, // 原始文件行号（1 起，含表头）
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<String>) -> Self {
        Self { row_number, cells }
    }

    /// 按列位置（0 起）取单元格，空白视为缺失
    pub fn cell(&self, index: usize) -> Option<String> {
        self.cells
            .get(index)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }
}

// ==========================================
// RawOrderRow - 订单行（列: 订单号/工序号/数量/交货期/未使用/产品）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderRow {
    pub order_number: Option<String>,
    pub operation_number: Option<String>,
    pub quantity: Option<String>,
    pub due_date: Option<String>,
    pub unused: Option<String>,
    pub product: Option<String>,

    // 元信息
    pub row_number: usize,
}

impl From<&RawRow> for RawOrderRow {
    fn from(row: &RawRow) -> Self {
        Self {
            order_number: row.cell(0),
            operation_number: row.cell(1),
            quantity: row.cell(2),
            due_date: row.cell(3),
            unused: row.cell(4),
            product: row.cell(5),
            row_number: row.row_number,
        }
    }
}

// ==========================================
// RawReportRow - 报工行（列: 订单号/工序号/数量/报工时间）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReportRow {
    pub order_number: Option<String>,
    pub operation_number: Option<String>,
    pub quantity: Option<String>,
    pub production_date_time: Option<String>,

    // 元信息
    pub row_number: usize,
}

impl From<&RawRow> for RawReportRow {
    fn from(row: &RawRow) -> Self {
        Self {
            order_number: row.cell(0),
            operation_number: row.cell(1),
            quantity: row.cell(2),
            production_date_time: row.cell(3),
            row_number: row.row_number,
        }
    }
}

// ==========================================
// ImportSummary - 单次导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub total_rows: usize,         // 数据行数（不含表头/空行）
    pub imported: usize,           // 实际落库
    pub skipped_duplicates: usize, // 匹配键已存在而丢弃（仅订单）
    pub defaulted_dates: usize,    // 报工时间兜底次数（仅报工）
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_order_row_positions() {
        let row = RawRow::new(
            2,
            vec![
                "10".to_string(),
                "20".to_string(),
                "5.5".to_string(),
                "2024-05-01".to_string(),
                "ignored".to_string(),
                " Widget ".to_string(),
            ],
        );
        let order_row = RawOrderRow::from(&row);

        assert_eq!(order_row.order_number.as_deref(), Some("10"));
        assert_eq!(order_row.unused.as_deref(), Some("ignored"));
        assert_eq!(order_row.product.as_deref(), Some("Widget"));
        assert_eq!(order_row.row_number, 2);
    }

    #[test]
    fn test_raw_report_row_short_row() {
        let row = RawRow::new(3, vec!["1".to_string(), "2".to_string(), "3".to_string()]);
        let report_row = RawReportRow::from(&row);

        assert_eq!(report_row.quantity.as_deref(), Some("3"));
        assert_eq!(report_row.production_date_time, None);
    }
}
