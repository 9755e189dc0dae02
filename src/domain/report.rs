// ==========================================
// 生产订单核对系统 - 报工（分摊）领域模型
// ==========================================
// 红线: 报工不去重、不删除、不改写（仅清空时整体移除）
// ==========================================

use crate::domain::order::OrderKey;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 报工时间缺失或无法解析时使用的最小日期（0001-01-01 00:00:00）
pub fn min_production_date_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

// ==========================================
// Report - 报工记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub order_number: i32,
    pub operation_number: i32,
    pub quantity: f64,
    pub production_date_time: NaiveDateTime, // 缺失时为 min_production_date_time()
}

impl Report {
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.order_number, self.operation_number)
    }

    /// 报工时间是否为兜底值
    pub fn has_default_date(&self) -> bool {
        self.production_date_time == min_production_date_time()
    }
}

// ==========================================
// OrphanReport - 找不到对应订单的报工
// ==========================================
// 显示格式: "OrderNumber: {n}, OperationNumber: {m}"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanReport {
    pub order_number: i32,
    pub operation_number: i32,
}

impl From<&Report> for OrphanReport {
    fn from(report: &Report) -> Self {
        Self {
            order_number: report.order_number,
            operation_number: report.operation_number,
        }
    }
}

impl fmt::Display for OrphanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&OrderKey::new(self.order_number, self.operation_number), f)
    }
}
