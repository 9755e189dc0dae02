// ==========================================
// 生产订单核对系统 - 生产订单领域模型
// ==========================================
// 匹配键: (order_number, operation_number)
// 用途: 导入层写入, 核对引擎删除/改写数量, 查询服务只读
// ==========================================

use crate::domain::report::Report;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OrderKey - 订单/报工匹配键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderKey {
    pub order_number: i32,
    pub operation_number: i32,
}

impl OrderKey {
    pub fn new(order_number: i32, operation_number: i32) -> Self {
        Self {
            order_number,
            operation_number,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderNumber: {}, OperationNumber: {}",
            self.order_number, self.operation_number
        )
    }
}

// ==========================================
// Order - 生产订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u32,         // 导入时分配（策略见 OrderIdPolicy）
    pub order_number: i32,     // 订单号
    pub operation_number: i32, // 工序号
    pub quantity: f64,         // 订单数量（规则2可改写）
    pub due_date: NaiveDate,   // 交货期
    pub product: String,       // 产品
}

impl Order {
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.order_number, self.operation_number)
    }
}

// ==========================================
// NewOrder - 已解析、尚未分配 order_id 的订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_number: i32,
    pub operation_number: i32,
    pub quantity: f64,
    pub due_date: NaiveDate,
    pub product: String,
}

impl NewOrder {
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.order_number, self.operation_number)
    }

    pub fn into_order(self, order_id: u32) -> Order {
        Order {
            order_id,
            order_number: self.order_number,
            operation_number: self.operation_number,
            quantity: self.quantity,
            due_date: self.due_date,
            product: self.product,
        }
    }
}

// ==========================================
// OrderWithReports - 订单及其报工明细（查询结果）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithReports {
    pub order: Order,
    pub reports: Vec<Report>,
}

impl OrderWithReports {
    /// 报工数量合计
    pub fn reported_total(&self) -> f64 {
        self.reports.iter().map(|r| r.quantity).sum()
    }
}
