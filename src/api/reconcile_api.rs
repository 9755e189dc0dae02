// ==========================================
// 生产订单核对系统 - 核对规则 API
// ==========================================
// 职责: 持锁执行核对规则，输出响应 DTO
// 孤立报工以 "OrderNumber: {n}, OperationNumber: {m}" 文本返回
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::report::OrphanReport;
use crate::engine::ReconciliationEngine;
use crate::repository::SharedRecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 规则1响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOrdersResponse {
    pub deleted_orders: usize,
}

/// 规则2响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrdersResponse {
    pub updated_orders: usize,
}

/// 规则3响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedReportsResponse {
    pub failed_reports: Vec<String>,
}

/// 合并执行响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRulesResponse {
    pub deleted_orders: usize,
    pub updated_orders: usize,
    pub failed_reports: Vec<String>,
}

fn describe(orphans: &[OrphanReport]) -> Vec<String> {
    orphans.iter().map(|o| o.to_string()).collect()
}

pub struct ReconcileApi {
    store: SharedRecordStore,
    engine: Arc<ReconciliationEngine>,
}

impl ReconcileApi {
    pub fn new(store: SharedRecordStore, engine: Arc<ReconciliationEngine>) -> Self {
        Self { store, engine }
    }

    /// 规则1: 删除报工已满足的订单
    pub fn delete_fully_reported_orders(&self) -> ApiResult<DeleteOrdersResponse> {
        let mut store = self.store.lock()?;
        let deleted_orders = self.engine.delete_fully_reported_orders(&mut store);
        Ok(DeleteOrdersResponse { deleted_orders })
    }

    /// 规则2: 收缩报工不足的订单
    pub fn update_under_reported_orders(&self) -> ApiResult<UpdateOrdersResponse> {
        let mut store = self.store.lock()?;
        let updated_orders = self.engine.update_under_reported_orders(&mut store);
        Ok(UpdateOrdersResponse { updated_orders })
    }

    /// 规则3: 列出孤立报工
    pub fn list_failed_reports(&self) -> ApiResult<FailedReportsResponse> {
        let store = self.store.lock()?;
        let orphans = self.engine.list_orphan_reports(&store);
        Ok(FailedReportsResponse {
            failed_reports: describe(&orphans),
        })
    }

    /// 合并执行三条规则
    pub fn process_business_rules(&self) -> ApiResult<BusinessRulesResponse> {
        let mut store = self.store.lock()?;
        let summary = self.engine.process_all(&mut store);
        Ok(BusinessRulesResponse {
            deleted_orders: summary.deleted_orders,
            updated_orders: summary.updated_orders,
            failed_reports: describe(&summary.failed_reports),
        })
    }
}
