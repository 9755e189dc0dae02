// ==========================================
// 生产订单核对系统 - 订单查询 API
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::order::OrderWithReports;
use crate::engine::OrderQueryService;
use crate::repository::SharedRecordStore;
use std::sync::Arc;
use tracing::debug;

pub struct OrderApi {
    store: SharedRecordStore,
    query_service: Arc<OrderQueryService>,
}

impl OrderApi {
    pub fn new(store: SharedRecordStore, query_service: Arc<OrderQueryService>) -> Self {
        Self {
            store,
            query_service,
        }
    }

    /// 按 order_id 查询订单及其报工
    ///
    /// # 返回
    /// - Ok(OrderWithReports)
    /// - Err(ApiError::NotFound): order_id 不存在（含 0 与清空之后）
    pub fn get_order(&self, order_id: u32) -> ApiResult<OrderWithReports> {
        let store = self.store.lock()?;
        let result = self.query_service.get_order_with_reports(&store, order_id)?;

        debug!(order_id, reports = result.reports.len(), "订单查询完成");
        Ok(result)
    }
}
