// ==========================================
// 生产订单核对系统 - 订单查询服务
// ==========================================
// 职责: 按 order_id 查询订单并关联其报工（只读）
// ==========================================

use crate::domain::order::OrderWithReports;
use crate::repository::{RecordStore, RepositoryError, RepositoryResult};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct OrderQueryService;

impl OrderQueryService {
    pub fn new() -> Self {
        Self
    }

    /// 查询订单及其报工
    ///
    /// # 返回
    /// - Ok(OrderWithReports): 订单（同号时取插入顺序第一条）+ 匹配键相同的报工（插入顺序）
    /// - Err(NotFound): order_id 不存在
    #[instrument(skip(self, store))]
    pub fn get_order_with_reports(
        &self,
        store: &RecordStore,
        order_id: u32,
    ) -> RepositoryResult<OrderWithReports> {
        let order = store
            .find_order(order_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            })?;

        let reports: Vec<_> = store.reports_for(order.key()).cloned().collect();
        debug!(order_id, reports = reports.len(), "订单查询完成");

        Ok(OrderWithReports { order, reports })
    }
}
