// ==========================================
// 生产订单核对系统 - 引擎层
// ==========================================
// 职责: 订单/报工核对规则、订单查询
// 红线: Engine 只通过 RecordStore 访问数据
// ==========================================

pub mod order_query;
pub mod reconciliation;

// 重导出核心引擎
pub use order_query::OrderQueryService;
pub use reconciliation::{OrderOutcome, ReconciliationEngine, ReconciliationSummary};
