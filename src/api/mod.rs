// ==========================================
// 生产订单核对系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行/外部传输层调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod order_api;
pub mod reconcile_api;

// 重导出核心类型
pub use error::{status, ApiError, ApiResult};
pub use import_api::{
    BatchImportReportsResponse, ImportApi, ImportOrdersResponse, ImportReportsResponse,
    ReportFileResult,
};
pub use order_api::OrderApi;
pub use reconcile_api::{
    BusinessRulesResponse, DeleteOrdersResponse, FailedReportsResponse, ReconcileApi,
    UpdateOrdersResponse,
};
