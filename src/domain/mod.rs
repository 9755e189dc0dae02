// ==========================================
// 生产订单核对系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod import;
pub mod order;
pub mod report;
pub mod types;

// 重导出核心类型
pub use import::{ImportSummary, RawOrderRow, RawReportRow, RawRow};
pub use order::{NewOrder, Order, OrderKey, OrderWithReports};
pub use report::{min_production_date_time, OrphanReport, Report};
pub use types::{ImportPolicy, OrderIdPolicy};
