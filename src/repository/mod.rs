// ==========================================
// 生产订单核对系统 - 数据仓储层
// ==========================================
// 职责: 进程内订单/报工存储（不持久化）
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod record_store;

pub use error::{RepositoryError, RepositoryResult};
pub use record_store::{OrderBatch, RecordStore, SharedRecordStore};
