// ==========================================
// 生产订单核对系统 - 核心库
// ==========================================
// 职责: 订单/报工导入（内存），按匹配键(订单号, 工序号)核对
// 规则1: 报工已满足的订单删除
// 规则2: 报工不足的订单数量收缩
// 规则3: 列出找不到订单的报工
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 内存存储
pub mod repository;

// 引擎层 - 核对规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportPolicy, OrderIdPolicy};

// 领域实体
pub use domain::{NewOrder, Order, OrderKey, OrderWithReports, OrphanReport, Report};

// 仓储
pub use repository::{RecordStore, SharedRecordStore};

// 引擎
pub use engine::{OrderQueryService, ReconciliationEngine, ReconciliationSummary};

// API
pub use api::{ApiError, ImportApi, OrderApi, ReconcileApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产订单核对系统";
