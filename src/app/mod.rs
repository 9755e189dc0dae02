// ==========================================
// 生产订单核对系统 - 应用层
// ==========================================
// 职责: 组装仓储/引擎/API，供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
