// ==========================================
// 生产订单核对系统 - 配置层
// ==========================================
// 职责: 系统配置管理（JSON 文件 + 默认值）
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use import_config_trait::ImportConfigReader;
