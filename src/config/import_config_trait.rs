// ==========================================
// 生产订单核对系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::ConfigResult;
use crate::domain::types::ImportPolicy;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取导入策略
    ///
    /// # 默认值
    /// - ALL_OR_NOTHING
    async fn get_import_policy(&self) -> ConfigResult<ImportPolicy>;

    /// 获取表头行数（文件开头跳过的行数）
    ///
    /// # 默认值
    /// - 1
    async fn get_header_rows(&self) -> ConfigResult<usize>;
}
