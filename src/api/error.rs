// ==========================================
// 生产订单核对系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入/仓储错误为用户可读的错误消息
// 状态码: status_code() 给出传输层状态码（200/204/400/404/500）
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 传输层状态码
pub mod status {
    pub const OK: u16 = 200;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_ERROR: u16 = 500;
}

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    /// 行级解析失败（带原始行号）
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("数据存储不可用: {0}")]
    StoreUnavailable(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 传输层状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) | ApiError::ImportError(_) | ApiError::ValidationError(_) => {
                status::BAD_REQUEST
            }
            ApiError::NotFound(_) => status::NOT_FOUND,
            ApiError::StoreUnavailable(_) | ApiError::InternalError(_) | ApiError::Other(_) => {
                status::INTERNAL_ERROR
            }
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::StoreUnavailable(format!("存储锁获取失败: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            // 行级错误保留行号信息
            ImportError::MissingCell { .. }
            | ImportError::TypeConversionError { .. }
            | ImportError::DateFormatError { .. } => ApiError::ValidationError(err.to_string()),

            ImportError::FileNotFound(_)
            | ImportError::UnsupportedFormat(_)
            | ImportError::FileReadError(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError(_) => ApiError::ImportError(err.to_string()),

            ImportError::Repository(repo_err) => repo_err.into(),
            ImportError::ConfigReadError(e) => ApiError::InternalError(e.to_string()),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
