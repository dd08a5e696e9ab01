// ==========================================
// 石材库存预警系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
