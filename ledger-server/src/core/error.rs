use shared::error::AppError;
use thiserror::Error;

/// 启动 / 运行期错误 (请求级错误走 `AppError`)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
