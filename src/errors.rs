use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum AdscopeError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    FileOperation(String),
    TaskFailed(String),
    Internal(String),
}

impl AdscopeError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AdscopeError::Validation(_) => "E001",
            AdscopeError::NotFound(_) => "E002",
            AdscopeError::Conflict(_) => "E003",
            AdscopeError::DatabaseConfig(_) => "E004",
            AdscopeError::DatabaseConnection(_) => "E005",
            AdscopeError::DatabaseOperation(_) => "E006",
            AdscopeError::Serialization(_) => "E007",
            AdscopeError::FileOperation(_) => "E008",
            AdscopeError::TaskFailed(_) => "E009",
            AdscopeError::Internal(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AdscopeError::Validation(_) => "Validation Error",
            AdscopeError::NotFound(_) => "Resource Not Found",
            AdscopeError::Conflict(_) => "Resource Conflict",
            AdscopeError::DatabaseConfig(_) => "Database Configuration Error",
            AdscopeError::DatabaseConnection(_) => "Database Connection Error",
            AdscopeError::DatabaseOperation(_) => "Database Operation Error",
            AdscopeError::Serialization(_) => "Serialization Error",
            AdscopeError::FileOperation(_) => "File Operation Error",
            AdscopeError::TaskFailed(_) => "Task Failed",
            AdscopeError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AdscopeError::Validation(msg)
            | AdscopeError::NotFound(msg)
            | AdscopeError::Conflict(msg)
            | AdscopeError::DatabaseConfig(msg)
            | AdscopeError::DatabaseConnection(msg)
            | AdscopeError::DatabaseOperation(msg)
            | AdscopeError::Serialization(msg)
            | AdscopeError::FileOperation(msg)
            | AdscopeError::TaskFailed(msg)
            | AdscopeError::Internal(msg) => msg,
        }
    }

    /// HTTP status this error maps to at the API boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            AdscopeError::Validation(_) => StatusCode::BAD_REQUEST,
            AdscopeError::NotFound(_) => StatusCode::NOT_FOUND,
            AdscopeError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message is safe to show to API clients.
    ///
    /// Server-side failures are replaced by a generic message in responses.
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AdscopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AdscopeError {}

// 便捷的构造函数
impl AdscopeError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AdscopeError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AdscopeError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AdscopeError::Conflict(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AdscopeError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AdscopeError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AdscopeError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AdscopeError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AdscopeError::FileOperation(msg.into())
    }

    pub fn task_failed<T: Into<String>>(msg: T) -> Self {
        AdscopeError::TaskFailed(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        AdscopeError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AdscopeError {
    fn from(err: sea_orm::DbErr) -> Self {
        AdscopeError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AdscopeError {
    fn from(err: std::io::Error) -> Self {
        AdscopeError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AdscopeError {
    fn from(err: serde_json::Error) -> Self {
        AdscopeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdscopeError>;
