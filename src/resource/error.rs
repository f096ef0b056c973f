//! 资源模块统一错误处理
//!
//! 解析本身不会失败，错误只出现在加载配置、读取资源文件和访问映射存储时

use std::fmt;

use thiserror::Error;

/// 资源错误类型
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),

    /// 资源文件解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 映射存储查询错误
    #[error("映射查询错误: {0}")]
    MappingError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),
}

impl ResourceError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            ResourceError::IoError(_) => true,
            ResourceError::MappingError(_) => true,
            ResourceError::ConfigError(_) => false,
            ResourceError::ParseError(_) => false,
            ResourceError::InvalidInput(_) => false,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResourceError::ConfigError(_) => ErrorCategory::Configuration,
            ResourceError::IoError(_) => ErrorCategory::Io,
            ResourceError::ParseError(_) => ErrorCategory::Parsing,
            ResourceError::MappingError(_) => ErrorCategory::Mapping,
            ResourceError::InvalidInput(_) => ErrorCategory::Input,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            ResourceError::ConfigError(msg)
            | ResourceError::IoError(msg)
            | ResourceError::ParseError(msg)
            | ResourceError::MappingError(msg)
            | ResourceError::InvalidInput(msg) => {
                *msg = format!("{} (上下文: {})", msg, context);
            }
        }

        self
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Parsing,
    Mapping,
    Input,
}

impl From<std::io::Error> for ResourceError {
    fn from(error: std::io::Error) -> Self {
        ResourceError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(error: serde_json::Error) -> Self {
        ResourceError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for ResourceError {
    fn from(error: toml::de::Error) -> Self {
        ResourceError::ParseError(format!("TOML解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type ResourceResult<T> = Result<T, ResourceError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> ResourceError {
        ResourceError::ConfigError(msg.to_string())
    }

    /// 创建映射查询错误
    pub fn mapping_error<T: fmt::Display>(msg: T) -> ResourceError {
        ResourceError::MappingError(msg.to_string())
    }

    /// 创建解析错误
    pub fn parse_error<T: fmt::Display>(msg: T) -> ResourceError {
        ResourceError::ParseError(msg.to_string())
    }
}
