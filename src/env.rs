//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，用于覆盖配置文件中的值

use std::env;
use std::fmt;
use std::time::Duration;

use crate::resource::source::MessageSource as Source;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅在变量已设置时解析，未设置返回 `None`
    fn lookup() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "RESOURCE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("warn".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                }),
            }
        }
    }
}

/// 资源查找相关环境变量
pub mod resource {
    use super::*;

    /// 主查找策略
    pub struct MessageSource;
    impl EnvVar<Source> for MessageSource {
        const NAME: &'static str = "RESOURCE_MESSAGE_SOURCE";
        const DEFAULT: Option<Source> = Some(Source::DynamicFolder);
        const DESCRIPTION: &'static str = "Primary message source: system, key-value-map, dynamic-folder";

        fn parse(value: &str) -> EnvResult<Source> {
            value.parse().map_err(|e| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("{}", e),
            })
        }
    }

    /// 站点标识
    pub struct SiteId;
    impl EnvVar<String> for SiteId {
        const NAME: &'static str = "RESOURCE_SITE_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Site identifier used in cache keys and mapping names";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 默认语言
    pub struct Locale;
    impl EnvVar<String> for Locale {
        const NAME: &'static str = "RESOURCE_LOCALE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Locale used when a request does not carry one (e.g. de_DE)";

        fn parse(value: &str) -> EnvResult<String> {
            let locale = value.trim();
            if locale.is_empty() || locale.contains(['.', '-', ' ']) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid locale '{}'. Use forms like 'default', 'de' or 'de_DE'", value),
                });
            }
            Ok(locale.to_string())
        }
    }

    /// 资源包目录
    pub struct BundleDir;
    impl EnvVar<String> for BundleDir {
        const NAME: &'static str = "RESOURCE_BUNDLE_DIR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Directory containing .properties resource bundles";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 映射导入文件
    pub struct MappingFile;
    impl EnvVar<String> for MappingFile {
        const NAME: &'static str = "RESOURCE_MAPPING_FILE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "JSON file with key/value mapping records";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存容量
    pub struct Capacity;
    impl EnvVar<usize> for Capacity {
        const NAME: &'static str = "RESOURCE_CACHE_CAPACITY";
        const DEFAULT: Option<usize> = Some(10_000);
        const DESCRIPTION: &'static str = "Maximum number of cached messages";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1_000_000)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "RESOURCE_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(3600));
        const DESCRIPTION: &'static str = "Cache TTL in seconds, 0 disables expiry";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds > 86400 * 7 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too long (maximum 7 days)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 生成环境变量文档
pub fn generate_env_docs() -> String {
    let mut docs = String::from("# Environment Variables\n\n");

    docs.push_str(&format!("- `{}`: {}\n", core::LogLevel::NAME, core::LogLevel::DESCRIPTION));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        resource::MessageSource::NAME,
        resource::MessageSource::DESCRIPTION,
        resource::MessageSource::DEFAULT
    ));
    docs.push_str(&format!("- `{}`: {}\n", resource::SiteId::NAME, resource::SiteId::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", resource::Locale::NAME, resource::Locale::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", resource::BundleDir::NAME, resource::BundleDir::DESCRIPTION));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        resource::MappingFile::NAME,
        resource::MappingFile::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::Capacity::NAME,
        cache::Capacity::DESCRIPTION,
        cache::Capacity::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::Ttl::NAME,
        cache::Ttl::DESCRIPTION,
        cache::Ttl::DEFAULT
    ));

    docs
}
