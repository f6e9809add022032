use chrono_tz::Tz;

use super::{Result, ServerError};
use crate::utils::time::parse_timezone;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | ./data/ledger.db | SQLite 文件 |
/// | ADMIN_SECRET | (development 自动生成) | 管理接口密钥, 非 development 必填 |
/// | BUSINESS_TIMEZONE | UTC | 业务时区 (IANA), 决定“当日结束” |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_DIR | 未设置 | 日志目录, 设置后写滚动日志文件 |
/// | LOG_JSON | production 为 true | 控制台 JSON 日志 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// BUSINESS_TIMEZONE=Asia/Taipei HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// `x-admin-secret` 请求头的期望值
    pub admin_secret: String,
    /// 业务时区
    pub business_timezone: Tz,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 控制台 JSON 日志
    pub log_json: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置 (测试用)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let business_timezone = match lookup("BUSINESS_TIMEZONE") {
            Some(name) => parse_timezone(&name).map_err(|e| ServerError::Config(e.message))?,
            None => Tz::UTC,
        };

        Ok(Self {
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "./data/ledger.db".into()),
            admin_secret: Self::require_secret(&lookup, "ADMIN_SECRET", &environment)?,
            business_timezone,
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(environment == "production"),
            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment,
        })
    }

    /// Require a secret: must be set and non-empty in non-development environments.
    fn require_secret(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String> {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(ServerError::Config(format!(
                        "{name} must be set in {environment} environment"
                    )));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(ServerError::Config(format!(
                "{name} must not be empty in {environment} environment"
            )));
        }
        Ok(val)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.database_path, "./data/ledger.db");
        assert_eq!(config.business_timezone, Tz::UTC);
        assert!(config.is_development());
        assert!(!config.log_json);
        assert_eq!(config.admin_secret, "dev-ADMIN_SECRET-not-for-production");
        assert_eq!(config.request_timeout_ms, 30000);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HTTP_PORT", "8080"),
            ("BUSINESS_TIMEZONE", "Asia/Taipei"),
            ("ADMIN_SECRET", "s3cret"),
            ("LOG_DIR", "/tmp/ledger-logs"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.business_timezone, chrono_tz::Asia::Taipei);
        assert_eq!(config.admin_secret, "s3cret");
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/ledger-logs"));
    }

    #[test]
    fn test_production_requires_secret() {
        let err = Config::from_lookup(lookup_from(&[("ENVIRONMENT", "production")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let err = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("ADMIN_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let config = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("ADMIN_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert!(config.log_json);
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let err = Config::from_lookup(lookup_from(&[("BUSINESS_TIMEZONE", "Nowhere/Land")]))
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
