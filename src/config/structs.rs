use serde::{Deserialize, Serialize};

use crate::errors::{ExporterError, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable prefix, e.g. `HE__SERVER__PORT=9100`
pub const ENV_PREFIX: &str = "HE";

/// 静态配置（从 TOML 与环境变量加载，启动时使用，不可热重载）
///
/// - server: 监听地址、端口、worker 数量
/// - metrics: 指标路径、命名空间、采样窗口
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// 显式指定的文件必须存在；默认的 `config.toml` 缺失时使用默认值。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (file, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(file).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// Override host and port from a `host:port` or `:port` string.
    pub fn apply_listen_address(&mut self, listen: &str) -> Result<()> {
        let (host, port) = listen.rsplit_once(':').ok_or_else(|| {
            ExporterError::config(format!(
                "listen address '{}' must look like host:port or :port",
                listen
            ))
        })?;
        let port: u16 = port.parse().map_err(|_| {
            ExporterError::config(format!("invalid port in listen address '{}'", listen))
        })?;

        let host = host.trim_start_matches('[').trim_end_matches(']');
        self.server.host = if host.is_empty() {
            default_server_host()
        } else {
            host.to_string()
        };
        self.server.port = port;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        if self.server.host.contains(':') {
            format!("[{}]:{}", self.server.host, self.server.port)
        } else {
            format!("{}:{}", self.server.host, self.server.port)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let path = &self.metrics.path;
        if !path.starts_with('/') || path == "/" {
            return Err(ExporterError::config(format!(
                "metrics.path must start with '/' and must not be the root path, got '{}'",
                path
            )));
        }
        if let Some(c) = path
            .chars()
            .find(|c| matches!(c, '\'' | '"' | '<' | '>' | '&') || c.is_whitespace() || c.is_control())
        {
            return Err(ExporterError::config(format!(
                "metrics.path must not contain {:?}, got '{}'",
                c, path
            )));
        }
        if self.server.host.is_empty() {
            return Err(ExporterError::config("server.host must not be empty"));
        }
        if self.server.workers == 0 {
            return Err(ExporterError::config("server.workers must be at least 1"));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ExporterError::config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 指标导出配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// CPU 采样窗口（毫秒），0 表示与上次采样比较，不阻塞
    #[serde(default)]
    pub cpu_sample_window_ms: u64,
    #[serde(default)]
    pub emit_timestamps: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8081
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_namespace() -> String {
    "howard_exporter".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            namespace: default_namespace(),
            cpu_sample_window_ms: 0,
            emit_timestamps: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.metrics.path, "/metrics");
        assert_eq!(config.metrics.namespace, "howard_exporter");
        assert_eq!(config.metrics.cpu_sample_window_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_listen_address() {
        let mut config = StaticConfig::default();
        config.apply_listen_address("127.0.0.1:9100").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.bind_address(), "127.0.0.1:9100");

        config.apply_listen_address(":8081").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);

        config.apply_listen_address("[::1]:9000").unwrap();
        assert_eq!(config.server.host, "::1");
        assert_eq!(config.bind_address(), "[::1]:9000");
    }

    #[test]
    fn test_apply_listen_address_rejects_garbage() {
        let mut config = StaticConfig::default();
        assert!(config.apply_listen_address("8081").is_err());
        assert!(config.apply_listen_address("host:notaport").is_err());
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_validate_metrics_path() {
        let mut config = StaticConfig::default();
        config.metrics.path = "/".to_string();
        assert!(config.validate().is_err());
        config.metrics.path = "metrics".to_string();
        assert!(config.validate().is_err());
        config.metrics.path = "/custom/metrics".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_metrics_path_rejects_markup() {
        let mut config = StaticConfig::default();
        for path in ["/m'><script>", "/a\"b", "/a b", "/a&b", "/a\nb"] {
            config.metrics.path = path.to_string();
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ExporterError::Config(_)), "{} accepted", path);
        }
    }

    #[test]
    fn test_validate_log_format() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[metrics]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }
}
