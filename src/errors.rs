use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ExporterError {
    SchemaViolation(String),
    DuplicateMetric(String),
    SampleProvider(String),
    Encoding(String),
    Config(String),
    Io(String),
}

impl ExporterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ExporterError::SchemaViolation(_) => "E001",
            ExporterError::DuplicateMetric(_) => "E002",
            ExporterError::SampleProvider(_) => "E003",
            ExporterError::Encoding(_) => "E004",
            ExporterError::Config(_) => "E005",
            ExporterError::Io(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ExporterError::SchemaViolation(_) => "Schema Violation",
            ExporterError::DuplicateMetric(_) => "Duplicate Metric",
            ExporterError::SampleProvider(_) => "Sample Provider Failure",
            ExporterError::Encoding(_) => "Encoding Failure",
            ExporterError::Config(_) => "Configuration Error",
            ExporterError::Io(_) => "I/O Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ExporterError::SchemaViolation(msg) => msg,
            ExporterError::DuplicateMetric(msg) => msg,
            ExporterError::SampleProvider(msg) => msg,
            ExporterError::Encoding(msg) => msg,
            ExporterError::Config(msg) => msg,
            ExporterError::Io(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败）
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

    /// 格式化为简洁输出（用于日志与 HTTP 响应）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ExporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ExporterError {}

// 便捷的构造函数
impl ExporterError {
    pub fn schema_violation<T: Into<String>>(msg: T) -> Self {
        ExporterError::SchemaViolation(msg.into())
    }

    pub fn duplicate_metric<T: Into<String>>(msg: T) -> Self {
        ExporterError::DuplicateMetric(msg.into())
    }

    pub fn sample_provider<T: Into<String>>(msg: T) -> Self {
        ExporterError::SampleProvider(msg.into())
    }

    pub fn encoding<T: Into<String>>(msg: T) -> Self {
        ExporterError::Encoding(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ExporterError::Config(msg.into())
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        ExporterError::Encoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for ExporterError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ExporterError::Encoding(err.to_string())
    }
}

impl From<config::ConfigError> for ExporterError {
    fn from(err: config::ConfigError) -> Self {
        ExporterError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ExporterError::schema_violation("a"),
            ExporterError::duplicate_metric("b"),
            ExporterError::sample_provider("c"),
            ExporterError::encoding("d"),
            ExporterError::config("e"),
            ExporterError::Io("f".to_string()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = ExporterError::duplicate_metric("howard_exporter_cpu_usage");
        assert_eq!(
            err.format_simple(),
            "Duplicate Metric: howard_exporter_cpu_usage"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: ExporterError = io.into();
        assert_eq!(err.code(), "E006");
        assert!(err.message().contains("address in use"));
    }
}
