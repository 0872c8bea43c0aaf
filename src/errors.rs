use std::fmt;

#[derive(Debug, Clone)]
pub enum IpCountryError {
    /// IP 字面量既不是数值也不是合法的点分十进制地址
    MalformedAddress(String),
    /// CSV 数据源无法打开或读取
    SourceUnavailable(String),
    /// 持久层拒绝读或写
    StoreFailure(String),
    CsvFormat(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Validation(String),
}

impl IpCountryError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpCountryError::MalformedAddress(_) => "E001",
            IpCountryError::SourceUnavailable(_) => "E002",
            IpCountryError::StoreFailure(_) => "E003",
            IpCountryError::CsvFormat(_) => "E004",
            IpCountryError::DatabaseConfig(_) => "E005",
            IpCountryError::DatabaseConnection(_) => "E006",
            IpCountryError::Validation(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpCountryError::MalformedAddress(_) => "Malformed Address",
            IpCountryError::SourceUnavailable(_) => "Source Unavailable",
            IpCountryError::StoreFailure(_) => "Store Failure",
            IpCountryError::CsvFormat(_) => "CSV Format Error",
            IpCountryError::DatabaseConfig(_) => "Database Configuration Error",
            IpCountryError::DatabaseConnection(_) => "Database Connection Error",
            IpCountryError::Validation(_) => "Validation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpCountryError::MalformedAddress(msg) => msg,
            IpCountryError::SourceUnavailable(msg) => msg,
            IpCountryError::StoreFailure(msg) => msg,
            IpCountryError::CsvFormat(msg) => msg,
            IpCountryError::DatabaseConfig(msg) => msg,
            IpCountryError::DatabaseConnection(msg) => msg,
            IpCountryError::Validation(msg) => msg,
        }
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

impl fmt::Display for IpCountryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpCountryError {}

// 便捷的构造函数
impl IpCountryError {
    pub fn malformed_address<T: Into<String>>(msg: T) -> Self {
        IpCountryError::MalformedAddress(msg.into())
    }

    pub fn source_unavailable<T: Into<String>>(msg: T) -> Self {
        IpCountryError::SourceUnavailable(msg.into())
    }

    pub fn store_failure<T: Into<String>>(msg: T) -> Self {
        IpCountryError::StoreFailure(msg.into())
    }

    pub fn csv_format<T: Into<String>>(msg: T) -> Self {
        IpCountryError::CsvFormat(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        IpCountryError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        IpCountryError::DatabaseConnection(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        IpCountryError::Validation(msg.into())
    }
}

impl From<sea_orm::DbErr> for IpCountryError {
    fn from(err: sea_orm::DbErr) -> Self {
        IpCountryError::StoreFailure(err.to_string())
    }
}

impl From<std::io::Error> for IpCountryError {
    fn from(err: std::io::Error) -> Self {
        IpCountryError::SourceUnavailable(err.to_string())
    }
}

impl From<csv::Error> for IpCountryError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            IpCountryError::SourceUnavailable(err.to_string())
        } else {
            IpCountryError::CsvFormat(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, IpCountryError>;
