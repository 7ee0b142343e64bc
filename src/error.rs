use std::fmt;

/// 语音助手后端的统一错误类型
#[derive(Debug)]
pub enum AssistantError {
    /// LLM / 流式调用错误
    Llm(LlmError),
    /// 工具执行错误
    Tool(ToolError),
    /// 持久化存储错误
    Store(StoreError),
    /// 天气服务错误
    Weather(WeatherError),
    /// 单轮对话执行错误
    Turn(TurnError),
    /// 配置错误
    Config(ConfigError),
    /// IO 错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

/// 错误的严重程度
///
/// - `Soft`：记录日志后可以继续产出回复（记忆检索、消息落库、工具失败）
/// - `Hard`：本轮无法产出回复，必须上抛到传输层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Soft,
    Hard,
}

/// LLM 相关错误
#[derive(Debug)]
pub enum LlmError {
    /// 网络请求失败
    NetworkError(String),
    /// API 返回错误状态码
    ApiError { status: u16, message: String },
    /// 流结束时既没有文本也没有工具调用
    EmptyResponse,
    /// 模型在流中报告失败
    StreamFailed(String),
    /// 序列化/反序列化错误
    SerializationError(String),
}

/// 工具执行错误
#[derive(Debug)]
pub enum ToolError {
    /// 参数缺失
    MissingParameter(String),
    /// 参数类型错误
    InvalidParameter { name: String, message: String },
    /// 工具执行超时
    Timeout(String),
}

/// 存储错误
#[derive(Debug)]
pub enum StoreError {
    /// 连接池不可用 / 获取连接超时
    Unavailable(String),
    /// SQL 执行失败
    Query(String),
    /// 读回的行无法还原
    MalformedRow(String),
}

/// 天气服务错误
#[derive(Debug)]
pub enum WeatherError {
    /// 服务返回非 2xx 状态码
    Status(u16),
    /// 网络错误
    Network(String),
    /// 响应体无法解析
    MalformedPayload(String),
    /// 响应中缺少数值型温度字段
    MissingTemperature,
}

/// 单轮对话错误
#[derive(Debug)]
pub enum TurnError {
    /// 传输层关闭，本轮被取消
    Cancelled,
    /// 工具调用轮次超过上限
    ToolRoundsExceeded(usize),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),
    /// 配置解析失败
    ParseFailed(String),
    /// 缺少必需的配置项
    MissingField(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
    /// 环境变量格式错误
    EnvFormatError(String),
    /// 指定模型没有配置
    ModelNotFound(String),
}

impl AssistantError {
    pub fn severity(&self) -> Severity {
        match self {
            AssistantError::Store(_) | AssistantError::Tool(_) | AssistantError::Weather(_) => {
                Severity::Soft
            }
            _ => Severity::Hard,
        }
    }

    pub fn is_soft(&self) -> bool {
        self.severity() == Severity::Soft
    }
}

/// 吞掉软错误：记录日志并返回 `None`；硬错误原样返回。
pub fn log_soft<T>(result: Result<T>, context: &str) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_soft() => {
            tracing::warn!(error = %e, "{context}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::Llm(e) => write!(f, "LLM Error: {}", e),
            AssistantError::Tool(e) => write!(f, "Tool Error: {}", e),
            AssistantError::Store(e) => write!(f, "Store Error: {}", e),
            AssistantError::Weather(e) => write!(f, "Weather Error: {}", e),
            AssistantError::Turn(e) => write!(f, "Turn Error: {}", e),
            AssistantError::Config(e) => write!(f, "Config Error: {}", e),
            AssistantError::Io(e) => write!(f, "IO Error: {}", e),
            AssistantError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LlmError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            LlmError::EmptyResponse => write!(f, "Empty response from LLM"),
            LlmError::StreamFailed(msg) => write!(f, "Response stream failed: {}", msg),
            LlmError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ToolError::InvalidParameter { name, message } => {
                write!(f, "Invalid parameter '{}': {}", name, message)
            }
            ToolError::Timeout(name) => write!(f, "Tool '{}' timed out", name),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::Query(msg) => write!(f, "Query failed: {}", msg),
            StoreError::MalformedRow(msg) => write!(f, "Malformed row: {}", msg),
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::Status(status) => {
                write!(f, "weather service returned status {}", status)
            }
            WeatherError::Network(msg) => write!(f, "weather service unreachable: {}", msg),
            WeatherError::MalformedPayload(msg) => {
                write!(f, "weather service sent an unreadable response: {}", msg)
            }
            WeatherError::MissingTemperature => {
                write!(f, "weather service response has no current temperature")
            }
        }
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Cancelled => write!(f, "Turn cancelled"),
            TurnError::ToolRoundsExceeded(n) => write!(f, "Tool rounds exceeded: {}", n),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::MissingField(field) => write!(f, "Missing config field: {}", field),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
            ConfigError::EnvFormatError(key) => {
                write!(f, "Malformed model environment variable: {}", key)
            }
            ConfigError::ModelNotFound(model) => write!(f, "No configuration for model: {}", model),
        }
    }
}

impl std::error::Error for AssistantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssistantError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for LlmError {}
impl std::error::Error for ToolError {}
impl std::error::Error for StoreError {}
impl std::error::Error for WeatherError {}
impl std::error::Error for TurnError {}
impl std::error::Error for ConfigError {}

impl From<std::io::Error> for AssistantError {
    fn from(err: std::io::Error) -> Self {
        AssistantError::Io(err)
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Llm(LlmError::NetworkError("Request timeout".to_string()))
        } else if err.is_connect() {
            AssistantError::Llm(LlmError::NetworkError(format!(
                "Connection failed: {}",
                err
            )))
        } else {
            AssistantError::Llm(LlmError::NetworkError(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Llm(LlmError::SerializationError(err.to_string()))
    }
}

impl From<serde_yaml::Error> for AssistantError {
    fn from(err: serde_yaml::Error) -> Self {
        AssistantError::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

impl From<sqlx::Error> for AssistantError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AssistantError::Store(StoreError::Unavailable(err.to_string()))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                AssistantError::Store(StoreError::MalformedRow(err.to_string()))
            }
            other => AssistantError::Store(StoreError::Query(other.to_string())),
        }
    }
}

impl From<LlmError> for AssistantError {
    fn from(err: LlmError) -> Self {
        AssistantError::Llm(err)
    }
}

impl From<ToolError> for AssistantError {
    fn from(err: ToolError) -> Self {
        AssistantError::Tool(err)
    }
}

impl From<StoreError> for AssistantError {
    fn from(err: StoreError) -> Self {
        AssistantError::Store(err)
    }
}

impl From<WeatherError> for AssistantError {
    fn from(err: WeatherError) -> Self {
        AssistantError::Weather(err)
    }
}

impl From<TurnError> for AssistantError {
    fn from(err: TurnError) -> Self {
        AssistantError::Turn(err)
    }
}

impl From<ConfigError> for AssistantError {
    fn from(err: ConfigError) -> Self {
        AssistantError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
