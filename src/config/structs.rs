use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 存储后端类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory, seeded from the bundled fixture. Lost on restart.
    #[default]
    Memory,
    Sqlite,
    Mysql,
    Postgres,
}

impl StorageBackend {
    pub fn is_sql(&self) -> bool {
        !matches!(self, Self::Memory)
    }

    /// Comma separated list of accepted names, for error messages
    pub fn valid_names() -> String {
        Self::iter()
            .map(|b| b.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(format!(
                "Invalid storage backend: '{}'. Valid: {}",
                s,
                Self::valid_names()
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 优先级：ENV > config.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// ENV 前缀：ADS，分隔符：__
    /// 示例：ADS__SERVER__PORT=9999
    pub fn load(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("ADS")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::errors::AdscopeError::serialization(format!("Failed to render config: {}", e))
        })?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
    /// Load the bundled ad fixture when the ads table is empty
    #[serde(default = "default_seed_on_start")]
    pub seed_on_start: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// 列表查询分页配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// 收藏配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Owner used when a request carries no userId
    #[serde(default = "default_user_id")]
    pub default_user_id: String,
    #[serde(default = "default_max_note_len")]
    pub max_note_len: usize,
}

/// Agent 任务与 SSE 推送配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Delay between observing a terminal status and closing the stream
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
    /// Pause between placeholder plan steps
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// How long finished tasks stay queryable
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://adscope.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_seed_on_start() -> bool {
    true
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

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_user_id() -> String {
    "demo-user".to_string()
}

fn default_max_note_len() -> usize {
    500
}

fn default_keepalive_secs() -> u64 {
    15
}

fn default_close_delay_ms() -> u64 {
    1000
}

fn default_step_delay_ms() -> u64 {
    800
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_cors_max_age() -> usize {
    3600
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            seed_on_start: default_seed_on_start(),
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

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            default_user_id: default_user_id(),
            max_note_len: default_max_note_len(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            keepalive_secs: default_keepalive_secs(),
            close_delay_ms: default_close_delay_ms(),
            step_delay_ms: default_step_delay_ms(),
            retention_secs: default_retention_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}
