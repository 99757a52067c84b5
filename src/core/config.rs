//! 配置管理模块
//!
//! 提供加载器、法线平滑和日志的配置加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (mesh_bake.toml)
//!
//! ```toml
//! [loader]
//! max_face_vertices = 64
//! # buffer_element_limit = 100000
//!
//! [smoothing]
//! epsilon = 1e-4
//! angle_threshold_degrees = 45.0
//! hash_buckets = 4096
//! use_cache = true
//! cache_dir = "cache"
//! cache_file_name = "smoothNormals.bins"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use super::error::{ConfigError, Result};

/// 完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 加载器配置
    #[serde(default)]
    pub loader: LoaderConfig,

    /// 法线平滑配置
    #[serde(default)]
    pub smoothing: SmoothingConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OBJ 加载器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// 单个面指令最多接受的顶点记号数，超出部分被截断
    #[serde(default = "default_max_face_vertices")]
    pub max_face_vertices: usize,

    /// 每个缓冲区允许的最大元素数
    ///
    /// 超出时按内存不足处理。`None` 表示只受实际分配能力限制。
    #[serde(default)]
    pub buffer_element_limit: Option<usize>,
}

/// 法线平滑配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// 位置量化与近似相等判断的容差
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,

    /// 平滑组角度阈值（度）
    ///
    /// 面法线夹角不超过该值时参与平均。
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold_degrees: f32,

    /// 空间哈希桶数量
    #[serde(default = "default_hash_buckets")]
    pub hash_buckets: usize,

    /// 是否读写法线缓存
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,

    /// 缓存根目录，每个网格使用其下以文件名命名的子目录
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// 每个对象缓存目录中的缓存文件名
    #[serde(default = "default_cache_file_name")]
    pub cache_file_name: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_max_face_vertices() -> usize { 64 }
fn default_epsilon() -> f32 { 1e-4 }
fn default_angle_threshold() -> f32 { 45.0 }
fn default_hash_buckets() -> usize { 4096 }
fn default_use_cache() -> bool { true }
fn default_cache_dir() -> PathBuf { PathBuf::from("cache") }
fn default_cache_file_name() -> String { "smoothNormals.bins".to_string() }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "mesh_bake.log".to_string() }

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_face_vertices: default_max_face_vertices(),
            buffer_element_limit: None,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            angle_threshold_degrees: default_angle_threshold(),
            hash_buckets: default_hash_buckets(),
            use_cache: default_use_cache(),
            cache_dir: default_cache_dir(),
            cache_file_name: default_cache_file_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl SmoothingConfig {
    /// 角度阈值对应的余弦值
    pub fn cos_threshold(&self) -> f32 {
        self.angle_threshold_degrees.to_radians().cos()
    }

    /// 某个对象缓存目录下的缓存文件路径
    pub fn cache_file_in(&self, folder: &Path) -> PathBuf {
        folder.join(&self.cache_file_name)
    }

    /// 网格文件对应的对象缓存目录
    ///
    /// 目录名由网格路径的父目录和文件名拼接而成，例如 `models/teapot.obj`
    /// 对应 `<cache_dir>/models_teapot`，使不同目录下的同名文件不共享缓存。
    /// 路径按调用者给出的形式使用：同一文件以相对路径和绝对路径传入时得到不同的目录。
    /// 路径分量中 `[A-Za-z0-9._-]` 以外的字符替换为 `_`。
    pub fn object_cache_dir(&self, mesh_path: &Path) -> PathBuf {
        let mut name = String::new();

        if let Some(parent) = mesh_path.parent() {
            for component in parent.components() {
                match component {
                    Component::Normal(part) => {
                        name.push_str(&sanitize_component(&part.to_string_lossy()));
                        name.push('_');
                    }
                    Component::ParentDir => name.push_str("up_"),
                    _ => {}
                }
            }
        }

        let stem = mesh_path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_else(|| "unnamed".into());
        name.push_str(&sanitize_component(&stem));

        self.cache_dir.join(name)
    }
}

fn sanitize_component(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use mesh_bake::core::Config;
    ///
    /// let config = Config::from_file("mesh_bake.toml")?;
    /// # Ok::<(), mesh_bake::core::MeshBakeError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--cache-dir <dir>`: 缓存根目录
    /// - `--no-cache`: 不读写法线缓存
    /// - `--max-face-vertices <n>`: 面顶点数上限
    /// - `--log-level <level>`: 日志级别
    ///
    /// 识别不了的参数原样返回，由调用者解释（例如网格路径）。
    /// `--config <path>` 和它的值会被跳过，因为配置文件需要在此之前加载。
    pub fn apply_args<I>(&mut self, args: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let mut rest = Vec::new();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--no-cache" => self.smoothing.use_cache = false,
                "--cache-dir" => {
                    if let Some(dir) = iter.next() {
                        self.smoothing.cache_dir = PathBuf::from(dir);
                    }
                }
                "--max-face-vertices" => {
                    if let Some(value) = iter.next().and_then(|v| v.parse().ok()) {
                        self.loader.max_face_vertices = value;
                    }
                }
                "--log-level" => {
                    if let Some(level) = iter.next().and_then(|v| LogLevel::parse(&v)) {
                        self.logging.level = level;
                    }
                }
                "--config" => {
                    iter.next();
                }
                _ => rest.push(arg),
            }
        }

        rest
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.loader.max_face_vertices < 3 {
            return Err(ConfigError::InvalidValue {
                field: "loader.max_face_vertices".to_string(),
                reason: "A face needs at least 3 vertices".to_string(),
            }.into());
        }

        if !(self.smoothing.epsilon > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "smoothing.epsilon".to_string(),
                reason: "Epsilon must be greater than 0".to_string(),
            }.into());
        }

        if self.smoothing.hash_buckets == 0 {
            return Err(ConfigError::InvalidValue {
                field: "smoothing.hash_buckets".to_string(),
                reason: "Hash table needs at least one bucket".to_string(),
            }.into());
        }

        let angle = self.smoothing.angle_threshold_degrees;
        if !(angle > 0.0 && angle <= 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "smoothing.angle_threshold_degrees".to_string(),
                reason: "Angle must be in (0, 180]".to_string(),
            }.into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// 从命令行字符串解析日志级别（不区分大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loader.max_face_vertices, 64);
        assert_eq!(config.smoothing.hash_buckets, 4096);
        assert_eq!(config.smoothing.cache_file_name, "smoothNormals.bins");
        assert!((config.smoothing.epsilon - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.loader.max_face_vertices = 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.epsilon = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.angle_threshold_degrees = 190.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            "[smoothing]\nangle_threshold_degrees = 30.0\n",
        )
        .unwrap();

        assert_eq!(config.smoothing.angle_threshold_degrees, 30.0);
        assert_eq!(config.smoothing.hash_buckets, 4096);
        assert_eq!(config.loader.max_face_vertices, 64);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_apply_args_returns_positional() {
        let mut config = Config::default();
        let rest = config.apply_args([
            "--no-cache",
            "a.obj",
            "--cache-dir",
            "out",
            "--config",
            "other.toml",
            "--log-level",
            "DEBUG",
            "b.obj",
        ]);

        assert!(!config.smoothing.use_cache);
        assert_eq!(config.smoothing.cache_dir, PathBuf::from("out"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(rest, vec!["a.obj".to_string(), "b.obj".to_string()]);
    }

    #[test]
    fn test_object_cache_dir() {
        let config = SmoothingConfig::default();
        let dir = config.object_cache_dir(Path::new("models/teapot.obj"));
        assert_eq!(dir, PathBuf::from("cache").join("models_teapot"));
        assert_eq!(
            config.cache_file_in(&dir),
            PathBuf::from("cache").join("models_teapot").join("smoothNormals.bins")
        );

        let bare = config.object_cache_dir(Path::new("teapot.obj"));
        assert_eq!(bare, PathBuf::from("cache").join("teapot"));
    }

    #[test]
    fn test_same_stem_in_different_folders_gets_own_cache() {
        let config = SmoothingConfig::default();
        let a = config.object_cache_dir(Path::new("a/cube.obj"));
        let b = config.object_cache_dir(Path::new("b/cube.obj"));

        assert_ne!(a, b);
        assert_eq!(a, PathBuf::from("cache").join("a_cube"));
        assert_eq!(
            config.object_cache_dir(Path::new("../shared dir/cube.obj")),
            PathBuf::from("cache").join("up_shared_dir_cube")
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh_bake.toml");

        let mut config = Config::default();
        config.loader.buffer_element_limit = Some(10);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.loader.buffer_element_limit, Some(10));
    }
}
