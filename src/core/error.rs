//! 错误处理模块
//!
//! 定义了网格烘焙流程中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 致命错误（打开失败、内存不足、读取失败）通过 `Result` 返回给调用者
//! - 非致命问题（格式错误的行、越界索引）只记录日志，不会出现在这里
//! - 为每种错误类型提供清晰的上下文信息（缓冲区名称、行号）
//! - 支持错误链（error source）

use std::fmt;
use std::path::PathBuf;

use crate::geometry::buffer::BufferKind;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, MeshBakeError>;

/// mesh_bake 的错误类型
#[derive(Debug)]
pub enum MeshBakeError {
    /// 配置错误
    Config(ConfigError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// 法线缓存错误
    Cache(CacheError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
///
/// 变体区分了调用者在批处理时需要区分的几种致命情况：
/// 参数无效、打开失败、内存不足、读取中途失败。
#[derive(Debug)]
pub enum MeshLoadError {
    /// 参数无效（例如空路径）
    InvalidArgument(String),

    /// 文件无法打开
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 缓冲区增长失败
    ///
    /// `line` 为触发增长的源文件行号；后处理阶段的临时缓冲区没有行号。
    OutOfMemory {
        buffer: BufferKind,
        line: Option<usize>,
    },

    /// 读取过程中发生 IO 错误（不同于正常的文件结束）
    ReadFailed {
        line: usize,
        source: std::io::Error,
    },

    /// 不支持的文件格式
    UnsupportedFormat(String),
}

/// 法线缓存文件相关的错误
///
/// 这些错误在平滑阶段内部处理（回退到重新计算），
/// 只有直接调用缓存读写函数时才会看到。
#[derive(Debug)]
pub enum CacheError {
    /// 缓存文件无法打开或创建
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 缓存文件读取失败（包括数据不完整）
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 缓存文件写入失败
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 缓存中记录的浮点数数量与当前网格不一致
    CountMismatch { expected: usize, found: usize },
}

impl fmt::Display for MeshBakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshBakeError::Config(e) => write!(f, "Configuration error: {}", e),
            MeshBakeError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            MeshBakeError::Cache(e) => write!(f, "Normal cache error: {}", e),
            MeshBakeError::Io(e) => write!(f, "IO error: {}", e),
            MeshBakeError::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MeshLoadError::OpenFailed { path, source } => {
                write!(f, "Failed to open mesh file '{}': {}", path.display(), source)
            }
            MeshLoadError::OutOfMemory { buffer, line: Some(line) } => {
                write!(f, "Out of memory expanding {} at line {}", buffer, line)
            }
            MeshLoadError::OutOfMemory { buffer, line: None } => {
                write!(f, "Out of memory allocating {}", buffer)
            }
            MeshLoadError::ReadFailed { line, source } => {
                write!(f, "Error reading mesh at line {}: {}", line, source)
            }
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Open { path, source } => {
                write!(f, "Failed to open cache '{}': {}", path.display(), source)
            }
            CacheError::Read { path, source } => {
                write!(f, "Failed to read cache '{}': {}", path.display(), source)
            }
            CacheError::Write { path, source } => {
                write!(f, "Failed to write cache '{}': {}", path.display(), source)
            }
            CacheError::CountMismatch { expected, found } => {
                write!(f, "Cache holds {} floats, mesh has {}", found, expected)
            }
        }
    }
}

impl std::error::Error for MeshBakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshBakeError::Io(e) => Some(e),
            MeshBakeError::MeshLoading(e) => Some(e),
            MeshBakeError::Cache(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for MeshLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshLoadError::OpenFailed { source, .. } => Some(source),
            MeshLoadError::ReadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Open { source, .. }
            | CacheError::Read { source, .. }
            | CacheError::Write { source, .. } => Some(source),
            CacheError::CountMismatch { .. } => None,
        }
    }
}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for MeshBakeError {
    fn from(err: std::io::Error) -> Self {
        MeshBakeError::Io(err)
    }
}

impl From<ConfigError> for MeshBakeError {
    fn from(err: ConfigError) -> Self {
        MeshBakeError::Config(err)
    }
}

impl From<MeshLoadError> for MeshBakeError {
    fn from(err: MeshLoadError) -> Self {
        MeshBakeError::MeshLoading(err)
    }
}

impl From<CacheError> for MeshBakeError {
    fn from(err: CacheError) -> Self {
        MeshBakeError::Cache(err)
    }
}
