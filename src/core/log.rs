//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! 加载器对每个可恢复的问题（格式错误的行、越界索引、被丢弃的面）
//! 记录一条带行号字段的 warn 日志；致命错误则通过 `Result` 返回。
//! 烘焙流程本身的进度使用 `bake_*` 宏，统一记录在 `mesh_bake::pipeline` 目标下，
//! 便于用 `RUST_LOG=mesh_bake::pipeline=info` 单独过滤。
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_bake::core::config::LogLevel;
//! use mesh_bake::core::log;
//!
//! log::init_logger(LogLevel::Info, false, None);
//! tracing::info!(triangles = 12, "Mesh baked");
//! ```

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::config::LogLevel;
use super::error::{MeshBakeError, Result};

const DEFAULT_LOG_FILE: &str = "mesh_bake.log";

/// 初始化日志系统
///
/// 只应调用一次；重复调用时打印错误并保留已有的订阅者。
///
/// # 参数
///
/// * `level` - 日志级别（设置了 `RUST_LOG` 时以环境变量为准）
/// * `file_output` - 是否额外输出到按天滚动的日志文件
/// * `log_file_path` - 日志文件路径，默认为 "mesh_bake.log"
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    if let Err(e) = try_init_logger(level, file_output, log_file_path) {
        eprintln!("{}", e);
    }
}

/// 初始化日志系统，已经初始化过时返回 `MeshBakeError::Log`
pub fn try_init_logger(
    level: LogLevel,
    file_output: bool,
    log_file_path: Option<&str>,
) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    // None 时该层不产生任何输出
    let file_layer = file_output.then(|| {
        let appender = rolling_appender(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(appender)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MeshBakeError::Log(format!("Failed to install subscriber: {}", e)))
}

/// 按天滚动的文件输出，目录取自路径的父目录
fn rolling_appender(log_path: &str) -> RollingFileAppender {
    let path = Path::new(log_path);
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);

    RollingFileAppender::new(Rotation::DAILY, directory, filename)
}

impl LogLevel {
    /// `EnvFilter` 使用的指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 烘焙流程日志 - Info 级别
#[macro_export]
macro_rules! bake_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "mesh_bake::pipeline", $($arg)*)
    };
}

/// 烘焙流程日志 - Warn 级别
#[macro_export]
macro_rules! bake_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "mesh_bake::pipeline", $($arg)*)
    };
}

/// 烘焙流程日志 - Error 级别
#[macro_export]
macro_rules! bake_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "mesh_bake::pipeline", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
        assert_eq!(LogLevel::parse("warn").map(|l| l.as_filter()), Some("warn"));
        assert!(EnvFilter::try_new(LogLevel::Trace.as_filter()).is_ok());
    }

    #[test]
    fn test_second_init_is_error() {
        // 第一次可能因其他测试已安装而失败，第二次一定失败
        let _ = try_init_logger(LogLevel::Error, false, None);
        let result = try_init_logger(LogLevel::Error, false, None);
        assert!(matches!(result, Err(MeshBakeError::Log(_))));
    }

    #[test]
    fn test_rolling_appender_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bake.log");
        let mut appender = rolling_appender(path.to_str().unwrap());

        use std::io::Write;
        appender.write_all(b"line\n").unwrap();
        appender.flush().unwrap();

        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("bake.log"));
        assert!(written);
    }
}
