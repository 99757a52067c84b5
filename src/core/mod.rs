//! 核心功能模块
//!
//! 本模块提供了网格烘焙的基础功能，包括数学工具、日志系统、配置管理和错误处理。
//! 这些模块独立于具体的网格格式，可以被任何加载器和后处理阶段使用。
//!
//! # 模块组织
//!
//! - `math`：数学类型别名、颜色和数组向量工具
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件加载设置
//! - `error`：错误处理，定义统一的错误类型

pub mod math;
pub mod log;
pub mod config;
pub mod error;

// 重新导出常用类型，方便使用
pub use math::{Color, Matrix4};
pub use error::{Result, MeshBakeError};
pub use config::Config;
