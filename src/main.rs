//! mesh_bake - OBJ 网格烘焙工具
//!
//! 读取一个或多个 OBJ 文件，生成带平滑法线和切线的顶点缓冲区，
//! 并把平滑结果缓存到 `<cache_dir>/<父目录_文件名>/smoothNormals.bins`。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用默认配置（mesh_bake.toml，不存在时使用内置默认值）
//! cargo run -- assets/cube.obj
//!
//! # 指定配置文件和缓存目录，并打印所有三角形
//! cargo run -- --config bake.toml --cache-dir out/cache --dump assets/cube.obj
//!
//! # 不读写缓存
//! cargo run -- --no-cache a.obj b.obj
//! ```
//!
//! # 架构概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  命令行入口
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Core     │  配置/日志/错误
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  MeshBaker  │  加载 → 平滑 → 切线
//! └─────────────┘
//! ```

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context};
use mesh_bake::core::{log, Config};
use mesh_bake::geometry::MeshBaker;
use tracing::{debug, error, info};

const DEFAULT_CONFIG: &str = "mesh_bake.toml";

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（`--config` 指定，否则为 mesh_bake.toml）
/// 2. 应用命令行参数覆盖
/// 3. 验证配置并初始化日志系统
/// 4. 依次烘焙所有网格，单个失败不影响其余文件
///
/// # 命令行参数
///
/// - `--config <path>`: 配置文件路径
/// - `--cache-dir <dir>`: 缓存根目录
/// - `--no-cache`: 不读写法线缓存
/// - `--max-face-vertices <n>`: 面顶点数上限
/// - `--log-level <level>`: 日志级别（trace/debug/info/warn/error）
/// - `--dump`: 把每个三角形的顶点数据打印到标准输出
///
/// 其余参数视为网格文件路径。
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. 加载配置（在初始化日志之前）
    let mut config = match config_path(&args) {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => Config::from_file_or_default(DEFAULT_CONFIG),
    };

    // 2. 应用命令行参数
    let rest = config.apply_args(&args);
    let dump = rest.iter().any(|a| a == "--dump");
    let meshes: Vec<&String> = rest.iter().filter(|a| a.as_str() != "--dump").collect();

    // 3. 验证配置并初始化日志
    config.validate().context("invalid configuration")?;

    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "mesh_bake starting...");
    debug!(?config, "Effective configuration");

    if meshes.is_empty() {
        bail!("no mesh files given (usage: mesh_bake [options] <file.obj>...)");
    }

    // 4. 烘焙
    let baker = MeshBaker::new(&config);
    let entries = baker.bake_all(meshes.iter().map(|p| Path::new(p.as_str())));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0;

    for entry in &entries {
        match &entry.result {
            Ok(baked) => {
                writeln!(
                    out,
                    "{}: {} triangles, {} floats, {} warnings",
                    entry.path.display(),
                    baked.mesh.triangle_count(),
                    baked.mesh.float_count(),
                    baked.mesh.warnings.len()
                )?;
                if dump {
                    baked
                        .mesh
                        .write_triangles(&mut out)
                        .with_context(|| format!("failed to dump '{}'", entry.path.display()))?;
                }
            }
            Err(e) => {
                error!("{}: {}", entry.path.display(), e);
                failed += 1;
            }
        }
    }
    out.flush()?;

    info!(total = entries.len(), failed, "mesh_bake finished");
    if failed > 0 {
        bail!("{} of {} meshes failed", failed, entries.len());
    }
    Ok(())
}

/// `--config <path>` 的值
fn config_path(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
