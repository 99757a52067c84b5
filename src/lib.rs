//! mesh_bake - OBJ 网格烘焙库
//!
//! 将 Wavefront OBJ 文本转换为可以直接上传 GPU 的非索引顶点缓冲区：
//! 每个顶点 11 个 `f32`（位置、法线、纹理坐标、切线），
//! 法线经过带角度阈值的平滑，并可缓存到磁盘。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理）
//! - `geometry`: 几何体模块（顶点、网格、OBJ 加载器、法线平滑、切线生成）
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_bake::core::Config;
//! use mesh_bake::geometry::MeshBaker;
//! use std::path::Path;
//!
//! let baker = MeshBaker::new(&Config::default());
//! let baked = baker.bake(Path::new("assets/cube.obj"), Some(Path::new("cache/cube")))?;
//!
//! // 11 浮点步长的顶点数据
//! let floats: &[f32] = baked.mesh.as_floats();
//! println!("{} 个浮点数", floats.len());
//! # Ok::<(), mesh_bake::core::MeshBakeError>(())
//! ```

pub mod core;
pub mod geometry;
