/// 几何体加载和处理模块
///
/// 把 OBJ 文本转换为 11 浮点步长的非索引顶点缓冲区，并完成法线平滑与切线生成。
///
/// # 模块结构
///
/// - `vertex`: 顶点记录布局
/// - `buffer`: 带容量上限、可报告分配失败的属性缓冲区
/// - `mesh`: 网格数据和加载警告
/// - `loaders`: OBJ 解析与面三角化
/// - `spatial_hash`: 近似位置分组
/// - `normals`: 法线平滑
/// - `cache`: 平滑法线缓存文件
/// - `tangents`: 切线生成
/// - `pipeline`: 加载、平滑、切线的完整流程
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ)
///     ↓
/// ObjLoader
///     ↓
/// MeshData (CPU侧数据)
///     ↓
/// NormalSmoother ⇄ 缓存文件
///     ↓
/// compute_tangents
///     ↓
/// 顶点缓冲区 (上传到GPU)
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_bake::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let mesh_data = ObjLoader::default().load_from_file(Path::new("model.obj"))?;
///
/// println!("顶点数: {}", mesh_data.vertex_count());
/// println!("三角形数: {}", mesh_data.triangle_count());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```

pub mod vertex;
pub mod buffer;
pub mod mesh;
pub mod loaders;
pub mod spatial_hash;
pub mod normals;
pub mod cache;
pub mod tangents;
pub mod pipeline;

// 重新导出常用类型
pub use vertex::Vertex;
pub use buffer::{AttributeStream, BufferKind};
pub use mesh::{LoadWarning, MeshData, WarningKind};
pub use normals::{NormalSmoother, SmoothOutcome};
pub use tangents::compute_tangents;
pub use pipeline::{BakedMesh, BatchEntry, MeshBaker};
