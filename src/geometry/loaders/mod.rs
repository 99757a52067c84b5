/// 网格文件加载
///
/// `MeshLoader` 把一个文件或一段内存解析为 `MeshData`，`load_mesh` 按扩展名挑选加载器。
/// 目前只有 OBJ（`v`/`vt`/`vn`/`f` 子集，自带流式解析器）。
///
/// ```rust,no_run
/// use mesh_bake::geometry::loaders::load_mesh;
/// use std::path::Path;
///
/// let mesh = load_mesh(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshData;
use std::path::Path;

pub mod face;
pub mod obj_loader;

pub use obj_loader::ObjLoader;

/// 网格加载器
///
/// 加载器持有自己的配置，因此方法接收 `&self`。
/// 可恢复的格式问题写入 `MeshData::warnings`，只有无法继续时才返回 `Err`。
pub trait MeshLoader {
    /// 从文件路径加载网格
    ///
    /// # 错误
    ///
    /// - 路径为空：`InvalidArgument`
    /// - 文件无法打开：`OpenFailed`
    /// - 缓冲区增长失败：`OutOfMemory`
    /// - 读取中途失败：`ReadFailed`
    fn load_from_file(&self, path: &Path) -> Result<MeshData>;

    /// 从内存数据加载网格
    fn load_from_memory(&self, data: &[u8]) -> Result<MeshData>;

    /// 获取支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str]
    where
        Self: Sized;
}

/// 根据文件扩展名选择合适的加载器（使用默认加载器配置）
///
/// # 返回
///
/// - `Ok(MeshData)`: 成功加载
/// - `Err(MeshBakeError)`: 不支持的格式或加载失败
pub fn load_mesh(path: &Path) -> Result<MeshData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::default().load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}
