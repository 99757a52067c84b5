/// 网格烘焙流程
///
/// 把一个 OBJ 文件依次经过加载、法线平滑、切线生成，得到可以直接上传的
/// 11 浮点步长顶点缓冲区。
///
/// ```text
/// OBJ 文件
///     ↓  ObjLoader
/// MeshData（展开的三角形）
///     ↓  NormalSmoother（可选缓存）
///     ↓  compute_tangents
/// MeshData（最终顶点缓冲区）
/// ```

use std::path::{Path, PathBuf};

use crate::core::config::{Config, SmoothingConfig};
use crate::core::error::Result;
use crate::geometry::loaders::{MeshLoader, ObjLoader};
use crate::geometry::mesh::MeshData;
use crate::geometry::normals::{NormalSmoother, SmoothOutcome};
use crate::geometry::tangents::compute_tangents;
use crate::{bake_error, bake_info, bake_warn};

/// 烘焙结果
#[derive(Debug)]
pub struct BakedMesh {
    pub mesh: MeshData,
    pub smoothing: SmoothOutcome,
    /// 本次使用的缓存文件
    pub cache_file: Option<PathBuf>,
}

/// 批量烘焙中单个文件的结果
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<BakedMesh>,
}

/// 网格烘焙器
///
/// # 示例
///
/// ```rust,no_run
/// use mesh_bake::core::Config;
/// use mesh_bake::geometry::pipeline::MeshBaker;
/// use std::path::Path;
///
/// let baker = MeshBaker::new(&Config::default());
/// let baked = baker.bake(Path::new("cube.obj"), Some(Path::new("cache/cube")))?;
/// println!("{} floats", baked.mesh.float_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MeshBaker {
    loader: ObjLoader,
    smoother: NormalSmoother,
    smoothing: SmoothingConfig,
}

impl MeshBaker {
    pub fn new(config: &Config) -> Self {
        Self {
            loader: ObjLoader::new(config.loader.clone()),
            smoother: NormalSmoother::new(&config.smoothing),
            smoothing: config.smoothing.clone(),
        }
    }

    /// 烘焙单个网格
    ///
    /// `cache_folder` 为对象的缓存目录，缓存文件名取自配置；为 `None` 时不读写缓存。
    pub fn bake(&self, mesh_path: &Path, cache_folder: Option<&Path>) -> Result<BakedMesh> {
        let mut mesh = self.loader.load_from_file(mesh_path)?;
        self.finish(&mut mesh, cache_folder).map(|(smoothing, cache_file)| BakedMesh {
            mesh,
            smoothing,
            cache_file,
        })
    }

    /// 烘焙内存中的 OBJ 文本
    pub fn bake_bytes(&self, data: &[u8], cache_folder: Option<&Path>) -> Result<BakedMesh> {
        let mut mesh = self.loader.load_from_memory(data)?;
        self.finish(&mut mesh, cache_folder).map(|(smoothing, cache_file)| BakedMesh {
            mesh,
            smoothing,
            cache_file,
        })
    }

    fn finish(
        &self,
        mesh: &mut MeshData,
        cache_folder: Option<&Path>,
    ) -> Result<(SmoothOutcome, Option<PathBuf>)> {
        let cache_file = cache_folder.map(|folder| self.smoothing.cache_file_in(folder));

        let smoothing = self.smoother.smooth(mesh, cache_file.as_deref())?;
        compute_tangents(mesh);

        if !mesh.warnings.is_empty() {
            bake_warn!(
                "{}: 加载时跳过了 {} 处问题数据",
                mesh.name.as_deref().unwrap_or("<memory>"),
                mesh.warnings.len()
            );
        }
        bake_info!(
            "烘焙完成 {}: {} 个三角形, {} 个浮点数, 平滑结果 {:?}",
            mesh.name.as_deref().unwrap_or("<memory>"),
            mesh.triangle_count(),
            mesh.float_count(),
            smoothing
        );

        Ok((smoothing, cache_file))
    }

    /// 批量烘焙
    ///
    /// 启用缓存时每个文件使用 `SmoothingConfig::object_cache_dir` 给出的目录。
    /// 单个文件失败不会中断后续文件。
    pub fn bake_all<I, P>(&self, paths: I) -> Vec<BatchEntry>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().to_path_buf();
                let folder = self
                    .smoothing
                    .use_cache
                    .then(|| self.smoothing.object_cache_dir(&path));

                bake_info!("开始烘焙: {}", path.display());
                let result = self.bake(&path, folder.as_deref());
                if let Err(e) = &result {
                    bake_error!("烘焙失败 {}: {}", path.display(), e);
                }

                BatchEntry { path, result }
            })
            .collect()
    }
}

impl Default for MeshBaker {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
