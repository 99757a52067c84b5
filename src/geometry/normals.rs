/// 法线平滑
///
/// 用面法线重新计算每条顶点记录的法线：位置在 epsilon 内重合的记录归为一组，
/// 组内只平均与自身面法线夹角不超过阈值的面法线，从而保留硬边。
///
/// 结果可以写入缓存文件，下次加载同样大小的网格时直接复用。

use std::path::Path;

use crate::core::config::SmoothingConfig;
use crate::core::error::{CacheError, MeshLoadError, Result};
use crate::core::math::geometry::{add, dot, face_normal, normalize};
use crate::geometry::buffer::BufferKind;
use crate::geometry::cache;
use crate::geometry::mesh::MeshData;
use crate::geometry::spatial_hash::SpatialHash;
use crate::geometry::vertex::Vertex;

/// 一次平滑调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothOutcome {
    /// 网格为空，什么都没做
    Empty,
    /// 顶点缓冲区直接替换为缓存内容
    CacheHit,
    /// 重新计算了法线
    Recomputed {
        /// 位置分组数量
        groups: usize,
        /// 结果是否成功写入缓存
        cache_saved: bool,
    },
}

/// 法线平滑器
#[derive(Debug, Clone)]
pub struct NormalSmoother {
    epsilon: f32,
    cos_threshold: f32,
    hash_buckets: usize,
}

fn scratch_oom() -> MeshLoadError {
    MeshLoadError::OutOfMemory {
        buffer: BufferKind::SmoothingScratch,
        line: None,
    }
}

impl NormalSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            epsilon: config.epsilon,
            cos_threshold: config.cos_threshold(),
            hash_buckets: config.hash_buckets,
        }
    }

    /// 平滑网格法线
    ///
    /// `cache_file` 为 `Some` 时先尝试读取缓存；缓存缺失、大小不一致或损坏时重新计算，
    /// 计算完成后把整个顶点缓冲区写回该文件。缓存读写失败只记录日志，不影响结果。
    ///
    /// # 错误
    ///
    /// 临时缓冲区分配失败时返回 `OutOfMemory`，此时网格保持调用前的状态。
    pub fn smooth(&self, mesh: &mut MeshData, cache_file: Option<&Path>) -> Result<SmoothOutcome> {
        if mesh.vertex_count() == 0 {
            tracing::debug!("网格为空，跳过法线平滑");
            return Ok(SmoothOutcome::Empty);
        }

        if let Some(path) = cache_file {
            match cache::load(path, mesh.float_count()) {
                Ok(Some(cached)) => {
                    mesh.triangle_vertices.copy_from_slice(&cached);
                    tracing::info!("从缓存加载平滑法线: {}", path.display());
                    return Ok(SmoothOutcome::CacheHit);
                }
                Ok(None) => {
                    tracing::info!("未找到法线缓存，重新计算: {}", path.display());
                }
                Err(e @ CacheError::CountMismatch { .. }) => {
                    tracing::info!("法线缓存与网格不匹配，重新计算: {}", e);
                }
                Err(e) => {
                    tracing::warn!("法线缓存不可用，重新计算: {}", e);
                }
            }
        }

        let groups = self.recompute(&mut mesh.triangle_vertices)?;
        tracing::info!(groups, vertices = mesh.vertex_count(), "法线平滑完成");

        let cache_saved = match cache_file {
            Some(path) => match cache::save(path, &mesh.triangle_vertices) {
                Ok(()) => {
                    tracing::info!("平滑法线已写入缓存: {}", path.display());
                    true
                }
                Err(e) => {
                    tracing::warn!("写入法线缓存失败: {}", e);
                    false
                }
            },
            None => false,
        };

        Ok(SmoothOutcome::Recomputed {
            groups,
            cache_saved,
        })
    }

    /// 重新计算所有记录的法线，返回位置分组数量
    ///
    /// 所有临时数据在修改 `vertices` 之前分配完成。
    pub fn recompute(&self, vertices: &mut [Vertex]) -> std::result::Result<usize, MeshLoadError> {
        let count = vertices.len();

        let mut positions: Vec<[f32; 3]> = Vec::new();
        positions.try_reserve_exact(count).map_err(|_| scratch_oom())?;
        positions.extend(vertices.iter().map(|v| v.position));

        let mut face_normals: Vec<[f32; 3]> = Vec::new();
        face_normals.try_reserve_exact(count).map_err(|_| scratch_oom())?;
        for tri in positions.chunks_exact(3) {
            let n = face_normal(tri[0], tri[1], tri[2]);
            face_normals.extend_from_slice(&[n; 3]);
        }
        face_normals.resize(count, [0.0; 3]);

        let mut hash = SpatialHash::try_new(self.hash_buckets, self.epsilon)?;
        for (index, position) in positions.iter().enumerate() {
            hash.insert(*position, index)?;
        }

        for group in hash.groups() {
            for &index in &group.members {
                let own = face_normals[index];
                let sum = group
                    .members
                    .iter()
                    .map(|&other| face_normals[other])
                    .filter(|&other| dot(own, other) >= self.cos_threshold)
                    .fold([0.0; 3], add);
                vertices[index].normal = normalize(sum);
            }
        }

        Ok(hash.group_count())
    }
}

impl Default for NormalSmoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MeshBakeError;
    use crate::core::math::geometry::length;

    fn push_triangle(mesh: &mut MeshData, p: [[f32; 3]; 3]) {
        let records = [
            Vertex::with_attributes(p[0], [0.0; 3], [0.0, 0.0]),
            Vertex::with_attributes(p[1], [0.0; 3], [1.0, 0.0]),
            Vertex::with_attributes(p[2], [0.0; 3], [0.0, 1.0]),
        ];
        mesh.triangle_vertices.try_extend_from_slice(&records, None).unwrap();
    }

    /// 共享原点的两个三角形，第二个绕 X 轴倾斜 `degrees` 度
    fn hinge(degrees: f32) -> MeshData {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut mesh = MeshData::new();
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -c, -s]]);
        mesh
    }

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-5)
    }

    #[test]
    fn test_flat_quad_normals() {
        let mut mesh = MeshData::new();
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);

        let outcome = NormalSmoother::default().smooth(&mut mesh, None).unwrap();
        assert_eq!(
            outcome,
            SmoothOutcome::Recomputed { groups: 4, cache_saved: false }
        );
        for v in mesh.triangle_vertices.iter() {
            assert!(approx(v.normal, [0.0, 0.0, 1.0]));
        }
    }

    #[test]
    fn test_sharp_edge_not_merged() {
        let mut mesh = hinge(60.0);
        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        assert!(approx(mesh.triangle_vertices[0].normal, [0.0, 0.0, 1.0]));
        let (s, c) = 60f32.to_radians().sin_cos();
        assert!(approx(mesh.triangle_vertices[3].normal, [0.0, -s, c]));
    }

    #[test]
    fn test_soft_edge_merged() {
        let mut mesh = hinge(30.0);
        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        let (s, c) = 30f32.to_radians().sin_cos();
        let expected = normalize([0.0, -s, 1.0 + c]);
        assert!(approx(mesh.triangle_vertices[0].normal, expected));
        assert!(approx(mesh.triangle_vertices[3].normal, expected));

        // 不共享的顶点保持各自的面法线
        assert!(approx(mesh.triangle_vertices[1].normal, [0.0, 0.0, 1.0]));
        assert!(approx(mesh.triangle_vertices[4].normal, [0.0, -s, c]));
    }

    #[test]
    fn test_exactly_threshold_angle_merges() {
        let mut mesh = hinge(45.0);
        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        let (s, c) = 45f32.to_radians().sin_cos();
        let expected = normalize([0.0, -s, 1.0 + c]);
        assert!(approx(mesh.triangle_vertices[0].normal, expected));
        assert!(approx(mesh.triangle_vertices[3].normal, expected));
    }

    #[test]
    fn test_just_over_threshold_splits() {
        let mut mesh = hinge(45.01);
        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        let (s, c) = 45.01f32.to_radians().sin_cos();
        assert!(approx(mesh.triangle_vertices[0].normal, [0.0, 0.0, 1.0]));
        assert!(approx(mesh.triangle_vertices[3].normal, [0.0, -s, c]));
    }

    #[test]
    fn test_integer_chamfer_at_45_degrees_merges() {
        let mut mesh = MeshData::new();
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, -1.0]]);

        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        let half = std::f32::consts::FRAC_1_SQRT_2;
        let expected = normalize([0.0, -half, 1.0 + half]);
        assert!(approx(mesh.triangle_vertices[0].normal, expected));
        assert!(approx(mesh.triangle_vertices[3].normal, expected));
        assert!(approx(mesh.triangle_vertices[4].normal, [0.0, -half, half]));
    }

    #[test]
    fn test_degenerate_triangle_gets_zero_normal() {
        let mut mesh = MeshData::new();
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        push_triangle(&mut mesh, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

        NormalSmoother::default().smooth(&mut mesh, None).unwrap();

        for v in &mesh.triangle_vertices[..3] {
            assert_eq!(v.normal, [0.0, 0.0, 0.0]);
        }
        // 与退化三角形共享原点的记录不受影响
        assert!(approx(mesh.triangle_vertices[3].normal, [0.0, 0.0, 1.0]));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_results_are_unit_or_zero() {
        let mut mesh = hinge(10.0);
        NormalSmoother::default().smooth(&mut mesh, None).unwrap();
        for v in mesh.triangle_vertices.iter() {
            let len = length(v.normal);
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_mesh_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        let mut mesh = MeshData::new();

        let outcome = NormalSmoother::default().smooth(&mut mesh, Some(&path)).unwrap();

        assert_eq!(outcome, SmoothOutcome::Empty);
        assert!(!path.exists());
    }

    #[test]
    fn test_cache_roundtrip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hinge").join("smoothNormals.bins");
        let smoother = NormalSmoother::default();

        let mut first = hinge(30.0);
        let outcome = smoother.smooth(&mut first, Some(&path)).unwrap();
        assert!(matches!(outcome, SmoothOutcome::Recomputed { cache_saved: true, .. }));

        let mut second = hinge(30.0);
        assert_eq!(smoother.smooth(&mut second, Some(&path)).unwrap(), SmoothOutcome::CacheHit);
        assert_eq!(
            bytemuck::cast_slice::<f32, u8>(first.as_floats()),
            bytemuck::cast_slice::<f32, u8>(second.as_floats())
        );
    }

    #[test]
    fn test_cache_is_keyed_by_count_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        let smoother = NormalSmoother::default();

        let mut original = hinge(30.0);
        smoother.smooth(&mut original, Some(&path)).unwrap();

        // 大小相同但几何不同：缓存内容被原样采用
        let mut other = hinge(80.0);
        assert_eq!(smoother.smooth(&mut other, Some(&path)).unwrap(), SmoothOutcome::CacheHit);
        assert_eq!(other.as_floats(), original.as_floats());
    }

    #[test]
    fn test_count_mismatch_recomputes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        let smoother = NormalSmoother::default();

        let mut small = MeshData::new();
        push_triangle(&mut small, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        smoother.smooth(&mut small, Some(&path)).unwrap();

        let mut larger = hinge(30.0);
        let outcome = smoother.smooth(&mut larger, Some(&path)).unwrap();
        assert!(matches!(outcome, SmoothOutcome::Recomputed { cache_saved: true, .. }));

        let cached = cache::load(&path, larger.float_count()).unwrap().unwrap();
        assert_eq!(&cached[..], &larger.triangle_vertices[..]);
    }

    #[test]
    fn test_corrupt_cache_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        std::fs::write(&path, [0xffu8; 3]).unwrap();

        let mut mesh = hinge(30.0);
        let outcome = NormalSmoother::default().smooth(&mut mesh, Some(&path)).unwrap();

        assert!(matches!(outcome, SmoothOutcome::Recomputed { cache_saved: true, .. }));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_unwritable_cache_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // 父路径是一个普通文件，无法创建目录
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("smoothNormals.bins");

        let mut mesh = hinge(30.0);
        let outcome = NormalSmoother::default().smooth(&mut mesh, Some(&path)).unwrap();

        assert!(matches!(outcome, SmoothOutcome::Recomputed { cache_saved: false, .. }));
        assert!(approx(mesh.triangle_vertices[1].normal, [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_single_bucket_matches_default() {
        let mut config = SmoothingConfig::default();
        config.hash_buckets = 1;

        let mut a = hinge(30.0);
        let mut b = hinge(30.0);
        NormalSmoother::new(&config).smooth(&mut a, None).unwrap();
        NormalSmoother::default().smooth(&mut b, None).unwrap();

        assert_eq!(a.as_floats(), b.as_floats());
    }

    #[test]
    fn test_error_type_converts() {
        let err: MeshBakeError = scratch_oom().into();
        assert!(err.to_string().contains("smoothing scratch"));
    }
}
