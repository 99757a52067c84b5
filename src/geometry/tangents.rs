/// 切线生成
///
/// 对每个三角形由位置差和纹理坐标差求出一条切线，写入该三角形的全部三条记录。
/// 切线不归一化，也不做 Gram-Schmidt 正交化，不生成副切线符号。

use crate::core::math::geometry::triangle_tangent;
use crate::geometry::mesh::MeshData;
use crate::geometry::vertex::Vertex;

/// 为顶点缓冲区中的每个三角形写入切线，返回处理的三角形数量
///
/// 末尾不足 3 条的记录保持不变。
pub fn generate_tangents(vertices: &mut [Vertex]) -> usize {
    let mut triangles = 0;

    for tri in vertices.chunks_exact_mut(3) {
        let tangent = triangle_tangent(
            [tri[0].position, tri[1].position, tri[2].position],
            [tri[0].texcoord, tri[1].texcoord, tri[2].texcoord],
        );
        for v in tri.iter_mut() {
            v.tangent = tangent;
        }
        triangles += 1;
    }

    triangles
}

/// 为网格生成切线
pub fn compute_tangents(mesh: &mut MeshData) -> usize {
    let triangles = generate_tangents(&mut mesh.triangle_vertices);
    tracing::debug!(triangles, "切线生成完成");
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(uv: [[f32; 2]; 3]) -> [Vertex; 3] {
        [
            Vertex::with_attributes([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], uv[0]),
            Vertex::with_attributes([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], uv[1]),
            Vertex::with_attributes([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], uv[2]),
        ]
    }

    #[test]
    fn test_tangent_follows_u_axis() {
        let mut vertices = triangle([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(generate_tangents(&mut vertices), 1);

        for v in &vertices {
            assert_eq!(v.tangent, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_tangent_is_not_normalized() {
        // u 方向缩小一半，行列式为 0.5，切线长度为 2
        let mut vertices = triangle([[0.0, 0.0], [0.5, 0.0], [0.0, 1.0]]);
        generate_tangents(&mut vertices);

        assert!((vertices[0].tangent[0] - 2.0).abs() < 1e-6);
        assert_eq!(vertices[0].tangent, vertices[2].tangent);
    }

    #[test]
    fn test_degenerate_uv_uses_unit_scale() {
        // 所有纹理坐标相同（例如缺失 vt 时的默认值）
        let mut vertices = triangle([[1.0, 1.0]; 3]);
        generate_tangents(&mut vertices);

        for v in &vertices {
            assert_eq!(v.tangent, [0.0, 0.0, 0.0]);
            assert!(v.tangent.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_each_triangle_independent() {
        let mut mesh = MeshData::new();
        mesh.triangle_vertices
            .try_extend_from_slice(&triangle([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]), None)
            .unwrap();
        mesh.triangle_vertices
            .try_extend_from_slice(&triangle([[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]]), None)
            .unwrap();

        assert_eq!(compute_tangents(&mut mesh), 2);
        assert_eq!(mesh.triangle_vertices[0].tangent, [1.0, 0.0, 0.0]);
        // u 与 v 互换后切线沿 Y
        assert_eq!(mesh.triangle_vertices[3].tangent, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut vertices = triangle([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let before = vertices;
        generate_tangents(&mut vertices);

        for (a, b) in vertices.iter().zip(before.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.texcoord, b.texcoord);
        }
    }
}
