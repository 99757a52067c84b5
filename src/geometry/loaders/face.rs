/// 面指令处理
///
/// 解析面顶点记号（`v`、`v/vt`、`v//vn`、`v/vt/vn`），并将面扇形三角化后
/// 展开为 `MeshData::triangle_vertices` 中的独立顶点记录。
///
/// # 格式限制
///
/// 只支持正的 1 基绝对索引。OBJ 的负数（相对末尾）索引会被视为缺失。
use crate::core::error::MeshLoadError;
use crate::geometry::mesh::{MeshData, WarningKind};
use crate::geometry::vertex::{Vertex, DEFAULT_NORMAL, DEFAULT_TEXCOORD};

/// 一个面顶点引用（0 基索引）
///
/// 缺失或无法解析的分量为 `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertexRef {
    pub position: Option<usize>,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// 解析一个面顶点记号
///
/// # 示例
///
/// ```rust
/// use mesh_bake::geometry::loaders::face::parse_face_token;
///
/// let r = parse_face_token("5//3");
/// assert_eq!(r.position, Some(4));
/// assert_eq!(r.texcoord, None);
/// assert_eq!(r.normal, Some(2));
/// ```
pub fn parse_face_token(token: &str) -> FaceVertexRef {
    let mut parts = token.splitn(3, '/');

    FaceVertexRef {
        position: parts.next().and_then(parse_index),
        texcoord: parts.next().and_then(parse_index),
        normal: parts.next().and_then(parse_index),
    }
}

/// 1 基文件索引转换为 0 基索引；空、非数字、零或负数返回 `None`
fn parse_index(component: &str) -> Option<usize> {
    let value: i64 = component.trim().parse().ok()?;
    if value >= 1 {
        usize::try_from(value - 1).ok()
    } else {
        None
    }
}

/// 将一个面扇形三角化并追加到顶点缓冲区
///
/// 第 i 个三角形（i = 1 .. n-2）使用引用 (0, i, i+1)。
/// 该方法假设多边形是凸的、平面的，非凸输入会生成结构上合法但视觉上错误的三角形。
///
/// # 返回
///
/// 实际写入的三角形数量。少于 3 个引用的面和位置索引无效的三角形被跳过并记录警告。
///
/// # 错误
///
/// 顶点缓冲区增长失败时返回 `OutOfMemory`，此时整个加载应当中止。
pub fn triangulate_face(
    mesh: &mut MeshData,
    refs: &[FaceVertexRef],
    line: usize,
) -> Result<usize, MeshLoadError> {
    if refs.len() < 3 {
        mesh.record_warning(line, WarningKind::ShortFace { vertices: refs.len() })?;
        return Ok(0);
    }

    let mut emitted = 0;
    for i in 1..refs.len() - 1 {
        if emit_triangle(mesh, [refs[0], refs[i], refs[i + 1]], line)? {
            emitted += 1;
        }
    }

    if refs.len() > 3 && line % 1000 == 0 {
        tracing::debug!(line, vertices = refs.len(), "已三角化 n 边形");
    }

    Ok(emitted)
}

/// 解析并写入一个三角形
///
/// 任一顶点的位置索引无效时整个三角形被丢弃，保证记录数始终是 3 的倍数。
fn emit_triangle(
    mesh: &mut MeshData,
    refs: [FaceVertexRef; 3],
    line: usize,
) -> Result<bool, MeshLoadError> {
    let mut records = [Vertex::default(); 3];

    for (record, r) in records.iter_mut().zip(refs.iter()) {
        let resolved = r.position.and_then(|i| mesh.positions.get(i).copied());
        let position = match resolved {
            Some(p) => p,
            None => {
                mesh.record_warning(line, WarningKind::InvalidPositionIndex { index: r.position })?;
                return Ok(false);
            }
        };

        let normal = r
            .normal
            .and_then(|i| mesh.normals.get(i))
            .copied()
            .unwrap_or(DEFAULT_NORMAL);
        let texcoord = r
            .texcoord
            .and_then(|i| mesh.texcoords.get(i))
            .copied()
            .unwrap_or(DEFAULT_TEXCOORD);

        *record = Vertex::with_attributes(position, normal, texcoord);
    }

    mesh.triangle_vertices.try_extend_from_slice(&records, Some(line))?;
    Ok(true)
}
