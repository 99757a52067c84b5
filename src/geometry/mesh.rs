/// 网格数据结构模块
///
/// 定义CPU侧的几何存储：解析得到的属性数组、展开后的三角形顶点缓冲区，
/// 以及加载过程中收集的非致命警告。

use std::fmt;
use std::io::{self, Write};

use super::buffer::{AttributeStream, BufferKind};
use crate::core::error::MeshLoadError;
use super::vertex::{Vertex, FLOATS_PER_VERTEX};
use crate::core::math::{Color, Matrix4};

/// 加载过程中遇到的非致命问题
///
/// 这些问题只会导致对应的行、面或三角形被跳过，解析继续进行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// `v` 行缺少三个数值
    MalformedPosition,
    /// `vt` 行缺少 u 分量
    MalformedTexcoord,
    /// `vn` 行缺少三个数值
    MalformedNormal,
    /// 面的顶点记号少于 3 个，整个面被丢弃
    ShortFace { vertices: usize },
    /// 面的顶点记号超过上限，多余部分被截断
    TruncatedFace { tokens: usize, kept: usize },
    /// 三角形引用了无效的位置索引，整个三角形被丢弃
    ///
    /// `index` 为 0 基索引；记号无法解析时为 `None`。
    InvalidPositionIndex { index: Option<usize> },
}

/// 带行号的加载警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub line: usize,
    pub kind: WarningKind,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::MalformedPosition => write!(f, "malformed vertex at line {}", self.line),
            WarningKind::MalformedTexcoord => write!(f, "malformed texcoord at line {}", self.line),
            WarningKind::MalformedNormal => write!(f, "malformed normal at line {}", self.line),
            WarningKind::ShortFace { vertices } => write!(
                f,
                "face with {} vertices (less than 3) at line {}",
                vertices, self.line
            ),
            WarningKind::TruncatedFace { tokens, kept } => write!(
                f,
                "face with {} vertices truncated to {} at line {}",
                tokens, kept, self.line
            ),
            WarningKind::InvalidPositionIndex { index: Some(index) } => write!(
                f,
                "invalid vertex index {} at line {}, triangle dropped",
                index, self.line
            ),
            WarningKind::InvalidPositionIndex { index: None } => write!(
                f,
                "missing vertex index at line {}, triangle dropped",
                self.line
            ),
        }
    }
}

/// CPU侧网格数据
///
/// 加载器填充属性数组并把每个面展开为 `triangle_vertices` 中的独立记录，
/// 之后法线平滑和切线生成阶段就地修改记录的法线、切线字段。
///
/// # 不变量
///
/// `triangle_vertices.len()` 始终是 3 的倍数（每个三角形 3 条记录），
/// 因此浮点视图的长度始终是 33 的倍数。
///
/// # 示例
///
/// ```rust
/// use mesh_bake::geometry::mesh::MeshData;
///
/// let mesh = MeshData::with_name("Empty");
/// assert_eq!(mesh.vertex_count(), 0);
/// assert_eq!(mesh.float_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MeshData {
    /// 网格名称（通常为文件名）
    pub name: Option<String>,

    /// `v` 指令的位置，0 基
    pub positions: AttributeStream<[f32; 3]>,

    /// `vt` 指令的纹理坐标，存储为 (u, 1 - v)
    pub texcoords: AttributeStream<[f32; 2]>,

    /// `vn` 指令的法线
    pub normals: AttributeStream<[f32; 3]>,

    /// 展开后的非索引三角形列表
    pub triangle_vertices: AttributeStream<Vertex>,

    /// 模型变换（供渲染器使用的占位字段，初始为单位矩阵）
    pub transform: Matrix4,

    /// 基础颜色（占位字段，初始为不透明白色）
    pub color: Color,

    /// 加载过程中收集的非致命警告
    ///
    /// 与属性数组共享元素上限，大量格式错误的行同样会触发 `OutOfMemory`。
    pub warnings: AttributeStream<LoadWarning>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut mesh = Self::new();
        mesh.name = Some(name.into());
        mesh
    }

    /// 创建一个所有缓冲区共享同一元素上限的网格数据
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            name: None,
            positions: AttributeStream::with_limit(BufferKind::Positions, limit),
            texcoords: AttributeStream::with_limit(BufferKind::Texcoords, limit),
            normals: AttributeStream::with_limit(BufferKind::Normals, limit),
            triangle_vertices: AttributeStream::with_limit(BufferKind::TriangleVertices, limit),
            transform: Matrix4::identity(),
            color: Color::WHITE,
            warnings: AttributeStream::with_limit(BufferKind::Warnings, limit),
        }
    }

    /// 展开后的顶点记录数
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.triangle_vertices.len()
    }

    /// 三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_vertices.len() / 3
    }

    /// 顶点缓冲区的浮点数个数（即缓存文件中记录的数量）
    #[inline]
    pub fn float_count(&self) -> usize {
        self.triangle_vertices.len() * FLOATS_PER_VERTEX
    }

    /// 以扁平 `f32` 切片查看顶点缓冲区（步长 11）
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.triangle_vertices[..])
    }

    /// 按三角形遍历顶点记录
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.triangle_vertices.chunks_exact(3)
    }

    /// 记录一个非致命警告，同时输出 warn 日志
    ///
    /// # 错误
    ///
    /// 警告列表增长失败时返回 `OutOfMemory`。
    pub fn record_warning(&mut self, line: usize, kind: WarningKind) -> Result<(), MeshLoadError> {
        let warning = LoadWarning { line, kind };
        tracing::warn!(line, "{}", warning);
        self.warnings.try_push(warning, Some(line))
    }

    /// 重置渲染器占位字段：单位矩阵、不透明白色
    pub fn reset_placeholders(&mut self) {
        self.transform = Matrix4::identity();
        self.color = Color::WHITE;
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 顶点记录数是3的倍数
    /// - 所有记录只包含有限数值
    ///
    /// # 返回
    ///
    /// - `Ok(())`: 数据有效
    /// - `Err(String)`: 数据无效，返回错误描述
    pub fn validate(&self) -> Result<(), String> {
        if self.triangle_vertices.len() % 3 != 0 {
            return Err(format!(
                "顶点记录数必须是3的倍数，当前为: {}",
                self.triangle_vertices.len()
            ));
        }

        for (index, vertex) in self.triangle_vertices.iter().enumerate() {
            if let Some(component) = vertex.as_floats().iter().position(|v| !v.is_finite()) {
                return Err(format!("顶点 {} 的第 {} 个分量不是有限值", index, component));
            }
        }

        Ok(())
    }

    /// 输出所有三角形的顶点数据（调试用）
    pub fn write_triangles<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (t, triangle) in self.triangles().enumerate() {
            writeln!(out, "Triangle {}:", t)?;
            for (label, v) in ['A', 'B', 'C'].iter().zip(triangle) {
                writeln!(
                    out,
                    "  Vertex {}: Pos({:.6}, {:.6}, {:.6}), Normal({:.6}, {:.6}, {:.6}), UV({:.6}, {:.6}), Tangent({:.6}, {:.6}, {:.6})",
                    label,
                    v.position[0], v.position[1], v.position[2],
                    v.normal[0], v.normal[1], v.normal[2],
                    v.texcoord[0], v.texcoord[1],
                    v.tangent[0], v.tangent[1], v.tangent[2],
                )?;
            }
        }
        Ok(())
    }

    /// 清空所有数据
    pub fn clear(&mut self) {
        self.positions.clear();
        self.texcoords.clear();
        self.normals.clear();
        self.triangle_vertices.clear();
        self.warnings.clear();
        self.name = None;
        self.reset_placeholders();
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}
