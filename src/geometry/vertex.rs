/// 展开顶点记录
///
/// 三角形顶点缓冲区中的一条记录有 11 个 `f32`，依次为位置、法线、纹理坐标、切线。
/// 同一布局既是 GPU 顶点格式，也是法线缓存文件中的数据格式。

use bytemuck::{Pod, Zeroable};

/// 每条顶点记录的浮点数个数
pub const FLOATS_PER_VERTEX: usize = 11;

/// 缺失纹理坐标时使用的默认值
pub const DEFAULT_TEXCOORD: [f32; 2] = [1.0, 1.0];

/// 缺失法线时使用的默认值
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 0.0];

/// 一条顶点记录
///
/// `#[repr(C)]` 且没有填充，可以通过 `bytemuck` 直接视为 `[f32; 11]`。
///
/// | 浮点偏移 | 字段 |
/// |---------|------|
/// | 0..3 | position |
/// | 3..6 | normal |
/// | 6..8 | texcoord |
/// | 8..11 | tangent |
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 从文件原样复制
    pub position: [f32; 3],

    /// 加载时来自 `vn`（缺失为零向量），平滑阶段会被覆盖
    pub normal: [f32; 3],

    /// (u, 1 - v)
    pub texcoord: [f32; 2],

    /// 加载时为零，由切线生成阶段写入，不做归一化
    pub tangent: [f32; 3],
}

impl Vertex {
    #[inline]
    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2], tangent: [f32; 3]) -> Self {
        Self { position, normal, texcoord, tangent }
    }

    /// 三角化时使用：切线留空，等待后处理
    #[inline]
    pub fn with_attributes(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self::new(position, normal, texcoord, [0.0; 3])
    }

    /// 以 11 个浮点数查看
    ///
    /// ```rust
    /// use mesh_bake::geometry::vertex::Vertex;
    ///
    /// let v = Vertex::with_attributes([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
    /// assert_eq!(v.as_floats()[..3], [1.0, 2.0, 3.0]);
    /// assert_eq!(v.as_floats()[6..8], [0.5, 0.5]);
    /// ```
    #[inline]
    pub fn as_floats(&self) -> &[f32; FLOATS_PER_VERTEX] {
        bytemuck::cast_ref(self)
    }
}
