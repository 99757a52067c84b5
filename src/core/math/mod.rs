//! 数学工具模块
//!
//! 网格的变换占位使用 `nalgebra` 矩阵；逐顶点的向量运算使用原始数组
//! （见 `geometry` 子模块），因为顶点结构需要保持 `Pod` 布局。

pub use nalgebra::Matrix4 as Mat4;

/// 4x4 单精度矩阵
pub type Matrix4 = Mat4<f32>;

/// RGBA 颜色，分量范围 0.0-1.0
///
/// 网格的基础颜色目前只作为渲染器的占位字段，加载后总是不透明白色。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// 数值阈值
pub mod constants {
    /// 归一化时视为零长度的阈值
    pub const LENGTH_EPSILON: f32 = 1e-6;

    /// UV 行列式低于该值时不做除法
    pub const UV_DETERMINANT_EPSILON: f32 = 1e-8;
}

pub mod geometry;
