//! 几何数学工具模块
//!
//! 提供网格后处理使用的数组向量运算：
//! - 叉乘、点乘、归一化
//! - 三角形面法线
//! - 由位置和 UV 导数求三角形切线
//!
//! 所有函数都对 `[f32; 3]` 操作，与 `Vertex` 的字段布局一致。

use super::constants::{LENGTH_EPSILON, UV_DETERMINANT_EPSILON};

/// 计算两个3D向量的叉乘
///
/// 返回垂直于两个输入向量的向量，长度等于两向量张成的平行四边形面积。
#[inline]
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 计算两个3D向量的点乘
#[inline]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// 归一化3D向量
///
/// 长度不超过 `LENGTH_EPSILON` 时返回零向量，而不是产生 NaN。
#[inline]
pub fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = length(v);

    if length <= LENGTH_EPSILON {
        [0.0, 0.0, 0.0]
    } else {
        [v[0] / length, v[1] / length, v[2] / length]
    }
}

/// 三角形的单位面法线
///
/// `normalize(cross(p1 - p0, p2 - p0))`，退化三角形（零面积）返回零向量。
pub fn face_normal(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3]) -> [f32; 3] {
    normalize(cross(sub(p1, p0), sub(p2, p0)))
}

/// 由三角形的位置和 UV 计算切线
///
/// # 算法
///
/// - 位置导数: e1 = p1 - p0, e2 = p2 - p0
/// - UV 导数: (s1, t1) = uv1 - uv0, (s2, t2) = uv2 - uv0
/// - 行列式: r = s1 * t2 - s2 * t1
/// - 切线: (t2 * e1 - t1 * e2) / r
///
/// |r| 小于 `UV_DETERMINANT_EPSILON` 时缩放系数取 1.0。
/// 结果不做归一化。
pub fn triangle_tangent(positions: [[f32; 3]; 3], texcoords: [[f32; 2]; 3]) -> [f32; 3] {
    let e1 = sub(positions[1], positions[0]);
    let e2 = sub(positions[2], positions[0]);

    let s1 = texcoords[1][0] - texcoords[0][0];
    let t1 = texcoords[1][1] - texcoords[0][1];
    let s2 = texcoords[2][0] - texcoords[0][0];
    let t2 = texcoords[2][1] - texcoords[0][1];

    let r = s1 * t2 - s2 * t1;
    let scale = if r.abs() < UV_DETERMINANT_EPSILON { 1.0 } else { 1.0 / r };

    [
        (t2 * e1[0] - t1 * e2[0]) * scale,
        (t2 * e1[1] - t1 * e2[1]) * scale,
        (t2 * e1[2] - t1 * e2[2]) * scale,
    ]
}
