/// 可增长的属性缓冲区
///
/// 网格的每一路属性流（位置、纹理坐标、法线、三角形顶点）都保存在一个
/// `AttributeStream` 中。所有增长操作都通过 `try_reserve` 完成并返回
/// `Result`，分配失败会以 `MeshLoadError::OutOfMemory` 报告，而不是中止进程。
///
/// 可选的元素上限 `limit` 作为内存预算：超出上限与真实的分配失败同样处理。

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::core::error::MeshLoadError;

/// 缓冲区标识，用于错误报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// 顶点位置 (`v`)
    Positions,
    /// 纹理坐标 (`vt`)
    Texcoords,
    /// 顶点法线 (`vn`)
    Normals,
    /// 展开后的三角形顶点记录
    TriangleVertices,
    /// 法线平滑的临时缓冲区（位置、面法线、空间哈希）
    SmoothingScratch,
    /// 加载警告列表
    Warnings,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKind::Positions => "positions",
            BufferKind::Texcoords => "texcoords",
            BufferKind::Normals => "normals",
            BufferKind::TriangleVertices => "triangle vertices",
            BufferKind::SmoothingScratch => "smoothing scratch buffers",
            BufferKind::Warnings => "load warnings",
        };
        f.write_str(name)
    }
}

/// 带增长检查的属性数组
#[derive(Debug, Clone)]
pub struct AttributeStream<T> {
    kind: BufferKind,
    items: Vec<T>,
    limit: Option<usize>,
}

impl<T> AttributeStream<T> {
    /// 创建一个空的属性流
    pub fn new(kind: BufferKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            limit: None,
        }
    }

    /// 创建一个带元素上限的属性流
    pub fn with_limit(kind: BufferKind, limit: Option<usize>) -> Self {
        Self {
            kind,
            items: Vec::new(),
            limit,
        }
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /// 为 `additional` 个新元素预留空间
    ///
    /// # 错误
    ///
    /// 超出元素上限或分配失败时返回 `OutOfMemory`，缓冲区内容不变。
    pub fn try_reserve(&mut self, additional: usize, line: Option<usize>) -> Result<(), MeshLoadError> {
        let kind = self.kind;
        let oom = || MeshLoadError::OutOfMemory { buffer: kind, line };

        if let Some(limit) = self.limit {
            match self.items.len().checked_add(additional) {
                Some(total) if total <= limit => {}
                _ => return Err(oom()),
            }
        }

        self.items.try_reserve(additional).map_err(|_| oom())
    }

    /// 追加一个元素
    pub fn try_push(&mut self, value: T, line: Option<usize>) -> Result<(), MeshLoadError> {
        self.try_reserve(1, line)?;
        self.items.push(value);
        Ok(())
    }

    /// 追加一组元素，要么全部追加，要么一个都不追加
    pub fn try_extend_from_slice(&mut self, values: &[T], line: Option<usize>) -> Result<(), MeshLoadError>
    where
        T: Clone,
    {
        self.try_reserve(values.len(), line)?;
        self.items.extend_from_slice(values);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Deref for AttributeStream<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for AttributeStream<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
