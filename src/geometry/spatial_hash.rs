/// 近似位置分组的空间哈希
///
/// 位置的每个分量除以 epsilon 后截断为整数，三者组合哈希到固定数量的桶中。
/// 桶只是候选范围：只有与某个组代表位置在三个轴上都相差小于 epsilon 的点
/// 才会加入该组，否则在同一个桶中新建一组。
///
/// 整张表（所有桶和组）由一次平滑调用独占，调用结束时整体释放。

use crate::core::error::MeshLoadError;
use crate::geometry::buffer::BufferKind;

/// 同一位置（在 epsilon 内）的展开顶点集合
#[derive(Debug, Clone)]
pub struct VertexGroup {
    /// 创建该组时的第一个位置
    pub representative: [f32; 3],
    /// 组内顶点记录的下标
    pub members: Vec<usize>,
}

/// 分桶的顶点分组表
#[derive(Debug)]
pub struct SpatialHash {
    buckets: Vec<Vec<VertexGroup>>,
    epsilon: f32,
}

fn scratch_oom() -> MeshLoadError {
    MeshLoadError::OutOfMemory {
        buffer: BufferKind::SmoothingScratch,
        line: None,
    }
}

impl SpatialHash {
    /// 创建一个有 `bucket_count` 个桶的空表
    ///
    /// `bucket_count` 为 0 时按 1 处理。
    pub fn try_new(bucket_count: usize, epsilon: f32) -> Result<Self, MeshLoadError> {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count).map_err(|_| scratch_oom())?;
        buckets.resize_with(bucket_count, Vec::new);

        Ok(Self { buckets, epsilon })
    }

    /// 位置所在的桶
    pub fn bucket_index(&self, position: [f32; 3]) -> usize {
        let ix = (position[0] / self.epsilon) as i32;
        let iy = (position[1] / self.epsilon) as i32;
        let iz = (position[2] / self.epsilon) as i32;

        let hash = ix.wrapping_mul(73_856_093)
            ^ iy.wrapping_mul(19_349_663)
            ^ iz.wrapping_mul(83_492_791);

        (hash as u32 as usize) % self.buckets.len()
    }

    /// 三个轴上都相差小于 epsilon
    #[inline]
    fn near(&self, a: [f32; 3], b: [f32; 3]) -> bool {
        (a[0] - b[0]).abs() < self.epsilon
            && (a[1] - b[1]).abs() < self.epsilon
            && (a[2] - b[2]).abs() < self.epsilon
    }

    /// 把一个顶点记录加入对应的组
    ///
    /// 同一个桶中优先匹配最近创建的组。
    pub fn insert(&mut self, position: [f32; 3], index: usize) -> Result<(), MeshLoadError> {
        let bucket = self.bucket_index(position);
        let found = self.buckets[bucket]
            .iter()
            .rposition(|group| self.near(group.representative, position));

        if let Some(slot) = found {
            let group = &mut self.buckets[bucket][slot];
            group.members.try_reserve(1).map_err(|_| scratch_oom())?;
            group.members.push(index);
            return Ok(());
        }

        let mut members = Vec::new();
        members.try_reserve(4).map_err(|_| scratch_oom())?;
        members.push(index);

        let chain = &mut self.buckets[bucket];
        chain.try_reserve(1).map_err(|_| scratch_oom())?;
        chain.push(VertexGroup {
            representative: position,
            members,
        });
        Ok(())
    }

    /// 遍历所有组
    pub fn groups(&self) -> impl Iterator<Item = &VertexGroup> {
        self.buckets.iter().flatten()
    }

    pub fn group_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
