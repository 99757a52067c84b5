/// 平滑法线缓存文件
///
/// 文件布局（本机字节序，不可跨平台移植）：
///
/// | 偏移 | 内容 |
/// |------|------|
/// | 0 | `usize` 浮点数个数 N |
/// | size_of::<usize>() | N 个 `f32`，即完整的顶点缓冲区 |
///
/// 缓存只以 N 作为键：N 与当前网格一致即视为命中，不校验内容和来源文件。
/// 因此两个网格只要共用同一个缓存目录且浮点数个数相同，就会读到对方的结果；
/// 批量烘焙时目录由 `SmoothingConfig::object_cache_dir` 按路径区分。

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::mem::size_of;
use std::path::Path;

use crate::core::error::CacheError;
use crate::geometry::vertex::{Vertex, FLOATS_PER_VERTEX};

/// 读取缓存
///
/// # 返回
///
/// - `Ok(Some(vertices))`: 命中，长度为 `expected_floats / 11`
/// - `Ok(None)`: 缓存文件不存在
/// - `Err(CountMismatch)`: 浮点数个数与当前网格不一致
/// - `Err(Open | Read)`: 文件损坏、被截断或无法读取
pub fn load(path: &Path, expected_floats: usize) -> Result<Option<Vec<Vertex>>, CacheError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|source| CacheError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let read_err = |source: io::Error| CacheError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut header = [0u8; size_of::<usize>()];
    reader.read_exact(&mut header).map_err(read_err)?;
    let found = usize::from_ne_bytes(header);

    if found != expected_floats || found % FLOATS_PER_VERTEX != 0 {
        return Err(CacheError::CountMismatch {
            expected: expected_floats,
            found,
        });
    }

    let count = found / FLOATS_PER_VERTEX;
    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(count)
        .map_err(|_| read_err(io::ErrorKind::OutOfMemory.into()))?;
    vertices.resize(count, Vertex::default());

    reader
        .read_exact(bytemuck::cast_slice_mut(&mut vertices[..]))
        .map_err(read_err)?;

    Ok(Some(vertices))
}

/// 写入缓存，必要时创建父目录
///
/// 已存在的文件会被覆盖。
pub fn save(path: &Path, vertices: &[Vertex]) -> Result<(), CacheError> {
    let write_err = |source: io::Error| CacheError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::info!("创建缓存目录: {}", parent.display());
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let file = File::create(path).map_err(|source| CacheError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let count = vertices.len() * FLOATS_PER_VERTEX;
    writer.write_all(&count.to_ne_bytes()).map_err(write_err)?;
    writer
        .write_all(bytemuck::cast_slice(vertices))
        .map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Vertex> {
        (0..6)
            .map(|i| {
                let f = i as f32;
                Vertex::new([f, f + 0.5, -f], [0.0, 1.0, 0.0], [f * 0.1, 0.2], [1.0, 0.0, f])
            })
            .collect()
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("absent.bins"), 66).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_creates_parent_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube").join("smoothNormals.bins");
        let vertices = sample();

        save(&path, &vertices).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), size_of::<usize>() + 66 * size_of::<f32>());

        let mut header = [0u8; size_of::<usize>()];
        header.copy_from_slice(&bytes[..size_of::<usize>()]);
        assert_eq!(usize::from_ne_bytes(header), 66);

        let loaded = load(&path, 66).unwrap().unwrap();
        assert_eq!(loaded, vertices);
    }

    #[test]
    fn test_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        save(&path, &sample()).unwrap();

        match load(&path, 33) {
            Err(CacheError::CountMismatch { expected, found }) => {
                assert_eq!(expected, 33);
                assert_eq!(found, 66);
            }
            other => panic!("expected CountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_payload_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        save(&path, &sample()).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();

        assert!(matches!(load(&path, 66), Err(CacheError::Read { .. })));
    }

    #[test]
    fn test_truncated_header_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoothNormals.bins");
        fs::write(&path, [1u8, 2]).unwrap();

        assert!(matches!(load(&path, 66), Err(CacheError::Read { .. })));
    }
}
