/// OBJ 文件加载器
///
/// 逐行流式解析 Wavefront OBJ 的 `v`、`vt`、`vn`、`f` 指令。
/// 面在读取时即被扇形三角化并展开为非索引的顶点记录，其余指令被忽略。
use super::face::{parse_face_token, triangulate_face};
use super::MeshLoader;
use crate::core::config::LoaderConfig;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::{MeshData, WarningKind};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// OBJ 格式加载器
///
/// 实现 `MeshLoader` trait，提供 OBJ 文件的加载功能。
///
/// # 特性
///
/// - 逐行读取，行缓冲区按需增长
/// - UV 坐标翻转（V轴：1.0 - v）
/// - 面顶点记号数量受 `max_face_vertices` 限制
/// - 格式错误的行只产生警告，不中止加载
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_bake::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let mesh = ObjLoader::default().load_from_file(Path::new("model.obj"))?;
/// println!("加载了 {} 个顶点记录", mesh.vertex_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjLoader {
    config: LoaderConfig,
}

impl ObjLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// 从任意带缓冲的读取器解析网格
    ///
    /// # 错误
    ///
    /// - 读取过程中发生 IO 错误：`ReadFailed`
    /// - 任一缓冲区增长失败：`OutOfMemory`
    pub fn load_from_reader<R: BufRead>(&self, mut reader: R, name: Option<String>) -> Result<MeshData> {
        let mut mesh = MeshData::with_limit(self.config.buffer_element_limit);
        mesh.name = name;

        let mut buf = Vec::new();
        let mut line_number = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| MeshLoadError::ReadFailed {
                    line: line_number + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            self.parse_line(&mut mesh, &line, line_number)?;
        }

        mesh.reset_placeholders();

        tracing::info!(
            "成功加载 OBJ 数据: {} 个位置, {} 个三角形, {} 条警告",
            mesh.positions.len(),
            mesh.triangle_count(),
            mesh.warnings.len()
        );

        Ok(mesh)
    }

    /// 按首个记号分发一行
    fn parse_line(&self, mesh: &mut MeshData, line: &str, line_number: usize) -> std::result::Result<(), MeshLoadError> {
        let mut fields = line.split_whitespace();

        match fields.next() {
            Some("v") => match parse_floats::<3>(&mut fields) {
                Some(position) => mesh.positions.try_push(position, Some(line_number))?,
                None => mesh.record_warning(line_number, WarningKind::MalformedPosition)?,
            },
            Some("vt") => match fields.next().and_then(|f| f.parse::<f32>().ok()) {
                Some(u) => {
                    let v = fields.next().and_then(|f| f.parse::<f32>().ok()).unwrap_or(0.0);
                    mesh.texcoords.try_push([u, 1.0 - v], Some(line_number))?;
                }
                None => mesh.record_warning(line_number, WarningKind::MalformedTexcoord)?,
            },
            Some("vn") => match parse_floats::<3>(&mut fields) {
                Some(normal) => mesh.normals.try_push(normal, Some(line_number))?,
                None => mesh.record_warning(line_number, WarningKind::MalformedNormal)?,
            },
            Some("f") => {
                let max = self.config.max_face_vertices;
                let mut refs = Vec::with_capacity(max.min(8));
                let mut tokens = 0usize;

                for token in fields {
                    tokens += 1;
                    if refs.len() < max {
                        refs.push(parse_face_token(token));
                    }
                }

                if tokens > max {
                    mesh.record_warning(line_number, WarningKind::TruncatedFace { tokens, kept: max })?;
                }

                triangulate_face(mesh, &refs, line_number)?;
            }
            _ => {}
        }

        Ok(())
    }
}

/// 解析接下来的 N 个浮点数，任一缺失或格式错误返回 `None`
///
/// 多余的字段（例如 `v` 的 w 分量）被忽略。
fn parse_floats<'a, const N: usize>(fields: &mut impl Iterator<Item = &'a str>) -> Option<[f32; N]> {
    let mut values = [0.0f32; N];
    for value in values.iter_mut() {
        *value = fields.next()?.parse().ok()?;
    }
    Some(values)
}

impl MeshLoader for ObjLoader {
    fn load_from_file(&self, path: &Path) -> Result<MeshData> {
        if path.as_os_str().is_empty() {
            return Err(MeshLoadError::InvalidArgument("空的网格文件路径".to_string()).into());
        }

        // 相对路径相对于当前工作目录解析
        match std::env::current_dir() {
            Ok(cwd) => tracing::debug!(cwd = %cwd.display(), path = %path.display(), "打开 OBJ 文件"),
            Err(e) => tracing::debug!(error = %e, "无法获取当前工作目录"),
        }

        let file = File::open(path).map_err(|source| MeshLoadError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed")
            .to_string();

        self.load_from_reader(BufReader::new(file), Some(name))
    }

    fn load_from_memory(&self, data: &[u8]) -> Result<MeshData> {
        self.load_from_reader(data, None)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}
