/// OBJ 烘焙示例
///
/// 演示如何用 mesh_bake 加载 OBJ 文件、平滑法线、生成切线并缓存结果。
///
/// 运行方式：
/// ```
/// cargo run --example bake_obj [path/to/model.obj]
/// ```

use mesh_bake::core::Config;
use mesh_bake::geometry::{MeshBaker, SmoothOutcome};
use std::path::PathBuf;

fn main() {
    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== mesh_bake OBJ 烘焙示例 ===\n");

    let obj_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/cube.obj"));

    let config = Config::default();
    let cache_folder = config.smoothing.object_cache_dir(&obj_path);
    let baker = MeshBaker::new(&config);

    println!("正在烘焙: {}", obj_path.display());
    println!("缓存目录: {}", cache_folder.display());

    match baker.bake(&obj_path, Some(&cache_folder)) {
        Ok(baked) => {
            let mesh = &baked.mesh;
            println!("\n✓ 烘焙成功！\n");

            println!("网格信息:");
            println!("  名称: {}", mesh.name.as_deref().unwrap_or("未命名"));
            println!("  顶点记录数: {}", mesh.vertex_count());
            println!("  三角形数: {}", mesh.triangle_count());
            println!("  浮点数: {}", mesh.float_count());
            println!("  警告数: {}", mesh.warnings.len());

            match baked.smoothing {
                SmoothOutcome::Empty => println!("  法线: 网格为空"),
                SmoothOutcome::CacheHit => println!("  法线: 来自缓存"),
                SmoothOutcome::Recomputed { groups, cache_saved } => {
                    println!("  法线: 重新计算（{} 个位置组，已缓存: {}）", groups, cache_saved)
                }
            }

            // 显示前几个顶点的数据
            println!("\n顶点数据（前 {} 个）:", mesh.vertex_count().min(3));
            for (i, vertex) in mesh.triangle_vertices.iter().take(3).enumerate() {
                println!("  顶点 {}:", i);
                println!("    位置: [{:.3}, {:.3}, {:.3}]",
                    vertex.position[0], vertex.position[1], vertex.position[2]);
                println!("    法线: [{:.3}, {:.3}, {:.3}]",
                    vertex.normal[0], vertex.normal[1], vertex.normal[2]);
                println!("    UV: [{:.3}, {:.3}]",
                    vertex.texcoord[0], vertex.texcoord[1]);
                println!("    切线: [{:.3}, {:.3}, {:.3}]",
                    vertex.tangent[0], vertex.tangent[1], vertex.tangent[2]);
            }

            for warning in mesh.warnings.iter() {
                println!("  ⚠ {}", warning);
            }

            // 验证数据
            match mesh.validate() {
                Ok(()) => println!("\n✓ 数据验证通过"),
                Err(e) => println!("\n✗ 数据验证失败: {}", e),
            }
        }
        Err(e) => {
            eprintln!("\n✗ 烘焙失败: {}", e);
            std::process::exit(1);
        }
    }
}
