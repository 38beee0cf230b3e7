//! Skeletonize a cylinder primitive end to end:
//! - run the edge-collapse pipeline with progress reporting
//! - estimate node radii from the mesh surface
//! - print the resulting SWC table

use curveskel_algorithms::{
    add_radius, skeletonize, Output, Progress, RadiusMethod, SkeletonizeParams,
};
use curveskel_core::primitives;

fn main() -> anyhow::Result<()> {
    let mesh = primitives::cylinder(16, 12, 1.0, 10.0)?;
    println!(
        "cylinder mesh: {} vertices, {} edges, {} faces",
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.face_count()
    );

    let params = SkeletonizeParams {
        output: Output::Both,
        progress: Progress::new(|current, total, message| {
            if current == total || current % 50 == 0 {
                println!("[{current}/{total}] {message}");
            }
        }),
        ..SkeletonizeParams::new()
    };

    let result = skeletonize(&mesh, &params)?;
    let skeleton = result.graph().expect("requested both outputs");
    println!(
        "skeleton: {} nodes, {} edges, {} root(s)",
        skeleton.node_count(),
        skeleton.edge_count(),
        skeleton.roots().len()
    );

    let mut table = result.table().expect("requested both outputs").clone();
    add_radius(&mut table, &mesh, RadiusMethod::default())?;

    println!("node_id  parent_id         x         y         z    radius");
    for row in table.iter() {
        println!(
            "{:>7}  {:>9}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}",
            row.node_id, row.parent_id, row.x, row.y, row.z, row.radius
        );
    }

    Ok(())
}
