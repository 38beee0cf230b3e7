//! End-to-end tests for the skeletonization pipeline

use curveskel_algorithms::{
    add_radius, make_swc, mst_over_mesh, skeletonize, GeodesicLimit, Output, RadiusMethod,
    SkeletonizeParams, SwcOptions,
};
use curveskel_core::{primitives, SwcTable, ROOT_PARENT};
use std::collections::HashMap;

fn params(output: Output) -> SkeletonizeParams {
    SkeletonizeParams {
        shape_weight: 1.0,
        sample_weight: 0.1,
        output,
        ..SkeletonizeParams::new()
    }
}

/// Follow parent pointers from every row and check each chain reaches a
/// root within `max_steps`.
fn assert_chains_terminate(table: &SwcTable, max_steps: usize) {
    let parent_of: HashMap<i64, i64> = table.iter().map(|n| (n.node_id, n.parent_id)).collect();
    for row in table.iter() {
        let mut current = row.node_id;
        let mut steps = 0;
        while let Some(&parent) = parent_of.get(&current) {
            if parent == ROOT_PARENT {
                break;
            }
            assert!(
                parent_of.contains_key(&parent),
                "dangling parent {parent} for node {current}"
            );
            current = parent;
            steps += 1;
            assert!(
                steps <= max_steps,
                "parent chain from {} exceeded {max_steps} steps",
                row.node_id
            );
        }
    }
}

#[test]
fn tetrahedron_collapses_to_tiny_skeleton() {
    let mesh = primitives::tetrahedron().unwrap();
    let output = skeletonize(&mesh, &params(Output::Table)).unwrap();
    let table = output.table().unwrap();

    assert!(table.len() <= 4, "expected <= 4 rows, got {}", table.len());
    assert_eq!(table.roots().count(), 1, "expected exactly one root");
    assert_chains_terminate(table, 4);
}

#[test]
fn cylinder_table_is_a_valid_forest() {
    let mesh = primitives::cylinder(12, 8, 1.0, 10.0).unwrap();
    let output = skeletonize(&mesh, &params(Output::Table)).unwrap();
    let table = output.table().unwrap();

    assert!(!table.is_empty());
    assert!(table.roots().count() >= 1);
    // No node id repeats (single parent), chains end at a root within V.
    let mut ids: Vec<i64> = table.iter().map(|n| n.node_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), table.len());
    assert_chains_terminate(table, mesh.vertex_count());
}

#[test]
fn table_round_trips_the_oriented_edge_set() {
    let mesh = primitives::cylinder(10, 6, 1.0, 8.0).unwrap();
    let output = skeletonize(&mesh, &params(Output::Graph)).unwrap();
    let skeleton = output.graph().unwrap();

    let table = make_swc(
        &skeleton.edge_list(),
        mesh.vertices(),
        &SwcOptions {
            reindex: false,
            validate: true,
        },
    )
    .unwrap();

    let mut rebuilt: Vec<(i64, i64)> = table
        .iter()
        .filter(|n| n.parent_id != ROOT_PARENT)
        .map(|n| (n.node_id, n.parent_id))
        .collect();
    rebuilt.sort_unstable();
    let mut expected = skeleton.edge_list();
    expected.sort_unstable();
    assert_eq!(rebuilt, expected);
}

#[test]
fn reindexed_table_orders_parents_first() {
    let mesh = primitives::cylinder(10, 6, 1.0, 8.0).unwrap();
    let output = skeletonize(&mesh, &params(Output::Graph)).unwrap();
    let table = make_swc(
        &output.graph().unwrap().edge_list(),
        mesh.vertices(),
        &SwcOptions {
            reindex: true,
            validate: true,
        },
    )
    .unwrap();

    // Ids are the dense row range and every parent precedes its children.
    for (ri, row) in table.iter().enumerate() {
        assert_eq!(row.node_id, ri as i64);
        if row.parent_id != ROOT_PARENT {
            assert!(
                row.parent_id < row.node_id,
                "parent {} does not precede child {}",
                row.parent_id,
                row.node_id
            );
        }
    }
}

#[test]
fn duplicate_parent_rows_fail_only_when_validated() {
    let mesh = primitives::tetrahedron().unwrap();
    let edges = [(1, 0), (1, 2), (2, 0)];

    assert!(make_swc(&edges, mesh.vertices(), &SwcOptions::default()).is_err());
    assert!(make_swc(
        &edges,
        mesh.vertices(),
        &SwcOptions {
            reindex: false,
            validate: false,
        },
    )
    .is_ok());
}

#[test]
fn tight_geodesic_limit_still_yields_valid_trees() {
    let mesh = primitives::cylinder(8, 6, 1.0, 12.0).unwrap();
    // Retain vertices on the two end rings; a limit of 2 cannot bridge
    // the height-12 gap, so the reconnection must come back as a forest.
    let keep = [0, 2, 6 * 8, 6 * 8 + 3];
    let pairs = mst_over_mesh(&mesh, &keep, GeodesicLimit::Finite(2.0), None).unwrap();

    let roots = pairs.iter().filter(|(_, p)| *p == ROOT_PARENT).count();
    assert!(roots > 1, "expected a disconnected forest, got {roots} root");

    // The serializer accepts the forest: one row per node, one parent each.
    let table = make_swc(&pairs, mesh.vertices(), &SwcOptions::default()).unwrap();
    assert_eq!(table.len(), keep.len());
    assert_eq!(table.roots().count(), roots);
    assert_chains_terminate(&table, keep.len());
}

#[test]
fn radius_estimation_replaces_placeholder() {
    let mesh = primitives::cylinder(12, 8, 1.0, 10.0).unwrap();
    let output = skeletonize(&mesh, &params(Output::Table)).unwrap();
    let mut table = output.table().unwrap().clone();

    add_radius(&mut table, &mesh, RadiusMethod::default()).unwrap();
    for row in table.iter() {
        assert!(row.radius > 0.0, "node {} kept no radius", row.node_id);
    }

    // The unimplemented method refuses instead of silently defaulting.
    assert!(add_radius(&mut table, &mesh, RadiusMethod::Ray).is_err());
}
