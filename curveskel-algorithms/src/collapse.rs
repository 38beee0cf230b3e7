//! Greedy edge-collapse skeletonization
//!
//! Contracts the mesh edge graph by repeatedly collapsing the cheapest
//! remaining edge until no face survives. Edges are never removed from
//! their arrays: a collapse relabels endpoints in place and flips a state
//! flag, so the cost array stays aligned to edge identity and only the
//! edges touching the merged vertex need their costs recomputed.
//!
//! The surviving ("kept") edges are handed to the tree finalizer and the
//! SWC serializer to produce the final skeleton.

use crate::progress::{CancelToken, Progress};
use crate::quadric::CostModel;
use crate::serialize::{make_swc, SwcOptions};
use crate::tree::{edges_to_graph, ForestOptions};
use curveskel_core::{Error, Point3d, Result, Skeleton, SurfaceMesh, SwcTable};

/// Lifecycle of one edge slot. `Kept` and `Collapsed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    Active,
    Kept,
    Collapsed,
}

/// Which of the two skeleton representations to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    /// SWC-style node table.
    #[default]
    Table,
    /// Rooted forest graph.
    Graph,
    /// Both representations.
    Both,
}

/// Parameters for [`skeletonize`].
#[derive(Debug)]
pub struct SkeletonizeParams {
    /// Weight for shape costs, which represent the impact of merging two
    /// vertices on the shape of the object.
    pub shape_weight: f64,
    /// Weight for sampling costs, which grow when a merge would generate
    /// prohibitively long edges.
    pub sample_weight: f64,
    pub output: Output,
    /// Reported once per collapse iteration with (faces removed, initial
    /// face count). Display-only.
    pub progress: Progress,
    /// Checked at the top of every collapse iteration.
    pub cancel: Option<CancelToken>,
}

impl SkeletonizeParams {
    pub fn new() -> Self {
        Self {
            shape_weight: 1.0,
            sample_weight: 0.1,
            output: Output::Table,
            progress: Progress::none(),
            cancel: None,
        }
    }
}

impl Default for SkeletonizeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`skeletonize`], shaped by [`SkeletonizeParams::output`].
#[derive(Debug)]
pub enum SkeletonizeOutput {
    Table(SwcTable),
    Graph(Skeleton),
    Both { graph: Skeleton, table: SwcTable },
}

impl SkeletonizeOutput {
    pub fn table(&self) -> Option<&SwcTable> {
        match self {
            Self::Table(t) | Self::Both { table: t, .. } => Some(t),
            Self::Graph(_) => None,
        }
    }

    pub fn graph(&self) -> Option<&Skeleton> {
        match self {
            Self::Graph(g) | Self::Both { graph: g, .. } => Some(g),
            Self::Table(_) => None,
        }
    }
}

pub(crate) struct CollapseEngine<'a> {
    vertices: &'a [Point3d],
    edges: Vec<[usize; 2]>,
    lengths: Vec<f64>,
    face_edges: Vec<[usize; 3]>,
    state: Vec<EdgeState>,
    costs: Vec<f64>,
    model: CostModel,
}

impl<'a> CollapseEngine<'a> {
    pub(crate) fn new(mesh: &'a SurfaceMesh, shape_weight: f64, sample_weight: f64) -> Self {
        let model = CostModel::new(mesh, shape_weight, sample_weight);
        let edges: Vec<[usize; 2]> = mesh.edges_unique().to_vec();
        let lengths: Vec<f64> = mesh.edges_unique_length().to_vec();
        let vertices = mesh.vertices();
        let costs: Vec<f64> = edges
            .iter()
            .zip(&lengths)
            .map(|(e, &len)| model.cost(*e, len, vertices))
            .collect();
        Self {
            vertices,
            state: vec![EdgeState::Active; edges.len()],
            face_edges: mesh.faces_unique_edges().to_vec(),
            edges,
            lengths,
            costs,
            model,
        }
    }

    /// Take an edge out of play. Retired edges keep an infinite cost so
    /// they can never win another selection.
    fn retire(&mut self, ei: usize, state: EdgeState) {
        self.state[ei] = state;
        self.costs[ei] = f64::INFINITY;
    }

    /// Slot of the cheapest active edge; ties go to the lowest slot.
    fn cheapest_active_edge(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (ei, &state) in self.state.iter().enumerate() {
            if state != EdgeState::Active {
                continue;
            }
            match best {
                Some((_, cost)) if self.costs[ei] >= cost => {}
                _ => best = Some((ei, self.costs[ei])),
            }
        }
        best.map(|(ei, _)| ei)
    }

    /// One step: collapse the edge at `collapse_ix` (or retire it as kept
    /// if it no longer borders a face).
    fn collapse(&mut self, collapse_ix: usize) {
        let [u, v] = self.edges[collapse_ix];

        // All edges running between u and v: the selected edge plus any
        // parallel copies earlier relabeling produced. Self-loops are
        // already collapsed and never qualify.
        let candidates: Vec<usize> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                (e[0] == u || e[0] == v) && (e[1] == u || e[1] == v) && e[0] != e[1]
            })
            .map(|(ei, _)| ei)
            .collect();

        let mut degenerate: Vec<[usize; 3]> = Vec::new();
        self.face_edges.retain(|triple| {
            if triple.iter().any(|e| candidates.contains(e)) {
                degenerate.push(*triple);
                false
            } else {
                true
            }
        });

        if degenerate.is_empty() {
            // The edge borders no remaining face: it is part of the
            // skeleton boundary. No vertex merge happens.
            for &ei in &candidates {
                self.retire(ei, EdgeState::Kept);
            }
            return;
        }

        for &ei in &candidates {
            self.retire(ei, EdgeState::Collapsed);
        }

        // Each degenerating triangle is reduced to a single edge: its two
        // surviving edges merge, the first (in triple order) wins and the
        // second is relabeled away.
        for triple in &degenerate {
            let survivors: Vec<usize> = triple
                .iter()
                .copied()
                .filter(|e| !candidates.contains(e))
                .collect();
            if let [win, lose] = survivors[..] {
                if win != lose {
                    for t in self.face_edges.iter_mut() {
                        for slot in t.iter_mut() {
                            if *slot == lose {
                                *slot = win;
                            }
                        }
                    }
                }
                self.retire(lose, EdgeState::Collapsed);
            }
        }

        // Merge vertex u into v.
        for e in self.edges.iter_mut() {
            for slot in e.iter_mut() {
                if *slot == u {
                    *slot = v;
                }
            }
        }
        self.model.merge(u, v);

        // Only edges whose endpoint set changed need new costs.
        for ei in 0..self.edges.len() {
            let e = self.edges[ei];
            if self.state[ei] == EdgeState::Active && (e[0] == v || e[1] == v) {
                self.costs[ei] = self.model.cost(e, self.lengths[ei], self.vertices);
            }
        }
    }

    /// Run the collapse loop until no face-edge triple remains.
    ///
    /// Every iteration either shrinks the face set or permanently retires
    /// at least one edge, so the loop terminates in finitely many steps.
    pub(crate) fn run(&mut self, progress: &Progress, cancel: Option<&CancelToken>) -> Result<()> {
        let total = self.face_edges.len();
        while !self.face_edges.is_empty() {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                return Err(Error::Cancelled);
            }
            progress.report(total - self.face_edges.len(), total, "collapsing faces");

            let Some(collapse_ix) = self.cheapest_active_edge() else {
                return Err(Error::Algorithm(format!(
                    "edge collapse stalled with {} faces outstanding",
                    self.face_edges.len()
                )));
            };
            self.collapse(collapse_ix);
        }

        // Edges still active border no faces at all; by the edge state
        // machine they are kept.
        for ei in 0..self.state.len() {
            if self.state[ei] == EdgeState::Active {
                self.retire(ei, EdgeState::Kept);
            }
        }
        progress.report(total, total, "collapsing faces");

        tracing::debug!(
            kept = self.state.iter().filter(|&&s| s == EdgeState::Kept).count(),
            collapsed = self
                .state
                .iter()
                .filter(|&&s| s == EdgeState::Collapsed)
                .count(),
            "edge collapse finished"
        );
        Ok(())
    }

    /// The surviving skeleton edges, with their relabeled endpoints.
    pub(crate) fn kept_edges(&self) -> Vec<[usize; 2]> {
        self.edges
            .iter()
            .zip(&self.state)
            .filter(|(_, &s)| s == EdgeState::Kept)
            .map(|(e, _)| *e)
            .collect()
    }
}

/// Skeletonize a (contracted) surface mesh.
///
/// Runs the quadric-and-sampling cost model and the greedy edge-collapse
/// loop over `mesh`, fixes the surviving edges into a rooted forest, and
/// serializes it as requested by [`SkeletonizeParams::output`].
///
/// The result is sensitive to the coordinate scale of the input: very
/// large coordinates can overflow the `f64` cost accumulation, very small
/// ones can starve the skeleton of vertices. Pre-scale the mesh rather
/// than relying on any internal normalization (there is none).
pub fn skeletonize(mesh: &SurfaceMesh, params: &SkeletonizeParams) -> Result<SkeletonizeOutput> {
    let mut engine = CollapseEngine::new(mesh, params.shape_weight, params.sample_weight);
    engine.run(&params.progress, params.cancel.as_ref())?;
    let kept = engine.kept_edges();

    let skeleton = edges_to_graph(
        &kept,
        mesh.vertices(),
        &ForestOptions {
            drop_disconnected: true,
            weight: false,
        },
    )?;

    match params.output {
        Output::Graph => Ok(SkeletonizeOutput::Graph(skeleton)),
        Output::Table => {
            let table = make_swc(&skeleton.edge_list(), mesh.vertices(), &SwcOptions::default())?;
            Ok(SkeletonizeOutput::Table(table))
        }
        Output::Both => {
            let table = make_swc(&skeleton.edge_list(), mesh.vertices(), &SwcOptions::default())?;
            Ok(SkeletonizeOutput::Both {
                graph: skeleton,
                table,
            })
        }
    }
}
