//! Coordinate operation path generation.
//!
//! A path from a source CRS to a target CRS is found in three stages:
//!
//! 1. Both endpoints are unwrapped through their base links: projected CRSs
//!    through their projection, derived geodetic CRSs through their base
//!    definition. The source side uses inverse operations, the target side
//!    forward ones.
//! 2. If the two chains share a CRS, the path is spliced there and no search
//!    is needed.
//! 3. Otherwise the chains are joined by a bounded uniform-cost search over
//!    transformations and concatenated operations, filtered by area of use.
//!    Every source chain node is a seed and every target chain node a goal,
//!    so an operation defined at a projected level is used directly.
//!
//! Cost is the total number of edges. Ties keep the first candidate in
//! enumeration order, which makes the result deterministic.

mod crs_path;

pub use crs_path::CrsPath;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::db::Database;
use crate::error::DecodeError;
use crate::limits::DEFAULT_MAX_HOPS;
use crate::model::{Area, BaseDefinition, Category, Code, Crs, GeodeticCrs, OperationCode, OperationRef};

/// Options for [`PathGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Maximum number of search edges between the source and target chains.
    pub max_hops: usize,
    /// Skip operations whose area of use touches neither endpoint's area.
    pub filter_by_area: bool,
    /// Expand non-deprecated, more accurate operations first.
    pub rank_by_accuracy: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            filter_by_area: true,
            rank_by_accuracy: false,
        }
    }
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn without_area_filter(mut self) -> Self {
        self.filter_by_area = false;
        self
    }

    pub fn ranked_by_accuracy(mut self) -> Self {
        self.rank_by_accuracy = true;
        self
    }
}

/// Plans operation paths over one [`Database`].
#[derive(Debug, Clone, Copy)]
pub struct PathGenerator<'a> {
    db: &'a Database,
    options: PathOptions,
}

/// One side of the request, unwrapped towards its geodetic base.
///
/// `edges[i]` joins `nodes[i]` and `nodes[i + 1]`: source side edges point
/// inwards, target side edges point outwards.
struct Chain {
    nodes: Vec<Arc<Crs>>,
    edges: Vec<OperationRef>,
}

impl Chain {
    fn position(&self, code: Code) -> Option<usize> {
        self.nodes.iter().position(|n| n.code() == code)
    }
}

/// A search state: the node reached, how, and from which state.
struct Visit {
    crs: Code,
    edge: Option<OperationRef>,
    parent: Option<usize>,
    /// Index of the seed on the source chain.
    seed: usize,
    hops: usize,
}

/// Areas of the two endpoints, when both are known.
struct AreaFilter {
    source: Arc<Area>,
    target: Arc<Area>,
}

impl AreaFilter {
    /// An edge touching either endpoint area is kept. Requiring both would
    /// drop the edges that hand over between two disjoint regions.
    fn admits(&self, area: &Area) -> bool {
        area.intersects(&self.source) || area.intersects(&self.target)
    }
}

impl<'a> PathGenerator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            options: PathOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Finds a path from `source` to `target`.
    ///
    /// Returns `Ok(None)` when either code is absent, when an endpoint is
    /// not geodetic or projected over a geodetic base, and when no path
    /// exists within the hop bound. Errors are reserved for malformed data.
    pub fn generate_path(&self, source: Code, target: Code) -> Result<Option<CrsPath>, DecodeError> {
        tracing::debug!(source, target, "planning operation path");
        let (Some(source_crs), Some(target_crs)) = (self.db.crs(source)?, self.db.crs(target)?) else {
            tracing::debug!(source, target, "unknown CRS code");
            return Ok(None);
        };
        if source == target {
            return Ok(Some(CrsPath::identity(source_crs)));
        }
        if self.db.geodetic_base(source)?.is_none() || self.db.geodetic_base(target)?.is_none() {
            tracing::debug!(source, target, "endpoint has no geodetic base");
            return Ok(None);
        }

        let source_chain = self.unwrap_source(source_crs)?;
        let target_chain = self.unwrap_target(target_crs)?;

        if let Some(path) = direct_match(&source_chain, &target_chain) {
            tracing::debug!(source, target, edges = path.len(), "joined at a shared base");
            return Ok(Some(path));
        }

        let path = self.search(&source_chain, &target_chain)?;
        match &path {
            Some(path) => tracing::debug!(source, target, edges = path.len(), %path, "found path"),
            None => tracing::debug!(source, target, max_hops = self.options.max_hops, "no path"),
        }
        Ok(path)
    }

    // ===== UNWRAPPING =====

    /// Source side: each derived level is left through the inverse of its
    /// defining operation. Stops at an operation that cannot be inverted.
    fn unwrap_source(&self, crs: Arc<Crs>) -> Result<Chain, DecodeError> {
        self.unwrap_chain(crs, |operation| operation.inverse())
    }

    /// Target side: each derived level is entered through its defining
    /// operation.
    fn unwrap_target(&self, crs: Arc<Crs>) -> Result<Chain, DecodeError> {
        self.unwrap_chain(crs, Some)
    }

    fn unwrap_chain(
        &self,
        crs: Arc<Crs>,
        direction: impl Fn(OperationRef) -> Option<OperationRef>,
    ) -> Result<Chain, DecodeError> {
        let origin = crs.code();
        let mut chain = Chain {
            nodes: vec![crs],
            edges: Vec::new(),
        };
        loop {
            let (base_code, operation) = match chain.nodes[chain.nodes.len() - 1].as_ref() {
                Crs::Projected(projected) => (
                    projected.base_crs,
                    self.db
                        .require_operation(OperationCode::conversion(projected.projection))?,
                ),
                Crs::Geodetic(GeodeticCrs {
                    base: Some(BaseDefinition { crs, operation }),
                    ..
                }) => (
                    *crs,
                    self.db
                        .single_operation(*operation)?
                        .ok_or(DecodeError::DanglingReference {
                            category: Category::Conversion,
                            code: *operation,
                        })?,
                ),
                _ => break,
            };
            let Some(edge) = direction(OperationRef::forward(operation)) else {
                break;
            };
            if chain.position(base_code).is_some() {
                return Err(DecodeError::CyclicBaseChain { code: origin });
            }
            let base = self.db.require_crs(base_code)?;
            chain.edges.push(edge);
            chain.nodes.push(base);
        }
        Ok(chain)
    }

    // ===== GRAPH SEARCH =====

    fn area_filter(&self, source: &Crs, target: &Crs) -> Result<Option<AreaFilter>, DecodeError> {
        if !self.options.filter_by_area {
            return Ok(None);
        }
        let (Some(source), Some(target)) = (source.area(), target.area()) else {
            return Ok(None);
        };
        match (self.db.area(source)?, self.db.area(target)?) {
            (Some(source), Some(target)) => Ok(Some(AreaFilter { source, target })),
            _ => Ok(None),
        }
    }

    fn search(&self, source: &Chain, target: &Chain) -> Result<Option<CrsPath>, DecodeError> {
        let filter = self.area_filter(source.nodes[0].as_ref(), target.nodes[0].as_ref())?;

        // Reaching target node j costs j more edges back out to the target.
        let mut goals: FxHashMap<Code, usize> = FxHashMap::default();
        for (j, node) in target.nodes.iter().enumerate() {
            goals.entry(node.code()).or_insert(j);
        }

        let mut visits: Vec<Visit> = Vec::new();
        let mut queue = BinaryHeap::new();
        for (i, node) in source.nodes.iter().enumerate() {
            queue.push(Reverse((i, visits.len())));
            visits.push(Visit {
                crs: node.code(),
                edge: None,
                parent: None,
                seed: i,
                hops: 0,
            });
        }

        let mut settled: FxHashSet<Code> = FxHashSet::default();
        let mut best: Option<(usize, usize, usize)> = None;

        while let Some(Reverse((cost, id))) = queue.pop() {
            if best.is_some_and(|(best_cost, _, _)| cost >= best_cost) {
                break;
            }
            let crs = visits[id].crs;
            if !settled.insert(crs) {
                continue;
            }
            if let Some(&j) = goals.get(&crs) {
                if best.is_none_or(|(best_cost, _, _)| cost + j < best_cost) {
                    best = Some((cost + j, id, j));
                }
            }
            if visits[id].hops >= self.options.max_hops {
                continue;
            }
            let edges = self.edges_from(crs, filter.as_ref(), &goals)?;
            tracing::trace!(crs, cost, candidates = edges.len(), "expanding");
            for (next, edge) in edges {
                if settled.contains(&next) {
                    continue;
                }
                let visit = Visit {
                    crs: next,
                    edge: Some(edge),
                    parent: Some(id),
                    seed: visits[id].seed,
                    hops: visits[id].hops + 1,
                };
                queue.push(Reverse((cost + 1, visits.len())));
                visits.push(visit);
            }
        }

        let Some((_, id, j)) = best else {
            return Ok(None);
        };
        self.assemble(source, &visits, id, target, j).map(Some)
    }

    /// Admissible edges leaving `crs`, in expansion order. An edge may only
    /// land on a non-geodetic CRS when that CRS is one of the `goals`.
    fn edges_from(
        &self,
        crs: Code,
        filter: Option<&AreaFilter>,
        goals: &FxHashMap<Code, usize>,
    ) -> Result<Vec<(Code, OperationRef)>, DecodeError> {
        let forward = self.db.operations_from(crs).iter().map(|&code| (code, false));
        let reverse = self.db.operations_to(crs).iter().map(|&code| (code, true));

        let mut edges = Vec::new();
        for (code, inverted) in forward.chain(reverse) {
            let op = self.db.require_operation(code)?;
            let edge = OperationRef::forward(op);
            let edge = if inverted {
                match edge.inverse() {
                    Some(inverse) => inverse,
                    None => continue,
                }
            } else {
                edge
            };
            if let (Some(filter), Some(area)) = (filter, edge.core().area()) {
                let area = self.db.area(area)?.ok_or(DecodeError::DanglingReference {
                    category: Category::Area,
                    code: area,
                })?;
                if !filter.admits(&area) {
                    tracing::trace!(operation = code.code, "outside area of interest");
                    continue;
                }
            }
            let Some(next) = edge.target_crs() else { continue };
            if !goals.contains_key(&next) && !self.db.require_crs(next)?.kind().is_geodetic() {
                continue;
            }
            edges.push((next, edge));
        }

        if self.options.rank_by_accuracy {
            edges.sort_by(|(_, a), (_, b)| {
                let key = |e: &OperationRef| {
                    let op = e.core();
                    (op.deprecated(), op.accuracy().unwrap_or(f64::INFINITY))
                };
                let (a, b) = (key(a), key(b));
                a.0.cmp(&b.0).then(a.1.total_cmp(&b.1))
            });
        }
        Ok(edges)
    }

    // ===== ASSEMBLY =====

    fn assemble(
        &self,
        source: &Chain,
        visits: &[Visit],
        goal: usize,
        target: &Chain,
        j: usize,
    ) -> Result<CrsPath, DecodeError> {
        let mut middle = Vec::new();
        let mut current = goal;
        while let Some(parent) = visits[current].parent {
            if let Some(edge) = &visits[current].edge {
                middle.push((visits[current].crs, edge.clone()));
            }
            current = parent;
        }
        middle.reverse();
        let i = visits[current].seed;

        let mut nodes: Vec<Arc<Crs>> = source.nodes[..=i].to_vec();
        let mut edges: Vec<OperationRef> = source.edges[..i].to_vec();
        for (crs, edge) in middle {
            nodes.push(self.db.require_crs(crs)?);
            edges.push(edge);
        }
        for k in (0..j).rev() {
            edges.push(target.edges[k].clone());
            nodes.push(Arc::clone(&target.nodes[k]));
        }
        Ok(CrsPath::new(nodes, edges))
    }
}

/// Splices the chains at their cheapest shared CRS, if any.
fn direct_match(source: &Chain, target: &Chain) -> Option<CrsPath> {
    let (i, j) = source
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(i, node)| target.position(node.code()).map(|j| (i, j)))
        .min_by_key(|&(i, j)| (i + j, i))?;

    let mut nodes: Vec<Arc<Crs>> = source.nodes[..=i].to_vec();
    let mut edges: Vec<OperationRef> = source.edges[..i].to_vec();
    for k in (0..j).rev() {
        edges.push(target.edges[k].clone());
        nodes.push(Arc::clone(&target.nodes[k]));
    }
    Some(CrsPath::new(nodes, edges))
}
