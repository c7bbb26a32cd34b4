use std::fmt;
use std::sync::Arc;

use crate::model::{Crs, OperationRef};

/// A chain of CRSs joined by directed operations.
///
/// `edges[i]` takes coordinates from `nodes[i]` to `nodes[i + 1]`, so there
/// is always exactly one more node than there are edges.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsPath {
    nodes: Vec<Arc<Crs>>,
    edges: Vec<OperationRef>,
}

impl CrsPath {
    pub(crate) fn identity(crs: Arc<Crs>) -> Self {
        Self {
            nodes: vec![crs],
            edges: Vec::new(),
        }
    }

    pub(crate) fn new(nodes: Vec<Arc<Crs>>, edges: Vec<OperationRef>) -> Self {
        debug_assert_eq!(nodes.len(), edges.len() + 1);
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Arc<Crs>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[OperationRef] {
        &self.edges
    }

    /// The requested source CRS.
    pub fn first(&self) -> &Arc<Crs> {
        &self.nodes[0]
    }

    /// The requested target CRS.
    pub fn last(&self) -> &Arc<Crs> {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True for the zero-edge path from a CRS to itself.
    pub fn is_identity(&self) -> bool {
        self.edges.is_empty()
    }

    /// `(from, operation, to)` for every step, in order.
    pub fn steps(&self) -> impl Iterator<Item = (&Arc<Crs>, &OperationRef, &Arc<Crs>)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (&self.nodes[i], edge, &self.nodes[i + 1]))
    }

    pub fn into_parts(self) -> (Vec<Arc<Crs>>, Vec<OperationRef>) {
        (self.nodes, self.edges)
    }
}

impl fmt::Display for CrsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first().code())?;
        for (_, edge, to) in self.steps() {
            let marker = if edge.is_inverse() { "^-1" } else { "" };
            write!(f, " -[{}{}]-> {}", edge.code().code, marker, to.code())?;
        }
        Ok(())
    }
}
