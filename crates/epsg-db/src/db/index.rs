//! Reverse indexes used by the path generator.
//!
//! Built eagerly in one pass over the raw transformation, concatenated
//! operation and CRS records, reading only the fields they need.

use rustc_hash::FxHashMap;

use crate::codec::records::{peek_endpoints, peek_projected_base};
use crate::error::DecodeError;
use crate::model::{Code, Crs, Operation, OperationCode};
use crate::store::KeyedStore;

#[derive(Debug, Default, Clone)]
pub struct OperationIndex {
    from: FxHashMap<Code, Vec<OperationCode>>,
    to: FxHashMap<Code, Vec<OperationCode>>,
    projections: FxHashMap<Code, Vec<Code>>,
}

impl OperationIndex {
    /// Lists transformations before concatenated operations, each in ascending code order.
    pub fn build(
        transformations: &KeyedStore<Operation>,
        concatenated: &KeyedStore<Operation>,
        crs: &KeyedStore<Crs>,
    ) -> Result<Self, DecodeError> {
        let mut index = Self::default();
        for (store, make) in [
            (transformations, OperationCode::transformation as fn(Code) -> OperationCode),
            (concatenated, OperationCode::concatenated),
        ] {
            for record in store.raw_records() {
                let (code, data) = record?;
                let (source, target, _) = peek_endpoints(data)?;
                index.from.entry(source).or_default().push(make(code));
                index.to.entry(target).or_default().push(make(code));
            }
        }
        for record in crs.raw_records() {
            let (code, data) = record?;
            if let Some(base) = peek_projected_base(data)? {
                index.projections.entry(base).or_default().push(code);
            }
        }
        tracing::debug!(
            sources = index.from.len(),
            targets = index.to.len(),
            projection_bases = index.projections.len(),
            "built operation index"
        );
        Ok(index)
    }

    /// Operations whose declared source CRS is `crs`.
    pub fn operations_from(&self, crs: Code) -> &[OperationCode] {
        self.from.get(&crs).map_or(&[], Vec::as_slice)
    }

    /// Operations whose declared target CRS is `crs`.
    pub fn operations_to(&self, crs: Code) -> &[OperationCode] {
        self.to.get(&crs).map_or(&[], Vec::as_slice)
    }

    /// Projected CRSs whose declared base CRS is `crs`.
    pub fn projections_based_on(&self, crs: Code) -> &[Code] {
        self.projections.get(&crs).map_or(&[], Vec::as_slice)
    }

    /// Total number of indexed operations.
    pub fn operation_count(&self) -> usize {
        self.from.values().map(Vec::len).sum()
    }
}
