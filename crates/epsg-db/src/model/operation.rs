//! Coordinate operations and directed references to them.

use std::sync::Arc;

use crate::model::{Category, Code};

/// Which operation resource a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Conversion,
    Transformation,
    Concatenated,
}

impl OperationKind {
    pub fn category(self) -> Category {
        match self {
            OperationKind::Conversion => Category::Conversion,
            OperationKind::Transformation => Category::Transformation,
            OperationKind::Concatenated => Category::ConcatenatedOperation,
        }
    }
}

/// An operation code qualified by its resource, since codes are only
/// unique within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationCode {
    pub kind: OperationKind,
    pub code: Code,
}

impl OperationCode {
    pub fn conversion(code: Code) -> Self {
        Self {
            kind: OperationKind::Conversion,
            code,
        }
    }

    pub fn transformation(code: Code) -> Self {
        Self {
            kind: OperationKind::Transformation,
            code,
        }
    }

    pub fn concatenated(code: Code) -> Self {
        Self {
            kind: OperationKind::Concatenated,
            code,
        }
    }
}

/// Fields shared by every operation variant.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInfo {
    pub code: Code,
    pub name: String,
    pub area: Option<Code>,
    pub deprecated: bool,
    pub invertible: bool,
}

/// A conversion: no datum change, source and target implied by the CRS using it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub info: OperationInfo,
    pub method: Code,
}

/// A datum transformation between two declared CRSs.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub info: OperationInfo,
    pub source_crs: Code,
    pub target_crs: Code,
    pub method: Code,
    /// Empirical accuracy in metres.
    pub accuracy: Option<f64>,
}

/// An ordered chain of single operations, used as one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatenatedOperation {
    pub info: OperationInfo,
    /// Source of the first step.
    pub source_crs: Code,
    /// Target of the last step.
    pub target_crs: Code,
    /// Step codes; each names a transformation, or a conversion when no
    /// transformation has that code.
    pub steps: Vec<Code>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Conversion(Conversion),
    Transformation(Transformation),
    Concatenated(ConcatenatedOperation),
}

impl Operation {
    pub fn info(&self) -> &OperationInfo {
        match self {
            Operation::Conversion(op) => &op.info,
            Operation::Transformation(op) => &op.info,
            Operation::Concatenated(op) => &op.info,
        }
    }

    pub fn code(&self) -> Code {
        self.info().code
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn area(&self) -> Option<Code> {
        self.info().area
    }

    pub fn deprecated(&self) -> bool {
        self.info().deprecated
    }

    pub fn is_invertible(&self) -> bool {
        self.info().invertible
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Conversion(_) => OperationKind::Conversion,
            Operation::Transformation(_) => OperationKind::Transformation,
            Operation::Concatenated(_) => OperationKind::Concatenated,
        }
    }

    pub fn operation_code(&self) -> OperationCode {
        OperationCode {
            kind: self.kind(),
            code: self.code(),
        }
    }

    /// Declared source CRS; conversions declare none.
    pub fn source_crs(&self) -> Option<Code> {
        match self {
            Operation::Conversion(_) => None,
            Operation::Transformation(op) => Some(op.source_crs),
            Operation::Concatenated(op) => Some(op.source_crs),
        }
    }

    /// Declared target CRS; conversions declare none.
    pub fn target_crs(&self) -> Option<Code> {
        match self {
            Operation::Conversion(_) => None,
            Operation::Transformation(op) => Some(op.target_crs),
            Operation::Concatenated(op) => Some(op.target_crs),
        }
    }

    pub fn method(&self) -> Option<Code> {
        match self {
            Operation::Conversion(op) => Some(op.method),
            Operation::Transformation(op) => Some(op.method),
            Operation::Concatenated(_) => None,
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self {
            Operation::Transformation(op) => op.accuracy,
            _ => None,
        }
    }
}

/// An operation used in a direction.
///
/// The inverse is a view over the same shared record: inverting twice gives
/// back the forward reference.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRef {
    op: Arc<Operation>,
    inverted: bool,
}

impl OperationRef {
    pub fn forward(op: Arc<Operation>) -> Self {
        Self { op, inverted: false }
    }

    /// The reverse direction, or None when the operation is not invertible.
    pub fn inverse(&self) -> Option<OperationRef> {
        if !self.op.is_invertible() {
            return None;
        }
        Some(Self {
            op: Arc::clone(&self.op),
            inverted: !self.inverted,
        })
    }

    /// The underlying record, independent of direction.
    pub fn core(&self) -> &Arc<Operation> {
        &self.op
    }

    pub fn is_inverse(&self) -> bool {
        self.inverted
    }

    pub fn is_invertible(&self) -> bool {
        self.op.is_invertible()
    }

    pub fn code(&self) -> OperationCode {
        self.op.operation_code()
    }

    pub fn name(&self) -> String {
        if self.inverted {
            format!("Inverse of {}", self.op.name())
        } else {
            self.op.name().to_string()
        }
    }

    pub fn source_crs(&self) -> Option<Code> {
        if self.inverted {
            self.op.target_crs()
        } else {
            self.op.source_crs()
        }
    }

    pub fn target_crs(&self) -> Option<Code> {
        if self.inverted {
            self.op.source_crs()
        } else {
            self.op.target_crs()
        }
    }
}
