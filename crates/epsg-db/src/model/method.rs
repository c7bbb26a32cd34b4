//! Operation methods, parameters and parameter values.

use crate::model::Code;

/// One parameter position of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSlot {
    pub parameter: Code,
    /// Negate the value when the operation is applied in reverse.
    pub sign_reversal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationMethod {
    pub code: Code,
    pub name: String,
    pub can_reverse: bool,
    /// Ordered slots; an operation's values line up with these.
    pub slots: Vec<ParameterSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub code: Code,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValueKind {
    Number(f64),
    /// File names and other textual values.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValue {
    pub value: ParameterValueKind,
    pub unit: Option<Code>,
}

impl ParameterValue {
    pub fn number(value: f64, unit: Option<Code>) -> Self {
        Self {
            value: ParameterValueKind::Number(value),
            unit,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: ParameterValueKind::Text(value.into()),
            unit: None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            ParameterValueKind::Number(v) => Some(v),
            ParameterValueKind::Text(_) => None,
        }
    }

    /// Value with numeric sign flipped; text is unchanged.
    pub fn negated(&self) -> Self {
        match &self.value {
            ParameterValueKind::Number(v) => Self::number(-v, self.unit),
            ParameterValueKind::Text(_) => self.clone(),
        }
    }
}

/// A parameter value resolved against its method slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameter {
    pub parameter: Code,
    pub name: String,
    pub value: ParameterValue,
}
