//! Serializable network descriptions.
//!
//! A [`NetDef`] is an ordered list of operator invocations. Operators
//! communicate through named blobs: an operator reads the blobs named in its
//! `inputs` and writes the blobs named in its `outputs`.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Operator
// =============================================================================

/// A single operator invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorDef {
    /// Operator type (e.g. `"Conv"`).
    pub op_type: String,
    /// Optional instance name; empty when unnamed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Blobs read by this operator, in argument order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inputs: Vec<String>,
    /// Blobs written by this operator, in argument order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub outputs: Vec<String>,
    /// Free-form operator arguments.
    #[cfg_attr(feature = "serde", serde(default))]
    pub args: BTreeMap<String, String>,
}

impl OperatorDef {
    /// Creates an unnamed operator of the given type with no blobs.
    #[must_use]
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Self::default()
        }
    }

    /// Sets the instance name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the input blobs.
    #[must_use]
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output blobs.
    #[must_use]
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Returns true if this operator reads the named blob.
    #[must_use]
    pub fn reads(&self, blob: &str) -> bool {
        self.inputs.iter().any(|b| b == blob)
    }

    /// Returns true if this operator writes the named blob.
    #[must_use]
    pub fn writes(&self, blob: &str) -> bool {
        self.outputs.iter().any(|b| b == blob)
    }
}

// =============================================================================
// Network
// =============================================================================

/// An ordered network of operators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetDef {
    /// Network name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Operators in execution order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ops: Vec<OperatorDef>,
    /// Blobs supplied from outside the network.
    #[cfg_attr(feature = "serde", serde(default))]
    pub external_inputs: Vec<String>,
    /// Blobs the network must produce.
    #[cfg_attr(feature = "serde", serde(default))]
    pub external_outputs: Vec<String>,
}

impl NetDef {
    /// Creates an empty network with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends an operator.
    #[must_use]
    pub fn with_op(mut self, op: OperatorDef) -> Self {
        self.ops.push(op);
        self
    }

    /// Sets the external inputs.
    #[must_use]
    pub fn with_external_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the external outputs.
    #[must_use]
    pub fn with_external_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the operator types in execution order.
    #[must_use]
    pub fn op_types(&self) -> Vec<&str> {
        self.ops.iter().map(|op| op.op_type.as_str()).collect()
    }
}
