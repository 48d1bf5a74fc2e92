// src/model/node.rs

//! Static node definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::matrix::MatrixRecord;

/// Whether a node runs on its own once its dependencies are done, or waits
/// for someone to release it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    #[default]
    Automatic,
    Manual,
}

/// Trigger configuration (`trigger = { type = "manual" }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub r#type: TriggerType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    #[default]
    Matrix,
}

/// Where a matrix node gets its value-records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixSource {
    /// Fixed list declared in the workflow.
    Values(Vec<MatrixRecord>),
    /// Array read from the run state at this key on every reconciliation.
    FromState(String),
    /// Neither `values` nor `from_state`: master only.
    Empty,
}

/// Fan-out strategy of a node.
///
/// On the wire this is `{ "type": "matrix", "values": [...], "from_state": "key" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStrategy", into = "RawStrategy")]
pub struct Strategy {
    pub r#type: StrategyType,
    pub source: MatrixSource,
}

impl Strategy {
    pub fn matrix_values(values: Vec<MatrixRecord>) -> Self {
        Self {
            r#type: StrategyType::Matrix,
            source: MatrixSource::Values(values),
        }
    }

    pub fn matrix_from_state(key: impl Into<String>) -> Self {
        Self {
            r#type: StrategyType::Matrix,
            source: MatrixSource::FromState(key.into()),
        }
    }

    /// State key for dynamic matrices.
    pub fn state_key(&self) -> Option<&str> {
        match &self.source {
            MatrixSource::FromState(key) => Some(key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawStrategy {
    #[serde(default)]
    r#type: StrategyType,
    #[serde(default)]
    values: Option<Vec<MatrixRecord>>,
    #[serde(default)]
    from_state: Option<String>,
}

impl From<RawStrategy> for Strategy {
    fn from(raw: RawStrategy) -> Self {
        let source = match (raw.values, raw.from_state) {
            (Some(values), Some(key)) => {
                warn!(
                    state_key = %key,
                    "matrix strategy declares both `values` and `from_state`; using `values`"
                );
                MatrixSource::Values(values)
            }
            (Some(values), None) => MatrixSource::Values(values),
            (None, Some(key)) => MatrixSource::FromState(key),
            (None, None) => MatrixSource::Empty,
        };
        Self {
            r#type: raw.r#type,
            source,
        }
    }
}

impl From<Strategy> for RawStrategy {
    fn from(strategy: Strategy) -> Self {
        let (values, from_state) = match strategy.source {
            MatrixSource::Values(values) => (Some(values), None),
            MatrixSource::FromState(key) => (None, Some(key)),
            MatrixSource::Empty => (None, None),
        };
        Self {
            r#type: strategy.r#type,
            values,
            from_state,
        }
    }
}

/// One unit of work in a workflow.
///
/// `runtime` and `steps` are passed through untouched; the scheduler never
/// looks inside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub r#type: NodeType,

    /// Ids of nodes that must complete before this node may run.
    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub trigger: Option<Trigger>,

    #[serde(default)]
    pub strategy: Option<Strategy>,

    #[serde(default)]
    pub runtime: Option<serde_json::Value>,

    #[serde(default)]
    pub steps: Vec<serde_json::Value>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Node {
    /// A node with a matrix strategy always gets a master task, whatever
    /// its source.
    pub fn is_matrix(&self) -> bool {
        matches!(
            self.strategy,
            Some(Strategy {
                r#type: StrategyType::Matrix,
                ..
            })
        )
    }

    /// State key for nodes whose children are driven by run state.
    pub fn state_key(&self) -> Option<&str> {
        self.strategy.as_ref().and_then(Strategy::state_key)
    }

    /// Whether satisfied dependencies still need an external go-ahead.
    pub fn requires_manual_trigger(&self) -> bool {
        self.r#type == NodeType::Manual
            || self
                .trigger
                .map(|t| t.r#type == TriggerType::Manual)
                .unwrap_or(false)
    }
}
