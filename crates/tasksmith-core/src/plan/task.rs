//! Wire types for plan requests and generated tasks.
//!
//! A [`Task`] is produced entirely by the remote model; this service does
//! not construct tasks itself and does not validate id uniqueness, deadline
//! format, or dependency acyclicity. Plans exist only for the duration of
//! one request/response cycle.

use serde::{Deserialize, Serialize};

/// Incoming request body for plan generation.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// Free-form goal text to decompose. Must be non-empty.
    pub goal: String,
}

/// A single task in a generated plan, as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id within the plan.
    pub task_id: i64,
    /// Short task title.
    pub task_name: String,
    /// Longer explanation. The model is asked for one but it is not
    /// required, so absence deserializes to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Suggested deadline, free-form (e.g. "3 days from now" or a date).
    /// Never parsed locally.
    pub deadline: String,
    /// Ids of tasks that must complete before this one.
    pub dependencies: Vec<i64>,
}
