//! Prompt construction and the structured-output schema descriptor.
//!
//! The prompt and schema are fixed: the goal text is the only variable
//! part. All planning intelligence is delegated to the remote model; this
//! module only states the contract it is asked to honor.

use serde_json::{Value, json};

/// System instruction sent with every plan-generation call.
pub const SYSTEM_INSTRUCTION: &str = "You are a 'Smart Task Planner' AI. Your goal is to break \
     down a high-level user goal into a detailed, actionable list of tasks with clear deadlines \
     and dependencies. Respond ONLY with a JSON object. Do not include any introductory or \
     concluding text.";

/// Build the user prompt for a goal.
pub fn build_user_prompt(goal: &str) -> String {
    format!(
        "Break down this goal into actionable tasks with suggested deadlines and dependencies. \
         The input goal is: '{goal}'"
    )
}

/// The output-shape hint sent to the model.
///
/// Uses the uppercase type names the Gemini REST API expects. `description`
/// is intentionally absent from `required`: models omit it often enough
/// that requiring it causes avoidable retries.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "task_id": {
                    "type": "INTEGER",
                    "description": "Unique ID for the task."
                },
                "task_name": {
                    "type": "STRING",
                    "description": "Short, descriptive task title."
                },
                "description": {
                    "type": "STRING",
                    "description": "Detailed explanation of the task."
                },
                "deadline": {
                    "type": "STRING",
                    "description": "Suggested deadline (e.g. '3 days from now' or 'YYYY-MM-DD')."
                },
                "dependencies": {
                    "type": "ARRAY",
                    "items": { "type": "INTEGER" },
                    "description": "IDs of tasks that must be completed before this task."
                }
            },
            "required": ["task_id", "task_name", "deadline", "dependencies"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_goal_verbatim() {
        let prompt = build_user_prompt("Launch a product");
        assert!(prompt.contains("'Launch a product'"));
        assert!(prompt.starts_with("Break down this goal"));
    }

    #[test]
    fn system_instruction_demands_json_only() {
        assert!(SYSTEM_INSTRUCTION.contains("Respond ONLY with a JSON object"));
    }

    #[test]
    fn schema_is_array_of_task_objects() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        let props = schema["items"]["properties"]
            .as_object()
            .expect("items.properties should be an object");
        for field in ["task_id", "task_name", "description", "deadline", "dependencies"] {
            assert!(props.contains_key(field), "schema should describe {field}");
        }
    }

    #[test]
    fn schema_does_not_require_description() {
        let schema = response_schema();
        let required: Vec<&str> = schema["items"]["required"]
            .as_array()
            .expect("required should be an array")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["task_id", "task_name", "deadline", "dependencies"]);
    }
}
