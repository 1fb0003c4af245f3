//! Plan generation: domain types, prompt construction, and the retrying
//! generation loop.

pub mod generate;
pub mod prompt;
pub mod task;

pub use generate::{Attempt, PlanError, RetryPolicy, generate_plan, parse_tasks};
pub use prompt::{SYSTEM_INSTRUCTION, build_user_prompt, response_schema};
pub use task::{PlanRequest, Task};
