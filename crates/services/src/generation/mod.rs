//! Question generation: plan a round, render the prompt, call the model,
//! parse the reply, persist the results.

mod parse;
mod plan;
mod prompt;
mod service;

// Public API of the generation subsystem.
pub use crate::error::GenerationError;
pub use parse::parse_reply;
pub use plan::{excerpt, plan_random, plan_sequential, GenerationPlan, EXCERPT_CHARS};
pub use prompt::render_prompt;
pub use service::GenerationService;
