// Worksheet API: LLM generation, the measure/paginate/assemble pipeline and
// the HTTP handlers that expose both.

pub mod generator;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
