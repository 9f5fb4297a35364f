// Copy analysis: rubric prompt, single LLM call, reply parsing.

pub mod analyzer;
pub mod handlers;
pub mod parser;
pub mod prompts;
