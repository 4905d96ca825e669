// Job opportunity pipeline: prompt, parse, staleness-gated refresh, handlers.

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod refresh;
