// Industry insights: weekly market reports generated per industry.

pub mod handlers;
pub mod prompts;
pub mod service;
