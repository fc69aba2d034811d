//! Prompt template and generation gateway

pub mod gateway;
pub mod prompt;

pub use gateway::GenerationGateway;
pub use prompt::build_prompt;
