pub mod common;
pub mod config;
pub mod negotiation;
pub mod parse;
pub mod prompts;
pub mod valuation;
pub mod vision;
