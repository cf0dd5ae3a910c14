//! Planner client implementations for Tenderdesk.
//!
//! A planner is anything that turns a system prompt plus a conversation
//! into one free-form text completion. The agent never talks HTTP
//! itself; it holds an `Arc<dyn Planner>` and treats the response as
//! opaque text for the interpreter to decode.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatPlanner;
