//! Drive-thru ordering agent for the Spice Route restaurant.
//!
//! The speech side (transcription, synthesis, turn detection) lives in the
//! voice front end. This crate takes transcripts, lets an LLM drive the order
//! through a small set of tools, and keeps the receipt file current.

pub mod agent;
pub mod assets;
pub mod config;
pub mod desk;
pub mod error;
pub mod events;
pub mod instructions;
pub mod llm;
pub mod logger;
pub mod menu;
pub mod order;
pub mod receipt;
pub mod runtime;
pub mod session;

pub use agent::tools;
pub use error::{Error, ToolError};
