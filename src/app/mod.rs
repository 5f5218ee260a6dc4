//! Application orchestration: state, refresh gating and input handling.

pub mod event;
pub mod handler;
pub mod refresh;
pub mod source;
pub mod state;
