//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: key handling and the loop that runs one turn per submitted line.
//! - [`renderer`]: transcript layout and frame output.
//!
//! This layer only presents the session; [`crate::core`] owns the turn logic.

pub mod chat_loop;
pub mod renderer;
