//! bankchat is a terminal banking assistant that talks to an OpenAI-compatible
//! chat completions API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session (transcript, remote context, turn counter), the
//!   reply policy that scripts the opening turns, the completion backend, and
//!   configuration.
//! - [`ui`] renders the transcript and runs the full-screen event loop.
//! - [`cli`] parses arguments, initializes tracing, and dispatches to the
//!   full-screen chat or the line-oriented mode.
//! - [`api`] defines the request/response payloads.
//!
//! The binary (`src/main.rs`) only calls [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
