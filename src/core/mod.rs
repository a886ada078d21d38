pub mod completion;
pub mod config;
pub mod constants;
pub mod message;
pub mod reply;
pub mod session;
