//! Shared constants used across the application

use std::time::Duration;

/// Replies for the opening turns, indexed by the number of completed turns.
/// Once the session has answered all of them, turns go to the remote model.
pub const CANNED_REPLIES: [&str; 4] = [
    "Hello! Welcome to our bank's virtual assistant. I'm here to help you with your banking needs. How can I assist you today?",
    "Please Enter your Account number",
    "Please Enter OTP sent your Register Mobile number",
    "Your account balance is 1500000 ",
];

/// Instruction seeded at the head of every session's remote context.
pub const SYSTEM_PROMPT: &str = "You are a helpful banking assistant. \
Answer user queries about account balance, transactions, loans, \
credit cards, and general banking services. \
If the query is outside banking, politely say you can only help with banking topics.";

pub const TEMPERATURE: f32 = 0.5;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Context length (in messages, system instruction included) at which the
/// session starts warning about request size.
pub const DEFAULT_CONTEXT_WARN_THRESHOLD: usize = 64;

/// Space reserved around the input line for borders and the busy indicator.
pub const INDICATOR_SPACE: u16 = 4;
