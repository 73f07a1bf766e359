//! Interpretation client. Everything that talks to a language model lives here;
//! the session itself stays in `arcana-core`.

pub mod chat_completions;
pub mod config;
pub mod error;
pub mod flow;
pub mod gemini;
pub mod interpreter;
pub mod prompt;
pub mod provider;
pub mod response;

pub use chat_completions::*;
pub use config::*;
pub use error::*;
pub use flow::*;
pub use gemini::*;
pub use interpreter::*;
pub use prompt::*;
pub use provider::*;
pub use response::*;
