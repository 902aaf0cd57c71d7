//! Generation provider adapters.

mod anthropic;
mod mock;
mod openai;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use mock::{MockGenerationProvider, MockReply};
pub use openai::{OpenAiConfig, OpenAiProvider};
