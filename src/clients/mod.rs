pub mod gemini_client;
pub mod openai_client;
pub mod provider;
pub mod sleeper;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiCompatClient;
pub use provider::{build_provider, GenerationCall, GenerativeProvider};
pub use sleeper::{Sleeper, TokioSleeper};
