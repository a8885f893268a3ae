pub mod client;
pub mod types;

pub use client::{GeminiHttpClient, DEFAULT_BASE_URL};
pub use types::{first_text, GenerateContentRequest, GenerationConfig};
