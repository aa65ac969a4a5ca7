mod client;

pub use client::{OpenRouterClient, DEFAULT_REFERER, OPENROUTER_API_BASE};
