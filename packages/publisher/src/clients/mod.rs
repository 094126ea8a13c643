//! Concrete collaborator implementations.

mod gemini;
mod indexnow;
mod telegram;
mod wordpress;

pub use gemini::GeminiClient;
pub use indexnow::IndexNowClient;
pub use telegram::TelegramNotifier;
pub use wordpress::WordPressClient;
