pub mod fallback;
pub mod providers;
pub mod store;

pub use fallback::{ChatFallback, CHAT_ERROR_REPLY, EMPTY_RESPONSE_REPLY, NOT_SURE_REPLY};
pub use providers::gemini::GeminiBackend;
pub use providers::mock::MockBackend;
pub use store::{ConversationHandle, ConversationStore};
