pub mod intent;
pub mod normalize;
pub mod router;

pub use intent::{Intent, classify};
pub use normalize::normalize;
pub use router::{DEFAULT_ASSISTANT_NAME, GREETING_REPLY, IntentRouter, SONG_NOT_FOUND_REPLY};
