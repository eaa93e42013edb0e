pub mod error;
pub mod traits;
pub mod types;

pub use error::PrinixError;
pub use traits::{ChatBackend, ChatSession, MediaResolver, TargetOpener};
pub use types::{MediaDescriptor, ReplyPayload, SessionId};
