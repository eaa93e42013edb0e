pub mod engine;
pub mod narrator;

pub use engine::{CommandSpeaker, Speaker, TextInput};
pub use narrator::Narrator;
