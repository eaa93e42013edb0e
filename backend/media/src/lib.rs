//! Media resolution: turn a free-text song request into one playable audio URL.

pub mod stub;
pub mod ytdlp;

pub use stub::StaticResolver;
pub use ytdlp::YtDlpResolver;
