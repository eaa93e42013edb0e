pub mod aliases;
pub mod platform;
pub mod target;

pub use aliases::{AppAlias, WINDOWS_APPS};
pub use platform::{detect_platform, LinuxOpener, MacOpener, PlatformOpener, WindowsOpener};
pub use target::{DesktopOpener, UnsupportedOpener};
