/// Platform launch strategies.
///
/// One strategy is picked at startup from the compile target; every open or
/// launch goes through it. Spawned processes are detached and reaped on a
/// background thread so the caller never waits on them.
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use prinix_core::PrinixError;

use crate::aliases::{AppAlias, WINDOWS_APPS};

type Result<T> = std::result::Result<T, PrinixError>;

pub trait PlatformOpener: Send + Sync {
    /// Short platform name for logs ("windows", "macos", "linux").
    fn name(&self) -> &'static str;

    /// Hand a file or folder to the platform's default handler.
    fn open_path(&self, path: &Path) -> Result<()>;

    /// Open a URL in the default browser.
    fn open_url(&self, url: &str) -> Result<()>;

    /// Start an executable by path or by name.
    fn launch(&self, program: &str) -> Result<()>;

    /// Application aliases this platform knows how to launch.
    fn aliases(&self) -> &'static [AppAlias] {
        &[]
    }
}

/// Pick the strategy for the platform this binary was built for.
pub fn detect_platform() -> Box<dyn PlatformOpener> {
    match std::env::consts::OS {
        "windows" => Box::new(WindowsOpener),
        "macos" => Box::new(MacOpener),
        _ => Box::new(LinuxOpener::new()),
    }
}

fn spawn_detached(mut cmd: Command, target: &str) -> Result<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    debug!(command = ?cmd, "Spawning detached process");
    let mut child = cmd.spawn().map_err(|e| PrinixError::OpenFailed {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

pub struct WindowsOpener;

impl WindowsOpener {
    fn path_command(path: &Path) -> Command {
        let mut cmd = Command::new("explorer");
        cmd.arg(path);
        cmd
    }
}


impl PlatformOpener for WindowsOpener {
    fn name(&self) -> &'static str {
        "windows"
    }

    // Paths and URLs never pass through `cmd`, which would interpret `&`, `|`
    // and `^` inside them.
    fn open_path(&self, path: &Path) -> Result<()> {
        spawn_detached(Self::path_command(path), &path.to_string_lossy())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler").arg(url);
        spawn_detached(cmd, url)
    }

    /// Only ever called with alias programs from a fixed table.
    fn launch(&self, program: &str) -> Result<()> {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(program);
        spawn_detached(cmd, program)
    }

    fn aliases(&self) -> &'static [AppAlias] {
        WINDOWS_APPS
    }
}

// ---------------------------------------------------------------------------
// macOS
// ---------------------------------------------------------------------------

pub struct MacOpener;

impl PlatformOpener for MacOpener {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        spawn_detached(cmd, &path.to_string_lossy())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        spawn_detached(cmd, url)
    }

    fn launch(&self, program: &str) -> Result<()> {
        let mut cmd = Command::new("open");
        cmd.args(["-a", program]);
        spawn_detached(cmd, program)
    }
}

// ---------------------------------------------------------------------------
// Linux and other Unix
// ---------------------------------------------------------------------------

pub struct LinuxOpener {
    xdg_open: Option<PathBuf>,
}

impl LinuxOpener {
    pub fn new() -> Self {
        Self {
            xdg_open: which::which("xdg-open").ok(),
        }
    }
}

impl Default for LinuxOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformOpener for LinuxOpener {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        let shown = path.to_string_lossy();
        match &self.xdg_open {
            Some(xdg) => {
                let mut cmd = Command::new(xdg);
                cmd.arg(path);
                spawn_detached(cmd, &shown)
            }
            // No desktop handler: try running the path itself.
            None => spawn_detached(Command::new(path), &shown),
        }
    }

    fn open_url(&self, url: &str) -> Result<()> {
        let Some(xdg) = &self.xdg_open else {
            return Err(PrinixError::Unsupported("xdg-open is not installed".into()));
        };
        let mut cmd = Command::new(xdg);
        cmd.arg(url);
        spawn_detached(cmd, url)
    }

    fn launch(&self, program: &str) -> Result<()> {
        spawn_detached(Command::new(program), program)
    }
}
