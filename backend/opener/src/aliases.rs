/// Well-known application aliases, checked when no filesystem path matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppAlias {
    pub key: &'static str,
    pub program: &'static str,
}

impl AppAlias {
    /// A target matches when either string contains the other.
    pub fn matches(&self, target_lower: &str) -> bool {
        target_lower.contains(self.key) || self.key.contains(target_lower)
    }

    /// Key with the first letter upper-cased and the rest lower-cased.
    pub fn display_name(&self) -> String {
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

/// Checked in order; the first match wins.
pub const WINDOWS_APPS: &[AppAlias] = &[
    AppAlias { key: "notepad", program: "notepad.exe" },
    AppAlias { key: "calculator", program: "calc.exe" },
    AppAlias { key: "cmd", program: "cmd.exe" },
    AppAlias { key: "paint", program: "mspaint.exe" },
    AppAlias { key: "explorer", program: "explorer.exe" },
    AppAlias { key: "task manager", program: "taskmgr.exe" },
    AppAlias {
        key: "chrome",
        program: r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    },
    AppAlias {
        key: "edge",
        program: r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    },
];

/// First alias matching `target_lower`.
pub fn find_alias<'a>(aliases: &'a [AppAlias], target_lower: &str) -> Option<&'a AppAlias> {
    aliases.iter().find(|alias| alias.matches(target_lower))
}
