use std::path::Path;
use std::process::Command;

/// Find an executable in common locations, falling back to PATH.
/// Lookups are cached per name.
#[cfg(target_os = "macos")]
pub fn find_command(name: &str) -> String {
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    static RESOLVED: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
    let cache = RESOLVED.get_or_init(|| Mutex::new(HashMap::new()));
    let Ok(mut cache) = cache.lock() else {
        return find_in_paths(name, HOMEBREW_PATHS);
    };
    cache
        .entry(name.to_string())
        .or_insert_with(|| find_in_paths(name, HOMEBREW_PATHS))
        .clone()
}

#[cfg(target_os = "macos")]
const HOMEBREW_PATHS: &[&str] = &[
    "/opt/homebrew/bin", // Apple Silicon
    "/usr/local/bin",    // Intel Mac
];

#[cfg(target_os = "macos")]
fn find_in_paths(name: &str, prefix_paths: &[&str]) -> String {
    prefix_paths
        .iter()
        .map(|prefix| format!("{}/{}", prefix, name))
        .find(|full_path| Path::new(full_path).exists())
        .unwrap_or_else(|| name.to_string())
}

/// Non-macOS hosts resolve commands through PATH.
#[cfg(not(target_os = "macos"))]
pub fn find_command(name: &str) -> String {
    name.to_string()
}

/// A `Command` that never flashes a console window on Windows.
pub fn hidden_command(program: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        let mut cmd = Command::new(program);
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }
    #[cfg(not(target_os = "windows"))]
    {
        Command::new(program)
    }
}

/// Open a text file in the platform's default editor.
pub fn open_in_editor(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut cmd = Command::new("open");
        cmd.arg("-t");
        cmd
    };
    #[cfg(target_os = "windows")]
    let mut cmd = hidden_command("notepad");
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(path).spawn().map(|_| ())
}

/// `mm:ss` for the tray tooltip and console status line.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::{find_command, format_remaining};

    #[test]
    fn unknown_commands_fall_back_to_path_lookup() {
        let name = "focusguard-no-such-tool";
        assert_eq!(find_command(name), name);
        assert_eq!(find_command(name), find_command(name));
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(1500), "25:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(6001), "100:01");
    }
}
