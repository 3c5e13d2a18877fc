//! macOS notifications using terminal-notifier

use std::process::Command;

use crate::utils::find_command;

const BUNDLE_ID: &str = "com.focusguard.app";

pub fn notify(title: &str, body: &str) {
    // terminal-notifier only: building an osascript string from an app name
    // would allow AppleScript injection.
    let cmd = find_command("terminal-notifier");
    if !std::path::Path::new(&cmd).exists() && Command::new(&cmd).arg("-help").output().is_err() {
        log::debug!("terminal-notifier not available, skipping notification");
        return;
    }

    let _ = Command::new(&cmd)
        .args([
            "-title", title, "-message", body, "-sender", BUNDLE_ID, "-sound", "Glass",
        ])
        .spawn();
}
