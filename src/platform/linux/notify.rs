//! Linux notifications using notify-send

use std::process::Command;

pub fn notify(title: &str, body: &str) {
    if let Err(err) = Command::new("notify-send")
        .args(["--app-name=focusguard", title, body])
        .spawn()
    {
        log::debug!("notify-send unavailable: {}", err);
    }
}
