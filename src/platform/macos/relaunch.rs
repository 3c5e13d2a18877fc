//! macOS relaunch through LaunchServices (`open -a`)

use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::model::AppDescriptor;

pub fn relaunch_app(app: &AppDescriptor) -> Result<()> {
    // `detail` is the bundle path; `open -a` also resolves bare app names.
    let target = if app.detail.is_empty() {
        &app.display
    } else {
        &app.detail
    };

    let output = Command::new("open")
        .args(["-g", "-a", target])
        .output()
        .context("failed to execute open")?;

    if !output.status.success() {
        return Err(anyhow!(
            "open -a {} failed: {}",
            target,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}
