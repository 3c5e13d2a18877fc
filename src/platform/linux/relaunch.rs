//! Linux relaunch in a new session so the app outlives us

use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

use crate::model::AppDescriptor;

pub fn relaunch_app(app: &AppDescriptor) -> Result<()> {
    let target = if app.detail.is_empty() {
        &app.id
    } else {
        &app.detail
    };

    // setsid -f forks and returns at once, so there is no child to reap.
    let status = Command::new("setsid")
        .args(["-f", target])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to execute setsid")?;

    if !status.success() {
        return Err(anyhow!("setsid -f {} exited with {}", target, status));
    }
    Ok(())
}
