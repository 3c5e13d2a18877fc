//! Windows relaunch from the recorded image path

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::AppDescriptor;
use crate::utils::hidden_command;

pub fn relaunch_app(app: &AppDescriptor) -> Result<()> {
    if Path::new(&app.detail).is_absolute() {
        std::process::Command::new(&app.detail)
            .spawn()
            .with_context(|| format!("failed to start {}", app.detail))?;
    } else {
        // Only the image name is known: let the shell resolve it.
        hidden_command("cmd")
            .args(["/C", "start", "", &app.id])
            .spawn()
            .with_context(|| format!("failed to start {}", app.id))?;
    }
    Ok(())
}
