//! Platform abstraction layer
//!
//! Each host provides one `ProcessControl` strategy covering:
//! - Inventory of user-facing applications
//! - Termination by process name
//! - Relaunch of a previously terminated application
//!
//! plus desktop notifications under `current::notify`.

use std::process::Command;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::model::{AppDescriptor, KillOutcome, sort_and_dedup};

#[cfg(unix)]
pub mod linux;

#[cfg(unix)]
pub mod macos;

#[cfg(unix)]
mod unix;

pub mod windows;

// Re-export the current platform's modules
#[cfg(target_os = "macos")]
pub use macos as current;

#[cfg(target_os = "windows")]
pub use windows as current;

#[cfg(all(unix, not(target_os = "macos")))]
pub use linux as current;

/// Names shorter than this are treated as noise.
pub const MIN_NAME_LEN: usize = 3;

pub trait ProcessControl: Send + Sync {
    /// Running user-facing applications, sorted by display label and unique
    /// by `(id, detail)`. Failures come back as a single error sentinel.
    fn list_apps(&self) -> Vec<AppDescriptor>;

    /// Issue one termination request for every process named `id`.
    fn kill_app(&self, id: &str) -> KillOutcome;

    /// Start `app` again, preferring its `detail` target.
    fn relaunch_app(&self, app: &AppDescriptor) -> Result<()>;
}

/// The strategy for the host this binary was built for.
pub fn current_control() -> Arc<dyn ProcessControl> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::MacosControl)
    }
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsControl)
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Arc::new(linux::LinuxControl)
    }
}

/// Run a listing command and return its stdout.
pub(crate) fn listing_output(command: &mut Command, what: &str) -> Result<String> {
    let output = command
        .output()
        .with_context(|| format!("failed to execute {}", what))?;

    if !output.status.success() {
        return Err(anyhow!(
            "{} failed: {}",
            what,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Apply the shared noise filters, then sort and deduplicate.
pub(crate) fn finish_inventory(
    apps: Vec<AppDescriptor>,
    blacklist: &[&str],
    own_name: Option<&str>,
) -> Vec<AppDescriptor> {
    let mut apps: Vec<AppDescriptor> = apps
        .into_iter()
        .filter(|app| {
            let name = app.id.trim_end_matches(".exe");
            if name.chars().count() < MIN_NAME_LEN {
                return false;
            }
            if let Some(own) = own_name
                && name.eq_ignore_ascii_case(own)
            {
                return false;
            }
            !blacklist
                .iter()
                .any(|b| b.eq_ignore_ascii_case(name) || b.eq_ignore_ascii_case(&app.display))
        })
        .collect();
    sort_and_dedup(&mut apps);
    apps
}

/// Turn a parse result into the inventory contract.
pub(crate) fn inventory_or_sentinel(result: Result<Vec<AppDescriptor>>) -> Vec<AppDescriptor> {
    match result {
        Ok(apps) => apps,
        Err(err) => {
            log::warn!("App inventory failed: {:#}", err);
            vec![AppDescriptor::error(format!("{:#}", err))]
        }
    }
}

/// File stem of our own executable, so the picker never offers to kill us.
pub(crate) fn own_process_name() -> Option<String> {
    std::env::current_exe()
        .ok()?
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}
