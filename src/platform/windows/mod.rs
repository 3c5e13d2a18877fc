//! Windows strategy: PowerShell inventory keyed by image path, taskkill by
//! image name, relaunch from the recorded path.

pub mod apps;
pub mod kill;
pub mod notify;
pub mod relaunch;

use anyhow::Result;

use crate::model::{AppDescriptor, KillOutcome};
use crate::platform::ProcessControl;

pub struct WindowsControl;

impl ProcessControl for WindowsControl {
    fn list_apps(&self) -> Vec<AppDescriptor> {
        apps::list_apps()
    }

    fn kill_app(&self, id: &str) -> KillOutcome {
        kill::terminate_image(id)
    }

    fn relaunch_app(&self, app: &AppDescriptor) -> Result<()> {
        relaunch::relaunch_app(app)
    }
}
