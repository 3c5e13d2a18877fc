//! Linux (and other Unix) strategy: command names throughout.

pub mod apps;
pub mod kill;
pub mod notify;
pub mod relaunch;

use anyhow::Result;

use crate::model::{AppDescriptor, KillOutcome};
use crate::platform::ProcessControl;

pub struct LinuxControl;

impl ProcessControl for LinuxControl {
    fn list_apps(&self) -> Vec<AppDescriptor> {
        apps::list_apps()
    }

    fn kill_app(&self, id: &str) -> KillOutcome {
        kill::terminate_app(id)
    }

    fn relaunch_app(&self, app: &AppDescriptor) -> Result<()> {
        relaunch::relaunch_app(app)
    }
}
