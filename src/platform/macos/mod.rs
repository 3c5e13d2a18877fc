//! macOS strategy: `ps` for inventory, SIGTERM by name, `open -a` to relaunch.

pub mod apps;
pub mod kill;
pub mod notify;
pub mod relaunch;

use anyhow::Result;

use crate::model::{AppDescriptor, KillOutcome};
use crate::platform::ProcessControl;

pub struct MacosControl;

impl ProcessControl for MacosControl {
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
