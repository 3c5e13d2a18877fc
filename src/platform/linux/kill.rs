//! Linux process termination using a single SIGTERM

use crate::model::KillOutcome;
use crate::platform::unix::terminate_by_name;

pub fn terminate_app(id: &str) -> KillOutcome {
    let outcome = terminate_by_name(id);
    log::debug!("terminate {} -> {:?}", id, outcome);
    outcome
}
