//! macOS process termination using a single SIGTERM

use crate::model::KillOutcome;
use crate::platform::unix::terminate_by_name;

/// `id` is the executable name inside the app bundle. No SIGKILL follow-up:
/// apps get to save state and quit on their own.
pub fn terminate_app(id: &str) -> KillOutcome {
    let outcome = terminate_by_name(id);
    log::debug!("terminate {} -> {:?}", id, outcome);
    outcome
}
