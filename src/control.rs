//! Concurrent termination (joined) and relaunch (fire-and-forget).

use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::config::ConfirmationPolicy;
use crate::model::{AppDescriptor, KillOutcome};
use crate::platform::ProcessControl;

impl ConfirmationPolicy {
    pub fn confirms(self, outcome: &KillOutcome) -> bool {
        match self {
            ConfirmationPolicy::Lenient => !matches!(outcome, KillOutcome::NotFound),
            ConfirmationPolicy::Strict => matches!(outcome, KillOutcome::Success),
        }
    }
}

/// Terminate every id concurrently and return, in input order, the ids the
/// policy confirms. Blocks until all calls have settled.
pub fn kill_apps(
    control: &dyn ProcessControl,
    ids: &[String],
    policy: ConfirmationPolicy,
) -> Vec<String> {
    if ids.is_empty() {
        return Vec::new();
    }

    let (tx, rx) = crossbeam_channel::bounded(ids.len());
    thread::scope(|scope| {
        for (index, id) in ids.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let outcome = control.kill_app(id);
                let _ = tx.send((index, outcome));
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<Option<KillOutcome>> = vec![None; ids.len()];
    for (index, outcome) in rx.iter() {
        outcomes[index] = Some(outcome);
    }

    let mut confirmed = Vec::new();
    for (id, outcome) in ids.iter().zip(outcomes) {
        let Some(outcome) = outcome else {
            warn!("Termination of {} did not report back", id);
            continue;
        };
        match &outcome {
            KillOutcome::Success => debug!("Terminated {}", id),
            KillOutcome::NotFound => debug!("{} was not running", id),
            KillOutcome::PermissionDenied => warn!("Permission denied terminating {}", id),
            KillOutcome::Failed(err) => warn!("Failed to terminate {}: {}", id, err),
        }
        if policy.confirms(&outcome) {
            confirmed.push(id.clone());
        }
    }
    confirmed
}

/// Terminate the ids behind `targets` and return the descriptors confirmed.
/// Each distinct id is signalled once even if several entries share it.
pub fn terminate_targets(
    control: &dyn ProcessControl,
    targets: &[AppDescriptor],
    policy: ConfirmationPolicy,
) -> Vec<AppDescriptor> {
    let mut ids: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets {
        if !ids.contains(&target.id) {
            ids.push(target.id.clone());
        }
    }

    let confirmed = kill_apps(control, &ids, policy);
    let killed: Vec<AppDescriptor> = targets
        .iter()
        .filter(|t| confirmed.contains(&t.id))
        .cloned()
        .collect();
    info!(
        "Silenced {} of {} distracting apps",
        killed.len(),
        targets.len()
    );
    killed
}

/// Relaunch each app on its own thread. Returns immediately; failures are
/// only logged.
pub fn relaunch_apps(control: Arc<dyn ProcessControl>, apps: Vec<AppDescriptor>) {
    for app in apps {
        let control = Arc::clone(&control);
        thread::spawn(move || match control.relaunch_app(&app) {
            Ok(()) => info!("Relaunched {}", app),
            Err(err) => warn!("Failed to relaunch {}: {:#}", app, err),
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{Result, anyhow};
    use crossbeam_channel::{Receiver, Sender};

    use super::*;

    /// Records every call; kill outcomes are scripted per id.
    pub struct FakeControl {
        pub outcomes: HashMap<String, KillOutcome>,
        pub kill_delay: Duration,
        pub failing_relaunch: Vec<String>,
        pub killed: Mutex<Vec<String>>,
        relaunch_tx: Sender<AppDescriptor>,
        pub relaunch_rx: Receiver<AppDescriptor>,
    }

    impl FakeControl {
        pub fn new() -> Self {
            let (relaunch_tx, relaunch_rx) = crossbeam_channel::unbounded();
            Self {
                outcomes: HashMap::new(),
                kill_delay: Duration::ZERO,
                failing_relaunch: Vec::new(),
                killed: Mutex::new(Vec::new()),
                relaunch_tx,
                relaunch_rx,
            }
        }

        pub fn with_outcome(mut self, id: &str, outcome: KillOutcome) -> Self {
            self.outcomes.insert(id.to_string(), outcome);
            self
        }

        pub fn kill_calls(&self) -> Vec<String> {
            self.killed.lock().unwrap().clone()
        }

        /// Relaunched apps observed within `timeout`, in completion order.
        pub fn relaunched(&self, expected: usize, timeout: Duration) -> Vec<AppDescriptor> {
            let mut seen = Vec::new();
            while seen.len() < expected {
                match self.relaunch_rx.recv_timeout(timeout) {
                    Ok(app) => seen.push(app),
                    Err(_) => break,
                }
            }
            seen
        }
    }

    impl ProcessControl for FakeControl {
        fn list_apps(&self) -> Vec<AppDescriptor> {
            vec![
                AppDescriptor::new("slack", "Slack", "/Applications/Slack.app"),
                AppDescriptor::named("Spotify"),
            ]
        }

        fn kill_app(&self, id: &str) -> KillOutcome {
            if !self.kill_delay.is_zero() {
                thread::sleep(self.kill_delay);
            }
            self.killed.lock().unwrap().push(id.to_string());
            self.outcomes
                .get(id)
                .cloned()
                .unwrap_or(KillOutcome::Success)
        }

        fn relaunch_app(&self, app: &AppDescriptor) -> Result<()> {
            let _ = self.relaunch_tx.send(app.clone());
            if self.failing_relaunch.contains(&app.id) {
                return Err(anyhow!("cannot start {}", app.id));
            }
            Ok(())
        }
    }
}
