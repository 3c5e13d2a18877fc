use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;

use crate::control::terminate_targets;
use crate::model::{EventSink, UserEvent, WorkerCommand};
use crate::platform::ProcessControl;

/// Runs the blocking OS work off the control thread: the termination join
/// barrier and inventory listing. Results come back as `UserEvent`s.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    sink: Arc<dyn EventSink>,
    control: Arc<dyn ProcessControl>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for command in rx.iter() {
            let delivered = match command {
                WorkerCommand::Terminate { targets, policy } => {
                    let killed = terminate_targets(control.as_ref(), &targets, policy);
                    sink.send_event(UserEvent::TerminationSettled(killed))
                }
                WorkerCommand::ListApps => {
                    let apps = control.list_apps();
                    log::debug!("Inventory listed {} apps", apps.len());
                    sink.send_event(UserEvent::InventoryReady(apps))
                }
            };
            if !delivered {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ConfirmationPolicy;
    use crate::control::testing::FakeControl;
    use crate::model::{AppDescriptor, KillOutcome};

    #[test]
    fn terminate_reports_confirmed_targets() {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let control = FakeControl::new().with_outcome("gone", KillOutcome::NotFound);
        let handle = spawn_worker(cmd_rx, Arc::new(event_tx), Arc::new(control));

        let slack = AppDescriptor::named("slack");
        cmd_tx
            .send(WorkerCommand::Terminate {
                targets: vec![slack.clone(), AppDescriptor::named("gone")],
                policy: ConfirmationPolicy::Lenient,
            })
            .unwrap();
        cmd_tx.send(WorkerCommand::ListApps).unwrap();
        drop(cmd_tx);

        match event_rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            UserEvent::TerminationSettled(killed) => assert_eq!(killed, vec![slack]),
            other => panic!("unexpected {:?}", other),
        }
        match event_rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            UserEvent::InventoryReady(apps) => assert_eq!(apps.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        handle.join().unwrap();
    }
}
