//! One-second tick scheduler. At most one ticker thread is live; every tick
//! carries the generation it was started with so late ticks from a stopped
//! ticker can be told apart.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Sender, select};

use crate::model::{EventSink, UserEvent};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Ticker {
    sink: Arc<dyn EventSink>,
    period: Duration,
    generation: u64,
    stop_tx: Option<Sender<()>>,
}

impl Ticker {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_period(sink, TICK_PERIOD)
    }

    pub fn with_period(sink: Arc<dyn EventSink>, period: Duration) -> Self {
        Self {
            sink,
            period,
            generation: 0,
            stop_tx: None,
        }
    }

    /// Stop any live ticker, then start a new one. Returns its generation.
    pub fn start(&mut self) -> u64 {
        self.stop();
        self.generation += 1;
        let generation = self.generation;
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let sink = Arc::clone(&self.sink);
        let ticks = crossbeam_channel::tick(self.period);

        thread::spawn(move || {
            loop {
                select! {
                    // Fires when the sender is dropped.
                    recv(stop_rx) -> _ => break,
                    recv(ticks) -> _ => {
                        if !sink.send_event(UserEvent::Tick { generation }) {
                            break;
                        }
                    }
                }
            }
            log::trace!("ticker {} stopped", generation);
        });

        self.stop_tx = Some(stop_tx);
        log::debug!("ticker {} started", generation);
        generation
    }

    pub fn stop(&mut self) {
        self.stop_tx.take();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// True only for ticks of the ticker that is live right now.
    pub fn accepts(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> (Ticker, crossbeam_channel::Receiver<UserEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Ticker::with_period(Arc::new(tx), Duration::from_millis(10)), rx)
    }

    fn next_generation(rx: &crossbeam_channel::Receiver<UserEvent>) -> u64 {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(UserEvent::Tick { generation }) => generation,
            other => panic!("expected tick, got {:?}", other),
        }
    }

    #[test]
    fn restart_supersedes_previous_generation() {
        let (mut ticker, rx) = ticker();
        let first = ticker.start();
        assert_eq!(next_generation(&rx), first);

        let second = ticker.start();
        assert!(!ticker.accepts(first));
        assert!(ticker.accepts(second));

        // Drain whatever the first ticker queued before it noticed the stop.
        let mut seen_second = false;
        for _ in 0..20 {
            if next_generation(&rx) == second {
                seen_second = true;
                break;
            }
        }
        assert!(seen_second);
        thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        // From here on only the live generation arrives.
        for _ in 0..5 {
            assert_eq!(next_generation(&rx), second);
        }
    }

    #[test]
    fn stop_rejects_all_generations() {
        let (mut ticker, rx) = ticker();
        let generation = ticker.start();
        ticker.stop();
        assert!(!ticker.is_running());
        assert!(!ticker.accepts(generation));

        // Allow an in-flight tick, then silence.
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(60)).is_err());
    }
}
