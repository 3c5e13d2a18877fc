//! Hot reload of the settings file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::read_settings;
use crate::model::{EventSink, UserEvent};

const SETTINGS_DEBOUNCE: Duration = Duration::from_millis(500);

pub fn spawn_settings_watcher(
    sink: Arc<dyn EventSink>,
    settings_path: PathBuf,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match Watcher::new(
            move |res: Result<NotifyEvent, notify::Error>| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Failed to create settings watcher: {}", e);
                return;
            }
        };

        // Watch the directory: editors often replace the file instead of
        // writing it in place.
        let Some(dir) = settings_path.parent() else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::error!("Failed to create settings directory: {}", e);
            return;
        }
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            log::error!("Failed to watch settings directory: {}", e);
            return;
        }

        log::debug!("Settings watcher started for {:?}", settings_path);

        while let Ok(result) = rx.recv() {
            if !touches_settings(&result, &settings_path) {
                continue;
            }
            // Read only once the directory has been quiet, so a truncate
            // followed by a write is seen as the final content.
            loop {
                match rx.recv_timeout(SETTINGS_DEBOUNCE) {
                    Ok(_) => continue,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }

            log::debug!("Settings file changed, attempting reload");
            let delivered = match read_settings(&settings_path) {
                Ok(settings) => sink.send_event(UserEvent::SettingsReloaded(settings)),
                Err(e) => {
                    let msg = format!("Settings reload failed: {:#}", e);
                    log::warn!("{}", msg);
                    sink.send_event(UserEvent::SettingsReloadFailed(msg))
                }
            };
            if !delivered {
                break;
            }
        }
    })
}

fn touches_settings(result: &Result<NotifyEvent, notify::Error>, settings_path: &Path) -> bool {
    match result {
        Ok(event) => {
            matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                && event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == settings_path.file_name())
        }
        Err(e) => {
            log::error!("Settings watch error: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use super::*;

    #[test]
    fn reload_reads_content_written_after_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"focusTime": 25}"#).unwrap();

        let (tx, rx) = crossbeam_channel::unbounded::<UserEvent>();
        let _watcher = spawn_settings_watcher(Arc::new(tx), path.clone());
        thread::sleep(Duration::from_millis(300));

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        file.flush().unwrap();
        thread::sleep(Duration::from_millis(100));
        file.write_all(br#"{"focusTime": 50}"#).unwrap();
        file.flush().unwrap();
        drop(file);

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(UserEvent::SettingsReloaded(settings)) => assert_eq!(settings.focus_time, 50),
            other => panic!("expected reloaded settings, got {:?}", other),
        }
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let (tx, rx) = crossbeam_channel::unbounded::<UserEvent>();
        let _watcher = spawn_settings_watcher(Arc::new(tx), path);
        thread::sleep(Duration::from_millis(300));

        std::fs::write(dir.path().join("other.json"), "{}").unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(1500)).is_err());
    }
}
