use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::config::{get_settings_path, load_settings_from};
use crate::controller::{Controller, Presenter};
use crate::model::{EventSink, UserEvent};
use crate::platform::current_control;
use crate::ticker::Ticker;
use crate::ui::console::{ConsolePresenter, HELP, spawn_stdin_reader};
use crate::watcher::spawn_settings_watcher;
use crate::worker::spawn_worker;

/// Load settings and start the background threads. The returned controller
/// belongs to the calling thread.
fn start_controller(sink: Arc<dyn EventSink>, presenter: Box<dyn Presenter>) -> Controller {
    let settings_path = get_settings_path();
    let settings = load_settings_from(&settings_path);
    info!(
        "Loaded settings: focus {}m, break {}m, {} distracting apps",
        settings.focus_time,
        settings.break_time,
        settings.app_kill_list.len()
    );

    let control = current_control();
    let (worker_tx, worker_rx) = crossbeam_channel::unbounded();
    let _worker = spawn_worker(worker_rx, Arc::clone(&sink), Arc::clone(&control));
    let _settings_watcher = spawn_settings_watcher(Arc::clone(&sink), settings_path.clone());
    let ticker = Ticker::new(sink);

    Controller::new(settings, settings_path, ticker, worker_tx, control, presenter)
}

pub fn run_console() -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded::<UserEvent>();
    let sink: Arc<dyn EventSink> = Arc::new(tx);
    let mut controller = start_controller(Arc::clone(&sink), Box::new(ConsolePresenter::new()));
    let _stdin_reader = spawn_stdin_reader(sink);

    println!("{}", HELP);
    controller.present();
    for event in rx.iter() {
        if !controller.handle(event) {
            break;
        }
    }
    Ok(())
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub use tray::run;

#[cfg(any(target_os = "macos", target_os = "windows"))]
mod tray {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use tray_icon::menu::MenuEvent;
    use winit::event::{Event, StartCause};
    use winit::event_loop::{ControlFlow, EventLoop, EventLoopProxy};

    use super::start_controller;
    use crate::model::{EventSink, MenuAction, UserEvent};
    use crate::ui::menu::parse_menu_id;
    use crate::ui::tray::TrayPresenter;

    const MENU_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Background threads post into the winit loop through its proxy.
    struct ProxySink(Mutex<EventLoopProxy<UserEvent>>);

    impl EventSink for ProxySink {
        fn send_event(&self, event: UserEvent) -> bool {
            match self.0.lock() {
                Ok(proxy) => proxy.send_event(event).is_ok(),
                Err(_) => false,
            }
        }
    }

    pub fn run() -> Result<()> {
        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .context("failed to create event loop")?;
        let sink: Arc<dyn EventSink> = Arc::new(ProxySink(Mutex::new(event_loop.create_proxy())));
        let menu_receiver = MenuEvent::receiver().clone();

        let tray = TrayPresenter::new()?;
        let mut controller = start_controller(sink, Box::new(tray));
        controller.present();
        // The picker lives in the menu, so list apps up front.
        controller.handle(UserEvent::MenuAction(MenuAction::RefreshApps));

        #[allow(deprecated)]
        let run_result = event_loop.run(move |event, event_loop| match event {
            Event::NewEvents(StartCause::Init) => {
                event_loop
                    .set_control_flow(ControlFlow::WaitUntil(Instant::now() + MENU_POLL_INTERVAL));
            }
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                while let Ok(event) = menu_receiver.try_recv() {
                    if let Some(action) = parse_menu_id(event.id().as_ref()) {
                        if !controller.handle(UserEvent::MenuAction(action)) {
                            event_loop.exit();
                            return;
                        }
                    }
                }
                event_loop
                    .set_control_flow(ControlFlow::WaitUntil(Instant::now() + MENU_POLL_INTERVAL));
            }
            Event::UserEvent(user_event) => {
                if !controller.handle(user_event) {
                    event_loop.exit();
                }
            }
            _ => {}
        });

        run_result.context("event loop terminated with error")
    }
}
