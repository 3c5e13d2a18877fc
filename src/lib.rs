pub mod app;
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub use app::run;
pub use app::run_console;

pub mod config;
pub mod control;
pub mod controller;
pub mod kill_list;
pub mod model;
pub mod session;
pub mod ticker;
pub mod utils;
pub mod watcher;
pub mod worker;

// Platform abstraction layer
pub mod platform;

// UI modules
pub mod ui {
    pub mod console;
    pub mod menu;

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    pub mod icon;
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    pub mod tray;
}

// Re-export platform-specific implementations through unified interface
pub mod notify {
    pub use crate::platform::current::notify::*;
}
