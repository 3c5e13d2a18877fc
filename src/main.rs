use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let console = std::env::args().skip(1).any(|arg| arg == "--console");

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    if !console {
        return focusguard::run();
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    if !console {
        log::debug!("No tray on this platform, using the console");
    }

    focusguard::run_console()
}
