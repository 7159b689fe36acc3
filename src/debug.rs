use std::sync::atomic::{AtomicBool, Ordering};

pub const DEBUG_ENV_VAR: &str = "PROPERTYFINDER_DEBUG";

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Turns debug output on if `--debug` was passed or the environment asks for it.
pub fn init(flag: bool) {
    let from_env = std::env::var(DEBUG_ENV_VAR)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    set_debug(flag || from_env);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            println!("[{}] {}", $crate::debug::timestamp(), format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! debug_eprintln {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[{}] {}", $crate::debug::timestamp(), format!($($arg)*));
        }
    };
}
