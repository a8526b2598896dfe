// common.rs — print front-end shared by every crate in the input core
//
// All recoverable failures end up here as log lines. Output goes through
// `tracing`; a redirect buffer can capture it instead (used by tests and by
// anything that wants to show the text on screen).

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================
// Redirect buffer for com_printf
// ============================================================

thread_local! {
    // Per event thread; the input core never logs from more than one.
    static RD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Begin redirecting printf output into a buffer.
pub fn com_begin_redirect() {
    RD_BUFFER.with(|buf| *buf.borrow_mut() = Some(String::new()));
}

/// End redirect and return the captured output.
pub fn com_end_redirect() -> Option<String> {
    RD_BUFFER.with(|buf| buf.borrow_mut().take())
}

/// Append to the redirect buffer if one is active.
fn redirect(msg: &str) -> bool {
    RD_BUFFER.with(|buf| {
        if let Some(ref mut s) = *buf.borrow_mut() {
            s.push_str(msg);
            true
        } else {
            false
        }
    })
}

// ============================================================
// com_printf / com_dprintf / com_log_error
// ============================================================

// Mirrors the `developer` cvar of the context that drives logging.
static DEVELOPER: AtomicBool = AtomicBool::new(false);

pub(crate) fn com_set_developer(on: bool) {
    DEVELOPER.store(on, Ordering::Relaxed);
}

pub fn com_developer() -> bool {
    DEVELOPER.load(Ordering::Relaxed)
}

/// General-purpose print function.
pub fn com_printf(msg: &str) {
    if redirect(msg) {
        return;
    }
    tracing::info!("{}", msg.trim_end_matches('\n'));
}

/// Developer-only print. Only prints when the `developer` cvar is set.
pub fn com_dprintf(msg: &str) {
    if !com_developer() {
        return;
    }
    if redirect(msg) {
        return;
    }
    tracing::debug!("{}", msg.trim_end_matches('\n'));
}

/// Error print for recoverable platform failures. Never aborts.
pub fn com_log_error(msg: &str) {
    if redirect(msg) {
        return;
    }
    tracing::error!("{}", msg.trim_end_matches('\n'));
}

// ============================================================
// Subscriber setup
// ============================================================

/// Install the fmt subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn com_init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_captures_printf() {
        com_begin_redirect();
        com_printf("hello\n");
        com_log_error("failed: thing\n");
        let out = com_end_redirect().unwrap();
        assert_eq!(out, "hello\nfailed: thing\n");
    }

    #[test]
    fn test_end_redirect_without_begin() {
        assert!(com_end_redirect().is_none());
    }

    #[test]
    fn test_init_logging_twice() {
        com_init_logging(false);
        com_init_logging(true);
    }
}
