/// User interface and status output utilities
///
/// This module handles:
/// - Serialized console output
/// - Colored terminal text
/// - Status, notice and error message formatting
use lazy_static::lazy_static;
use std::io::{IsTerminal, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Allow or forbid colored stderr output (`--no-color`)
pub fn set_colors(enabled: bool) {
    COLORS.store(enabled, Ordering::Relaxed);
}

/// Colors are written only when allowed and stderr is a terminal
fn stderr_colors() -> bool {
    COLORS.load(Ordering::Relaxed) && std::io::stderr().is_terminal()
}

/// Execute a function with exclusive access to console output
fn status_lock<F>(f: F)
where
    F: FnOnce(),
{
    lazy_static! {
        static ref LOCK: Mutex<()> = Mutex::new(());
    }
    let _guard = LOCK.lock();
    f();
}

/// Print colored, bold text to stderr, with fallback to plain text
fn eprint_color(s: &str, fg: term::color::Color) {
    if !stderr_colors() || !really_print_color(s, fg) {
        eprint!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        let Some(mut t) = term::stderr() else {
            return false;
        };
        if t.fg(fg).is_err() {
            return false;
        }
        let _ = t.attr(term::Attr::Bold);
        if write!(t, "{}", s).is_err() {
            return false;
        }
        let _ = t.reset();
        true
    }
}

/// Print a status message with "bench-viewer: " prefix
pub fn status(s: &str) {
    status_lock(|| {
        println!("bench-viewer: {}", s);
    });
}

/// Print a non-fatal notice with a colored "note" prefix
pub fn print_notice(msg: &str) {
    status_lock(|| {
        eprint_color("note", term::color::BRIGHT_YELLOW);
        eprintln!(": {}", msg);
    });
}

/// Print an error message with colored "error" prefix
pub fn print_error(msg: &str) {
    status_lock(|| {
        eprintln!();
        eprint_color("error", term::color::BRIGHT_RED);
        eprintln!(": {}", msg);
        eprintln!();
    });
}
