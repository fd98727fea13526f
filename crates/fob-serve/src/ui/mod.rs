//! Terminal output for the dev server.
//!
//! Status lines go to stderr so stdout stays free for `check` output.
//!
//! ```no_run
//! use fob_serve::ui;
//!
//! ui::init_colors(false);
//! ui::success("Staged 3 files");
//! ui::warning("Rebuild failed, keeping previous assets");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_staged_summary, server_banner};
pub use messages::{error, info, success, warning};

/// Whether colored output should be used.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise stderr must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Apply the color decision process-wide.
///
/// `no_color` forces plain output regardless of the environment.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    owo_colors::set_override(enabled);
    console::set_colors_enabled_stderr(enabled);
}
