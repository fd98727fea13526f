//! One-line status messages on stderr.
//!
//! Colors go through `if_supports_color`, so `--no-color` and `NO_COLOR`
//! are honored once [`init_colors`](super::init_colors) has run.

use owo_colors::{OwoColorize, Stream::Stderr, Style};

fn marker(symbol: &str, style: Style) -> String {
    symbol
        .if_supports_color(Stderr, |s| s.style(style))
        .to_string()
}

pub fn success(message: &str) {
    eprintln!("{} {}", marker("✓", Style::new().green().bold()), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", marker("ℹ", Style::new().blue().bold()), message);
}

pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        marker("⚠", Style::new().yellow().bold()),
        message.if_supports_color(Stderr, |m| m.yellow())
    );
}

pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        marker("✗", Style::new().red().bold()),
        message.if_supports_color(Stderr, |m| m.red())
    );
}
