//! User-facing console output.
//! Consistent prefixed messages, colored only when stdout is a TTY. Reports and
//! listings go through `print_user` unprefixed so they stay scriptable.

use owo_colors::{OwoColorize, Style};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn prefixed(tag: &str, style: Style, msg: &str) -> String {
    if is_tty() {
        format!("{} {}", tag.style(style), msg)
    } else {
        format!("{tag} {msg}")
    }
}

pub fn print_info(msg: &str) {
    println!("{}", prefixed("info:", Style::new().cyan().bold(), msg));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", prefixed("warn:", Style::new().yellow().bold(), msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", prefixed("error:", Style::new().red().bold(), msg));
}

pub fn print_success(msg: &str) {
    println!("{}", prefixed("ok:", Style::new().green().bold(), msg));
}

/// Print plain text (no prefix) such as the copy report or a config listing.
/// A trailing newline in `msg` is not doubled.
pub fn print_user(msg: &str) {
    println!("{}", msg.trim_end_matches('\n'));
}
