// Macros for user-facing output. Results go to stdout, notes and problems to stderr.

fn show_icons() -> bool {
    std::env::var_os("NO_ICONS").is_none()
}

pub(crate) fn icon(symbol: &str) -> String {
    if show_icons() {
        format!("{symbol} ")
    } else {
        String::new()
    }
}

#[macro_export]
macro_rules! ui_ok {
    ($($arg:tt)*) => {{
        println!("{}{}", $crate::ui::icon("✔"), format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_info {
    ($($arg:tt)*) => {{
        eprintln!("{}{}", $crate::ui::icon("ℹ"), format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_warn {
    ($($arg:tt)*) => {{
        eprintln!("{}{}", $crate::ui::icon("⚠"), format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_err {
    ($($arg:tt)*) => {{
        eprintln!("{}{}", $crate::ui::icon("✖"), format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_out {
    ($($arg:tt)*) => {{
        println!($($arg)*);
    }};
}

/// Print one machine-readable report as a single JSON line on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> color_eyre::Result<()> {
    use std::io::Write;
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
