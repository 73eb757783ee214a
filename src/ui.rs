use crate::sandbox::telemetry::{LogEntry, TelemetryKind};
use anyhow::{Context, Result, anyhow, bail};

/// write one coloured line; shared by the output macros below
#[doc(hidden)]
#[macro_export]
macro_rules! __ui_line {
    ($stream:ident, $color:ident, $($arg:tt)*) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::$stream(), "{}", format!($($arg)*).$color());
    }};
}

#[macro_export]
macro_rules! warning {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__ui_line!(stderr, yellow, $fmt $(, $($arg)*)?)
    };
    ($expr:expr) => {
        $crate::__ui_line!(stderr, yellow, "{}", $expr)
    };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__ui_line!(stderr, red, $fmt $(, $($arg)*)?)
    };
    ($expr:expr) => {
        $crate::__ui_line!(stderr, red, "{}", $expr)
    };
}

#[macro_export]
macro_rules! status {
    ($fmt:literal $(, $($arg:tt)*)?) => {
        $crate::__ui_line!(stdout, green, $fmt $(, $($arg)*)?)
    };
    ($expr:expr) => {
        $crate::__ui_line!(stdout, green, "{}", $expr)
    };
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $fmt $(, $($arg)*)?);
    }};
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", $expr);
    }};
}

/// print a telemetry entry from the preview, coloured by kind
pub fn print_log_entry(entry: &LogEntry) {
    use chrono::{Local, TimeZone};
    use colored::Colorize;

    let time = Local
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let line = format!("{time} [{}] {}", kind_label(entry.kind), entry.message);
    match entry.kind {
        TelemetryKind::Error => error!(line),
        TelemetryKind::Warn => warning!(line),
        TelemetryKind::Info => info!("{}", line.blue()),
        TelemetryKind::Log => info!(line),
    }
}

fn kind_label(kind: TelemetryKind) -> &'static str {
    match kind {
        TelemetryKind::Log => "log",
        TelemetryKind::Error => "error",
        TelemetryKind::Warn => "warn",
        TelemetryKind::Info => "info",
    }
}

/// single-key choice between options; enter picks the first one.
/// returns the lowercased first character of the chosen option
pub fn prompt(options: &[&str]) -> Result<char> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode},
    };
    use std::io::{self, Write};

    debug_assert!(!options.is_empty(), "prompt requires at least one option");

    // "[Y]ES/[n]o" style labels and their keys
    let mut labels = Vec::with_capacity(options.len());
    let mut keys = Vec::with_capacity(options.len());
    for opt in options {
        let mut chars = opt.chars();
        let first = chars.next().context("prompt options cannot be empty")?;
        labels.push(format!("[{first}]{}", chars.as_str()));
        keys.push(first.to_lowercase().next().unwrap_or(first));
    }

    print!("{} ? ", labels.join("/"));
    let _ = io::stdout().flush();

    enable_raw_mode().context("this command requires an interactive terminal")?;

    let choice = loop {
        let Ok(Event::Key(KeyEvent {
            code, modifiers, ..
        })) = event::read()
        else {
            continue;
        };
        match code {
            KeyCode::Esc => break None,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
            KeyCode::Enter => break Some(0),
            KeyCode::Char(c) => {
                let lower = c.to_lowercase().next().unwrap_or(c);
                if let Some(idx) = keys.iter().position(|&k| k == lower) {
                    break Some(idx);
                }
            }
            _ => {}
        }
    };

    disable_raw_mode().ok();
    match choice {
        Some(idx) => {
            info!(options[idx]);
            Ok(keys[idx])
        }
        None => {
            info!("^C");
            bail!("cancelled")
        }
    }
}

pub fn edit_one_line(line: &str) -> Result<String> {
    use rustyline::DefaultEditor;

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;
    match editor.readline_with_initial("? ", (line, "")) {
        Ok(edited) => Ok(edited.trim().to_string()),
        Err(_) => {
            info!("^C");
            bail!("cancelled")
        }
    }
}

pub fn edit_multi_line(text: &str) -> Result<String> {
    use std::env;
    use std::fs;
    use std::io::Write;
    use std::process::Command;
    use tempfile::Builder;

    let editor = env::var("EDITOR").context("EDITOR not set")?;

    let mut temp_file = Builder::new()
        .prefix("pagesmith-commit-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create temporary file")?;
    temp_file
        .write_all(text.as_bytes())
        .context("failed to write to temporary file")?;
    temp_file
        .flush()
        .context("failed to flush temporary file")?;

    let temp_path = temp_file.path().to_owned();

    // run via shell so arguments inside EDITOR are honoured
    let quoted = shlex::try_quote(&temp_path.to_string_lossy())
        .map_err(|e| anyhow!("failed to quote temporary path: {e}"))?
        .into_owned();
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{editor} {quoted}"))
        .status()
        .with_context(|| format!("failed to run editor: {editor}"))?;
    if !status.success() {
        bail!("editor exited with {status}");
    }

    let edited = fs::read_to_string(&temp_path).context("failed to read edited message")?;
    Ok(edited.trim().to_string())
}
