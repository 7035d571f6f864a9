//! Terminal backend for headless/dedicated server console.
//!
//! Lines read from stdin are submitted like typed input, and every line the
//! console log gains is written to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{ConsoleInputEvent, ConsoleLog, PROMPT_MARKER};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .init_resource::<TerminalCursor>()
            .add_systems(PreUpdate, read_stdin)
            .add_systems(Last, write_stdout);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { colored: false } // Disabled by default - causes issues on some terminals
    }
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

/// How many console log lines have been written out so far.
#[derive(Resource, Default)]
struct TerminalCursor(u64);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines().map_while(Result::ok) {
            let text = line.trim_end_matches(['\r', '\n']).to_string();
            if sender.send(text).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(receiver: Res<StdinReceiver>, mut events: MessageWriter<ConsoleInputEvent>) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    while let Ok(line) = rx.try_recv() {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn write_stdout(
    log: Option<Res<ConsoleLog>>,
    mut cursor: ResMut<TerminalCursor>,
    config: Res<TerminalConfig>,
) {
    let Some(log) = log else { return };
    if log.appended() == cursor.0 {
        return;
    }

    let mut stdout = io::stdout().lock();
    for line in log.lines_since(cursor.0) {
        let _ = if config.colored {
            writeln!(stdout, "{}{}\x1b[0m", line_color(line), line)
        } else {
            writeln!(stdout, "{line}")
        };
    }
    let _ = stdout.flush();
    cursor.0 = log.appended();
}

fn line_color(line: &str) -> &'static str {
    if line.starts_with(PROMPT_MARKER) {
        "\x1b[36m"
    } else if line.starts_with("[ERROR]") {
        "\x1b[31m"
    } else if line.starts_with("[WARN]") {
        "\x1b[33m"
    } else if line.starts_with("[DEBUG]") || line.starts_with("[TRACE]") {
        "\x1b[90m"
    } else {
        "\x1b[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_color() {
        assert_eq!(line_color("\\help"), "\x1b[36m");
        assert_eq!(line_color("[WARN] low memory"), "\x1b[33m");
        assert_eq!(line_color("Commands:"), "\x1b[0m");
    }
}
