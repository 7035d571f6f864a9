//! Terminal console example.
//!
//! Drives the console from stdin and echoes its log to stdout, the way a
//! dedicated server would.
//!
//! Run with: `cargo run --example terminal --no-default-features --features terminal`
//!
//! Commands:
//! - `help` - List available commands and variables
//! - `max_players` - Query a variable
//! - `max_players 16` - Set it
//! - `status` - Show server status
//! - `quit` - Exit the application

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_dev_console::prelude::*;

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 30.0,
            ))),
        )
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut console: Console) {
    console.add_variable("max_players", 32, 32);
    console.add_variable("hostname", "My Server".to_string(), "My Server".to_string());

    console.add_command("status", |_args, world| {
        let registry = world.resource::<ConsoleRegistry>();
        let hostname: String = registry.get("hostname").unwrap_or_default();
        let max_players: i32 = registry.get("max_players").unwrap_or_default();

        let mut log = world.resource_mut::<ConsoleLog>();
        log.append_line(format!("Hostname: {hostname}"));
        log.append_line(format!("Max Players: {max_players}"));
    });

    console.add_command("say", |args, world| {
        let line = if args.is_empty() {
            "Usage: say <message>".to_string()
        } else {
            format!("[SERVER] {}", args.join(" "))
        };
        world.resource_mut::<ConsoleLog>().append_line(line);
    });
}
