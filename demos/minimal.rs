//! Minimal headless console example.
//!
//! Drives the console programmatically without any UI and prints what it
//! writes to its log.
//!
//! Run with: `cargo run --example minimal --no-default-features`

use bevy::prelude::*;
use bevy_dev_console::prelude::*;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .add_systems(Last, print_new_lines)
        .run();
}

fn setup(mut console: Console) {
    console.add_variable("gravity", 800.0f32, 800.0);

    console.add_command("greet", |args, world| {
        let name = args.get(0).unwrap_or("World");
        world
            .resource_mut::<ConsoleLog>()
            .append_line(format!("Hello, {name}!"));
    });

    println!("Console initialized. Registered: gravity, greet");
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    // Query a variable
    events.write(ConsoleInputEvent::new("gravity"));

    // Set it, then query again
    events.write(ConsoleInputEvent::new("gravity 1000"));
    events.write(ConsoleInputEvent::new("gravity"));

    events.write(ConsoleInputEvent::new("greet Developer"));
    events.write(ConsoleInputEvent::new("reset gravity"));
    events.write(ConsoleInputEvent::new("quit"));
}

fn print_new_lines(log: Res<ConsoleLog>, mut seen: Local<u64>) {
    for line in log.lines_since(*seen) {
        println!("{line}");
    }
    *seen = log.appended();
}
