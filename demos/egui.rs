//! Egui console example.
//!
//! Run with: `cargo run --example egui`
//!
//! Controls:
//! - ` (grave) toggles the console, Shift+` toggles the input-only mini mode
//! - Enter submits, Tab lists completions
//! - ArrowUp/ArrowDown recall history, PageUp/PageDown scroll, F3 jumps to the bottom
//!
//! Try these commands:
//! - `help`, `cmdlist`, `cvarlist`
//! - `gravity 1200` then `reset gravity`
//! - `spawn` / `despawn`
//! - `screenshot`

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, save_to_disk};
use bevy_dev_console::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            custom_layer: bevy_dev_console::logging::custom_log_layer,
            ..default()
        }))
        .add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (report_changes, request_screenshots))
        .run();
}

/// Marker for demo entities.
#[derive(Component)]
struct DemoEntity;

/// Paths the `screenshot` command asked for, saved from a regular system.
#[derive(Resource, Default, Clone)]
struct ScreenshotQueue(std::sync::Arc<std::sync::Mutex<Vec<std::path::PathBuf>>>);

fn setup(mut commands: Commands, mut console: Console, mut shots: ResMut<ScreenshotSettings>) {
    commands.spawn(Camera2d);

    let queue = ScreenshotQueue::default();
    let pending = queue.clone();
    shots.set_capture(move |path: &std::path::Path| {
        pending
            .0
            .lock()
            .map_err(|_| ConsoleError::Capture("capture queue poisoned".into()))?
            .push(path.to_path_buf());
        Ok(())
    });
    commands.insert_resource(queue);

    console.add_variable("gravity", 800.0f32, 800.0);
    console.add_variable("show_fps", false, false);

    console.add_command("spawn", |_args, world| {
        world.spawn((
            Sprite {
                color: Color::srgb(0.3, 0.7, 0.3),
                custom_size: Some(Vec2::new(50.0, 50.0)),
                ..default()
            },
            DemoEntity,
        ));
        info!("Spawned entity");
    });

    console.add_command("despawn", |_args, world| {
        let entities: Vec<Entity> = world
            .query_filtered::<Entity, With<DemoEntity>>()
            .iter(world)
            .collect();
        let count = entities.len();
        for entity in entities {
            world.despawn(entity);
        }
        info!("Despawned {count} entities");
    });

    info!("Press ` to open the console. Try: help, spawn, gravity 1200");
}

fn report_changes(mut events: MessageReader<ConVarChangedEvent>) {
    for event in events.read() {
        info!("{} changed from {} to {}", event.name, event.old_value, event.new_value);
    }
}

fn request_screenshots(mut commands: Commands, queue: Res<ScreenshotQueue>) {
    let Ok(mut paths) = queue.0.lock() else {
        return;
    };
    for path in paths.drain(..) {
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(path));
    }
}
