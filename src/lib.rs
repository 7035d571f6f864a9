//! An in-game developer console for Bevy.
//!
//! A text overlay that slides down from the top of the screen and lets the
//! operator inspect and change the running app through typed commands and
//! variables:
//!
//! - **Commands**: named callbacks, composed when registered more than once
//! - **Variables**: typed values with a remembered default
//! - **History and completion**: hold-to-repeat recall, prefix listing on tab
//! - **Visibility**: open, closed and an input-only mini mode, with timed slides
//!
//! # Features
//!
//! - `egui` (default): egui-based panel and log capture
//! - `terminal`: stdin/stdout backend for dedicated servers
//!
//! # Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_dev_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     // Register a variable
//!     console.add_variable("gravity", 800, 800);
//!
//!     // Register a command
//!     console.add_command("noclip", |_, _world| {
//!         info!("Noclip toggled!");
//!     });
//!
//!     // Get and set values
//!     let _ = console.set("gravity", 1000);
//!     let gravity: i32 = console.get("gravity").unwrap_or_default();
//!     console.print(format!("gravity is {gravity}"));
//! }
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod screenshot;

// UI modules (feature-gated)
#[cfg(feature = "egui")]
pub mod logging;
#[cfg(feature = "egui")]
pub mod ui;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

pub use config::ConsoleConfig;
pub use core::{
    AcceleratingRepeater, CommandArgs, CommandHandler, ConCommand, ConVar, ConVarChangedEvent,
    ConVarValue, Console, ConsoleError, ConsoleEventsPlugin, ConsoleInput, ConsoleInputEvent,
    ConsoleLayout, ConsoleLog, ConsoleRef, ConsoleRegistry, ConsoleState, ConsoleStateChanged,
    ConsoleVisibility, KeyState, ScrollController, VarType, VarValue, handler, tokenize,
};
pub use screenshot::{FrameCapture, ScreenshotSettings};

#[cfg(feature = "egui")]
pub use ui::ConsoleTheme;

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ConsoleConfig;
    pub use crate::core::{
        CommandArgs, ConVar, ConVarChangedEvent, ConVarValue, Console, ConsoleError,
        ConsoleInputEvent, ConsoleLog, ConsoleRef, ConsoleRegistry, ConsoleState,
        ConsoleStateChanged, ConsoleVisibility, VarValue, handler,
    };
    pub use crate::screenshot::{FrameCapture, ScreenshotSettings};
    pub use crate::{ConsolePlugin, ConsoleSet};
}

/// System set containing the console's per-frame pipeline in [`Update`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsoleSet;

/// Main console plugin.
///
/// # Configuration
///
/// Insert a [`ConsoleConfig`] before or after adding the plugin to change key
/// bindings, panel size and timing:
///
/// ```no_run
/// # use bevy::prelude::*;
/// # use bevy_dev_console::prelude::*;
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .insert_resource(ConsoleConfig {
///         toggle_key: KeyCode::F1,
///         ..default()
///     })
///     .add_plugins(ConsolePlugin);
/// ```
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsoleConfig>()
            .register_type::<ConsoleConfig>()
            .init_resource::<ConsoleRegistry>()
            .init_resource::<ConsoleInput>()
            .init_resource::<ConsoleVisibility>()
            .init_resource::<ScrollController>()
            .init_resource::<ConsoleLog>()
            .init_resource::<ConsoleLayout>()
            .init_resource::<ScreenshotSettings>()
            .init_resource::<PendingLines>()
            .add_plugins(core::ConsoleEventsPlugin);

        // Register built-in commands and variables
        app.add_systems(Startup, register_builtins);

        // Per-frame pipeline. Keys are sampled before any timer advances, and
        // submitted lines run with exclusive World access:
        // 1. apply_config: re-derive layout and timing when inputs changed
        // 2. toggle_console .. handle_console_keys: keys and visibility timers
        // 3. read_console_input: programmatic lines join the same queue
        // 4. execute_pending_lines: run queued lines against the registry
        // 5. flush_pending: send variable changes and exit requests
        // 6. scroll_console: page keys and stick-to-bottom
        app.add_systems(
            Update,
            (
                apply_config,
                toggle_console,
                advance_visibility,
                handle_console_keys,
                read_console_input,
                execute_pending_lines,
                flush_pending,
                scroll_console,
            )
                .chain()
                .in_set(ConsoleSet),
        );

        // egui UI (feature-gated)
        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;

            app.init_resource::<ui::ConsoleTheme>().add_systems(
                EguiPrimaryContextPass,
                ui::render_console.run_if(|v: Res<ConsoleVisibility>| v.is_visible()),
            );
        }

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Append several lines to the console log.
fn print_lines<I>(world: &mut World, lines: I)
where
    I: IntoIterator<Item = String>,
{
    let mut log = world.resource_mut::<ConsoleLog>();
    for line in lines {
        log.append_line(line);
    }
}

fn command_names(world: &World) -> Vec<String> {
    world
        .resource::<ConsoleRegistry>()
        .list_commands()
        .map(str::to_owned)
        .collect()
}

fn variable_names(world: &World) -> Vec<String> {
    world
        .resource::<ConsoleRegistry>()
        .list_variables()
        .map(str::to_owned)
        .collect()
}

/// Register built-in console commands and variables.
fn register_builtins(mut registry: ResMut<ConsoleRegistry>) {
    // Clear - Empty the log and collapse the scroll area
    registry.add_command(
        "Clear",
        handler(|_args, world| {
            world.resource_mut::<ConsoleLog>().clear();
            world.resource_mut::<ScrollController>().jump_to_bottom();
        }),
    );

    // CmdList - List every command
    registry.add_command(
        "CmdList",
        handler(|_args, world| {
            let names = command_names(world);
            print_lines(world, names);
        }),
    );

    // CvarList - List every variable
    registry.add_command(
        "CvarList",
        handler(|_args, world| {
            let names = variable_names(world);
            print_lines(world, names);
        }),
    );

    // Help - Both lists, each under a header, skipping empty ones
    registry.add_command(
        "Help",
        handler(|_args, world| {
            let commands = command_names(world);
            if !commands.is_empty() {
                print_lines(world, std::iter::once("Commands:".to_string()).chain(commands));
            }
            let variables = variable_names(world);
            if !variables.is_empty() {
                print_lines(world, std::iter::once("Variables:".to_string()).chain(variables));
            }
        }),
    );

    // Screenshot - Delegate to the installed frame capture
    registry.add_command(
        "Screenshot",
        handler(|_args, world| {
            let line = match world.resource::<ScreenshotSettings>().take() {
                Ok(path) => format!("Wrote {}", path.display()),
                Err(e) => {
                    debug!("Screenshot failed: {}", e);
                    e.to_string()
                }
            };
            world.resource_mut::<ConsoleLog>().append_line(line);
        }),
    );

    // Quit - Ask the app to exit once this frame's commands have run
    registry.add_command(
        "Quit",
        handler(|_args, world| {
            world.resource_mut::<PendingLines>().quit = true;
        }),
    );

    // Echo - Print the arguments
    registry.add_command(
        "Echo",
        handler(|args, world| {
            world.resource_mut::<ConsoleLog>().append_line(args.join(" "));
        }),
    );

    // Reset - Restore a variable's default
    registry.add_command(
        "Reset",
        handler(|args, world| {
            let Some(name) = args.get(0) else {
                world
                    .resource_mut::<ConsoleLog>()
                    .append_line("Usage: Reset <variable>");
                return;
            };

            let outcome = world
                .resource_mut::<ConsoleRegistry>()
                .variable_mut(name)
                .map(|cvar| {
                    let old_value = cvar.get().clone();
                    cvar.reset();
                    let change = (old_value != *cvar.get()).then(|| {
                        ConVarChangedEvent::new(cvar.name(), old_value, cvar.get().clone())
                    });
                    (cvar.to_string(), change)
                });

            match outcome {
                Ok((line, change)) => {
                    world.resource_mut::<ConsoleLog>().append_line(line);
                    if let Some(change) = change {
                        world.resource_mut::<PendingLines>().changes.push(change);
                    }
                }
                Err(e) => world.resource_mut::<ConsoleLog>().append_line(e.to_string()),
            }
        }),
    );

    registry.add_variable("Boolean", true, false);
    registry.add_variable("Number", 123, 456);
    registry.add_variable("String", String::from("John"), String::from("Empty"));
}

/// Lines waiting for execution and what their execution produced.
#[derive(Resource, Default)]
struct PendingLines {
    queue: Vec<String>,
    changes: Vec<ConVarChangedEvent>,
    quit: bool,
}

/// Re-derive layout and timing from the config, the screen and the log.
fn apply_config(
    config: Res<ConsoleConfig>,
    mut layout: ResMut<ConsoleLayout>,
    mut visibility: ResMut<ConsoleVisibility>,
    mut input: ResMut<ConsoleInput>,
    mut scroll: ResMut<ScrollController>,
    mut log: ResMut<ConsoleLog>,
) {
    if config.is_changed() {
        let (initial, subsequent) = config.repeat_delays();
        input.set_repeat_delays(initial, subsequent);
        scroll.set_repeat_delays(initial, subsequent);
        visibility.set_opening_time(config.opening_time());
        log.set_line_height(config.font_size() * core::LINE_SPACING);
    }

    let next = ConsoleLayout::compute(
        layout.screen_height,
        config.size_percent(),
        config.font_size(),
        &log,
    );
    let resized = next.panel_height != layout.panel_height
        || next.input_block_height != layout.input_block_height;

    if config.is_changed() || resized {
        visibility.set_layout(next.panel_height, next.input_block_height);
        scroll.jump_to_bottom();
    }
    if next != *layout {
        *layout = next;
    }
}

/// Toggle key handling.
fn toggle_console(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    config: Res<ConsoleConfig>,
    mut visibility: ResMut<ConsoleVisibility>,
) {
    let Some(keys) = keys else { return };
    if keys.just_pressed(config.toggle_key) {
        visibility.toggle(config.mini_modifier_held(&keys));
    }
}

/// Advance the slide in flight and report state changes.
fn advance_visibility(
    time: Res<Time>,
    mut visibility: ResMut<ConsoleVisibility>,
    mut changes: MessageWriter<ConsoleStateChanged>,
) {
    visibility.tick(time.delta_secs());
    for (from, to) in visibility.drain_changes() {
        changes.write(ConsoleStateChanged { from, to });
    }
}

/// Completion, submission and history recall while the input row is enabled.
fn handle_console_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    time: Res<Time>,
    config: Res<ConsoleConfig>,
    visibility: Res<ConsoleVisibility>,
    registry: Res<ConsoleRegistry>,
    mut input: ResMut<ConsoleInput>,
    mut log: ResMut<ConsoleLog>,
    mut pending: ResMut<PendingLines>,
) {
    let Some(keys) = keys else { return };
    if !visibility.input_enabled() {
        if input.recall_held() {
            input.cancel_recall();
        }
        return;
    }

    if keys.just_pressed(config.complete_key) {
        input.complete(&registry, &mut log);
    }
    if config.submit_pressed(&keys) {
        let line = input.submit();
        pending.queue.push(line);
    }

    input.update_recall(
        KeyState::read(&keys, config.history_previous_key),
        KeyState::read(&keys, config.history_next_key),
        time.delta(),
    );
}

/// Queue lines submitted through [`ConsoleInputEvent`].
fn read_console_input(
    mut events: MessageReader<ConsoleInputEvent>,
    mut input: ResMut<ConsoleInput>,
    mut pending: ResMut<PendingLines>,
) {
    for event in events.read() {
        input.record(&event.line);
        pending.queue.push(event.line.clone());
    }
}

/// Exclusive system that executes queued lines with full World access.
fn execute_pending_lines(world: &mut World) {
    if world.resource::<PendingLines>().queue.is_empty() {
        return;
    }
    let queue = std::mem::take(&mut world.resource_mut::<PendingLines>().queue);
    for line in queue {
        execute_line(world, &line);
    }
}

/// What the first token of a line resolved to.
enum Target {
    Command(String, Vec<CommandHandler>),
    Variable,
    Unknown,
}

/// Echo, tokenize and dispatch one submitted line.
fn execute_line(world: &mut World, raw: &str) {
    world
        .resource_mut::<ConsoleLog>()
        .append_line(format!("{}{raw}", core::PROMPT_MARKER));

    let Some(tokens) = tokenize(raw) else {
        return;
    };
    let name = tokens.command;

    let target = {
        let registry = world.resource::<ConsoleRegistry>();
        if let Some(cmd) = registry.command(name) {
            Target::Command(cmd.name().to_string(), cmd.handlers())
        } else if registry.contains_variable(name) {
            Target::Variable
        } else {
            Target::Unknown
        }
    };

    match target {
        Target::Command(cmd_name, handlers) => {
            let args = CommandArgs::new(raw, tokens.args);
            for handler in handlers {
                // Execute with panic safety so one bad callback can't take the console down
                let result = catch_unwind(AssertUnwindSafe(|| handler(&args, world)));

                if let Err(panic_info) = result {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    debug!("Command \"{}\" panicked: {}", cmd_name, panic_msg);
                    world
                        .resource_mut::<ConsoleLog>()
                        .append_line(format!("Command \"{cmd_name}\" panicked: {panic_msg}"));
                }
            }
        }
        Target::Variable => {
            let outcome = {
                let mut registry = world.resource_mut::<ConsoleRegistry>();
                match tokens.args.first() {
                    None => registry
                        .variable(name)
                        .map(|cvar| (Some(cvar.describe(name)), None)),
                    Some(text) => {
                        assign(&mut registry, name, text).map(|change| (None, Some(change)))
                    }
                }
            };

            match outcome {
                Ok((line, change)) => {
                    if let Some(line) = line {
                        world.resource_mut::<ConsoleLog>().append_line(line);
                    }
                    if let Some(change) = change {
                        world.resource_mut::<PendingLines>().changes.push(change);
                    }
                }
                Err(e) => {
                    debug!("Console: {}", e);
                    world.resource_mut::<ConsoleLog>().append_line(e.to_string());
                }
            }
        }
        Target::Unknown => {
            let e = ConsoleError::UnknownCommand(name.to_string());
            world.resource_mut::<ConsoleLog>().append_line(e.to_string());
        }
    }
}

/// Convert `text` to the variable's type and store it.
fn assign(
    registry: &mut ConsoleRegistry,
    name: &str,
    text: &str,
) -> Result<ConVarChangedEvent, ConsoleError> {
    let cvar = registry.variable_mut(name)?;
    let old_value = cvar.get().clone();
    cvar.set_from_str(text)?;
    Ok(ConVarChangedEvent::new(cvar.name(), old_value, cvar.get().clone()))
}

/// System that sends what execution queued up.
fn flush_pending(
    mut pending: ResMut<PendingLines>,
    mut change_events: MessageWriter<ConVarChangedEvent>,
    mut exit: MessageWriter<AppExit>,
) {
    if pending.changes.is_empty() && !pending.quit {
        return;
    }
    for change in pending.changes.drain(..) {
        change_events.write(change);
    }
    if std::mem::take(&mut pending.quit) {
        info!("Quit requested from console");
        exit.write(AppExit::Success);
    }
}

/// Page keys, jump-to-bottom and the stick-to-bottom policy.
fn scroll_console(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    time: Res<Time>,
    config: Res<ConsoleConfig>,
    layout: Res<ConsoleLayout>,
    log: Res<ConsoleLog>,
    visibility: Res<ConsoleVisibility>,
    mut scroll: ResMut<ScrollController>,
) {
    if log.appended() != scroll.seen() {
        scroll.follow(log.appended(), config.scroll_down_on_adding);
    }

    let Some(keys) = keys else { return };
    if keys.just_pressed(config.jump_to_bottom_key) {
        scroll.jump_to_bottom();
    }

    if visibility.is_visible() && visibility.shows_log() {
        scroll.update(
            KeyState::read(&keys, config.scroll_up_key),
            KeyState::read(&keys, config.scroll_down_key),
            layout.scroll_metrics(log.preferred_content_height()),
            time.delta(),
        );
    } else {
        scroll.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    /// Frame length used by every test app.
    const FRAME: Duration = Duration::from_millis(20);

    /// Test resource to track command execution.
    #[derive(Resource, Default)]
    struct Calls(Vec<String>);

    /// Messages collected by [`record_messages`].
    #[derive(Resource, Default)]
    struct Recorded {
        changes: Vec<ConVarChangedEvent>,
        states: Vec<ConsoleStateChanged>,
    }

    fn record_messages(
        mut changes: MessageReader<ConVarChangedEvent>,
        mut states: MessageReader<ConsoleStateChanged>,
        mut recorded: ResMut<Recorded>,
    ) {
        recorded.changes.extend(changes.read().cloned());
        recorded.states.extend(states.read().copied());
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(ConsolePlugin)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Calls>()
            .init_resource::<Recorded>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .add_systems(PostUpdate, record_messages);

        // Run startup (registers built-in commands)
        app.update();
        app
    }

    fn submit(app: &mut App, line: &str) {
        app.world_mut().write_message(ConsoleInputEvent::new(line));
        app.update();
    }

    fn log_lines(app: &App) -> Vec<String> {
        app.world().resource::<ConsoleLog>().lines().to_vec()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
    }

    fn release(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().release(key);
        app.update();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
    }

    fn tap(app: &mut App, key: KeyCode) {
        press(app, key);
        release(app, key);
    }

    fn state(app: &App) -> ConsoleState {
        app.world().resource::<ConsoleVisibility>().state()
    }

    fn open_console(app: &mut App) {
        tap(app, KeyCode::Backquote);
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(state(app), ConsoleState::Open);
    }

    #[test]
    fn test_builtins_registered() {
        let app = test_app();
        let registry = app.world().resource::<ConsoleRegistry>();

        let commands: Vec<&str> = registry.list_commands().collect();
        assert_eq!(
            commands,
            vec!["Clear", "CmdList", "CvarList", "Echo", "Help", "Quit", "Reset", "Screenshot"]
        );
        assert!(registry.get::<bool>("Boolean").unwrap());
        assert!(!registry.get_default::<bool>("Boolean").unwrap());
        assert_eq!(registry.get::<i32>("number").unwrap(), 123);
        assert_eq!(registry.get::<String>("STRING").unwrap(), "John");
    }

    #[test]
    fn test_commands_compose_in_order() {
        let mut app = test_app();
        {
            let mut registry = app.world_mut().resource_mut::<ConsoleRegistry>();
            registry.add_command(
                "Greet",
                handler(|args, world| {
                    let line = format!("first {}", args.join(","));
                    world.resource_mut::<Calls>().0.push(line);
                }),
            );
            registry.add_command(
                "greet",
                handler(|args, world| {
                    let line = format!("second {}", args.len());
                    world.resource_mut::<Calls>().0.push(line);
                }),
            );
        }

        submit(&mut app, "GREET a  b");

        let calls = &app.world().resource::<Calls>().0;
        assert_eq!(calls, &vec!["first a,b".to_string(), "second 2".to_string()]);
        assert_eq!(log_lines(&app), vec!["\\GREET a  b".to_string()]);
    }

    #[test]
    fn test_variable_scenario() {
        let mut app = test_app();

        submit(&mut app, "Number 789");
        assert_eq!(
            app.world().resource::<ConsoleRegistry>().get::<i32>("Number").unwrap(),
            789
        );

        submit(&mut app, "Number abc");
        assert_eq!(
            app.world().resource::<ConsoleRegistry>().get::<i32>("Number").unwrap(),
            789
        );

        submit(&mut app, "number");

        assert_eq!(
            log_lines(&app),
            vec![
                "\\Number 789".to_string(),
                "\\Number abc".to_string(),
                "Cannot convert \"abc\" to integer for \"Number\"".to_string(),
                "\\number".to_string(),
                "\"number\" is: \"789\" Default: \"456\"".to_string(),
            ]
        );

        let recorded = app.world().resource::<Recorded>();
        assert_eq!(recorded.changes.len(), 1);
        assert_eq!(recorded.changes[0].old_value, VarValue::Int(123));
        assert_eq!(recorded.changes[0].new_value, VarValue::Int(789));
    }

    #[test]
    fn test_unknown_command() {
        let mut app = test_app();
        submit(&mut app, "bogus 1 2");
        assert_eq!(
            log_lines(&app),
            vec!["\\bogus 1 2".to_string(), "Unknown command \"bogus\"".to_string()]
        );
    }

    #[test]
    fn test_blank_line_echoes_marker_only() {
        let mut app = test_app();
        submit(&mut app, "   ");
        assert_eq!(log_lines(&app), vec!["\\   ".to_string()]);
        assert_eq!(
            app.world().resource::<ConsoleInput>().history().entries(),
            &["   "]
        );

        submit(&mut app, "");
        assert_eq!(log_lines(&app).last().map(String::as_str), Some("\\"));
        assert_eq!(app.world().resource::<ConsoleInput>().history().len(), 1);
    }

    #[test]
    fn test_panicking_command_is_reported() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<ConsoleRegistry>()
            .add_command("Boom", handler(|_, _| panic!("boom")));

        submit(&mut app, "boom");
        assert_eq!(
            log_lines(&app).last().map(String::as_str),
            Some("Command \"Boom\" panicked: boom")
        );

        // Console still works afterwards
        submit(&mut app, "echo ok");
        assert_eq!(log_lines(&app).last().map(String::as_str), Some("ok"));
    }

    #[test]
    fn test_help_and_lists() {
        let mut app = test_app();
        submit(&mut app, "help");

        let lines = log_lines(&app);
        assert_eq!(lines[1], "Commands:");
        assert_eq!(lines[2], "Clear");
        let vars_at = lines.iter().position(|l| l == "Variables:").unwrap();
        assert_eq!(&lines[vars_at + 1..], &["Boolean", "Number", "String"]);

        submit(&mut app, "clear");
        submit(&mut app, "cvarlist");
        assert_eq!(log_lines(&app), vec!["\\cvarlist", "Boolean", "Number", "String"]);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut app = test_app();
        submit(&mut app, "echo hello world");
        assert_eq!(log_lines(&app).last().map(String::as_str), Some("hello world"));

        submit(&mut app, "Clear");
        assert!(app.world().resource::<ConsoleLog>().is_empty());
    }

    #[test]
    fn test_reset_restores_default() {
        let mut app = test_app();
        submit(&mut app, "String Paul");
        submit(&mut app, "reset string");

        let registry = app.world().resource::<ConsoleRegistry>();
        assert_eq!(registry.get::<String>("String").unwrap(), "Empty");
        assert_eq!(
            log_lines(&app).last().map(String::as_str),
            Some("\"String\" is: \"Empty\" Default: \"Empty\"")
        );
        assert_eq!(app.world().resource::<Recorded>().changes.len(), 2);

        submit(&mut app, "reset nope");
        assert_eq!(
            log_lines(&app).last().map(String::as_str),
            Some("Unknown variable \"nope\"")
        );
    }

    #[test]
    fn test_quit_requests_exit() {
        let mut app = test_app();
        assert!(app.should_exit().is_none());

        submit(&mut app, "quit");
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn test_screenshot_builtin() {
        let mut app = test_app();
        submit(&mut app, "screenshot");
        assert_eq!(
            log_lines(&app).last().map(String::as_str),
            Some(screenshot::CAPTURE_UNAVAILABLE)
        );

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Screenshots");
        app.insert_resource(ScreenshotSettings::new(&target).with_capture(
            |path: &std::path::Path| -> Result<(), ConsoleError> {
                std::fs::write(path, b"png")?;
                Ok(())
            },
        ));

        submit(&mut app, "screenshot");
        let expected = target.join("Screenshot0.png");
        assert!(expected.exists());
        assert_eq!(
            log_lines(&app).last().cloned(),
            Some(format!("Wrote {}", expected.display()))
        );
    }

    #[test]
    fn test_toggle_opens_and_closes() {
        let mut app = test_app();
        assert_eq!(state(&app), ConsoleState::Closed);

        press(&mut app, KeyCode::Backquote);
        assert_eq!(state(&app), ConsoleState::Opening);
        assert!(!app.world().resource::<ConsoleVisibility>().input_enabled());
        release(&mut app, KeyCode::Backquote);

        for _ in 0..10 {
            app.update();
        }
        assert_eq!(state(&app), ConsoleState::Open);
        assert!(app.world().resource::<ConsoleVisibility>().input_enabled());

        tap(&mut app, KeyCode::Backquote);
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(state(&app), ConsoleState::Closed);

        let states: Vec<_> = app
            .world()
            .resource::<Recorded>()
            .states
            .iter()
            .map(|s| (s.from, s.to))
            .collect();
        assert_eq!(
            states,
            vec![
                (ConsoleState::Closed, ConsoleState::Opening),
                (ConsoleState::Opening, ConsoleState::Open),
                (ConsoleState::Open, ConsoleState::Closing),
                (ConsoleState::Closing, ConsoleState::Closed),
            ]
        );
    }

    #[test]
    fn test_reverse_mid_opening() {
        let mut app = test_app();
        press(&mut app, KeyCode::Backquote);
        let panel = app.world().resource::<ConsoleVisibility>().panel_height();
        let before = app.world().resource::<ConsoleVisibility>().offset();
        assert!(before < panel);

        release(&mut app, KeyCode::Backquote);
        let moved = app.world().resource::<ConsoleVisibility>().offset();
        press(&mut app, KeyCode::Backquote);
        assert_eq!(state(&app), ConsoleState::Closing);

        // The slide back starts where the panel was and heads up.
        let after = app.world().resource::<ConsoleVisibility>().offset();
        assert!(after > moved);
        assert!(after < panel);
    }

    #[test]
    fn test_mini_mode() {
        let mut app = test_app();
        // Slow enough that the short mini slide spans several frames.
        app.world_mut().resource_mut::<ConsoleConfig>().opening_time = 1.0;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ShiftLeft);
        press(&mut app, KeyCode::Backquote);
        assert_eq!(state(&app), ConsoleState::MiniOpening);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(KeyCode::ShiftLeft);
        release(&mut app, KeyCode::Backquote);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(state(&app), ConsoleState::Mini);

        let visibility = app.world().resource::<ConsoleVisibility>();
        let layout = app.world().resource::<ConsoleLayout>();
        let expected = layout.panel_height - layout.input_block_height;
        assert!((visibility.offset() - expected).abs() < 1e-3);
        assert!(visibility.input_enabled());
    }

    #[test]
    fn test_tab_completion() {
        let mut app = test_app();
        open_console(&mut app);

        app.world_mut().resource_mut::<ConsoleInput>().set_line("cle");
        tap(&mut app, KeyCode::Tab);
        assert_eq!(log_lines(&app), vec!["\\cle", "Clear"]);
        assert_eq!(app.world().resource::<ConsoleInput>().line(), "cle");

        app.world_mut().resource_mut::<ConsoleInput>().set_line("n");
        tap(&mut app, KeyCode::Tab);
        assert_eq!(
            &log_lines(&app)[2..],
            &["\\n", "    Number = \"123\""]
        );
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut app = test_app();
        app.world_mut().resource_mut::<ConsoleInput>().set_line("help");
        tap(&mut app, KeyCode::Enter);
        assert!(app.world().resource::<ConsoleLog>().is_empty());
        assert_eq!(app.world().resource::<ConsoleInput>().line(), "help");
    }

    #[test]
    fn test_submit_and_recall_history() {
        let mut app = test_app();
        open_console(&mut app);

        for line in ["echo a", "echo b", "echo c"] {
            app.world_mut().resource_mut::<ConsoleInput>().set_line(line);
            tap(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.world().resource::<ConsoleInput>().line(), "");
        assert_eq!(log_lines(&app).last().map(String::as_str), Some("c"));

        let line = |app: &App| app.world().resource::<ConsoleInput>().line().to_string();

        tap(&mut app, KeyCode::ArrowUp);
        assert_eq!(line(&app), "echo c");
        tap(&mut app, KeyCode::ArrowUp);
        assert_eq!(line(&app), "echo b");
        tap(&mut app, KeyCode::ArrowDown);
        assert_eq!(line(&app), "echo c");
        tap(&mut app, KeyCode::ArrowDown);
        assert_eq!(line(&app), "");

        let input = app.world().resource::<ConsoleInput>();
        assert_eq!(input.caret(), 0);
        assert_eq!(input.history().len(), 3);
    }

    #[test]
    fn test_holding_recall_repeats() {
        let mut app = test_app();
        open_console(&mut app);
        for n in 0..10 {
            submit(&mut app, &format!("echo {n}"));
        }

        // Immediate fire, then nothing until the initial delay passes.
        press(&mut app, KeyCode::ArrowUp);
        assert_eq!(app.world().resource::<ConsoleInput>().line(), "echo 9");
        for _ in 0..20 {
            app.update();
        }
        // 400ms held: still on the first recall.
        assert_eq!(app.world().resource::<ConsoleInput>().line(), "echo 9");

        for _ in 0..10 {
            app.update();
        }
        let recalled = app.world().resource::<ConsoleInput>().line().to_string();
        assert_ne!(recalled, "echo 9");

        // Holding the other direction too stops recall entirely.
        press(&mut app, KeyCode::ArrowDown);
        let pinned = app.world().resource::<ConsoleInput>().line().to_string();
        for _ in 0..30 {
            app.update();
        }
        assert_eq!(app.world().resource::<ConsoleInput>().line(), pinned);
        assert!(app.world().resource::<ConsoleInput>().recall_held());
    }

    #[test]
    fn test_scrolling_and_stick_to_bottom() {
        let mut app = test_app();
        app.world_mut().resource_mut::<ConsoleConfig>().scroll_down_on_adding = false;
        for n in 0..100 {
            app.world_mut()
                .resource_mut::<ConsoleLog>()
                .append_line(format!("line {n}"));
        }
        open_console(&mut app);

        tap(&mut app, KeyCode::PageUp);
        let offset = app.world().resource::<ScrollController>().offset();
        assert!(offset > 0.0);

        // Scrolled up: new output does not pull the view down.
        submit(&mut app, "echo more");
        assert_eq!(app.world().resource::<ScrollController>().offset(), offset);

        tap(&mut app, KeyCode::F3);
        assert!(app.world().resource::<ScrollController>().is_at_bottom());

        // With the policy on, output always returns to the bottom.
        app.world_mut().resource_mut::<ConsoleConfig>().scroll_down_on_adding = true;
        app.update();
        tap(&mut app, KeyCode::PageUp);
        assert!(!app.world().resource::<ScrollController>().is_at_bottom());
        submit(&mut app, "echo again");
        assert!(app.world().resource::<ScrollController>().is_at_bottom());
    }

    #[test]
    fn test_config_change_snaps_transition() {
        let mut app = test_app();
        press(&mut app, KeyCode::Backquote);
        assert_eq!(state(&app), ConsoleState::Opening);

        app.world_mut().resource_mut::<ConsoleConfig>().size_percent = 80;
        release(&mut app, KeyCode::Backquote);
        assert_eq!(state(&app), ConsoleState::Open);

        let layout = app.world().resource::<ConsoleLayout>();
        assert_eq!(layout.panel_height, 576.0);
    }
}
