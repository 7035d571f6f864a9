//! Log capture for the console.
//!
//! Mirrors host log output into the console log as `"[LEVEL] message"` lines.

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use std::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::ConsoleLog;

/// Least severe level that is mirrored into the console.
///
/// Insert before adding the [`LogPlugin`](bevy::log::LogPlugin) to change it;
/// the layer reads it once when it is built.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCaptureSettings {
    pub level: Level,
}

impl Default for LogCaptureSettings {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

/// Pass to [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer) to
/// mirror host logs into the console.
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let level = app
        .world()
        .get_resource::<LogCaptureSettings>()
        .copied()
        .unwrap_or_default()
        .level;

    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogMessage>();
    app.insert_non_send_resource(CapturedLogEvents(receiver));
    app.add_systems(PostUpdate, transfer_log_events);

    LogCaptureLayer { sender, level }
}

/// A captured log event.
#[derive(Message, Debug, Clone)]
pub struct LogMessage {
    /// The message contents.
    pub message: String,

    /// The part of the system the event occurred in.
    pub target: &'static str,

    /// The level of verbosity of the event.
    pub level: Level,
}

impl LogMessage {
    /// The line written to the console log.
    pub fn console_line(&self) -> String {
        format!("[{}] {}", self.level, self.message)
    }
}

/// Moves captured events into the console log and re-sends them as [`LogMessage`]s.
fn transfer_log_events(
    receiver: NonSend<CapturedLogEvents>,
    mut log_events: MessageWriter<LogMessage>,
    mut console_log: Option<ResMut<ConsoleLog>>,
) {
    for msg in receiver.0.try_iter() {
        if let Some(log) = console_log.as_deref_mut() {
            log.append_line(msg.console_line());
        }
        log_events.write(msg);
    }
}

/// Receiving end of the layer's channel, drained once per frame.
struct CapturedLogEvents(mpsc::Receiver<LogMessage>);

/// A [`Layer`] that captures log events at or above a level.
struct LogCaptureLayer {
    sender: mpsc::Sender<LogMessage>,
    level: Level,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        // Lower verbosity compares less: ERROR < WARN < INFO.
        if *metadata.level() > self.level {
            return;
        }

        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
            });
        }
    }
}

/// Pulls the `message` field out of an event.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::schedule::ExecutorKind;
    use tracing_subscriber::layer::SubscriberExt;

    use crate::core::{ConsoleInputEvent, ConsoleRegistry, handler};
    use crate::screenshot::CAPTURE_UNAVAILABLE;

    #[test]
    fn test_console_line() {
        let msg = LogMessage {
            message: "Loaded level".to_string(),
            target: "game",
            level: Level::WARN,
        };
        assert_eq!(msg.console_line(), "[WARN] Loaded level");
    }

    #[test]
    fn test_default_capture_level() {
        assert_eq!(LogCaptureSettings::default().level, Level::INFO);
    }

    #[derive(Resource, Default)]
    struct Received(Vec<String>);

    fn receive_log_messages(mut messages: MessageReader<LogMessage>, mut received: ResMut<Received>) {
        received.0.extend(messages.read().map(LogMessage::console_line));
    }

    fn capture_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).init_resource::<ConsoleLog>();
        app
    }

    #[test]
    fn test_captures_at_or_above_level() {
        let mut app = capture_app();
        app.init_resource::<Received>()
            .add_systems(Last, receive_log_messages);
        let layer = create_custom_log_layer(&mut app);

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
            tracing::debug!("frame stats");
            tracing::info!("map loaded");
            tracing::error!("lost connection");
        });
        app.update();

        let expected = [
            "[WARN] disk almost full",
            "[INFO] map loaded",
            "[ERROR] lost connection",
        ];
        assert_eq!(app.world().resource::<ConsoleLog>().lines(), &expected);
        assert_eq!(app.world().resource::<Received>().0, expected);
    }

    #[test]
    fn test_capture_level_from_settings() {
        let mut app = capture_app();
        app.insert_resource(LogCaptureSettings { level: Level::ERROR });
        let layer = create_custom_log_layer(&mut app);

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("ignored");
            tracing::error!("kept");
        });
        app.update();

        assert_eq!(app.world().resource::<ConsoleLog>().lines(), &["[ERROR] kept"]);
    }

    #[test]
    fn test_console_failures_are_single_lines() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(crate::ConsolePlugin);
        // Keep console systems on this thread so the scoped subscriber sees them.
        app.edit_schedule(Update, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });
        let layer = create_custom_log_layer(&mut app);

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            app.update();
            app.world_mut()
                .resource_mut::<ConsoleRegistry>()
                .add_command("Boom", handler(|_, _| panic!("boom")));

            app.world_mut().write_message(ConsoleInputEvent::new("screenshot"));
            app.world_mut().write_message(ConsoleInputEvent::new("boom"));
            app.update();
            app.update();
        });

        assert_eq!(
            app.world().resource::<ConsoleLog>().lines(),
            &[
                "\\screenshot",
                CAPTURE_UNAVAILABLE,
                "\\boom",
                "Command \"Boom\" panicked: boom",
            ]
        );
    }
}
