//! Structured event logging.
//!
//! Every component receives a [`SyncLog`] that owns its own
//! `tracing::Dispatch`. Nothing installs a global subscriber, so two runs in
//! one process (or one test binary) never share log state.

use std::fmt::Display;
use std::io::IsTerminal;
use std::path::Path;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Event taxonomy carried in the `action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CheckFile,
    SkipFile,
    CopyFile,
    Copy,
    Ignore,
    CheckDir,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::CheckFile => "CHECK_FILE",
            Action::SkipFile => "SKIP_FILE",
            Action::CopyFile => "COPY_FILE",
            Action::Copy => "COPY",
            Action::Ignore => "IGNORE",
            Action::CheckDir => "CHECK_DIR",
            Action::Delete => "DELETE",
        }
    }
}

/// Level used when `RUST_LOG` does not say otherwise.
///
/// Verbose shows every decision, dry run shows what would change, and a
/// plain run only reports problems.
pub fn default_level(verbose: bool, dry_run: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if dry_run {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Logger handle passed to every sync component
#[derive(Debug, Clone)]
pub struct SyncLog {
    dispatch: Dispatch,
}

impl SyncLog {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// A logger that drops every event
    pub fn disabled() -> Self {
        Self::new(Dispatch::none())
    }

    /// Console logger on stderr, gated by the verbose/dry-run flags
    pub fn for_flags(verbose: bool, dry_run: bool) -> Self {
        let filter = EnvFilter::builder()
            .with_default_directive(default_level(verbose, dry_run).into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .with_env_filter(filter)
            .finish();

        Self::new(Dispatch::new(subscriber))
    }

    fn scoped(&self, emit: impl FnOnce()) {
        tracing::dispatcher::with_default(&self.dispatch, emit);
    }

    pub fn debug(&self, action: Action, path: &Path, message: &str) {
        self.scoped(|| {
            tracing::debug!(action = action.as_str(), path = %path.display(), "{}", message)
        });
    }

    pub fn info(&self, action: Action, path: &Path, message: &str) {
        self.scoped(|| {
            tracing::info!(action = action.as_str(), path = %path.display(), "{}", message)
        });
    }

    /// Info event that also names the destination path
    pub fn info_to(&self, action: Action, path: &Path, destination: &Path, message: &str) {
        self.scoped(|| {
            tracing::info!(
                action = action.as_str(),
                path = %path.display(),
                destination = %destination.display(),
                "{}",
                message
            )
        });
    }

    /// Run-level milestone without a path
    pub fn milestone(&self, message: &str) {
        self.scoped(|| tracing::info!("{}", message));
    }

    pub fn warn(&self, path: &Path, error: &dyn Display, message: &str) {
        self.scoped(|| {
            tracing::warn!(path = %path.display(), error = %error, "{}", message)
        });
    }

    pub fn error(&self, path: &Path, error: &dyn Display, message: &str) {
        self.scoped(|| {
            tracing::error!(path = %path.display(), error = %error, "{}", message)
        });
    }
}

#[cfg(test)]
pub(crate) mod capture {
    //! In-memory layer for asserting on emitted events.

    use super::SyncLog;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Dispatch, Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Debug, Clone)]
    pub(crate) struct CapturedEvent {
        pub level: Level,
        pub action: Option<String>,
        pub path: Option<String>,
        pub destination: Option<String>,
        pub message: String,
    }

    pub(crate) type Events = Arc<Mutex<Vec<CapturedEvent>>>;

    struct CaptureLayer {
        events: Events,
    }

    #[derive(Default)]
    struct FieldVisitor {
        action: Option<String>,
        path: Option<String>,
        destination: Option<String>,
        message: String,
    }

    impl FieldVisitor {
        fn store(&mut self, field: &Field, value: String) {
            match field.name() {
                "action" => self.action = Some(value),
                "path" => self.path = Some(value),
                "destination" => self.destination = Some(value),
                "message" => self.message = value,
                _ => {}
            }
        }
    }

    impl Visit for FieldVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.store(field, value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.store(field, format!("{:?}", value));
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);

            if let Ok(mut events) = self.events.lock() {
                events.push(CapturedEvent {
                    level: *event.metadata().level(),
                    action: visitor.action,
                    path: visitor.path,
                    destination: visitor.destination,
                    message: visitor.message,
                });
            }
        }
    }

    /// A logger recording every event at every level
    pub(crate) fn capturing_log() -> (SyncLog, Events) {
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            events: Arc::clone(&events),
        });
        (SyncLog::new(Dispatch::new(subscriber)), events)
    }

    /// Actions of the captured events, in emission order
    pub(crate) fn actions(events: &Events) -> Vec<String> {
        events
            .lock()
            .expect("lock captured events")
            .iter()
            .filter_map(|e| e.action.clone())
            .collect()
    }
}
