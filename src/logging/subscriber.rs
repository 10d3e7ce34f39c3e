//! Tracing subscriber: outcome-aware console output plus a plain log file.
//!
//! [`Logger`](super::Logger) emits chatmate outcomes as structured events
//! (`chatmate`, `outcome` and `detail` fields under [`OUTCOME_TARGET`]).
//! Both layers decode events into a [`Record`]: the console colours it, the
//! file layer writes it as one tagged line.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{clock, log_file_path, timestamp};
use crate::artifact::OperationOutcome;

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "chatmate::stage";

/// Target used for per-chatmate outcome events.
pub(super) const OUTCOME_TARGET: &str = "chatmate::outcome";

const RESET: &str = "\x1b[0m";

/// What an event reports, decoded from its target and fields.
#[derive(Debug, PartialEq, Eq)]
enum Record {
    Stage(String),
    Outcome {
        chatmate: String,
        outcome: Option<OperationOutcome>,
        detail: Option<String>,
    },
    Message(String),
}

#[derive(Default)]
struct Fields {
    message: String,
    chatmate: String,
    outcome: String,
    detail: Option<String>,
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "chatmate" => self.chatmate = value.to_string(),
            "outcome" => self.outcome = value.to_string(),
            "detail" => self.detail = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}

impl Record {
    fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut fields = Fields::default();
        event.record(&mut fields);
        match event.metadata().target() {
            STAGE_TARGET => Self::Stage(fields.message),
            OUTCOME_TARGET => Self::Outcome {
                outcome: OperationOutcome::ALL
                    .into_iter()
                    .find(|o| o.label() == fields.outcome),
                chatmate: fields.chatmate,
                detail: fields.detail,
            },
            _ => Self::Message(fields.message),
        }
    }

    /// Uncoloured text of the record.
    fn text(&self) -> String {
        match self {
            Self::Stage(msg) | Self::Message(msg) => msg.clone(),
            Self::Outcome {
                chatmate,
                outcome,
                detail,
            } => {
                let label = outcome.map_or("unknown outcome", OperationOutcome::label);
                match detail {
                    Some(detail) => format!("{chatmate}: {label} ({detail})"),
                    None => format!("{chatmate}: {label}"),
                }
            }
        }
    }
}

/// Icon and ANSI colour for an outcome on the console.
const fn outcome_style(outcome: Option<OperationOutcome>) -> (&'static str, &'static str) {
    match outcome {
        Some(OperationOutcome::Installed | OperationOutcome::Removed) => ("✓", "\x1b[32m"),
        Some(OperationOutcome::Reinstalled) => ("↻", "\x1b[32m"),
        Some(OperationOutcome::Skipped) => ("○", "\x1b[33m"),
        Some(OperationOutcome::NotFound) => ("·", "\x1b[2m"),
        Some(OperationOutcome::ValidationFailed) | None => ("✗", "\x1b[31m"),
    }
}

/// One log-file line: time, a fixed-width tag, then the record text.
fn file_line(level: Level, record: &Record, time: &str) -> String {
    let tag = match (record, level) {
        (Record::Stage(_), _) => "STAGE",
        (Record::Outcome { outcome: Some(o), .. }, _) if o.is_success() => "OK",
        (Record::Outcome { .. }, _) => "FAIL",
        (Record::Message(_), Level::ERROR) => "ERROR",
        (Record::Message(_), Level::WARN) => "WARN",
        (Record::Message(_), Level::INFO) => "INFO",
        (Record::Message(_), _) => "DEBUG",
    };
    format!("{time} {tag:<5} {}", record.text())
}

/// A [`tracing_subscriber::Layer`] that appends every event to the
/// per-command log file, without colour.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a header line naming `command`, and return a
    /// layer appending to it.
    ///
    /// Returns `None` if the directory or the file cannot be created.
    pub(super) fn at(path: &Path, command: &str) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let header = format!(
            "# chatmate {} {command} {}\n",
            crate::version(),
            timestamp()
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let line = file_line(*event.metadata().level(), &Record::from_event(event), &clock());
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console rendering: stage banners, coloured outcome lines, and levelled
/// messages.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let record = Record::from_event(event);
        let text = record.text();
        match (&record, *event.metadata().level()) {
            (Record::Stage(_), _) => writeln!(writer, "\x1b[1;34m==>{RESET} \x1b[1m{text}{RESET}"),
            (Record::Outcome { outcome, .. }, _) => {
                let (icon, color) = outcome_style(*outcome);
                writeln!(writer, "  {color}{icon} {text}{RESET}")
            }
            (Record::Message(_), Level::ERROR) => writeln!(writer, "\x1b[31merror:{RESET} {text}"),
            (Record::Message(_), Level::WARN) => writeln!(writer, "\x1b[33mwarning:{RESET} {text}"),
            (Record::Message(_), Level::INFO) => writeln!(writer, "  {text}"),
            (Record::Message(_), _) => writeln!(writer, "  \x1b[2m{text}{RESET}"),
        }
    }
}

/// Install the global [`tracing`] subscriber.
///
/// The console shows `info` and above (`debug` too when `verbose`), with
/// warnings and errors on stderr. Every event down to `debug` is also
/// written to `<cache>/chatmate/<command>.log` when that file can be opened.
/// A second call leaves the first subscriber in place.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(writer)
        .with_filter(console_filter);

    let file = log_file_path(command)
        .and_then(|path| FileLayer::at(&path, command))
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}
