use chrono::Local;
use colored::*;
use std::fmt::Write as _;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs the global subscriber: colored one-line records on stderr, filtered by `RUST_LOG`
/// (default `info`).
///
/// Logs go to stderr so the console conversation on stdout stays readable.
/// Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .event_format(DriveThruFormatter)
            .try_init();
    });
}

struct DriveThruFormatter;

fn level_label(level: tracing::Level) -> ColoredString {
    match level {
        tracing::Level::ERROR => "ERROR".red().bold(),
        tracing::Level::WARN => " WARN".yellow().bold(),
        tracing::Level::INFO => " INFO".green().bold(),
        tracing::Level::DEBUG => "DEBUG".blue().bold(),
        tracing::Level::TRACE => "TRACE".magenta().bold(),
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DriveThruFormatter
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
        let now = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
        let metadata = event.metadata();

        write!(
            writer,
            "{} {} {} ",
            now.dimmed(),
            level_label(*metadata.level()),
            metadata.target().cyan()
        )?;

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        write!(writer, "{}{}", visitor.message, visitor.fields)?;
        writeln!(writer)
    }
}

/// Collects the `message` field verbatim and the remaining fields as `key=value`.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name().dimmed(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name().dimmed(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!(session = "abc", "logger ready");
    }
}
