use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "conversa.log";

/// Used when `RUST_LOG` is unset. The HTTP stacks under teloxide and the
/// grader log every request at info, so they are held at warn.
const DEFAULT_DIRECTIVES: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Console plus daily-rolling JSON file under `log_dir`. Keep the guard alive
/// for as long as logs should reach the file.
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().with_writer(file_writer).json())
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_quiet_http_clients() {
        let filter = EnvFilter::new(DEFAULT_DIRECTIVES).to_string();
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("hyper=warn"));
    }
}
