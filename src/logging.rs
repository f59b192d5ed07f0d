//! Structured logging setup for fixlet_manager.
//!
//! Logs go to stderr so stdout carries only listings, prompts and JSON.
//! The interactive menu shares the terminal with stderr, so it defaults to
//! `warn`: rejected rows, out-of-range numbers and failed saves still show,
//! per-command chatter does not. One-shot commands default to `info`.
//!
//! `RUST_LOG` overrides either default (an unparseable value falls back to
//! the default) and `RUST_LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::EnvFilter;

const INTERACTIVE_FILTER: &str = "fixlet_manager=warn";
const ONE_SHOT_FILTER: &str = "fixlet_manager=info";

fn default_directive(interactive: bool) -> &'static str {
    if interactive {
        INTERACTIVE_FILTER
    } else {
        ONE_SHOT_FILTER
    }
}

fn build_filter(rust_log: Option<&str>, interactive: bool) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(interactive)))
}

fn wants_json(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("json"))
}

/// Initialize the global tracing subscriber.
///
/// Repeated calls are no-ops.
pub fn init(interactive: bool) {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), interactive);
    let is_json = wants_json(std::env::var("RUST_LOG_FORMAT").ok().as_deref());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(!interactive)
        .with_file(false)
        .with_line_number(false);

    if is_json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
