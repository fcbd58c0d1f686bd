use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate targets that belong to this service.
pub const TARGET_PREFIXES: [&str; 5] = [
    "ai_llm_service",
    "api",
    "bayard_backend",
    "composer",
    "doc_search",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Returns true for targets emitted by this service's own crates.
///
/// `api` matches `api` and `api::routes`, not `apis`.
pub fn is_service_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target
            .strip_prefix(p)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Build a **library-scoped** formatting layer that renders only events
/// from this service's crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line`
/// - Span close events (duration of instrumented calls)
/// - ANSI colors only when stdout is a terminal
///
/// Third-party events are left to whatever other layer the binary composes.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_service = filter::filter_fn(|meta| is_service_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_service)
}

/// Level directives for every crate of this service.
/// Example: `ai_llm_service=debug`, `doc_search=debug`, ...
pub fn level_directives(level: Level) -> Vec<Directive> {
    TARGET_PREFIXES
        .iter()
        .filter_map(|target| {
            let s = format!("{target}={}", level.as_str().to_lowercase());
            Directive::from_str(&s).ok()
        })
        .collect()
}

/// Create an EnvFilter from `RUST_LOG` or the fallback default, then raise
/// this service's crates to `level`.
///
/// `RUST_LOG` wins entirely when it is set.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), |f, d| f.add_directive(d)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_targets_match_whole_crate_names() {
        assert!(is_service_target("api"));
        assert!(is_service_target("doc_search::elastic"));
        assert!(is_service_target("bayard_backend"));
        assert!(!is_service_target("apis::x"));
        assert!(!is_service_target("tower_http::trace::on_response"));
        assert!(!is_service_target("hyper"));
    }

    #[test]
    fn directives_cover_all_crates() {
        let directives = level_directives(Level::DEBUG);
        assert_eq!(directives.len(), TARGET_PREFIXES.len());
        assert!(
            directives
                .iter()
                .any(|d| d.to_string() == "doc_search=debug")
        );
    }
}
