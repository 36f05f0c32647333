use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, fmt::MakeWriter,
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let directives = std::env::var("RUST_LOG").ok();
    build_subscriber(verbose, directives, std::io::stderr).init();
}

/// `-v` turns on debug output for `nerkh`; otherwise `directives` (the
/// `RUST_LOG` value) alone decide what is logged.
fn build_subscriber<W>(
    verbose: bool,
    directives: Option<String>,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let app_filter = verbose.then(|| Targets::new().with_target("nerkh", LevelFilter::DEBUG));
    let fallback = if verbose { "debug" } else { "off" };
    let env_filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(writer))
        .with(app_filter)
        .with(env_filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::{debug, warn};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    fn emit(verbose: bool, directives: Option<&str>) -> String {
        let buffer = Buffer::default();
        let subscriber = build_subscriber(verbose, directives.map(String::from), buffer.clone());
        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "nerkh::providers::http", "Fetch failed");
            debug!(target: "nerkh::core::extract", "Extracted price");
        });
        buffer.contents()
    }

    #[test]
    fn test_rust_log_enables_output_without_verbose() {
        let output = emit(false, Some("nerkh=debug"));
        assert!(output.contains("Fetch failed"));
        assert!(output.contains("Extracted price"));
    }

    #[test]
    fn test_rust_log_level_respected() {
        let output = emit(false, Some("nerkh=warn"));
        assert!(output.contains("Fetch failed"));
        assert!(!output.contains("Extracted price"));
    }

    #[test]
    fn test_silent_by_default() {
        assert!(emit(false, None).is_empty());
    }

    #[test]
    fn test_verbose_enables_debug() {
        let output = emit(true, None);
        assert!(output.contains("Fetch failed"));
        assert!(output.contains("Extracted price"));
    }
}
