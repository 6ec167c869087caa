use tracing_subscriber::EnvFilter;

/// Default directives: engine at `info`, font stack quieter.
const DEFAULT_DIRECTIVES: &str = "info,cosmic_text=warn,fontdb=warn";

/// Install the global fmt subscriber. `RUST_LOG` wins when set.
pub fn init() {
    init_with_level("info");
}

/// Install the global fmt subscriber at the given level.
///
/// Accepts the level names used in configuration files (`DEBUG`, `INFO`,
/// `WARNING`, `ERROR`, case-insensitive). Unknown names fall back to `info`.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives_for(level)));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn directives_for(level: &str) -> String {
    let level = match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    };
    DEFAULT_DIRECTIVES.replacen("info", level, 1)
}
