use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the CLI verbosity flags. Takes the same
/// directives as `RUST_LOG` (e.g. `wiremux_mux=trace,info`).
pub const LOG_ENV_VAR: &str = "WIREMUX_LOG";

/// Install the stderr logger for the CLI.
///
/// The filter comes from [`LOG_ENV_VAR`] when set; otherwise `-v` maps to
/// debug for the wiremux crates and `-vv` to trace for everything.
pub fn init_logging(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.compact().try_init();
    }
}

fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "info,wiremux=debug,wiremux_mux=debug,wiremux_pipe=debug,wiremux_rpc=debug",
        _ => "trace",
    }
}
