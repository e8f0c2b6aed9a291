mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::output::OutputFormat;

/// Channel-multiplexed RPC over a local socket.
#[derive(Parser, Debug)]
#[command(name = "wiremux", version)]
struct Cli {
    /// Print results as JSON lines.
    #[arg(long, global = true, conflicts_with = "pretty")]
    json: bool,

    /// Print results for humans (default on a terminal).
    #[arg(long, global = true)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace); WIREMUX_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write stderr logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.pretty {
            OutputFormat::Pretty
        } else {
            OutputFormat::default_for_stdout()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_json);

    let format = cli.output_format();
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("wiremux: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_call_subcommand() {
        let cli = Cli::try_parse_from([
            "wiremux",
            "call",
            "/tmp/test.sock",
            "--method",
            "add",
            "--args",
            "[1,2]",
        ])
        .expect("call subcommand should parse");

        match cli.command {
            Command::Call(args) => {
                assert_eq!(args.method, "add");
                assert_eq!(args.channel, "rpc");
                assert_eq!(args.args, "[1,2]");
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["wiremux", "serve", "/tmp/test.sock", "--once"])
            .expect("serve subcommand should parse");

        match cli.command {
            Command::Serve(args) => assert!(args.once),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["wiremux", "-vv", "version"])
            .expect("verbose flags should parse");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn json_selects_output_format() {
        let cli = Cli::try_parse_from(["wiremux", "--json", "version"])
            .expect("--json should parse");
        assert!(matches!(cli.output_format(), OutputFormat::Json));
    }

    #[test]
    fn json_and_pretty_conflict() {
        assert!(Cli::try_parse_from(["wiremux", "--json", "--pretty", "version"]).is_err());
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["wiremux", "frobnicate"]).is_err());
    }
}
