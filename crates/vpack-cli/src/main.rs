//! `vpack` entry point: parses arguments, reads stdin, writes stdout.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vpack::Format;
use vpack_cli::{check, convert, issues_report, CliError, ConvertOptions};

/// Convert and check JSON, CBOR and legacy documents.
#[derive(Parser, Debug)]
#[command(name = "vpack", version, about, long_about = None)]
struct Cli {
    /// Log filter such as `debug` or `vpack=trace`. Defaults to `RUST_LOG`,
    /// then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-encode stdin in another format.
    Convert(ConvertArgs),

    /// Check that stdin decodes and holds the required keys.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input format: json, cbor, legacy or legacy-frame.
    #[arg(long, default_value = "json")]
    from: Format,

    /// Output format.
    #[arg(long, default_value = "cbor")]
    to: Format,

    /// Indent JSON output.
    #[arg(long)]
    pretty: bool,

    /// Order map keys shortest first in JSON and CBOR output.
    #[arg(long)]
    sort_keys: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Input format.
    #[arg(long, default_value = "json")]
    from: Format,

    /// Key the top-level map must contain. Repeatable.
    #[arg(long = "require", value_name = "KEY")]
    require: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("vpack: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, CliError> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;
    tracing::debug!(bytes = input.len(), "read stdin");
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Convert(args) => {
            let opts = ConvertOptions {
                pretty: args.pretty,
                sort_keys: args.sort_keys,
            };
            let out = convert(&input, args.from, args.to, opts)?;
            stdout.write_all(&out)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => {
            let issues = check(&input, args.from, &args.require);
            writeln!(stdout, "{}", issues_report(&issues)?)?;
            Ok(if issues.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "vpack", "convert", "--from", "cbor", "--to", "json", "--pretty", "--sort-keys",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.from, Format::Cbor);
        assert_eq!(args.to, Format::Json);
        assert!(args.pretty && args.sort_keys);
    }

    #[test]
    fn convert_defaults_json_to_cbor() {
        let cli = Cli::try_parse_from(["vpack", "convert"]).unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!((args.from, args.to), (Format::Json, Format::Cbor));
    }

    #[test]
    fn parses_repeated_requirements() {
        let cli = Cli::try_parse_from([
            "vpack",
            "--log-level",
            "debug",
            "validate",
            "--from",
            "legacy-frame",
            "--require",
            "type",
            "--require",
            "text",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.from, Format::LegacyFrame);
        assert_eq!(args.require, ["type", "text"]);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["vpack", "convert", "--from", "yaml"]).is_err());
    }
}
