use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sizeline",
    about = "Bucket size history: record a snapshot per mutation, chart the series",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the trigger server on in-memory stores
    Serve(ServeArgs),
    /// Replay a create/update/delete/create sequence and chart it
    Simulate(SimulateArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr`.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Overrides `pipeline.bucket`.
    #[arg(long)]
    pub bucket: Option<String>,
    /// Where to write the rendered chart.
    #[arg(short, long, default_value = "plot.png")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["sizeline", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["sizeline", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_bad_addr() {
        assert!(Cli::try_parse_from(["sizeline", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_simulate() {
        let cli = Cli::try_parse_from(["sizeline", "simulate", "--bucket", "photos", "-o", "out.png"]).unwrap();
        if let Command::Simulate(args) = cli.command {
            assert_eq!(args.bucket, Some("photos".into()));
            assert_eq!(args.out, PathBuf::from("out.png"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["sizeline", "simulate"]).unwrap();
        if let Command::Simulate(args) = cli.command {
            assert!(args.bucket.is_none());
            assert_eq!(args.out, PathBuf::from("plot.png"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["sizeline", "config", "--config", "sizeline.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Config(_)));
        assert_eq!(cli.config, Some(PathBuf::from("sizeline.toml")));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["sizeline", "--verbose", "config"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["sizeline", "--format", "json", "simulate"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
