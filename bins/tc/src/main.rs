//! tc - Traffic control tool for the mc qdisc
//!
//! Encodes `mc` qdisc parameters into a netlink attribute block and decodes
//! option and statistics blocks received from the kernel.

use clap::{Parser, Subcommand};
use mcq::output::{OutputFormat, OutputOptions};

mod commands;

use commands::qdisc::QdiscCmd;

#[derive(Parser)]
#[command(name = "tc")]
#[command(about = "Traffic control tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Output JSON
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    /// Show details
    #[arg(short = 'd', long, global = true)]
    details: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode and decode queuing discipline attributes
    #[command(visible_alias = "q")]
    Qdisc(QdiscCmd),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let opts = OutputOptions {
        details: cli.details,
        pretty: cli.pretty,
    };

    match cli.command {
        Command::Qdisc(cmd) => cmd.run(format, &opts),
    }
}
