#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;

#[derive(FromArgs, Debug)]
/// Conversion tool for raw GX texture data
struct TopLevel {
    /// log debug output (overridden by RUST_LOG)
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Convert(commands::convert::ConvertCmd),
    Analyze(commands::analyze::AnalyzeCmd),
    Info(commands::info::InfoCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();
    util::init_logging(cli.verbose);

    match cli.command {
        Commands::Convert(cmd) => {
            commands::convert::handle_convert_command(cmd)?;
        }
        Commands::Analyze(cmd) => {
            commands::analyze::handle_analyze_command(cmd)?;
        }
        Commands::Info(cmd) => {
            commands::info::handle_info_command(cmd);
        }
    }

    Ok(())
}
