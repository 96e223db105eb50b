use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::prelude::*;

use self::{auto_play::AutoPlayArg, best::BestArg, run_script::RunScriptArg};

mod auto_play;
mod best;
mod run_script;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games with a built-in bot and report the results
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Apply a JSON list of commands to a fresh session
    RunScript(#[clap(flatten)] RunScriptArg),
    /// Print the persisted best score
    Best(#[clap(flatten)] BestArg),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::RunScript(arg) => run_script::run(&arg)?,
        Mode::Best(arg) => best::run(&arg)?,
    }
    Ok(())
}
