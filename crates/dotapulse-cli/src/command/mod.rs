use clap::{Parser, Subcommand};

use self::{config::ShowConfigArg, inactivity::InactivityArg, profile::ProfileArg};

mod config;
mod inactivity;
mod profile;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Measure outcomes of the games played right before inactive periods
    Inactivity(#[clap(flatten)] InactivityArg),
    /// Summarize win rate, leaver rate and hero diversity of players
    Profile(#[clap(flatten)] ProfileArg),
    /// Print the default analysis configuration as JSON
    Config(#[clap(flatten)] ShowConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Inactivity(arg) => inactivity::run(&arg)?,
        Mode::Profile(arg) => profile::run(&arg)?,
        Mode::Config(arg) => config::run(&arg)?,
    }
    Ok(())
}
