use clap::{ArgAction, Parser, Subcommand};

use self::{annotate::AnnotateArg, inspect::InspectArg};

mod annotate;
mod inspect;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct CommandArgs {
    /// What mode to run the program in (defaults to `annotate`)
    #[command(subcommand)]
    mode: Option<Mode>,
    #[command(flatten)]
    annotate: AnnotateArg,
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Decrease log verbosity (-q: warn, -qq: error)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    quiet: u8,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Write annotated events files for every run of a dataset
    Annotate(#[clap(flatten)] AnnotateArg),
    /// Print the level, frame count and event counts of one capture
    Inspect(#[clap(flatten)] InspectArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init(args.verbose, args.quiet);
    match args.mode.unwrap_or(Mode::Annotate(args.annotate)) {
        Mode::Annotate(arg) => annotate::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
    }
    Ok(())
}
