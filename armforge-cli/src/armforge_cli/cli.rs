use clap::{Parser, Subcommand};

pub mod serve;

#[derive(Parser, Debug)]
#[command(about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Whether to run in development mode.
    #[arg(long)]
    pub dev: bool,
    /// The verbosity level (0-3).
    #[arg(long, default_value_t = 1)]
    pub verbosity: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the template portal HTTP server.
    Serve(self::serve::Serve),
}
