pub mod toc;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle ToC files
    Toc {
        #[command(subcommand)]
        command: toc::ToCCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Toc { command } => command.handle(),
        }
    }
}
