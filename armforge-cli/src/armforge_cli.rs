mod cli;

pub use cli::Cli;
use cli::Commands;

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Commands::Serve(serve) => {
                self.run_serve(serve).await?;
            },
        }

        Ok(())
    }
}
