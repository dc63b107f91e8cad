use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Pre-fill the search box and start searching immediately.
    #[arg(long)]
    pub query: Option<String>,
}
