use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lyrics-seeker")]
#[command(author, version, about = "Telegram bot that finds songs by lyrics metadata and sends audio with lyrics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Search the lyrics provider and print a result page the way the bot shows it
    Search {
        /// Free-text query, e.g. "here comes the sun beatles"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Page to print (1-based)
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
