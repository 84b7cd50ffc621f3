use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod ask;
mod index;
mod search;
mod status;

#[derive(Parser)]
#[command(name = "clause")]
#[command(about = "Compliance Q&A over indexed regulation text, with cited answers")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Parse a regulation document and load it into the vector store")]
    Index {
        #[arg(help = "Path to the extracted regulation text (plain or markdown)")]
        file: PathBuf,

        #[arg(
            long,
            default_value = "gdpr",
            help = "Regulation family: gdpr, ccpa, pipeda"
        )]
        regulation: String,
    },

    #[command(about = "Ask a compliance question and get a grounded, cited answer")]
    Ask {
        #[arg(help = "The compliance question")]
        question: String,

        #[arg(long, help = "Number of chunks to retrieve (defaults from config)")]
        top_k: Option<usize>,
    },

    #[command(about = "Retrieve matching chunks without generating an answer")]
    Search {
        #[arg(help = "Search query")]
        query: String,

        #[arg(long, default_value = "5", help = "Maximum results to return")]
        top_k: usize,
    },

    #[command(about = "Show collection and model status")]
    Status,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Index { file, regulation } => index::run(file, &regulation, cli.json).await,
        Commands::Ask { question, top_k } => ask::run(&question, top_k, cli.json).await,
        Commands::Search { query, top_k } => search::run(&query, top_k, cli.json).await,
        Commands::Status => status::run(cli.json).await,
    }
}
