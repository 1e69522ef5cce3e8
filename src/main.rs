use std::path::PathBuf;

use clap::Parser;
use trivia_quiz::{Difficulty, RunOptions, DEFAULT_STORE_PATH};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Player name, pre-filled on the welcome screen
    #[arg(short, long)]
    name: Option<String>,

    /// Open Trivia DB category id to preselect
    #[arg(short, long)]
    category: Option<u32>,

    /// Difficulty to preselect
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// File holding the persisted name and high score
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let options = RunOptions {
        name: args.name,
        category: args.category,
        difficulty: args.difficulty,
        store_path: args.store,
    };

    if let Err(e) = trivia_quiz::run(options).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
