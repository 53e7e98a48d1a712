use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use steamdash::chatbot::{self, Reply};
use steamdash::dataset::Dataset;
use steamdash::llm::AiBridge;
use tracing::info;

#[derive(Parser)]
#[command(name = "steamdash")]
#[command(about = "Steam games analytics chatbot")]
struct Args {
    /// The question in natural language
    query: String,

    /// Path to the games CSV (default: data/steam_games.csv)
    #[arg(short, long, default_value = "data/steam_games.csv")]
    data: PathBuf,

    /// Also ask the hosted model for a free-text answer
    #[arg(long)]
    ai: bool,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    info!("Loading dataset from {}", args.data.display());
    let dataset = Dataset::load(&args.data)?;
    info!("Loaded {} games", dataset.height());

    match chatbot::respond(&dataset, &args.query)? {
        Reply::Text(text) => println!("{}", text),
        Reply::Table(rows) => {
            println!("year,games");
            for row in rows {
                println!("{},{}", row.year, row.games);
            }
        }
    }

    if args.ai {
        let bridge = match args.api_key {
            Some(key) => AiBridge::connect(key),
            None => AiBridge::from_env(),
        };
        match bridge.ask(&args.query, &dataset).await {
            Ok(answer) => println!("\nAI answer:\n{}", answer),
            Err(e) => println!("\n{}", e),
        }
    }

    Ok(())
}
