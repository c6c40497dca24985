//! Parley - chat with a small trained chatbot from the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parley::conversation::Conversation;
use parley::nlp::Normalizer;
use parley::{ChatBot, Config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat on stdin (default)
    Chat,
    /// Answer a single message and exit
    Ask {
        /// The message to answer
        text: String,
    },
    /// Retrain the classifier from the store or built-in corpus
    Train,
    /// Show how a message is normalized
    Normalize {
        /// The message to normalize
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let command = args.command.unwrap_or(Command::Chat);

    if let Command::Normalize { text } = &command {
        println!("{}", Normalizer::default().normalize(text));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let bot = ChatBot::from_config(&config);

    match command {
        Command::Ask { text } => {
            let mut conversation = Conversation::default();
            let candidate = bot.respond_in(&mut conversation, &text).await;
            println!("{}", candidate.text);
        }
        Command::Train => {
            let outcome = bot.update_model().await;
            println!("{}", outcome.message);
            if !outcome.success {
                anyhow::bail!("training failed");
            }
        }
        Command::Chat => run_chat(&bot).await?,
        Command::Normalize { .. } => {}
    }

    Ok(())
}

async fn run_chat(bot: &ChatBot) -> Result<()> {
    let mut conversation = Conversation::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Parley is ready. Type 'quit' to leave.");
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "quit" | "exit") {
            break;
        }

        let candidate = bot.respond_in(&mut conversation, message).await;
        println!("bot> {}", candidate.text);
    }

    Ok(())
}
