use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geopulse_agents::{GuideAgent, GENERAL_CONTEXT};
use geopulse_core::classify_intent;
use geopulse_observability::{init_tracing, AppMetrics};
use geopulse_storage::{seed_catalog, Store};

#[derive(Debug, Parser)]
#[command(name = "geopulse")]
#[command(about = "GeoPulse cultural etiquette CLI")]
struct Cli {
    /// SQLite URL, e.g. sqlite://geopulse.db. Without it an in-memory catalog is used.
    #[arg(long, env = "GEOPULSE_DATABASE_URL")]
    database_url: Option<String>,

    /// Skip loading the reference catalog before running the command.
    #[arg(long)]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat; the active country carries over between turns.
    Chat {
        #[arg(long, default_value = GENERAL_CONTEXT)]
        country: String,
    },
    /// Answer a single message.
    Ask {
        message: String,
        #[arg(long, default_value = GENERAL_CONTEXT)]
        country: String,
    },
    Guide {
        country: String,
    },
    Quiz {
        country: String,
    },
    Countries,
    /// Load the reference catalog and report what was added.
    Seed,
    /// Print the intent a message would be routed to.
    Classify {
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("geopulse_cli");
    let cli = Cli::parse();

    if let Command::Classify { message } = &cli.command {
        println!("{}", classify_intent(message).as_code());
        return Ok(());
    }

    let store = open_store(cli.database_url.as_deref()).await?;

    if let Command::Seed = cli.command {
        let report = seed_catalog(&store).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !cli.no_seed {
        seed_catalog(&store)
            .await
            .context("failed to seed country catalog")?;
    }

    let agent = GuideAgent::new(Arc::new(store), AppMetrics::shared());

    match cli.command {
        Command::Chat { country } => run_chat(agent, country).await?,
        Command::Ask { message, country } => {
            let reply = agent.process_message(&message, &country).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Guide { country } => match agent.guide(&country).await? {
            Some(guide) => println!("{}", serde_json::to_string_pretty(&guide)?),
            None => anyhow::bail!("Country '{}' not found", country.trim()),
        },
        Command::Quiz { country } => {
            let questions = agent.quiz(&country).await?;
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        Command::Countries => {
            for country in agent.countries().await? {
                println!("{}\t{}", country.id, country.name);
            }
        }
        Command::Seed | Command::Classify { .. } => {}
    }

    Ok(())
}

async fn run_chat(agent: GuideAgent<Store>, country: String) -> Result<()> {
    let mut active_country = country;

    println!("GeoPulse chat mode. type 'exit' to quit.");

    loop {
        print!("[{}] > ", active_country);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent.process_message(message, &active_country).await?;
        if let Some(name) = reply.active_country {
            active_country = name;
        }

        println!("\n{}\n", reply.response);
    }

    Ok(())
}

async fn open_store(database_url: Option<&str>) -> Result<Store> {
    match database_url {
        Some(url) => Store::sqlite(url)
            .await
            .with_context(|| format!("failed opening catalog at {}", url)),
        None => Ok(Store::memory()),
    }
}
