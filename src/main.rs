//! Binary entrypoint for the tinyquest CLI.
//!
//! Commands:
//! - `play [--seed <n>] [--name <name>]` - play interactively on stdin/stdout
//! - `init` - write a starter `config.toml` and the starter world catalog
//! - `leaderboard` - print the ranked top ten
//!
//! See the library crate docs for module-level details: `tinyquest::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use tinyquest::config::Config;
use tinyquest::game::{
    format_entries, spawn_engine, Catalog, GameSession, Leaderboard, Outcome, RandomDice,
};

#[derive(Parser)]
#[command(name = "tinyquest")]
#[command(about = "A turn-based text adventure with a persistent leaderboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on this terminal
    Play {
        /// Fixed RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Player name (skips the name prompt)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Write a default configuration and the starter world
    Init,
    /// Print the leaderboard
    Leaderboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed, name } => {
            let config = load_or_default(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            play(config, seed, name).await?;
            // The stdin reader may still be parked in a blocking read.
            std::process::exit(0);
        }
        Commands::Init => {
            init_logging(&None, cli.verbose);
            if Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it untouched", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                info!("Configuration file created at {}", cli.config);
            }
            let config = Config::load(&cli.config).await?;
            tokio::fs::create_dir_all(&config.storage.data_dir).await?;
            let written = Catalog::write_starter(&config.storage.catalog_dir)?;
            for file in &written {
                info!("wrote {}/{}", config.storage.catalog_dir, file);
            }
            println!(
                "Ready: {} catalog file(s) written to {}. Run `tinyquest play` to start.",
                written.len(),
                config.storage.catalog_dir
            );
        }
        Commands::Leaderboard => {
            let config = load_or_default(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let (board, warning) = Leaderboard::load_or_empty(config.storage.leaderboard_path());
            if let Some(w) = warning {
                println!("Warning: {}", w);
            }
            for line in board.format_lines() {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// A missing config file means defaults; a broken one is an error.
async fn load_or_default(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

async fn play(config: Config, seed: Option<u64>, name: Option<String>) -> Result<()> {
    let world = Catalog::load_dir(&config.storage.catalog_dir);
    let (board, board_warning) = Leaderboard::load_or_empty(config.storage.leaderboard_path());
    let dice = RandomDice::from_seed(seed.or(config.game.rng_seed));

    let mut game = config.game.clone();
    if let Some(name) = name {
        game.player_name = name;
        game.ask_name = false;
    }
    info!(
        "starting tinyquest v{} ({:?} navigation, {:?} scoring)",
        env!("CARGO_PKG_VERSION"),
        game.navigation,
        game.scoring
    );
    let session = GameSession::new(game, world.catalog, board, dice)
        .with_warnings(world.warnings.into_iter().chain(board_warning));
    let (engine, task) = spawn_engine(session);

    // Stdin is read on its own task so the engine only ever sees whole lines.
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_outcome(&engine.opening().await?);
    prompt();
    while let Some(line) = line_rx.recv().await {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        let outcome = engine.submit(line).await?;
        print_outcome(&outcome);
        if outcome.game_over.is_some() {
            println!("Leaderboard:");
            for entry in format_entries(&engine.leaderboard().await?) {
                println!("  {}", entry);
            }
        }
        prompt();
    }

    engine.shutdown();
    task.await?;
    println!("Farewell.");
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    for line in &outcome.messages {
        println!("{}", line);
    }
    println!("[{}]", outcome.status.line());
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);
    let file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(ref file) = file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));

            // Echo to the console only when someone is watching it
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
