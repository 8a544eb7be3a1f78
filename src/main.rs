use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;

use light_rider::bot::{Bot, Strategy};
use light_rider::config::Config;
use light_rider::protocol::Session;

#[derive(Parser)]
#[command(about = "Light Riders bot speaking the judge's stdin/stdout protocol")]
struct Args {
    /// Move selection policy
    #[arg(long, value_enum, default_value_t = Strategy::Search)]
    strategy: Strategy,

    /// Path to the tuning file
    #[arg(long, default_value = "Rider.toml")]
    config: PathBuf,

    /// RNG seed for the random policies
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead. Logs go to stderr; stdout belongs to the judge.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Light Rider bot ({:?})...", args.strategy);

    // Load configuration once at startup
    let config = Config::load_or_default_from(&args.config);
    let seed = args.seed.unwrap_or_else(rand::random);
    let bot = Bot::new(config, args.strategy, seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(bot).run(stdin.lock(), stdout.lock())?;

    info!("Judge closed the channel, exiting");
    Ok(())
}
