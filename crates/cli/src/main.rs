mod sim;
mod term;

use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use clap::{Arg, ArgMatches};
use life_common::{config, text, Board, BoardConfig};
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    sim::Outcome,
    term::{KeyWatcher, MenuChoice, Terminal},
};

const DEFAULT_LOG_FILTER: &str = "life=warn,life_common=warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = clap::App::new("life")
        .about("Conway's Game of Life on a wrap-around board")
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .default_value(config::DEFAULT_PATH)
                .help("board options used when rebuilding; defaults apply if the file is missing"),
        )
        .arg(
            Arg::with_name("load")
                .long("load")
                .takes_value(true)
                .conflicts_with("rebuild")
                .help("skip the menu and load a saved board"),
        )
        .arg(
            Arg::with_name("rebuild")
                .long("rebuild")
                .help("skip the menu and build a random board from the config"),
        )
        .arg(
            Arg::with_name("interval")
                .long("interval")
                .takes_value(true)
                .default_value("1000")
                .help("milliseconds between generations"),
        )
        .arg(
            Arg::with_name("generations")
                .long("generations")
                .takes_value(true)
                .help("stop without saving after this many generations"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed for the random initial board"),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .takes_value(true)
                .help("tracing filter, e.g. life=debug (overrides RUST_LOG)"),
        )
        .get_matches();

    init_tracing(matches.value_of("log"))?;

    let interval = Duration::from_millis(parse_arg(&matches, "interval")?.unwrap_or(1000));
    let limit = parse_arg::<u32>(&matches, "generations")?;

    let choice = if matches.is_present("load") {
        MenuChoice::Load
    } else if matches.is_present("rebuild") {
        MenuChoice::Rebuild
    } else {
        term::menu().context("could not read the menu choice")?
    };

    let board = match choice {
        MenuChoice::Load => {
            let path = match matches.value_of("load") {
                Some(path) => PathBuf::from(path),
                None => PathBuf::from(term::prompt("Read file name:")?),
            };
            text::load(&path).with_context(|| format!("could not load {}", path.display()))?
        }
        MenuChoice::Rebuild => rebuild(&matches)?,
        MenuChoice::Exit => {
            debug!("exit from menu");
            return Ok(());
        }
    };

    let (signal_tx, mut signals) = mpsc::unbounded_channel();
    let outcome = {
        let mut screen = Terminal::enter().context("could not set up the terminal")?;
        let _watcher = KeyWatcher::spawn(signal_tx).context("could not watch the keyboard")?;
        sim::run(board, &mut screen, &mut signals, interval, limit).await?
    };

    match outcome {
        Outcome::Save(board) => {
            let path = term::prompt("Write file name:")?;
            text::save(&board, &path).with_context(|| format!("could not save to {}", path))?;
            println!("Saved generation {} to {}", board.generation(), path);
        }
        Outcome::Quit(board) | Outcome::Finished(board) => {
            info!(
                generation = board.generation().get(),
                alive = board.alive_count(),
                "stopped without saving"
            );
        }
    }
    Ok(())
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;

    let filter = match filter {
        Some(filter) => filter.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(tracing_subscriber::EnvFilter::try_new(&filter).context("invalid log filter")?),
    )
    .context("could not install the tracing subscriber")?;
    Ok(())
}

fn rebuild(matches: &ArgMatches) -> anyhow::Result<Board> {
    let path = matches.value_of("config").unwrap_or(config::DEFAULT_PATH);
    let config = BoardConfig::load_or_default(path)
        .with_context(|| format!("could not read configuration {}", path))?;
    info!(?config, "building board");
    let board = match parse_arg::<u64>(matches, "seed")? {
        Some(seed) => config.build_with_rng(&mut StdRng::seed_from_u64(seed)),
        None => config.build(),
    };
    board.context("invalid board configuration")
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse()
                .with_context(|| format!("invalid --{} value {:?}", name, value))
        })
        .transpose()
}
