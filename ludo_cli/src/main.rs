use std::path::PathBuf;

use clap::Parser;
use ludo::{ColorTheme, DiceCount, DiceMode, GameSettings, RandomDice, TurnController};
use ludo_cli::{load_settings, parse_dice_count, parse_option, run_session, SessionEnd, SettingsOverrides};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Hot-seat Ludo in the terminal. Commands are read line by line from stdin.
#[derive(Parser)]
struct Args {
    /// Path to a JSON settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of players, between 2 and 4
    #[arg(short, long)]
    players: Option<u8>,

    /// Number of dice: 1 or 2
    #[arg(short, long, value_parser = parse_dice_count)]
    dice: Option<DiceCount>,

    /// How two dice are used: "sum", "choice" or "both"
    #[arg(long, value_parser = parse_option::<DiceMode>)]
    dice_mode: Option<DiceMode>,

    /// Color theme: "classic", "neon", "pastel" or "ocean"
    #[arg(long, value_parser = parse_option::<ColorTheme>)]
    theme: Option<ColorTheme>,

    /// Captures have to be played when possible
    #[arg(long, default_value_t = false)]
    mandatory_capture: bool,

    /// Occupied safe cells of other colors cannot be entered
    #[arg(long, default_value_t = false)]
    block_safe_spots: bool,

    /// Do not list the available moves
    #[arg(long, default_value_t = false)]
    hide_moves: bool,

    /// Tokens may leave home without rolling a six
    #[arg(long, default_value_t = false)]
    free_start: bool,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => GameSettings::default(),
    };
    let overrides = SettingsOverrides {
        number_of_players: args.players,
        number_of_dice: args.dice,
        dice_mode: args.dice_mode,
        color_theme: args.theme,
        mandatory_capture: args.mandatory_capture,
        block_other_color_safe_spots: args.block_safe_spots,
        hide_available_moves: args.hide_moves,
        free_start: args.free_start,
    };
    let settings = overrides.apply(settings);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let dice = RandomDice::new(StdRng::seed_from_u64(seed));

    let mut ctrl = TurnController::new(settings, dice)?;
    info!(
        players = settings.number_of_players,
        dice = settings.number_of_dice.get(),
        mode = ?settings.dice_mode,
        theme = settings.color_theme.name(),
        "Starting game"
    );
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match run_session(&mut ctrl, stdin, &mut stdout)? {
        SessionEnd::Won { winner } => info!(winner, "Game finished"),
        SessionEnd::Quit | SessionEnd::EndOfInput => info!("Game abandoned"),
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
