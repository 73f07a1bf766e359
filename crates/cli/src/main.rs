use anyhow::{Context, Result};
use arcana_core::{
    EventBus, HistoryStore, KeyValueStore, MemoryStore, RandomSource, ReadingResult, Session, Tone,
};
use arcana_cui::config::AppConfig;
use arcana_cui::logging::init_stderr_tracing;
use arcana_cui::persistence::open_history;
use arcana_cui::LaunchOptions;
use arcana_oracle::{request_interpretation, Interpreter};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

mod report;

const SETTLE_STEP: Duration = Duration::from_millis(100);
const SETTLE_LIMIT: usize = 1_000;

#[derive(Debug, Parser)]
#[command(name = "arcana", version)]
#[command(about = "Tarot readings in the terminal", long_about = None)]
struct Cli {
    #[command(flatten)]
    launch: LaunchOptions,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Draw and interpret one reading without the interactive interface
    Read(ReadArgs),
    /// Inspect saved readings
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// List every card in the deck
    Cards,
    /// List the available spreads
    Spreads,
    /// Open the interactive interface (the default)
    Tui,
}

#[derive(Debug, Args)]
struct ReadArgs {
    /// The question to ask the cards
    #[arg(long, short)]
    question: String,
    /// Spread id, see `arcana spreads`
    #[arg(long)]
    spread: Option<String>,
    /// gentle, rational or spiritual
    #[arg(long)]
    tone: Option<Tone>,
    /// Zero-based positions in the remaining deck to draw, in order. Slots
    /// left over are drawn at random.
    #[arg(long, value_delimiter = ',')]
    pick: Vec<usize>,
    /// Hide per-card meanings
    #[arg(long)]
    brief: bool,
    /// Print the reading as JSON
    #[arg(long)]
    json: bool,
    /// Do not add the reading to history
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// One line per saved reading, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one saved reading
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = match cli.command {
        None | Some(Commands::Tui) => return arcana_cui::run(cli.launch),
        Some(command) => command,
    };

    init_stderr_tracing();
    let config = cli.launch.load_config()?;
    match command {
        Commands::Read(args) => run_read(&config, cli.launch.offline, args),
        Commands::History { action } => run_history(&config, action),
        Commands::Cards => {
            print!("{}", report::cards_table(config.locale()));
            Ok(())
        }
        Commands::Spreads => {
            print!("{}", report::spreads_table(config.locale()));
            Ok(())
        }
        Commands::Tui => Ok(()),
    }
}

fn run_read(config: &AppConfig, offline: bool, args: ReadArgs) -> Result<()> {
    let reading = perform_reading(config, offline, &args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        print!("{}", report::render_reading(config.locale(), &reading, !args.brief));
    }
    Ok(())
}

/// Runs one reading start to finish: picks first, random draws for the
/// slots left, every card revealed, then the interpretation.
fn perform_reading(config: &AppConfig, offline: bool, args: &ReadArgs) -> Result<ReadingResult> {
    let locale = config.locale();
    let interpreter = if offline {
        Interpreter::offline()
    } else {
        Interpreter::from_config(&config.oracle)
    };
    let mut session = Session::new(config.session.clone(), locale, config.rng());
    session.set_tone(args.tone.unwrap_or(config.tone));
    let mut events = EventBus::default();

    session.start(&mut events)?;
    session.submit_question(&args.question, &mut events)?;
    match args.spread.as_deref() {
        Some(id) => session.select_spread_id(id, &mut events)?,
        None => {
            let spread = session.spread().clone();
            session.select_spread(spread, &mut events)?;
        }
    }
    for index in &args.pick {
        if session.needed() == 0 {
            break;
        }
        session
            .draw_at(*index, &mut events)
            .with_context(|| format!("draw deck position {index}"))?;
    }
    if session.needed() > 0 {
        session.auto_draw_remaining(&mut events)?;
    }
    settle(&mut session, &mut events);
    session.reveal_all(&mut events)?;
    settle(&mut session, &mut events);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let reading = if args.no_save {
        let mut history = HistoryStore::open(MemoryStore::new());
        interpret(&runtime, &mut session, &interpreter, &mut history, &mut events)?
    } else {
        let mut history = open_history(config.data_dir());
        interpret(&runtime, &mut session, &interpreter, &mut history, &mut events)?
    };
    log_events(&mut events);
    Ok(reading)
}

fn interpret<R: RandomSource, S: KeyValueStore>(
    runtime: &tokio::runtime::Runtime,
    session: &mut Session<R>,
    interpreter: &Interpreter,
    history: &mut HistoryStore<S>,
    events: &mut EventBus,
) -> Result<ReadingResult> {
    let reading = runtime.block_on(request_interpretation(
        session,
        interpreter,
        history,
        now_millis(),
        events,
    ))?;
    Ok(reading)
}

fn run_history(config: &AppConfig, action: HistoryAction) -> Result<()> {
    let locale = config.locale();
    let history = open_history(config.data_dir());
    match action {
        HistoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(history.load_all())?);
                return Ok(());
            }
            if history.is_empty() {
                println!("{}", locale.text("No readings yet.", "暂无记录。"));
            }
            for reading in history.load_all() {
                println!("{}", report::history_line(locale, reading));
            }
        }
        HistoryAction::Show { id, json } => {
            let reading = history
                .get(&id)
                .with_context(|| format!("no saved reading with id {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(reading)?);
            } else {
                print!(
                    "{}",
                    report::render_reading(locale, reading, config.show_meanings)
                );
            }
        }
    }
    Ok(())
}

/// Runs scheduled session work (auto-advance, reveal sequence) to completion.
fn settle<R: RandomSource>(session: &mut Session<R>, events: &mut EventBus) {
    for _ in 0..SETTLE_LIMIT {
        if !session.has_scheduled_work() {
            break;
        }
        session.advance(SETTLE_STEP, events);
    }
}

fn log_events(events: &mut EventBus) {
    for event in events.drain() {
        tracing::debug!(?event, "session event");
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
