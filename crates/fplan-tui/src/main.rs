// Transfer planner entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config and schedule (copying defaults on first run)
// 4. Run the requested seeds
// 5. Print the plan tables and the score

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fplan_app::{load_league, League};
use fplan_core::{explore, optimize, run_plan, PlanOutcome};
use fplan_tui::render::{self, PlanView};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fplan", about = "Plan fantasy squad transfers across a fixture list")]
struct Cli {
    /// Project root holding config/ and defaults/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Print the plan for every starting target before the best one
    #[arg(long, conflicts_with = "seed")]
    all_seeds: bool,

    /// Print only the plan for this starting target
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    // 1. Parse the command line
    let cli = Cli::parse();

    // 2. Initialize tracing (log to file, not terminal)
    init_tracing(&cli.root)?;
    info!("fplan starting up");

    // 3. Load config and schedule
    let league = load_league(&cli.root).context("failed to load league")?;

    // 4-5. Run and print
    if let Some(seed) = cli.seed {
        let outcome = run_plan(&league.input, seed)
            .with_context(|| format!("failed to build plan for seed {seed}"))?;
        print_plan(&league, &outcome, format!("Seed {seed}"))?;
        println!("Active players: {}", outcome.score);
        return Ok(());
    }

    if cli.all_seeds {
        let outcomes = explore(&league.input).context("failed to build plans")?;
        for outcome in &outcomes {
            print_plan(&league, outcome, format!("Seed {}", outcome.seed))?;
            println!("Active players: {}", outcome.score);
            println!();
        }
    }

    let best = optimize(&league.input).context("failed to find best plan")?;
    print_plan(
        &league,
        &best,
        format!("{} (seed {})", league.name, best.seed),
    )?;
    println!("Maximum active players: {}", best.score);

    info!("fplan finished");
    Ok(())
}

/// Print one plan: coloured on a terminal, plain text otherwise.
fn print_plan(league: &League, outcome: &PlanOutcome, title: String) -> anyhow::Result<()> {
    let view = PlanView {
        title,
        teams: &league.teams,
        schedule: league.input.schedule(),
        transfers: league.input.transfers(),
        outcome,
    };

    let stdout = std::io::stdout();
    if stdout.is_terminal() {
        render::write_styled(&mut stdout.lock(), &view).context("failed to write plan")?;
    } else {
        for line in render::plain_lines(&view) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which shows the plan).
fn init_tracing(root: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("fplan.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fplan=info,fplan_core=info,fplan_app=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
