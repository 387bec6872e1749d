// League assembly: config + schedule -> validated planner input.

use std::path::Path;

use fplan_core::{InputError, Match, PlannerInput, Replan};
use tracing::info;

use crate::config::{self, Config, ConfigError, ReplanConfig};
use crate::schedule::{self, ScheduleError};

#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("invalid league: {0}")]
    Input(#[from] InputError),
}

/// A fully loaded league, ready to plan.
#[derive(Debug, Clone)]
pub struct League {
    pub name: String,
    /// Team codes, indexed like the planner's team indices.
    pub teams: Vec<String>,
    pub input: PlannerInput,
}

impl League {
    pub fn team_name(&self, team: usize) -> &str {
        self.teams.get(team).map_or("?", String::as_str)
    }
}

/// Load `config/league.toml` (copying defaults on first run) and the
/// schedule it points at.
pub fn load_league(base_dir: &Path) -> Result<League, LeagueError> {
    let config = config::load_config(base_dir)?;
    let codes = config.team_codes();
    let schedule = schedule::load_schedule(&config.schedule_path(), &codes)?;
    build_league(&config, schedule)
}

/// Combine a loaded config with its fixture list.
pub fn build_league(config: &Config, schedule: Vec<Match>) -> Result<League, LeagueError> {
    let strengths = config.teams.iter().map(|t| t.strength).collect();
    let replan = config.replan.as_ref().map(|r| replan_row(config, r));

    let input = PlannerInput::new(
        config.league.num_players,
        config.league.transfers,
        strengths,
        schedule,
        replan,
    )?;

    info!(
        league = %config.league.name,
        teams = input.team_count(),
        matches = input.match_count(),
        num_players = input.num_players(),
        transfers = input.transfers(),
        replan = input.replan().is_some(),
        "league loaded"
    );

    Ok(League {
        name: config.league.name.clone(),
        teams: config.team_codes(),
        input,
    })
}

/// Expand the per-code replan table into a row indexed by team.
///
/// Codes were checked against the team list when the config was validated.
fn replan_row(config: &Config, replan: &ReplanConfig) -> Replan {
    let mut slots = vec![0; config.teams.len()];
    for (code, &count) in &replan.slots {
        if let Some(team) = config.team_index(code) {
            slots[team] += count;
        }
    }
    Replan {
        slots,
        powerplayer: config.team_index(&replan.powerplayer).unwrap_or_default(),
    }
}
