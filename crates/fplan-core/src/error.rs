// Error types for input validation and plan construction.

use thiserror::Error;

use crate::fixture::TeamIndex;

/// Contract violations in the planner's input, caught before any plan runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("schedule is empty")]
    EmptySchedule,

    #[error("at least two teams are required, got {count}")]
    TooFewTeams { count: usize },

    #[error("number of players must be greater than 0")]
    ZeroPlayers,

    #[error("team {team} has strength 0; strengths must be positive")]
    ZeroStrength { team: TeamIndex },

    #[error("match {match_index} references team {team}, but only {team_count} teams exist")]
    TeamOutOfRange {
        match_index: usize,
        team: TeamIndex,
        team_count: usize,
    },

    #[error("match {match_index} has team {team} playing itself")]
    SelfMatch { match_index: usize, team: TeamIndex },

    #[error("replan row has {got} entries, expected one per team ({expected})")]
    ReplanLength { expected: usize, got: usize },

    #[error("replan row allocates {total} players, expected exactly {num_players}")]
    ReplanTotal { total: u64, num_players: u32 },

    #[error("replan powerplayer {team} is not playing in the first match")]
    ReplanPowerplayer { team: TeamIndex },
}

/// Faults raised while building a plan.
///
/// `SeedOutOfRange` is a caller error. `IdleTeamsExhausted` indicates a logic
/// inconsistency: a validated input with an in-range seed never produces it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("seed {seed} is outside 1..={num_players}")]
    SeedOutOfRange { seed: u32, num_players: u32 },

    #[error(
        "match {match_index}: asked to skip {skip} idle teams, but only {idle_teams} are idle"
    )]
    IdleTeamsExhausted {
        match_index: usize,
        skip: usize,
        idle_teams: usize,
    },
}
