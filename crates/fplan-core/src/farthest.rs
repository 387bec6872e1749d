// Idle-team ranking: which team not playing now has the longest wait until
// its next fixture. Those teams lose the least by giving up slots.

use crate::error::PlanError;
use crate::fixture::{Match, TeamIndex};

/// Distance assigned to idle teams with no remaining fixtures.
const NO_NEXT_MATCH: usize = usize::MAX;

/// Return the idle team ranked `skip + 1` by distance to its next fixture.
///
/// Teams playing in `schedule[match_index]` are never returned. An idle
/// team's distance is the index of its first fixture after `match_index`;
/// teams with no later fixture rank first. Ties go to the lowest team index.
///
/// Fails when `skip` would step past every idle team.
pub fn next_farthest_team(
    schedule: &[Match],
    match_index: usize,
    team_count: usize,
    skip: usize,
) -> Result<TeamIndex, PlanError> {
    let idle_teams = team_count.saturating_sub(2);
    if skip >= idle_teams {
        return Err(PlanError::IdleTeamsExhausted {
            match_index,
            skip,
            idle_teams,
        });
    }

    let current = &schedule[match_index];
    let mut distances: Vec<usize> = (0..team_count)
        .map(|team| if current.contains(team) { 0 } else { NO_NEXT_MATCH })
        .collect();

    for (i, m) in schedule.iter().enumerate().skip(match_index + 1) {
        for team in m.teams() {
            if distances[team] == NO_NEXT_MATCH {
                distances[team] = i;
            }
        }
    }

    let mut team = farthest(&distances);
    for _ in 0..skip {
        distances[team] = 0;
        team = farthest(&distances);
    }

    Ok(team)
}

/// Index of the largest distance, first occurrence on ties.
fn farthest(distances: &[usize]) -> TeamIndex {
    let mut best = 0;
    for (team, &d) in distances.iter().enumerate() {
        if d > distances[best] {
            best = team;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
