// Validated planner input.
//
// `PlannerInput::new` is the only way to build one, so the plan builder can
// index strengths and rows without re-checking the schedule.

use crate::error::InputError;
use crate::fixture::{Match, TeamIndex};

/// The outcome of a match that has already been played, used in place of the
/// initial seed when replanning part-way through a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replan {
    /// Slots held per team for the first match of the schedule.
    pub slots: Vec<u32>,
    /// Team that held the powerplayer in that match.
    pub powerplayer: TeamIndex,
}

/// Everything a plan run reads. Never mutated by the planner.
#[derive(Debug, Clone)]
pub struct PlannerInput {
    num_players: u32,
    transfers: u32,
    strengths: Vec<u32>,
    schedule: Vec<Match>,
    replan: Option<Replan>,
}

impl PlannerInput {
    /// Validate and assemble planner input.
    ///
    /// # Arguments
    /// - `num_players`: slots available per match
    /// - `transfers`: substitutions allowed over the whole schedule
    /// - `strengths`: relative strength per team, indexed by team
    /// - `schedule`: fixtures in chronological order
    /// - `replan`: the realized first row, when the first match is already played;
    ///   it must place exactly `num_players` players
    pub fn new(
        num_players: u32,
        transfers: u32,
        strengths: Vec<u32>,
        schedule: Vec<Match>,
        replan: Option<Replan>,
    ) -> Result<Self, InputError> {
        if num_players == 0 {
            return Err(InputError::ZeroPlayers);
        }
        if strengths.len() < 2 {
            return Err(InputError::TooFewTeams {
                count: strengths.len(),
            });
        }
        if let Some(team) = strengths.iter().position(|&s| s == 0) {
            return Err(InputError::ZeroStrength { team });
        }
        if schedule.is_empty() {
            return Err(InputError::EmptySchedule);
        }

        let team_count = strengths.len();
        for (match_index, m) in schedule.iter().enumerate() {
            for team in m.teams() {
                if team >= team_count {
                    return Err(InputError::TeamOutOfRange {
                        match_index,
                        team,
                        team_count,
                    });
                }
            }
            if m.team1 == m.team2 {
                return Err(InputError::SelfMatch {
                    match_index,
                    team: m.team1,
                });
            }
        }

        if let Some(replan) = &replan {
            if replan.slots.len() != team_count {
                return Err(InputError::ReplanLength {
                    expected: team_count,
                    got: replan.slots.len(),
                });
            }
            let total = replan
                .slots
                .iter()
                .try_fold(0u64, |acc, &s| acc.checked_add(u64::from(s)))
                .unwrap_or(u64::MAX);
            if total != u64::from(num_players) {
                return Err(InputError::ReplanTotal { total, num_players });
            }
            if !schedule[0].contains(replan.powerplayer) {
                return Err(InputError::ReplanPowerplayer {
                    team: replan.powerplayer,
                });
            }
        }

        Ok(PlannerInput {
            num_players,
            transfers,
            strengths,
            schedule,
            replan,
        })
    }

    pub fn num_players(&self) -> u32 {
        self.num_players
    }

    pub fn transfers(&self) -> u32 {
        self.transfers
    }

    pub fn strengths(&self) -> &[u32] {
        &self.strengths
    }

    pub fn schedule(&self) -> &[Match] {
        &self.schedule
    }

    pub fn replan(&self) -> Option<&Replan> {
        self.replan.as_ref()
    }

    pub fn team_count(&self) -> usize {
        self.strengths.len()
    }

    pub fn match_count(&self) -> usize {
        self.schedule.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Home;

    fn schedule() -> Vec<Match> {
        vec![Match::new(0, 1, Home::Neither), Match::new(1, 2, Home::Team1)]
    }

    #[test]
    fn accepts_valid_input() {
        let input = PlannerInput::new(11, 30, vec![3, 2, 1], schedule(), None).unwrap();
        assert_eq!(input.num_players(), 11);
        assert_eq!(input.transfers(), 30);
        assert_eq!(input.team_count(), 3);
        assert_eq!(input.match_count(), 2);
        assert!(input.replan().is_none());
    }

    #[test]
    fn rejects_zero_players() {
        let err = PlannerInput::new(0, 5, vec![1, 1, 1], schedule(), None).unwrap_err();
        assert_eq!(err, InputError::ZeroPlayers);
    }

    #[test]
    fn rejects_single_team() {
        let err = PlannerInput::new(11, 5, vec![1], schedule(), None).unwrap_err();
        assert_eq!(err, InputError::TooFewTeams { count: 1 });
    }

    #[test]
    fn rejects_zero_strength() {
        let err = PlannerInput::new(11, 5, vec![1, 0, 1], schedule(), None).unwrap_err();
        assert_eq!(err, InputError::ZeroStrength { team: 1 });
    }

    #[test]
    fn rejects_empty_schedule() {
        let err = PlannerInput::new(11, 5, vec![1, 1], vec![], None).unwrap_err();
        assert_eq!(err, InputError::EmptySchedule);
    }

    #[test]
    fn rejects_out_of_range_team() {
        let err = PlannerInput::new(11, 5, vec![1, 1], schedule(), None).unwrap_err();
        assert_eq!(
            err,
            InputError::TeamOutOfRange {
                match_index: 1,
                team: 2,
                team_count: 2,
            }
        );
    }

    #[test]
    fn rejects_team_playing_itself() {
        let bad = vec![Match::new(1, 1, Home::Neither)];
        let err = PlannerInput::new(11, 5, vec![1, 1], bad, None).unwrap_err();
        assert_eq!(err, InputError::SelfMatch { match_index: 0, team: 1 });
    }

    #[test]
    fn rejects_replan_of_wrong_length() {
        let replan = Replan {
            slots: vec![5, 6],
            powerplayer: 0,
        };
        let err = PlannerInput::new(11, 5, vec![1, 1, 1], schedule(), Some(replan)).unwrap_err();
        assert_eq!(err, InputError::ReplanLength { expected: 3, got: 2 });
    }

    #[test]
    fn rejects_replan_with_wrong_total() {
        let replan = Replan {
            slots: vec![6, 6, 1],
            powerplayer: 0,
        };
        let err = PlannerInput::new(11, 5, vec![1, 1, 1], schedule(), Some(replan)).unwrap_err();
        assert_eq!(
            err,
            InputError::ReplanTotal {
                total: 13,
                num_players: 11,
            }
        );

        let replan = Replan {
            slots: vec![4, 4, 1],
            powerplayer: 0,
        };
        let err = PlannerInput::new(11, 5, vec![1, 1, 1], schedule(), Some(replan)).unwrap_err();
        assert_eq!(
            err,
            InputError::ReplanTotal {
                total: 9,
                num_players: 11,
            }
        );
    }

    #[test]
    fn replan_total_does_not_overflow() {
        let replan = Replan {
            slots: vec![u32::MAX, 2, 0],
            powerplayer: 0,
        };
        let err = PlannerInput::new(11, 5, vec![1, 1, 1], schedule(), Some(replan)).unwrap_err();
        assert_eq!(
            err,
            InputError::ReplanTotal {
                total: u64::from(u32::MAX) + 2,
                num_players: 11,
            }
        );
    }

    #[test]
    fn rejects_replan_powerplayer_not_in_first_match() {
        let replan = Replan {
            slots: vec![5, 5, 1],
            powerplayer: 2,
        };
        let err = PlannerInput::new(11, 5, vec![1, 1, 1], schedule(), Some(replan)).unwrap_err();
        assert_eq!(err, InputError::ReplanPowerplayer { team: 2 });
    }
}
