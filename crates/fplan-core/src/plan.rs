// Single-seed plan construction.
//
// Walks the schedule one match at a time, keeping a dense table of slots held
// per team. Each row starts as a copy of the previous one; the two playing
// teams are raised towards the split proposed for the current target, then
// pulled back down to respect the per-match capacity and the remaining
// transfer budget. Any net increase is paid for by idle teams whose next
// fixture is furthest away. The target itself is retuned after every match
// so that transfers are spent at roughly the planned pace.

use tracing::{debug, trace};

use crate::error::PlanError;
use crate::farthest::next_farthest_team;
use crate::fixture::{Match, Side, TeamIndex};
use crate::input::PlannerInput;
use crate::split::{round_div, split_slots};

// ---------------------------------------------------------------------------
// Plan table
// ---------------------------------------------------------------------------

/// Slots held per team for every match, plus the powerplayer holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// `slots[match][team]`
    pub slots: Vec<Vec<u32>>,
    /// Team holding the powerplayer in each match.
    pub powerplayer: Vec<TeamIndex>,
}

/// One team's slot count moving between consecutive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChange {
    pub team: TeamIndex,
    pub before: u32,
    pub after: u32,
}

impl SlotChange {
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

impl Plan {
    /// An all-zero plan for the given dimensions.
    pub fn new(match_count: usize, team_count: usize) -> Self {
        Plan {
            slots: vec![vec![0; team_count]; match_count],
            powerplayer: vec![0; match_count],
        }
    }

    pub fn match_count(&self) -> usize {
        self.slots.len()
    }

    pub fn row(&self, match_index: usize) -> &[u32] {
        &self.slots[match_index]
    }

    /// Slots held across all teams at a match.
    pub fn row_total(&self, match_index: usize) -> u32 {
        self.slots[match_index].iter().sum()
    }

    /// Slots held by the two teams playing `m` at `match_index`.
    pub fn playing(&self, match_index: usize, m: &Match) -> u32 {
        let row = &self.slots[match_index];
        row[m.team1] + row[m.team2]
    }

    /// Total active player-appearances over the schedule.
    pub fn score(&self, schedule: &[Match]) -> u32 {
        schedule
            .iter()
            .enumerate()
            .map(|(i, m)| self.playing(i, m))
            .sum()
    }

    /// Teams whose slot count differs from the previous row.
    ///
    /// Always empty for the first row.
    pub fn changes(&self, match_index: usize) -> Vec<SlotChange> {
        if match_index == 0 {
            return Vec::new();
        }
        let before = &self.slots[match_index - 1];
        let after = &self.slots[match_index];
        before
            .iter()
            .zip(after)
            .enumerate()
            .filter(|(_, (b, a))| b != a)
            .map(|(team, (&before, &after))| SlotChange {
                team,
                before,
                after,
            })
            .collect()
    }
}

/// Result of one plan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    /// Initial target the run started from.
    pub seed: u32,
    pub plan: Plan,
    /// Active player-appearances, see [`Plan::score`].
    pub score: u32,
    /// Net transfers paid at each match (zero for the first match).
    pub transfers_charged: Vec<i64>,
    /// Transfer budget left after the last match.
    pub transfers_left: i64,
}

impl PlanOutcome {
    pub fn transfers_used(&self) -> i64 {
        self.transfers_charged.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build the plan for one initial target `seed`.
///
/// Pure: the same input and seed always give the same outcome. `seed` must
/// lie in `1..=num_players`.
pub fn run_plan(input: &PlannerInput, seed: u32) -> Result<PlanOutcome, PlanError> {
    if !(1..=input.num_players()).contains(&seed) {
        return Err(PlanError::SeedOutOfRange {
            seed,
            num_players: input.num_players(),
        });
    }
    let mut builder = PlanBuilder::new(input, seed);
    builder.seed_first_row();

    let match_count = input.match_count();
    let mut i = 1;
    while i < match_count && builder.transfers > 0 {
        builder.transition(i)?;
        i += 1;
    }

    if i < match_count {
        debug!(seed, match_index = i, "transfers exhausted, freezing roster");
        for j in i..match_count {
            builder.freeze(j);
        }
    }

    Ok(builder.finish())
}

/// Run one seed and write its plan into `plan`, returning the score.
pub fn active_players(
    input: &PlannerInput,
    seed: u32,
    plan: &mut Plan,
) -> Result<u32, PlanError> {
    let outcome = run_plan(input, seed)?;
    *plan = outcome.plan;
    Ok(outcome.score)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct PlanBuilder<'a> {
    input: &'a PlannerInput,
    seed: u32,
    plan: Plan,
    /// Current per-match target, retuned after every transition.
    players_per_match: u32,
    /// Remaining transfer budget.
    transfers: i64,
    /// Sum of positive net transfers so far.
    transfers_made: u64,
    transfers_charged: Vec<i64>,
}

impl<'a> PlanBuilder<'a> {
    fn new(input: &'a PlannerInput, seed: u32) -> Self {
        PlanBuilder {
            input,
            seed,
            plan: Plan::new(input.match_count(), input.team_count()),
            players_per_match: seed,
            transfers: input.transfers() as i64,
            transfers_made: 0,
            transfers_charged: vec![0; input.match_count()],
        }
    }

    fn seed_first_row(&mut self) {
        match self.input.replan() {
            Some(replan) => {
                self.plan.slots[0].copy_from_slice(&replan.slots);
                self.plan.powerplayer[0] = replan.powerplayer;
            }
            None => self.bootstrap(),
        }
    }

    /// Fill the first row by handing out the budget in schedule order at an
    /// increasing target until the whole budget is placed.
    ///
    /// A team appearing in several early matches keeps its highest proposed
    /// share; each increase is capped by what is still unallocated.
    fn bootstrap(&mut self) {
        let input = self.input;
        let budget = input.num_players();
        let mut target = self.seed;

        while self.plan.row_total(0) < budget {
            let row = &mut self.plan.slots[0];
            row.fill(0);
            let mut unallocated = budget;

            for (i, m) in input.schedule().iter().enumerate() {
                if unallocated == 0 {
                    break;
                }
                let split = split_slots(m, target, input.strengths());
                if i == 0 {
                    self.plan.powerplayer[0] = split.powerplayer_team(m);
                }
                for side in Side::BOTH {
                    if unallocated == 0 {
                        break;
                    }
                    let team = m.team(side);
                    let added = split.share(side).saturating_sub(row[team]).min(unallocated);
                    row[team] += added;
                    unallocated -= added;
                }
            }

            trace!(target, placed = budget - unallocated, "bootstrap pass");
            target += 1;
        }
    }

    fn transition(&mut self, i: usize) -> Result<(), PlanError> {
        let input = self.input;
        let m = input.schedule()[i];
        let [team1, team2] = m.teams();
        let budget = input.num_players();

        let prev = self.plan.slots[i - 1].clone();
        let mut row = prev.clone();

        let split = split_slots(&m, self.players_per_match, input.strengths());
        let mut powerplayer = split.powerplayer_team(&m);
        row[team1] = prev[team1].max(split.shares[0]);
        row[team2] = prev[team2].max(split.shares[1]);

        // Capacity: trim the team that moved, team1 if both did.
        let playing = row[team1] + row[team2];
        if playing > budget {
            let excess = playing - budget;
            if row[team1] == prev[team1] {
                row[team2] = row[team2].saturating_sub(excess);
            } else {
                row[team1] = row[team1].saturating_sub(excess);
            }
            debug!(match_index = i, excess, "trimmed over-capacity match");
        }

        let mut num_transfers = total(&row) - total(&prev);

        // Transfer budget: take increases back one at a time, alternating sides.
        if num_transfers > self.transfers {
            debug!(
                match_index = i,
                needed = num_transfers,
                available = self.transfers,
                "not enough transfers, scaling back"
            );
            let mut side = Side::First;
            while num_transfers > self.transfers {
                let team = m.team(side);
                if row[team] > prev[team] {
                    row[team] -= 1;
                } else {
                    row[m.team(side.other())] -= 1;
                }
                side = side.other();
                num_transfers -= 1;
            }

            if powerplayer == team1 && row[team1] == 0 {
                powerplayer = team2;
            } else if powerplayer == team2 && row[team2] == 0 {
                powerplayer = team1;
            }
        }

        // Idle donation: the net increase comes out of teams that wait longest.
        if num_transfers > 0 {
            let mut to_remove = num_transfers as u32;
            let mut skip = 0;
            while to_remove > 0 {
                let team = next_farthest_team(input.schedule(), i, input.team_count(), skip)?;
                if prev[team] <= to_remove {
                    to_remove -= prev[team];
                    row[team] = 0;
                } else {
                    row[team] = prev[team] - to_remove;
                    to_remove = 0;
                }
                trace!(match_index = i, team, left = row[team], "idle team donated");
                skip += 1;
            }
            self.transfers_made += num_transfers as u64;
        }

        self.plan.slots[i] = row;
        self.plan.powerplayer[i] = powerplayer;
        self.transfers_charged[i] = num_transfers;
        self.transfers -= num_transfers;
        self.retarget(i);

        trace!(
            match_index = i,
            num_transfers,
            transfers_left = self.transfers,
            players_per_match = self.players_per_match,
            "transition"
        );

        Ok(())
    }

    /// Steer the target so actual transfer spending tracks the planned pace
    /// of `transfers / (matches - 1)` per match.
    fn retarget(&mut self, i: usize) {
        let input = self.input;
        let next = if self.transfers_made > 0 {
            // seed * planned / actual, with planned = T / (n - 1) and actual = made / i
            let num = self.seed as u64 * input.transfers() as u64 * i as u64;
            let den = (input.match_count() as u64 - 1) * self.transfers_made;
            round_div(num, den)
        } else {
            self.players_per_match as u64 + 1
        };
        self.players_per_match = next.clamp(1, input.num_players() as u64) as u32;
    }

    /// Carry the previous row forward unchanged once no transfers remain.
    fn freeze(&mut self, j: usize) {
        let input = self.input;
        let m = input.schedule()[j];
        let row = self.plan.slots[j - 1].clone();

        let split = split_slots(&m, self.players_per_match, input.strengths());
        let mut powerplayer = split.powerplayer_team(&m);
        if row[powerplayer] == 0 {
            powerplayer = m.team(split.powerplayer.other());
        }

        self.plan.slots[j] = row;
        self.plan.powerplayer[j] = powerplayer;
    }

    fn finish(self) -> PlanOutcome {
        let score = self.plan.score(self.input.schedule());
        PlanOutcome {
            seed: self.seed,
            plan: self.plan,
            score,
            transfers_charged: self.transfers_charged,
            transfers_left: self.transfers,
        }
    }
}

fn total(row: &[u32]) -> i64 {
    row.iter().map(|&s| s as i64).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
