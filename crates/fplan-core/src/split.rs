// Team split calculation: how a target slot count divides between the two
// teams of a match, and which of them should hold the powerplayer.
//
// Shares are proportional to strength, with a 25% boost for the home side.
// All rounding is half away from zero on exact integer ratios so that the
// same inputs always produce the same split.

use crate::fixture::{Home, Match, Side, TeamIndex};

/// Home advantage multiplier, as the exact ratio 5/4.
pub const HOME_ADVANTAGE_NUM: u64 = 5;
pub const HOME_ADVANTAGE_DEN: u64 = 4;

/// Proposed allocation for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Slots for `[team1, team2]`.
    pub shares: [u32; 2],
    /// Side favored to hold the powerplayer.
    pub powerplayer: Side,
}

impl Split {
    pub fn share(&self, side: Side) -> u32 {
        self.shares[side.index()]
    }

    /// Team index of the favored powerplayer holder.
    pub fn powerplayer_team(&self, m: &Match) -> TeamIndex {
        m.team(self.powerplayer)
    }
}

/// `num / den` rounded to the nearest integer, halves rounding up.
///
/// `den` must be non-zero.
pub fn round_div(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// Strengths of both participants after applying home advantage.
pub fn adjusted_strengths(m: &Match, strengths: &[u32]) -> [u64; 2] {
    let mut adjusted = [strengths[m.team1] as u64, strengths[m.team2] as u64];
    let boosted = match m.home {
        Home::Neither => None,
        Home::Team1 => Some(0),
        Home::Team2 => Some(1),
    };
    if let Some(i) = boosted {
        adjusted[i] = round_div(adjusted[i] * HOME_ADVANTAGE_NUM, HOME_ADVANTAGE_DEN);
    }
    adjusted
}

/// Split `n` slots between the two teams of `m`.
///
/// Team1 gets `n * s1 / (s1 + s2)` rounded, team2 the remainder. The split
/// is then corrected so that a stronger team never trails: if the share
/// ordering contradicts the strength ordering, the larger share loses one
/// slot. Equal strengths with unequal shares likewise drop one slot from the
/// larger share, so an odd `n` between equals yields two equal halves of
/// `n - 1`.
pub fn split_slots(m: &Match, n: u32, strengths: &[u32]) -> Split {
    let [s1, s2] = adjusted_strengths(m, strengths);

    let first = round_div(n as u64 * s1, s1 + s2) as u32;
    let mut shares = [first, n - first];

    if s1 > s2 && shares[0] < shares[1] {
        shares[1] -= 1;
    } else if s1 < s2 && shares[0] > shares[1] {
        shares[0] -= 1;
    } else if s1 == s2 {
        if shares[0] > shares[1] {
            shares[0] -= 1;
        } else if shares[0] < shares[1] {
            shares[1] -= 1;
        }
    }

    let powerplayer = if shares[0] != shares[1] {
        if shares[0] > shares[1] {
            Side::First
        } else {
            Side::Second
        }
    } else {
        match m.home {
            Home::Team1 => Side::First,
            Home::Team2 => Side::Second,
            Home::Neither if s2 > s1 => Side::Second,
            Home::Neither => Side::First,
        }
    };

    Split {
        shares,
        powerplayer,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
