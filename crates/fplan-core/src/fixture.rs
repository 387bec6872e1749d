// Match descriptors: which two teams meet and who has home advantage.

/// Zero-based index into the strengths array.
pub type TeamIndex = usize;

/// Which side of a fixture, if any, is playing at home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Home {
    #[default]
    Neither,
    Team1,
    Team2,
}

/// One of the two participants of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// Position of this side in a `[_; 2]` pair.
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// A scheduled fixture between two distinct teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub team1: TeamIndex,
    pub team2: TeamIndex,
    pub home: Home,
}

impl Match {
    pub fn new(team1: TeamIndex, team2: TeamIndex, home: Home) -> Self {
        Match { team1, team2, home }
    }

    /// Whether `team` plays in this match.
    pub fn contains(&self, team: TeamIndex) -> bool {
        self.team1 == team || self.team2 == team
    }

    /// The team on the given side.
    pub fn team(&self, side: Side) -> TeamIndex {
        match side {
            Side::First => self.team1,
            Side::Second => self.team2,
        }
    }

    pub fn teams(&self) -> [TeamIndex; 2] {
        [self.team1, self.team2]
    }

    /// The team with home advantage, if any.
    pub fn home_team(&self) -> Option<TeamIndex> {
        match self.home {
            Home::Neither => None,
            Home::Team1 => Some(self.team1),
            Home::Team2 => Some(self.team2),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
