// Fixture list loading.
//
// The schedule is a two-column CSV (`team1,team2`). A cell names a team by
// its code or by its 1-based position in league.toml, and a leading `+`
// marks the home side: `+CSK,RCB` or `1,+3`.

use fplan_core::{Home, Match, TeamIndex};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} line {line}: unknown team `{name}`")]
    UnknownTeam {
        path: String,
        line: u64,
        name: String,
    },

    #[error("{path} line {line}: `{name}` cannot play itself")]
    SelfMatch {
        path: String,
        line: u64,
        name: String,
    },

    #[error("{path} line {line}: only one side can be at home")]
    BothHome { path: String, line: u64 },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFixture {
    #[serde(default)]
    team1: String,
    #[serde(default)]
    team2: String,
}

/// One parsed cell: which team, and whether it carried the home marker.
struct Cell {
    team: TeamIndex,
    home: bool,
}

fn parse_cell(raw: &str, codes: &[String]) -> Option<Cell> {
    let raw = raw.trim();
    let (home, name) = match raw.strip_prefix('+') {
        Some(rest) => (true, rest.trim()),
        None => (false, raw),
    };
    if name.is_empty() {
        return None;
    }
    let team = match name.parse::<usize>() {
        Ok(n) if (1..=codes.len()).contains(&n) => n - 1,
        Ok(_) => return None,
        Err(_) => codes.iter().position(|c| c.eq_ignore_ascii_case(name))?,
    };
    Some(Cell { team, home })
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_schedule_from_reader<R: Read>(
    rdr: R,
    path: &str,
    codes: &[String],
) -> Result<Vec<Match>, ScheduleError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);

    let csv_error = |e: csv::Error| ScheduleError::Csv {
        path: path.to_string(),
        source: e,
    };
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut schedule = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let raw: RawFixture = record.deserialize(Some(&headers)).map_err(csv_error)?;

        if raw.team1.is_empty() || raw.team2.is_empty() {
            warn!("{path}: skipping incomplete fixture `{},{}`", raw.team1, raw.team2);
            continue;
        }

        let unknown = |name: &str| ScheduleError::UnknownTeam {
            path: path.to_string(),
            line,
            name: name.to_string(),
        };
        let first = parse_cell(&raw.team1, codes).ok_or_else(|| unknown(&raw.team1))?;
        let second = parse_cell(&raw.team2, codes).ok_or_else(|| unknown(&raw.team2))?;

        if first.team == second.team {
            return Err(ScheduleError::SelfMatch {
                path: path.to_string(),
                line,
                name: codes[first.team].clone(),
            });
        }
        let home = match (first.home, second.home) {
            (true, true) => {
                return Err(ScheduleError::BothHome {
                    path: path.to_string(),
                    line,
                })
            }
            (true, false) => Home::Team1,
            (false, true) => Home::Team2,
            (false, false) => Home::Neither,
        };
        schedule.push(Match::new(first.team, second.team, home));
    }

    debug!("{path}: {} fixtures", schedule.len());
    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load the fixture list from a CSV file, resolving cells against `codes`
/// (team codes in league.toml order).
pub fn load_schedule(path: &Path, codes: &[String]) -> Result<Vec<Match>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(|e| ScheduleError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_schedule_from_reader(file, &path.display().to_string(), codes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
