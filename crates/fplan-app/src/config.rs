// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    teams: Vec<TeamConfig>,
    #[serde(default)]
    replan: Option<ReplanConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Players that cost a substitution to change.
    pub num_players: u32,
    /// Substitutions allowed for the rest of the season.
    pub transfers: u32,
    /// Schedule CSV, relative to the project root.
    pub schedule: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    /// Short code used in the schedule (e.g. "CSK").
    pub code: String,
    pub strength: u32,
}

/// The first scheduled match has already been played with this squad.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplanConfig {
    pub powerplayer: String,
    /// Slots per team code; teams left out hold none.
    pub slots: HashMap<String, u32>,
}

/// Top-level assembled config.
#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub teams: Vec<TeamConfig>,
    pub replan: Option<ReplanConfig>,
    /// Directory the config was loaded from; relative paths resolve here.
    pub base_dir: PathBuf,
}

impl Config {
    /// Absolute path of the schedule CSV.
    pub fn schedule_path(&self) -> PathBuf {
        self.base_dir.join(&self.league.schedule)
    }

    /// Team codes in config order; a team's position is its index.
    pub fn team_codes(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.code.clone()).collect()
    }

    pub fn team_index(&self, code: &str) -> Option<usize> {
        self.teams
            .iter()
            .position(|t| t.code.eq_ignore_ascii_case(code))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/league.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        teams: league_file.teams,
        replan: league_file.replan,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the copied files, sorted. Skips `.example` files and never
/// overwrites an existing file.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(vec![])
        } else {
            Err(copy_error(format!(
                "neither defaults/ nor config/ directory found in {}; \
                 run from the project root or pass --root",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("failed to create {}: {e}", config_dir.display())))?;

    let mut copied = Vec::new();
    for source in default_files(&defaults_dir)? {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)? {
            info!("Copied default {}", target.display());
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Regular files in `defaults/` that belong in `config/`, sorted by name.
fn default_files(defaults_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = std::fs::read_dir(defaults_dir)
        .map_err(|e| copy_error(format!("failed to read {}: {e}", defaults_dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| copy_error(format!("failed to read defaults entry: {e}")))?
            .path();
        let is_template = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("example"));
        if path.is_file() && !is_template {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copy `source` to `target` unless `target` already exists. The target is
/// created with `create_new`, so a file appearing concurrently is left alone.
/// Returns whether a copy was made.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(copy_error(format!("failed to create {}: {e}", target.display())));
        }
    };
    let mut src = std::fs::File::open(source)
        .map_err(|e| copy_error(format!("failed to open {}: {e}", source.display())))?;
    std::io::copy(&mut src, &mut dest)
        .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;
    Ok(true)
}

/// Convenience wrapper: copies defaults, then loads config relative to `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.num_players == 0 {
        return Err(invalid("league.num_players", "must be greater than 0"));
    }

    if config.league.schedule.trim().is_empty() {
        return Err(invalid("league.schedule", "must name a CSV file"));
    }

    if config.teams.len() < 2 {
        return Err(invalid(
            "teams",
            format!("at least two teams are required, got {}", config.teams.len()),
        ));
    }

    let mut seen = HashSet::new();
    for (i, team) in config.teams.iter().enumerate() {
        let code = team.code.trim();
        if code.is_empty() {
            return Err(invalid(format!("teams[{i}].code"), "must not be empty"));
        }
        if code.starts_with('+') || code.parse::<usize>().is_ok() {
            return Err(invalid(
                format!("teams[{i}].code"),
                format!("`{code}` would be ambiguous in the schedule"),
            ));
        }
        if !seen.insert(code.to_ascii_uppercase()) {
            return Err(invalid(
                format!("teams[{i}].code"),
                format!("duplicate team code `{code}`"),
            ));
        }
        if team.strength == 0 {
            return Err(invalid(format!("teams[{i}].strength"), "must be > 0"));
        }
    }

    if let Some(replan) = &config.replan {
        if config.team_index(&replan.powerplayer).is_none() {
            return Err(invalid(
                "replan.powerplayer",
                format!("unknown team `{}`", replan.powerplayer),
            ));
        }
        for code in replan.slots.keys() {
            if config.team_index(code).is_none() {
                return Err(invalid(format!("replan.slots.{code}"), "unknown team"));
            }
        }
        let num_players = config.league.num_players;
        match replan
            .slots
            .values()
            .try_fold(0u32, |acc, &n| acc.checked_add(n))
        {
            Some(total) if total == num_players => {}
            Some(total) => {
                return Err(invalid(
                    "replan.slots",
                    format!("must add up to league.num_players ({num_players}), got {total}"),
                ));
            }
            None => {
                return Err(invalid(
                    "replan.slots",
                    format!("must add up to league.num_players ({num_players}), total overflows"),
                ));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The workspace-level defaults/ directory shipped with the repo.
    fn defaults_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../defaults")
    }

    /// A temp project root with config/league.toml holding `league_toml`.
    fn project_with(league_toml: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("league.toml"), league_toml).unwrap();
        tmp
    }

    const MINIMAL: &str = r#"
[league]
name = "Test"
num_players = 11
transfers = 20
schedule = "config/schedule.csv"

[[teams]]
code = "AAA"
strength = 3

[[teams]]
code = "BBB"
strength = 2
"#;

    fn expect_field(err: ConfigError, expected: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_league() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::copy(
            defaults_dir().join("league.toml"),
            tmp.path().join("config/league.toml"),
        )
        .unwrap();

        let config = load_config_from(tmp.path()).expect("default league should load");
        assert_eq!(config.league.num_players, 11);
        assert_eq!(config.league.transfers, 45);
        assert_eq!(config.teams.len(), 10);
        assert_eq!(config.teams[0].code, "CSK");
        assert!(config.replan.is_none());
        assert_eq!(config.schedule_path(), tmp.path().join("config/schedule.csv"));
    }

    #[test]
    fn load_minimal_league() {
        let tmp = project_with(MINIMAL);
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.league.name, "Test");
        assert_eq!(config.team_codes(), vec!["AAA", "BBB"]);
        assert_eq!(config.team_index("bbb"), Some(1));
        assert_eq!(config.team_index("CCC"), None);
    }

    #[test]
    fn load_replan_section() {
        let text = format!(
            "{MINIMAL}\n[replan]\npowerplayer = \"AAA\"\n\n[replan.slots]\nAAA = 6\nBBB = 5\n"
        );
        let tmp = project_with(&text);
        let config = load_config_from(tmp.path()).unwrap();
        let replan = config.replan.expect("replan section");
        assert_eq!(replan.powerplayer, "AAA");
        assert_eq!(replan.slots.get("AAA"), Some(&6));
        assert_eq!(replan.slots.get("BBB"), Some(&5));
    }

    #[test]
    fn rejects_zero_players() {
        let tmp = project_with(&MINIMAL.replace("num_players = 11", "num_players = 0"));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "league.num_players");
    }

    #[test]
    fn rejects_single_team() {
        let text = MINIMAL.replace("[[teams]]\ncode = \"BBB\"\nstrength = 2\n", "");
        let tmp = project_with(&text);
        expect_field(load_config_from(tmp.path()).unwrap_err(), "teams");
    }

    #[test]
    fn rejects_zero_strength() {
        let tmp = project_with(&MINIMAL.replace("strength = 2", "strength = 0"));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "teams[1].strength");
    }

    #[test]
    fn rejects_duplicate_codes() {
        let tmp = project_with(&MINIMAL.replace("code = \"BBB\"", "code = \"aaa\""));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "teams[1].code");
    }

    #[test]
    fn rejects_numeric_code() {
        let tmp = project_with(&MINIMAL.replace("code = \"BBB\"", "code = \"2\""));
        expect_field(load_config_from(tmp.path()).unwrap_err(), "teams[1].code");
    }

    #[test]
    fn rejects_replan_with_unknown_team() {
        let text = format!(
            "{MINIMAL}\n[replan]\npowerplayer = \"AAA\"\n\n[replan.slots]\nAAA = 6\nZZZ = 5\n"
        );
        let tmp = project_with(&text);
        expect_field(load_config_from(tmp.path()).unwrap_err(), "replan.slots.ZZZ");
    }

    #[test]
    fn rejects_replan_with_wrong_total() {
        let text = format!(
            "{MINIMAL}\n[replan]\npowerplayer = \"BBB\"\n\n[replan.slots]\nAAA = 4\nBBB = 5\n"
        );
        let tmp = project_with(&text);
        expect_field(load_config_from(tmp.path()).unwrap_err(), "replan.slots");
    }

    #[test]
    fn rejects_replan_total_that_overflows() {
        let text = format!(
            "{MINIMAL}\n[replan]\npowerplayer = \"AAA\"\n\n[replan.slots]\nAAA = 4294967295\nBBB = 12\n"
        );
        let tmp = project_with(&text);
        match load_config_from(tmp.path()).unwrap_err() {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "replan.slots");
                assert!(message.contains("overflows"));
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_replan_with_unknown_powerplayer() {
        let text = format!(
            "{MINIMAL}\n[replan]\npowerplayer = \"QQQ\"\n\n[replan.slots]\nAAA = 6\nBBB = 5\n"
        );
        let tmp = project_with(&text);
        expect_field(load_config_from(tmp.path()).unwrap_err(), "replan.powerplayer");
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = tempfile::tempdir().unwrap();
        match load_config_from(tmp.path()).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = project_with("this is not valid [[[ toml");
        match load_config_from(tmp.path()).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = tmp.path().join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::copy(defaults_dir().join("league.toml"), defaults.join("league.toml")).unwrap();
        fs::copy(defaults_dir().join("schedule.csv"), defaults.join("schedule.csv")).unwrap();
        fs::write(defaults.join("replan.toml.example"), "[replan]\n").unwrap();

        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert_eq!(copied.len(), 2);
        assert!(tmp.path().join("config/league.toml").exists());
        assert!(tmp.path().join("config/schedule.csv").exists());
        assert!(!tmp.path().join("config/replan.toml.example").exists());
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = tmp.path().join("defaults");
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&defaults).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(defaults_dir().join("league.toml"), defaults.join("league.toml")).unwrap();
        fs::copy(defaults_dir().join("schedule.csv"), defaults.join("schedule.csv")).unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(copied[0].ends_with("schedule.csv"));
        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn ensure_config_files_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = tmp.path().join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join("league.toml"), "# shipped\n").unwrap();
        fs::write(defaults.join("schedule.csv"), "team1,team2\n").unwrap();

        let first = ensure_config_files(tmp.path()).unwrap();
        assert_eq!(
            first,
            vec![
                tmp.path().join("config/league.toml"),
                tmp.path().join("config/schedule.csv"),
            ]
        );
        fs::write(tmp.path().join("config/league.toml"), "# edited\n").unwrap();

        assert!(ensure_config_files(tmp.path()).unwrap().is_empty());
        let content = fs::read_to_string(tmp.path().join("config/league.toml")).unwrap();
        assert_eq!(content, "# edited\n");
    }

    #[test]
    fn copy_if_missing_leaves_existing_target() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source.toml");
        let target = tmp.path().join("target.toml");
        fs::write(&source, "new").unwrap();

        assert!(copy_if_missing(&source, &target).unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");

        fs::write(&source, "newer").unwrap();
        assert!(!copy_if_missing(&source, &target).unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = tempfile::tempdir().unwrap();
        match ensure_config_files(tmp.path()).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
    }

    #[test]
    fn load_config_copies_defaults_then_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = tmp.path().join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::copy(defaults_dir().join("league.toml"), defaults.join("league.toml")).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.league.name, "Indian T20 League");
    }
}
