// Application layer: turns the files under config/ into a validated
// `PlannerInput` for the core planner.

pub mod config;
pub mod league;
pub mod schedule;

pub use config::{load_config, Config, ConfigError};
pub use league::{build_league, load_league, League, LeagueError};
pub use schedule::{load_schedule, ScheduleError};
