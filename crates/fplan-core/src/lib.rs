// Library root: the slot allocation heuristic and the types it works on.
//
// Nothing in here touches the terminal or the filesystem. Callers build a
// validated `PlannerInput` and hand it to `optimize` (best seed) or
// `run_plan` (one seed).

pub mod error;
pub mod farthest;
pub mod fixture;
pub mod input;
pub mod optimizer;
pub mod plan;
pub mod split;

pub use error::{InputError, PlanError};
pub use fixture::{Home, Match, Side, TeamIndex};
pub use input::{PlannerInput, Replan};
pub use optimizer::{explore, max_active_players, optimize};
pub use plan::{active_players, run_plan, Plan, PlanOutcome, SlotChange};
pub use split::{split_slots, Split};
