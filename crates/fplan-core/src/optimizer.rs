// Multi-seed search: run the plan builder from every initial target and keep
// the best-scoring plan.
//
// Seeds are independent and only read the shared input, so they are
// evaluated in parallel. Results are collected in seed order, which keeps
// the "first maximum wins" tie-break deterministic.

use rayon::prelude::*;
use tracing::info;

use crate::error::PlanError;
use crate::input::PlannerInput;
use crate::plan::{run_plan, Plan, PlanOutcome};

/// Outcomes for every seed `1..=num_players`, in seed order.
pub fn explore(input: &PlannerInput) -> Result<Vec<PlanOutcome>, PlanError> {
    (1..=input.num_players())
        .into_par_iter()
        .map(|seed| run_plan(input, seed))
        .collect()
}

/// The best plan over all seeds. Ties go to the smallest seed.
pub fn optimize(input: &PlannerInput) -> Result<PlanOutcome, PlanError> {
    let outcomes = explore(input)?;
    let best = pick_best(outcomes);
    info!(
        seed = best.seed,
        score = best.score,
        transfers_used = best.transfers_used(),
        "selected best plan"
    );
    Ok(best)
}

/// Run the search and write the winning plan into `plan`, returning its score.
pub fn max_active_players(input: &PlannerInput, plan: &mut Plan) -> Result<u32, PlanError> {
    let best = optimize(input)?;
    *plan = best.plan;
    Ok(best.score)
}

/// First outcome with the maximum score.
///
/// `outcomes` is never empty: a validated input has at least one player.
fn pick_best(outcomes: Vec<PlanOutcome>) -> PlanOutcome {
    let mut best: Option<PlanOutcome> = None;
    for outcome in outcomes {
        match &best {
            Some(b) if outcome.score <= b.score => {}
            _ => best = Some(outcome),
        }
    }
    best.unwrap_or_else(|| unreachable!("seed range 1..=num_players is never empty"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
