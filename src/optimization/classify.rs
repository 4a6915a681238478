//! Maps solver variable values back to dense per-unit result codes.
//!
//! The answer array always covers every spatial unit: excluded positions
//! are pre-filled, solved positions overlaid, so no index is ever left
//! uninitialized.

use crate::domain::SolverOutcome;

use super::mask::FeasibleMask;

/// Knapsack codes
pub const KNAPSACK_UNDECIDED: i16 = -2;
pub const KNAPSACK_EXCLUDED: i16 = -1;
pub const KNAPSACK_NOT_SELECTED: i16 = 0;
pub const KNAPSACK_SELECTED: i16 = 1;

/// Treatment codes; a non-negative code is the chosen treatment index
pub const TREATMENT_UNABLE: i16 = -3;
pub const TREATMENT_UNDECIDED: i16 = -2;
pub const TREATMENT_UNCHANGED: i16 = -1;

/// One binary variable per feasible unit, variable order = feasible order.
pub fn binary_selection(mask: &FeasibleMask, outcome: &SolverOutcome) -> Vec<i16> {
    let mut codes = vec![KNAPSACK_EXCLUDED; mask.len()];
    for (rank, &unit) in mask.feasible_indices().iter().enumerate() {
        codes[unit] = match outcome.variable_values.get(rank).copied().flatten() {
            None => KNAPSACK_UNDECIDED,
            Some(v) if v > 0.5 => KNAPSACK_SELECTED,
            Some(_) => KNAPSACK_NOT_SELECTED,
        };
    }
    codes
}

/// Mutually-exclusive multi-choice decoding. `unit_vars[unit]` lists the
/// unit's (variable index, action index) pairs; a unit without variables
/// was infeasible from the start and decodes to `unable`.
pub fn group_selection(unit_vars: &[Vec<(usize, usize)>], outcome: &SolverOutcome) -> Vec<i16> {
    unit_vars
        .iter()
        .map(|vars| {
            if vars.is_empty() {
                return TREATMENT_UNABLE;
            }
            let mut chosen = TREATMENT_UNCHANGED;
            for &(var, action) in vars {
                match outcome.variable_values.get(var).copied().flatten() {
                    None => return TREATMENT_UNDECIDED,
                    Some(v) if v > 0.5 => chosen = action as i16,
                    Some(_) => {}
                }
            }
            chosen
        })
        .collect()
}

/// Human-readable histogram of knapsack codes for logging.
pub fn knapsack_histogram(codes: &[i16]) -> String {
    let mut selected = 0usize;
    let mut not_selected = 0usize;
    let mut excluded = 0usize;
    let mut undecided = 0usize;
    for &code in codes {
        match code {
            KNAPSACK_SELECTED => selected += 1,
            KNAPSACK_NOT_SELECTED => not_selected += 1,
            KNAPSACK_EXCLUDED => excluded += 1,
            _ => undecided += 1,
        }
    }
    format!(
        "Solution histogram:\n\
         selected: {selected}\n\
         not selected: {not_selected}\n\
         excluded (invalid value or weight): {excluded}\n\
         undecided: {undecided}\n"
    )
}

/// Human-readable histogram of treatment codes for logging.
pub fn treatment_histogram(codes: &[i16], treat_names: &[String]) -> String {
    let mut unable = 0usize;
    let mut undecided = 0usize;
    let mut unchanged = 0usize;
    let mut per_treatment = vec![0usize; treat_names.len()];
    for &code in codes {
        match code {
            TREATMENT_UNABLE => unable += 1,
            TREATMENT_UNDECIDED => undecided += 1,
            TREATMENT_UNCHANGED => unchanged += 1,
            idx if (idx as usize) < per_treatment.len() => per_treatment[idx as usize] += 1,
            _ => {}
        }
    }
    let mut msg = format!(
        "Solution histogram:\n\
         unable: {unable}\n\
         undecided: {undecided}\n\
         unchanged: {unchanged}\n"
    );
    for (name, count) in treat_names.iter().zip(&per_treatment) {
        msg.push_str(&format!("{name}: {count}\n"));
    }
    msg
}
