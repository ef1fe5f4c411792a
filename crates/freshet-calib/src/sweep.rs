//! Parameter-sweep scaffolding: bounded variables, candidate grids, and a
//! record of every evaluation.
//!
//! The optimizer itself lives outside this crate; what is provided here is
//! the plumbing every optimizer needs: a mapping from unit-interval
//! candidates to bounded keyword overrides, a way to enumerate candidate
//! grids, and a log of evaluations with best-candidate tracking.

use freshet_settings::{Overrides, SettingValue};

use crate::loss::Massage;

/// One calibration parameter: a keyword and its inclusive bounds.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Keyword receiving the candidate component.
    pub name: String,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Variable {
    /// A bounded variable.
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// Map a unit-interval coordinate into the bounds (clamping).
    pub fn denormalize(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        self.lower + x * (self.upper - self.lower)
    }
}

/// Massages unit-interval candidates into float overrides, one component
/// per variable. Extra candidate components are ignored, missing ones
/// leave their variables out.
#[derive(Debug, Clone)]
pub struct BoundedMassage {
    variables: Vec<Variable>,
}

impl BoundedMassage {
    /// Massage over the given variables.
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// The variables, in candidate order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

impl Massage for BoundedMassage {
    fn massage(&self, candidate: &[f64]) -> Overrides {
        let mut overrides = Overrides::new();
        for (variable, x) in self.variables.iter().zip(candidate) {
            overrides.set(
                variable.name.clone(),
                SettingValue::Float(variable.denormalize(*x)),
            );
        }
        overrides
    }
}

/// Regular grid of unit-interval candidates, `steps` points per variable
/// (cartesian product, lowest-index variable varying fastest).
pub fn grid_candidates(num_vars: usize, steps: usize) -> Vec<Vec<f64>> {
    if num_vars == 0 || steps == 0 {
        return Vec::new();
    }
    let axis: Vec<f64> = (0..steps)
        .map(|i| {
            if steps == 1 {
                0.5
            } else {
                i as f64 / (steps - 1) as f64
            }
        })
        .collect();

    let mut candidates = vec![Vec::new()];
    for _ in 0..num_vars {
        let mut next = Vec::with_capacity(candidates.len() * steps);
        for x in &axis {
            for prefix in &candidates {
                let mut candidate = prefix.clone();
                candidate.push(*x);
                next.push(candidate);
            }
        }
        candidates = next;
    }
    candidates
}

/// One evaluated candidate.
#[derive(Debug, Clone)]
pub struct SweepRecord {
    /// Position in the sweep, starting at zero.
    pub iteration: usize,
    /// Loss value; NaN marks a failed evaluation.
    pub loss: f64,
    /// The candidate as handed to the loss.
    pub candidate: Vec<f64>,
}

/// Log of a finished sweep.
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    records: Vec<SweepRecord>,
}

impl Sweep {
    /// Evaluate every candidate in order with `loss` and log the results.
    pub fn run<L>(mut loss: L, candidates: impl IntoIterator<Item = Vec<f64>>) -> Self
    where
        L: FnMut(&[f64]) -> f64,
    {
        let mut records = Vec::new();
        for (iteration, candidate) in candidates.into_iter().enumerate() {
            let value = loss(&candidate);
            records.push(SweepRecord {
                iteration,
                loss: value,
                candidate,
            });
        }
        Self { records }
    }

    /// Every evaluation, in sweep order.
    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    /// The record with the lowest loss; NaN evaluations never win.
    pub fn best(&self) -> Option<&SweepRecord> {
        self.records
            .iter()
            .filter(|record| !record.loss.is_nan())
            .min_by(|a, b| a.loss.total_cmp(&b.loss))
    }

    /// Dump the log as CSV (`iteration,loss,x0,x1,...`).
    pub fn to_csv(&self) -> String {
        let width = self
            .records
            .iter()
            .map(|record| record.candidate.len())
            .max()
            .unwrap_or(0);

        let mut out = String::from("iteration,loss");
        for i in 0..width {
            out.push_str(&format!(",x{i}"));
        }
        out.push('\n');

        for record in &self.records {
            out.push_str(&format!("{},{}", record.iteration, record.loss));
            for x in &record.candidate {
                out.push_str(&format!(",{x}"));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denormalize_maps_and_clamps() {
        let v = Variable::new("SnowCorrFactor", 0.5, 1.5);
        assert_eq!(v.denormalize(0.0), 0.5);
        assert_eq!(v.denormalize(1.0), 1.5);
        assert_eq!(v.denormalize(0.5), 1.0);
        assert_eq!(v.denormalize(-1.0), 0.5);
        assert_eq!(v.denormalize(2.0), 1.5);
    }

    #[test]
    fn bounded_massage_builds_float_overrides() {
        let massage = BoundedMassage::new(vec![
            Variable::new("SnowCorrFactor", 0.5, 1.5),
            Variable::new("RainCorrFactor", 1.0, 2.0),
        ]);
        let overrides = massage.massage(&[0.5, 0.0]);
        let entries: Vec<_> = overrides.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "SnowCorrFactor");
        assert_eq!(entries[1].0, "RainCorrFactor");
    }

    #[test]
    fn grid_has_the_cartesian_size() {
        assert_eq!(grid_candidates(2, 3).len(), 9);
        assert_eq!(grid_candidates(3, 2).len(), 8);
        assert!(grid_candidates(0, 3).is_empty());
        assert!(grid_candidates(2, 0).is_empty());
        // A single step sits mid-interval.
        assert_eq!(grid_candidates(1, 1), vec![vec![0.5]]);
    }

    #[test]
    fn sweep_tracks_the_best_candidate() {
        let sweep = Sweep::run(
            |candidate: &[f64]| (candidate[0] - 0.25).abs(),
            grid_candidates(1, 5),
        );
        assert_eq!(sweep.records().len(), 5);
        let best = sweep.best().unwrap();
        assert_eq!(best.candidate, vec![0.25]);
        assert_eq!(best.loss, 0.0);
    }

    #[test]
    fn nan_evaluations_never_win() {
        let sweep = Sweep::run(
            |candidate: &[f64]| {
                if candidate[0] < 0.5 {
                    f64::NAN
                } else {
                    candidate[0]
                }
            },
            grid_candidates(1, 3),
        );
        let best = sweep.best().unwrap();
        assert_eq!(best.candidate, vec![0.5]);

        let all_nan = Sweep::run(|_: &[f64]| f64::NAN, grid_candidates(1, 3));
        assert!(all_nan.best().is_none());
    }

    #[test]
    fn csv_dump_has_one_row_per_record() {
        let sweep = Sweep::run(|c: &[f64]| c[0], vec![vec![0.0], vec![1.0]]);
        let csv = sweep.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["iteration,loss,x0", "0,0,0", "1,1,1"]);
    }
}
