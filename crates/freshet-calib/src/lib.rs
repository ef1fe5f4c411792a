//! Calibration scaffolding around GEOtop runs.
//!
//! Calibrating the model means searching a parameter space for the
//! settings that best reproduce observed series. This crate supplies the
//! pieces that do not depend on any particular optimizer:
//!
//! - [`measures`] — RMSE, NSE and KGE between observed and simulated series
//! - [`loss`] — candidate → overrides massage plus one scored model run
//! - [`sweep`] — bounded variables, candidate grids and evaluation logs
//!
//! An optimizer plugs in by repeatedly calling [`loss::Loss::evaluate`]
//! (NaN marks a failed run) and can be debugged after the fact through the
//! [`sweep::Sweep`] record.

pub mod loss;
pub mod measures;
pub mod sweep;

pub use loss::{Loss, Massage};
pub use measures::{Kge, Measure, Normalization, Nse, Rmse};
pub use sweep::{grid_candidates, BoundedMassage, Sweep, SweepRecord, Variable};
