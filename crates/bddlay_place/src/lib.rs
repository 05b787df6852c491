//! Layout models, wirelength costs and simulated annealing for BDD netlists.
//!
//! Three models place the transistors of a [`bddlay_netlist::Netlist`]:
//! [`Free2dLayout`] at arbitrary points in a rectangle, [`SingleRowLayout`]
//! as a permutation of row slots, and [`StandardCellLayout`] on the sites of
//! a row grid. All of them implement [`Layout`], which [`anneal`] and
//! [`anneal_enhanced`] optimize. [`LayoutReport`] summarizes the result.
//!
//! Pairwise Manhattan wirelength is quadratic in net size; HPWL and star
//! wirelength are linear.

#![warn(missing_docs)]

pub mod anneal;
pub mod cost;
pub mod error;
pub mod free2d;
pub mod layout;
pub mod report;
pub mod single_row;
pub mod standard_cell;

pub use anneal::{
    acceptance_probability, anneal, anneal_enhanced, AnnealOutcome, AnnealSchedule, StopReason,
};
pub use cost::{improvement_percent, Point};
pub use error::PlaceError;
pub use free2d::Free2dLayout;
pub use layout::{Layout, Position};
pub use report::{GridDetails, LayoutReport, RowDetails, WirelengthComparison};
pub use single_row::{RowWeights, SingleRowLayout};
pub use standard_cell::{CellGrid, LegalityViolation, StandardCellLayout, ViolationKind};
