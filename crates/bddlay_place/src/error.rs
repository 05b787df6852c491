//! Errors raised when a layout cannot be constructed.

use crate::cost::Point;
use bddlay_netlist::TransistorId;

/// Invalid layout geometry or parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaceError {
    /// The placement area has a non-positive or non-finite side.
    #[error("invalid placement area {width} x {height}")]
    InvalidArea {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// The site/row grid does not fit at least one row and one site.
    #[error("grid of {site_width} x {row_height} sites does not fit a {width} x {height} area")]
    InvalidGrid {
        /// Area width.
        width: f64,
        /// Area height.
        height: f64,
        /// Site pitch.
        site_width: f64,
        /// Row pitch.
        row_height: f64,
    },

    /// A cost weight is negative or not finite.
    #[error("invalid cost weights: w_wire = {w_wire}, w_area = {w_area}")]
    InvalidWeights {
        /// Wirelength weight.
        w_wire: f64,
        /// Area weight.
        w_area: f64,
    },

    /// A given row order is not a permutation of the netlist's transistors.
    #[error("row order is not a permutation of the transistors: {reason}")]
    InvalidPermutation {
        /// What is wrong with it.
        reason: String,
    },

    /// Explicit positions do not cover every transistor.
    #[error("expected {expected} positions, got {actual}")]
    PositionCount {
        /// Transistors in the netlist.
        expected: usize,
        /// Positions supplied.
        actual: usize,
    },

    /// An explicit position lies outside the placement area.
    #[error("{id} at ({:.2}, {:.2}) is outside the placement area", .position.x, .position.y)]
    OutsideArea {
        /// The misplaced transistor.
        id: TransistorId,
        /// Where it was put.
        position: Point,
    },

    /// An explicit position refers to a transistor outside the netlist.
    #[error("{id} is not in the netlist")]
    UnknownTransistor {
        /// The offending id.
        id: TransistorId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = PlaceError::InvalidArea {
            width: 0.0,
            height: 5.0,
        };
        assert_eq!(err.to_string(), "invalid placement area 0 x 5");

        let err = PlaceError::PositionCount {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected 4 positions, got 3");

        let err = PlaceError::UnknownTransistor {
            id: TransistorId::from_raw(9),
        };
        assert_eq!(err.to_string(), "T9 is not in the netlist");

        let err = PlaceError::OutsideArea {
            id: TransistorId::from_raw(1),
            position: Point::new(-1.0, 2.5),
        };
        assert_eq!(err.to_string(), "T1 at (-1.00, 2.50) is outside the placement area");
    }
}
