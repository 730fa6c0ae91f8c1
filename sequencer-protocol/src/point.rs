//! Sequence point value type

use heapless::Vec;

/// Maximum number of controlled dimensions in a point
///
/// The start packet announces the dimensionality in a single byte, so the
/// device can never be told about more than this many values.
pub const MAX_POINT_DIM: usize = 255;

/// Values of one point, one byte per controlled dimension
pub type PointValues = Vec<u8, MAX_POINT_DIM>;

/// One step of a motion sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencePoint {
    /// How long the point is held once reached (ms)
    pub duration: u16,
    /// Time allowed to move from the previous point to this one (ms)
    pub time_to_target: u16,
    /// Target value for each dimension
    pub values: PointValues,
}

impl SequencePoint {
    /// Create a point from a slice of values
    ///
    /// Returns `None` if there are more than [`MAX_POINT_DIM`] values.
    pub fn new(duration: u16, time_to_target: u16, values: &[u8]) -> Option<Self> {
        let values = Vec::from_slice(values).ok()?;
        Some(Self {
            duration,
            time_to_target,
            values,
        })
    }

    /// Number of dimensions carried by this point
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}
