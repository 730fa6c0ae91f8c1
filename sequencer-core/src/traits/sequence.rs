//! Motion sequence source
//!
//! The sequence is owned by the host (usually the editor the user is working
//! in). The engine only holds a handle to it while a session is running.

use sequencer_protocol::SequencePoint;

/// A sequence of points with a cursor
pub trait Sequence {
    /// Point under the cursor
    fn point(&self) -> SequencePoint;

    /// Cursor index
    fn cur_point(&self) -> usize;

    /// Move the cursor
    fn set_cur_point(&mut self, index: usize);

    /// Number of points
    fn num_points(&self) -> usize;

    /// Number of values per point
    fn point_dim(&self) -> usize;

    /// Whether the cursor is on the last point
    fn at_last_point(&self) -> bool {
        self.cur_point() + 1 >= self.num_points()
    }
}

impl<S: Sequence + ?Sized> Sequence for &mut S {
    fn point(&self) -> SequencePoint {
        (**self).point()
    }

    fn cur_point(&self) -> usize {
        (**self).cur_point()
    }

    fn set_cur_point(&mut self, index: usize) {
        (**self).set_cur_point(index)
    }

    fn num_points(&self) -> usize {
        (**self).num_points()
    }

    fn point_dim(&self) -> usize {
        (**self).point_dim()
    }
}

/// Sequence over a borrowed slice of points
#[derive(Debug, Clone)]
pub struct PointList<'a> {
    points: &'a [SequencePoint],
    cursor: usize,
    dim: usize,
}

impl<'a> PointList<'a> {
    /// Create a list with the cursor on the first point
    ///
    /// The dimensionality is taken from the first point.
    pub fn new(points: &'a [SequencePoint]) -> Self {
        let dim = points.first().map_or(0, SequencePoint::dim);
        Self {
            points,
            cursor: 0,
            dim,
        }
    }

    /// All points
    pub fn points(&self) -> &'a [SequencePoint] {
        self.points
    }
}

impl Sequence for PointList<'_> {
    fn point(&self) -> SequencePoint {
        self.points.get(self.cursor).cloned().unwrap_or_default()
    }

    fn cur_point(&self) -> usize {
        self.cursor
    }

    /// Out-of-range indices are clamped to the last point
    fn set_cur_point(&mut self, index: usize) {
        self.cursor = index.min(self.points.len().saturating_sub(1));
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn point_dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> [SequencePoint; 3] {
        [
            SequencePoint::new(100, 10, &[1, 2]).unwrap(),
            SequencePoint::new(200, 20, &[3, 4]).unwrap(),
            SequencePoint::new(300, 30, &[5, 6]).unwrap(),
        ]
    }

    #[test]
    fn test_point_list_cursor() {
        let points = points();
        let mut list = PointList::new(&points);

        assert_eq!(list.num_points(), 3);
        assert_eq!(list.point_dim(), 2);
        assert_eq!(list.point().duration, 100);

        list.set_cur_point(2);
        assert_eq!(list.point().duration, 300);
        assert!(list.at_last_point());

        list.set_cur_point(9);
        assert_eq!(list.cur_point(), 2);
    }

    #[test]
    fn test_mut_ref_is_a_sequence() {
        let points = points();
        let mut list = PointList::new(&points);

        fn advance<S: Sequence>(mut seq: S) {
            let next = seq.cur_point() + 1;
            seq.set_cur_point(next);
        }

        advance(&mut list);
        assert_eq!(list.cur_point(), 1);
    }

    #[test]
    fn test_empty_list() {
        let mut list = PointList::new(&[]);
        assert_eq!(list.point_dim(), 0);
        assert_eq!(list.point(), SequencePoint::default());
        list.set_cur_point(3);
        assert_eq!(list.cur_point(), 0);
        assert!(list.at_last_point());
    }
}
