//! Bounded trajectory traces.

use std::collections::VecDeque;

use crate::Point;

/// An ordered, FIFO-bounded record of positions.
///
/// Once the trace holds `capacity` points, every push evicts the oldest one.
/// The trace is observational only: nothing in it feeds back into the
/// integration.
///
/// # Example
///
/// ```rust
/// use mechanics::{Point, TrajectoryTrace};
///
/// let mut trace = TrajectoryTrace::new(2);
/// trace.push(Point::new(0.0, 0.0));
/// trace.push(Point::new(1.0, 0.0));
/// trace.push(Point::new(2.0, 0.0));
///
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.first(), Some(Point::new(1.0, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTrace {
    points: VecDeque<Point>,
    capacity: usize,
}

impl TrajectoryTrace {
    /// Creates an empty trace that keeps at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of points kept.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points currently recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points are recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a point, evicting the oldest ones while over capacity.
    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Overwrites the most recent point. Does nothing on an empty trace.
    pub fn replace_last(&mut self, point: Point) {
        if let Some(last) = self.points.back_mut() {
            *last = point;
        }
    }

    /// Oldest recorded point.
    #[inline]
    pub fn first(&self) -> Option<Point> {
        self.points.front().copied()
    }

    /// Most recent point.
    #[inline]
    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Removes every point. Capacity is kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Point> + ExactSizeIterator {
        self.points.iter()
    }

    /// Copies the points, oldest first.
    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}

impl<'a> IntoIterator for &'a TrajectoryTrace {
    type Item = &'a Point;
    type IntoIter = std::collections::vec_deque::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TrajectoryTrace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points.iter())
    }
}
