//! Axis-aligned extents of 2D vertex sets.

use serde::Serialize;

/// A coordinate axis of the 2D vertex table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Column of this axis in a `[x, y]` pair.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Column name used by the vertex table.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Closed interval `[min, max]` along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Build a range from two limits given in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Tightest range covering `values`, or `None` if there are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-axis `(min, max)` over a vertex set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Dimensions {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Dimensions {
    /// Extents of `points`; `None` for an empty set.
    pub fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        Some(Self {
            x: AxisRange::from_values(points.iter().map(|p| p[0]))?,
            y: AxisRange::from_values(points.iter().map(|p| p[1]))?,
        })
    }

    pub fn axis(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_orders_limits() {
        let r = AxisRange::new(3.0, -1.0);
        assert_eq!(r, AxisRange { min: -1.0, max: 3.0 });
        assert!(r.contains(0.0));
        assert!(!r.contains(3.5));
        assert_eq!(r.span(), 4.0);
    }

    #[test]
    fn dimensions_of_points() {
        let pts = [[0.0, 0.0], [1.0, -2.0], [5.0, 5.0]];
        let d = Dimensions::from_points(&pts).unwrap();
        assert_eq!(d.axis(Axis::X), AxisRange::new(0.0, 5.0));
        assert_eq!(d.axis(Axis::Y), AxisRange::new(-2.0, 5.0));
        assert!(Dimensions::from_points(&[]).is_none());
    }
}
