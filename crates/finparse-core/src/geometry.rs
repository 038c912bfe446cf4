//! Relative page coordinates returned alongside extracted values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A point in relative page coordinates (0.0 - 1.0 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered list of points outlining a detected region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Point>);

impl Polygon {
    /// Read a polygon from `[[x, y], ...]`. Malformed points are skipped and a
    /// missing or non-array value gives an empty polygon.
    pub fn from_prediction(value: Option<&Value>) -> Self {
        let points = value
            .and_then(Value::as_array)
            .map(|points| {
                points
                    .iter()
                    .filter_map(|point| {
                        let coords = point.as_array()?;
                        let x = coords.first()?.as_f64()?;
                        let y = coords.get(1)?.as_f64()?;
                        Some(Point::new(x, y))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self(points)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Axis-aligned box enclosing every point, `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<Quadrilateral> {
        let first = self.0.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in &self.0[1..] {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Some(Quadrilateral([
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ]))
    }

    /// Mean of all points.
    pub fn centroid(&self) -> Option<Point> {
        if self.0.is_empty() {
            return None;
        }
        let n = self.0.len() as f64;
        let (sx, sy) = self.0.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

impl std::fmt::Display for Polygon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let points: Vec<String> = self
            .0
            .iter()
            .map(|p| format!("({:.4}, {:.4})", p.x, p.y))
            .collect();
        write!(f, "Polygon with {} points: {}", self.0.len(), points.join(", "))
    }
}

/// Four corners, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quadrilateral(pub [Point; 4]);

impl Quadrilateral {
    /// Read four `[x, y]` points, `None` unless exactly four are present.
    pub fn from_prediction(value: Option<&Value>) -> Option<Self> {
        let polygon = Polygon::from_prediction(value);
        let points: [Point; 4] = polygon.0.try_into().ok()?;
        Some(Self(points))
    }

    pub fn top_left(&self) -> Point {
        self.0[0]
    }

    pub fn bottom_right(&self) -> Point {
        self.0[2]
    }
}
