//! Polyline vector map of the environment.
//!
//! The map is an ordered list of wall segments, immutable after load.
//! The text format is one segment per line, `x0, y0, x1, y1` (comma and/or
//! whitespace separated); blank lines and `#` comments are skipped.

use crate::core::Point2D;
use crate::error::{NavError, Result};
use crate::geometry::Segment;
use std::fs;
use std::path::Path;

/// A set of 2D wall segments loaded from a map file.
#[derive(Debug, Clone, Default)]
pub struct VectorMap {
    segments: Vec<Segment>,
}

impl VectorMap {
    /// Build a map from an existing segment list.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Load a map from a text file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut segments = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            if fields.len() != 4 {
                return Err(NavError::MapParse {
                    line: i + 1,
                    reason: format!("expected 4 coordinates, found {}", fields.len()),
                });
            }
            let mut coords = [0.0f32; 4];
            for (j, field) in fields.iter().enumerate() {
                coords[j] = field.parse().map_err(|_| NavError::MapParse {
                    line: i + 1,
                    reason: format!("invalid coordinate {:?}", field),
                })?;
            }
            segments.push(Segment::from_coords(
                coords[0], coords[1], coords[2], coords[3],
            ));
        }

        log::info!(
            "loaded vector map {} with {} segments",
            path.display(),
            segments.len()
        );
        Ok(Self { segments })
    }

    /// All wall segments, in file order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of wall segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the map has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the segment (p, q) intersects any wall.
    #[inline]
    pub fn intersects(&self, p: Point2D, q: Point2D) -> bool {
        self.intersects_segment(&Segment::new(p, q))
    }

    /// Whether `probe` intersects any wall.
    #[inline]
    pub fn intersects_segment(&self, probe: &Segment) -> bool {
        self.segments.iter().any(|s| s.intersects(probe))
    }

    /// Closest wall intersection along the segment (p, q), measured from `p`.
    pub fn closest_intersection(&self, p: Point2D, q: Point2D) -> Option<Point2D> {
        let probe = Segment::new(p, q);
        let mut best: Option<(f32, Point2D)> = None;
        for wall in &self.segments {
            if let Some(hit) = wall.intersection(&probe) {
                let d = p.distance_squared(&hit);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, hit));
                }
            }
        }
        best.map(|(_, hit)| hit)
    }
}
