//! Named normalized points, edited by one writer and read through snapshots.
//!
//! Insertion order is trail order. Keys stay dense (`point1..pointN`): deleting
//! a point renumbers the rest while keeping their values and order.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::geometry::NormalizedPoint;

/// Prefix of the dense key convention.
pub const KEY_PREFIX: &str = "point";
/// Position given to newly added points.
pub const DEFAULT_POSITION: NormalizedPoint = NormalizedPoint::new(0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no point named `{0}`")]
    UnknownPoint(String),
    #[error("`{raw}` is not a number")]
    InvalidNumber { raw: String },
    #[error("at least {min} points are required")]
    AtMinimum { min: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    pub key: String,
    pub point: NormalizedPoint,
}

/// Read-only view of the set at one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSnapshot {
    revision: u64,
    points: Rc<[NamedPoint]>,
}

impl PointSnapshot {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedPoint> {
        self.points.iter()
    }
}

#[derive(Debug, Clone)]
pub struct NamedPointSet {
    entries: Vec<NamedPoint>,
    revision: u64,
    snapshot: Option<PointSnapshot>,
}

impl Default for NamedPointSet {
    /// The starting trail: a diagonal from near the top-left corner to near
    /// the bottom-right corner.
    fn default() -> Self {
        Self::from_points([
            ("point1", NormalizedPoint::new(0.1, 0.1)),
            ("point2", NormalizedPoint::new(0.9, 0.9)),
        ])
    }
}

impl NamedPointSet {
    /// Fewest points the editor may delete down to.
    pub const MIN_POINTS: usize = 2;

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            revision: 0,
            snapshot: None,
        }
    }

    /// Build a set from arbitrary keys. Later duplicates replace earlier
    /// values in place.
    pub fn from_points<K: Into<String>>(points: impl IntoIterator<Item = (K, NormalizedPoint)>) -> Self {
        let mut set = Self::new();
        for (key, point) in points {
            let key = key.into();
            match set.entries.iter_mut().find(|e| e.key == key) {
                Some(entry) => entry.point = point,
                None => set.entries.push(NamedPoint { key, point }),
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, key: &str) -> Option<NormalizedPoint> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.point)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedPoint> {
        self.entries.iter()
    }

    pub fn can_delete(&self) -> bool {
        self.entries.len() > Self::MIN_POINTS
    }

    /// Append a point at the default position under the next dense key.
    pub fn add_point(&mut self) -> String {
        let mut n = self.entries.len() + 1;
        // Tolerate sets built from non-dense keys
        while self.get(&format!("{KEY_PREFIX}{n}")).is_some() {
            n += 1;
        }
        let key = format!("{KEY_PREFIX}{n}");
        self.entries.push(NamedPoint {
            key: key.clone(),
            point: DEFAULT_POSITION,
        });
        self.touch();
        log::debug!("added {}", key);
        key
    }

    /// Set one axis of one point from editor text. Invalid text leaves the
    /// stored value untouched.
    pub fn update_axis(&mut self, key: &str, axis: Axis, raw: &str) -> Result<f32, EditError> {
        let value = parse_coordinate(raw)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| EditError::UnknownPoint(key.to_string()))?;
        match axis {
            Axis::X => entry.point.x = value,
            Axis::Y => entry.point.y = value,
        }
        self.touch();
        Ok(value)
    }

    /// Replace a point's value.
    pub fn set(&mut self, key: &str, point: NormalizedPoint) -> Result<(), EditError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| EditError::UnknownPoint(key.to_string()))?;
        entry.point = point;
        self.touch();
        Ok(())
    }

    /// Remove a point and renumber the rest densely, keeping their order.
    pub fn delete_point(&mut self, key: &str) -> Result<NormalizedPoint, EditError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.key == key)
            .ok_or_else(|| EditError::UnknownPoint(key.to_string()))?;
        if !self.can_delete() {
            return Err(EditError::AtMinimum {
                min: Self::MIN_POINTS,
            });
        }
        let removed = self.entries.remove(idx);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.key = format!("{KEY_PREFIX}{}", i + 1);
        }
        self.touch();
        log::debug!("deleted {}, {} points remain", key, self.entries.len());
        Ok(removed.point)
    }

    /// Read-only view for this revision. Repeated calls without edits share
    /// one allocation.
    pub fn snapshot(&mut self) -> PointSnapshot {
        if let Some(ref snap) = self.snapshot {
            if snap.revision == self.revision {
                return snap.clone();
            }
        }
        let snap = PointSnapshot {
            revision: self.revision,
            points: self.entries.clone().into(),
        };
        self.snapshot = Some(snap.clone());
        snap
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Parse one coordinate typed into the editor.
pub fn parse_coordinate(raw: &str) -> Result<f32, EditError> {
    let invalid = || EditError::InvalidNumber {
        raw: raw.to_string(),
    };
    let value: f32 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(set: &NamedPointSet) -> Vec<String> {
        set.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn default_set_is_a_diagonal() {
        let set = NamedPointSet::default();
        assert_eq!(keys(&set), vec!["point1", "point2"]);
        assert_eq!(set.get("point2"), Some(NormalizedPoint::new(0.9, 0.9)));
        assert!(!set.can_delete());
    }

    #[test]
    fn add_point_uses_next_dense_key() {
        let mut set = NamedPointSet::default();
        assert_eq!(set.add_point(), "point3");
        assert_eq!(set.get("point3"), Some(DEFAULT_POSITION));

        let mut sparse = NamedPointSet::from_points([
            ("point1", NormalizedPoint::new(0.0, 0.0)),
            ("point3", NormalizedPoint::new(1.0, 1.0)),
        ]);
        assert_eq!(sparse.add_point(), "point4");
    }

    #[test]
    fn delete_renumbers_and_keeps_values() {
        let mut set = NamedPointSet::from_points([
            ("point1", NormalizedPoint::new(0.1, 0.1)),
            ("point2", NormalizedPoint::new(0.5, 0.2)),
            ("point3", NormalizedPoint::new(0.9, 0.8)),
        ]);
        let removed = set.delete_point("point2").unwrap();
        assert_eq!(removed, NormalizedPoint::new(0.5, 0.2));
        assert_eq!(keys(&set), vec!["point1", "point2"]);
        assert_eq!(set.get("point1"), Some(NormalizedPoint::new(0.1, 0.1)));
        assert_eq!(set.get("point2"), Some(NormalizedPoint::new(0.9, 0.8)));
    }

    #[test]
    fn delete_refuses_below_floor() {
        let mut set = NamedPointSet::default();
        assert_eq!(set.delete_point("point1"), Err(EditError::AtMinimum { min: 2 }));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.delete_point("point9"),
            Err(EditError::UnknownPoint("point9".into()))
        );
    }

    #[test]
    fn invalid_text_leaves_value_unchanged() {
        let mut set = NamedPointSet::default();
        let before = set.revision();
        for raw in ["", "abc", "NaN", "inf", "0.5.5"] {
            assert!(matches!(
                set.update_axis("point1", Axis::X, raw),
                Err(EditError::InvalidNumber { .. })
            ));
        }
        assert_eq!(set.get("point1"), Some(NormalizedPoint::new(0.1, 0.1)));
        assert_eq!(set.revision(), before);

        assert_eq!(set.update_axis("point1", Axis::Y, " 0.75 "), Ok(0.75));
        assert_eq!(set.get("point1"), Some(NormalizedPoint::new(0.1, 0.75)));
        // Out of the conventional range is accepted as-is
        assert_eq!(set.update_axis("point1", Axis::X, "1.5"), Ok(1.5));
    }

    #[test]
    fn snapshots_are_stable_across_edits() {
        let mut set = NamedPointSet::default();
        let first = set.snapshot();
        assert_eq!(set.snapshot(), first);

        set.add_point();
        let second = set.snapshot();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert!(second.revision() > first.revision());
    }

    #[test]
    fn empty_set_is_tolerated() {
        let mut set = NamedPointSet::new();
        assert!(set.snapshot().is_empty());
        assert_eq!(set.add_point(), "point1");
    }
}
