//! Axis-aligned bounding boxes per hand region.
//!
//! Purely geometric: boxes are rebuilt from joint positions each tick,
//! grouped by body region, at one of two levels of detail. The region
//! array is a fixed arena indexed by [`BoundsRegion`] — the key space is
//! known at compile time, so no per-tick hashing or map allocation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::skeleton::{Finger, HandFrame, HandJoint};

/// An axis-aligned bounding box, inclusive on all faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing both points.
    pub fn from_pair(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.encapsulate(p);
        }
        Some(aabb)
    }

    /// Grow to contain `point`.
    pub fn encapsulate(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Hand regions bounds are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsRegion {
    Palm,
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
    Hand,
}

impl BoundsRegion {
    pub const COUNT: usize = 7;

    pub const ALL: [BoundsRegion; Self::COUNT] = [
        Self::Palm,
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Little,
        Self::Hand,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    fn for_finger(finger: Finger) -> BoundsRegion {
        match finger {
            Finger::Thumb => Self::Thumb,
            Finger::Index => Self::Index,
            Finger::Middle => Self::Middle,
            Finger::Ring => Self::Ring,
            Finger::Little => Self::Little,
        }
    }
}

/// Level of detail: one whole-hand box, or per-segment boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsMode {
    Coarse,
    Fine,
}

/// Region-indexed box storage; part of the output snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandBounds {
    regions: [Vec<Aabb>; BoundsRegion::COUNT],
}

impl HandBounds {
    /// Boxes for a region; empty when the region was never produced.
    pub fn region(&self, region: BoundsRegion) -> &[Aabb] {
        &self.regions[region.index()]
    }
}

/// Rebuilds the per-region boxes from each tick's joint positions.
///
/// A region whose source joints went untracked keeps its previous boxes
/// for the tick rather than emptying.
#[derive(Debug, Clone)]
pub struct HandBoundsBuilder {
    mode: BoundsMode,
    bounds: HandBounds,
}

impl HandBoundsBuilder {
    pub fn new(mode: BoundsMode) -> Self {
        Self {
            mode,
            bounds: HandBounds::default(),
        }
    }

    pub fn mode(&self) -> BoundsMode {
        self.mode
    }

    /// Current boxes, for cloning into the output snapshot.
    pub fn bounds(&self) -> &HandBounds {
        &self.bounds
    }

    /// Recompute boxes for one tick.
    pub fn rebuild(&mut self, frame: &HandFrame) {
        match self.mode {
            BoundsMode::Coarse => self.rebuild_whole_hand(frame),
            BoundsMode::Fine => {
                self.rebuild_palm(frame);
                for finger in Finger::ALL {
                    self.rebuild_finger(frame, finger);
                }
            }
        }
    }

    /// One box over every non-palm joint.
    fn rebuild_whole_hand(&mut self, frame: &HandFrame) {
        let points = HandJoint::ALL
            .iter()
            .filter(|j| **j != HandJoint::Palm)
            .filter_map(|j| frame.joint(*j))
            .map(|pose| pose.position);
        if let Some(aabb) = Aabb::from_points(points) {
            let slot = &mut self.bounds.regions[BoundsRegion::Hand.index()];
            slot.clear();
            slot.push(aabb);
        }
    }

    /// Palm region: one metacarpal→proximal box per non-thumb finger.
    /// Updated only when all four pairs are tracked, so fresh and stale
    /// segments never mix within the region.
    fn rebuild_palm(&mut self, frame: &HandFrame) {
        let mut boxes = Vec::with_capacity(Finger::NON_THUMB.len());
        for finger in Finger::NON_THUMB {
            match (
                frame.joint(finger.metacarpal()),
                frame.joint(finger.knuckle()),
            ) {
                (Some(metacarpal), Some(knuckle)) => {
                    boxes.push(Aabb::from_pair(metacarpal.position, knuckle.position));
                }
                _ => return,
            }
        }
        self.bounds.regions[BoundsRegion::Palm.index()] = boxes;
    }

    /// Finger region: knuckle→middle and middle→tip boxes.
    fn rebuild_finger(&mut self, frame: &HandFrame, finger: Finger) {
        let (knuckle, middle, tip) = match (
            frame.joint(finger.knuckle()),
            frame.joint(finger.middle_joint()),
            frame.joint(finger.tip()),
        ) {
            (Some(k), Some(m), Some(t)) => (k, m, t),
            _ => return,
        };
        let region = BoundsRegion::for_finger(finger);
        let slot = &mut self.bounds.regions[region.index()];
        slot.clear();
        slot.push(Aabb::from_pair(knuckle.position, middle.position));
        slot.push(Aabb::from_pair(middle.position, tip.position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::test_support::spread_joints;
    use crate::skeleton::Handedness;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -0.5),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -0.5));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::from_points([]).is_none());
    }

    #[test]
    fn test_aabb_contains_is_inclusive() {
        let aabb = Aabb::from_pair(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::ZERO));
        assert!(aabb.contains(Vec3::ONE));
        assert!(aabb.contains(Vec3::splat(0.5)));
        assert!(!aabb.contains(Vec3::new(1.01, 0.5, 0.5)));
    }

    #[test]
    fn test_whole_hand_contains_all_non_palm_joints() {
        let frame = HandFrame::tracked(Handedness::Right, spread_joints());
        let mut builder = HandBoundsBuilder::new(BoundsMode::Coarse);
        builder.rebuild(&frame);

        let boxes = builder.bounds().region(BoundsRegion::Hand);
        assert_eq!(boxes.len(), 1);
        for joint in HandJoint::ALL {
            if joint == HandJoint::Palm {
                continue;
            }
            let pos = frame.joints[joint.index()].position;
            assert!(
                boxes[0].contains(pos),
                "{} at {} should lie inside the whole-hand box",
                joint.as_str(),
                pos
            );
        }
    }

    #[test]
    fn test_fine_mode_produces_palm_and_finger_boxes() {
        let frame = HandFrame::tracked(Handedness::Right, spread_joints());
        let mut builder = HandBoundsBuilder::new(BoundsMode::Fine);
        builder.rebuild(&frame);

        let bounds = builder.bounds();
        assert_eq!(bounds.region(BoundsRegion::Palm).len(), 4);
        for finger in [
            BoundsRegion::Thumb,
            BoundsRegion::Index,
            BoundsRegion::Middle,
            BoundsRegion::Ring,
            BoundsRegion::Little,
        ] {
            assert_eq!(bounds.region(finger).len(), 2, "{:?}", finger);
        }
        // Coarse-only region untouched in fine mode
        assert!(bounds.region(BoundsRegion::Hand).is_empty());
    }

    #[test]
    fn test_missing_joints_retain_previous_boxes() {
        let frame = HandFrame::tracked(Handedness::Right, spread_joints());
        let mut builder = HandBoundsBuilder::new(BoundsMode::Fine);
        builder.rebuild(&frame);
        let before = builder.bounds().region(BoundsRegion::Index).to_vec();
        let middle_before = builder.bounds().region(BoundsRegion::Middle).to_vec();

        // Index tip drops out; moved joints elsewhere must not disturb the
        // stale index boxes
        let mut degraded = frame.clone();
        degraded.clear_joint(HandJoint::IndexTip);
        for pose in degraded.joints.iter_mut() {
            pose.position += Vec3::splat(1.0);
        }
        builder.rebuild(&degraded);

        assert_eq!(builder.bounds().region(BoundsRegion::Index), &before[..]);
        // Fingers with full data did update
        assert_ne!(
            builder.bounds().region(BoundsRegion::Middle),
            &middle_before[..]
        );
    }

    #[test]
    fn test_partial_palm_keeps_previous_boxes() {
        let frame = HandFrame::tracked(Handedness::Right, spread_joints());
        let mut builder = HandBoundsBuilder::new(BoundsMode::Fine);
        builder.rebuild(&frame);
        let before = builder.bounds().region(BoundsRegion::Palm).to_vec();
        assert_eq!(before.len(), 4);

        // One metacarpal drops out; the palm region must keep all four
        // previous boxes rather than shrink to a fresh/stale mix
        let mut degraded = frame.clone();
        degraded.clear_joint(HandJoint::RingMetacarpal);
        for pose in degraded.joints.iter_mut() {
            pose.position += Vec3::splat(1.0);
        }
        builder.rebuild(&degraded);

        assert_eq!(builder.bounds().region(BoundsRegion::Palm), &before[..]);
    }
}
