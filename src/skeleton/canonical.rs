//! World-space ↔ canonical local-space conversion.
//!
//! Canonical space is root-relative (wrist at the origin), viewer-aligned,
//! and mirrored to a right hand, so recorded reference poses compare
//! against live data independent of where the hand sits in the world and
//! which hand produced it.

use glam::Quat;

use super::{HandJoint, Handedness, Pose, JOINT_COUNT};

/// Mirror a canonical pose across the x=0 plane.
///
/// Negates position.x and the rotation's y/z components without
/// re-normalizing the quaternion. The rotation half is an approximation
/// kept for parity with the recorded pose libraries this crate consumes;
/// recorded and live data pass through the same mirror, so comparisons
/// stay consistent.
pub fn mirror_pose(pose: Pose) -> Pose {
    let mut p = pose.position;
    p.x = -p.x;
    let r = pose.rotation;
    Pose {
        position: p,
        rotation: Quat::from_xyzw(r.x, -r.y, -r.z, r.w),
    }
}

/// Convert world-space joint poses into canonical local space.
///
/// Per joint: translate by `-reference.position`, rotate by the inverse of
/// `reference.rotation`, then by the inverse of the viewer rotation. Left
/// hands are mirrored to the right-hand frame afterwards. Pure and
/// deterministic over the fixed-size input.
pub fn normalize(
    joints: &[Pose; JOINT_COUNT],
    handedness: Handedness,
    reference: Pose,
    viewer_rotation: Quat,
) -> [Pose; JOINT_COUNT] {
    let ref_inv = reference.rotation.inverse();
    let view_inv = viewer_rotation.inverse();

    let mut out = [Pose::IDENTITY; JOINT_COUNT];
    for (canonical, world) in out.iter_mut().zip(joints.iter()) {
        let position = view_inv * (ref_inv * (world.position - reference.position));
        let rotation = view_inv * ref_inv * world.rotation;
        let pose = Pose { position, rotation };
        *canonical = match handedness {
            Handedness::Left => mirror_pose(pose),
            Handedness::Right => pose,
        };
    }
    out
}

/// Place canonical joint poses back into world space (inverse of
/// [`normalize`]): un-mirror left hands, then apply the viewer and
/// reference transforms in reverse order.
pub fn denormalize(
    joints: &[Pose; JOINT_COUNT],
    handedness: Handedness,
    reference: Pose,
    viewer_rotation: Quat,
) -> [Pose; JOINT_COUNT] {
    let mut out = [Pose::IDENTITY; JOINT_COUNT];
    for (world, canonical) in out.iter_mut().zip(joints.iter()) {
        let local = match handedness {
            Handedness::Left => mirror_pose(*canonical),
            Handedness::Right => *canonical,
        };
        let position =
            reference.rotation * (viewer_rotation * local.position) + reference.position;
        let rotation = reference.rotation * viewer_rotation * local.rotation;
        *world = Pose { position, rotation };
    }
    out
}

/// Canonical wrist→palm distance of a joint array; the scale denominator
/// for size-invariant pose comparison.
pub fn wrist_palm_distance(joints: &[Pose; JOINT_COUNT]) -> f32 {
    joints[HandJoint::Wrist.index()]
        .position
        .distance(joints[HandJoint::Palm.index()].position)
}
