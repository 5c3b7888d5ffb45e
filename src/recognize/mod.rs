//! Static pose recognition against a recorded reference library.
//!
//! A library of named canonical-space joint snapshots is loaded once at
//! startup; per-tick matching lives in [`matcher`].

pub mod matcher;

pub use matcher::PoseRecognizer;

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{HandkitError, LibraryError};
use crate::skeleton::canonical::wrist_palm_distance;
use crate::skeleton::{Pose, JOINT_COUNT};

/// Records whose wrist-to-palm distance falls below this are rejected:
/// the recognizer divides by it to correct for hand size.
pub(crate) const MIN_SCALE_DISTANCE: f32 = 1e-4;

/// One recorded reference pose: an identifier, the canonical-space joint
/// array it was captured with, and the precomputed wrist-to-palm distance
/// used as the scale denominator. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ReferencePoseRecord {
    pub id: String,
    pub joints: [Pose; JOINT_COUNT],
    pub scale_denominator: f32,
}

impl ReferencePoseRecord {
    pub fn new(id: impl Into<String>, joints: [Pose; JOINT_COUNT]) -> Self {
        Self {
            id: id.into(),
            scale_denominator: wrist_palm_distance(&joints),
            joints,
        }
    }
}

/// Tally of a library load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// An immutable set of reference pose records. One library per tracking
/// provider instance; read-only after load, so concurrent readers are
/// safe.
#[derive(Debug, Clone, Default)]
pub struct PoseLibrary {
    records: Vec<ReferencePoseRecord>,
    report: LoadReport,
}

/// On-disk library layout.
#[derive(Debug, Deserialize)]
struct LibraryFile {
    poses: Vec<RecordFile>,
}

#[derive(Debug, Deserialize)]
struct RecordFile {
    id: String,
    #[serde(default)]
    joints: Vec<JointEntry>,
}

/// Sparse (joint-index, pose) pair; joints absent from a record default
/// to the identity pose.
#[derive(Debug, Deserialize)]
struct JointEntry {
    joint: usize,
    position: glam::Vec3,
    rotation: glam::Quat,
}

impl PoseLibrary {
    /// An empty library; recognition always reports no match.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a library from in-memory records, applying the same
    /// validation as a file load.
    pub fn from_records(records: impl IntoIterator<Item = ReferencePoseRecord>) -> Self {
        let mut library = Self::default();
        for record in records {
            if record.scale_denominator < MIN_SCALE_DISTANCE {
                warn!(
                    id = %record.id,
                    "rejecting reference pose with degenerate wrist-palm distance"
                );
                library.report.rejected += 1;
                continue;
            }
            library.records.push(record);
            library.report.accepted += 1;
        }
        library
    }

    /// Load a JSON pose library. Malformed records are rejected with a
    /// warning and recognition proceeds with the remainder; a file that
    /// cannot be read or parsed at all is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HandkitError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LibraryError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let library = Self::from_str(&contents)?;
        info!(
            path = %path.as_ref().display(),
            accepted = library.report.accepted,
            rejected = library.report.rejected,
            "loaded pose library"
        );
        Ok(library)
    }

    /// Parse a JSON pose library from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, HandkitError> {
        let file: LibraryFile =
            serde_json::from_str(s).map_err(|e| LibraryError::Parse(e.to_string()))?;

        let mut library = Self::default();
        'records: for record in file.poses {
            let mut joints = [Pose::IDENTITY; JOINT_COUNT];
            for entry in &record.joints {
                if entry.joint >= JOINT_COUNT {
                    warn!(
                        id = %record.id,
                        joint = entry.joint,
                        "rejecting reference pose with out-of-range joint index"
                    );
                    library.report.rejected += 1;
                    continue 'records;
                }
                joints[entry.joint] = Pose::new(entry.position, entry.rotation.normalize());
            }

            let parsed = ReferencePoseRecord::new(record.id, joints);
            if parsed.scale_denominator < MIN_SCALE_DISTANCE {
                warn!(
                    id = %parsed.id,
                    "rejecting reference pose with degenerate wrist-palm distance"
                );
                library.report.rejected += 1;
                continue;
            }
            library.records.push(parsed);
            library.report.accepted += 1;
        }
        Ok(library)
    }

    pub fn records(&self) -> &[ReferencePoseRecord] {
        &self.records
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::test_support::spread_joints;

    #[test]
    fn test_parse_library_with_sparse_joints() {
        let library = PoseLibrary::from_str(
            r#"{
                "poses": [
                    {
                        "id": "fist",
                        "joints": [
                            {"joint": 0, "position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0]},
                            {"joint": 1, "position": [0.0, 0.0, 0.08], "rotation": [0.0, 0.0, 0.0, 1.0]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.report(), LoadReport { accepted: 1, rejected: 0 });
        let record = &library.records()[0];
        assert_eq!(record.id, "fist");
        assert!((record.scale_denominator - 0.08).abs() < 1e-6);
        // Unlisted joints default to identity
        assert_eq!(record.joints[5], Pose::IDENTITY);
    }

    #[test]
    fn test_out_of_range_joint_rejects_record_only() {
        let library = PoseLibrary::from_str(
            r#"{
                "poses": [
                    {
                        "id": "bad",
                        "joints": [
                            {"joint": 26, "position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0]}
                        ]
                    },
                    {
                        "id": "good",
                        "joints": [
                            {"joint": 1, "position": [0.0, 0.0, 0.08], "rotation": [0.0, 0.0, 0.0, 1.0]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(library.report(), LoadReport { accepted: 1, rejected: 1 });
        assert_eq!(library.records()[0].id, "good");
    }

    #[test]
    fn test_degenerate_scale_rejected() {
        // All identity: wrist and palm coincide
        let library = PoseLibrary::from_str(
            r#"{"poses": [{"id": "flat", "joints": []}]}"#,
        )
        .unwrap();
        assert_eq!(library.report(), LoadReport { accepted: 0, rejected: 1 });
        assert!(library.is_empty());
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        assert!(PoseLibrary::from_str("not json").is_err());
        assert!(PoseLibrary::from_str(r#"{"poses": 3}"#).is_err());
    }

    #[test]
    fn test_from_records_validates() {
        let good = ReferencePoseRecord::new("spread", spread_joints());
        let degenerate = ReferencePoseRecord::new("flat", [Pose::IDENTITY; JOINT_COUNT]);
        let library = PoseLibrary::from_records([good, degenerate]);
        assert_eq!(library.report(), LoadReport { accepted: 1, rejected: 1 });
        assert_eq!(library.records()[0].id, "spread");
    }
}
