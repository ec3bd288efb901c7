//! Flat, serializable scene snapshot model.
//!
//! A snapshot is constructed fresh on every save (no diffing) and consumed
//! once by a load. Entries carry a kind tag, an optional name, and a
//! string-keyed float property map, independent of the live store layout so
//! old files keep decoding as the store evolves.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::arena::{Entity, EntityId};
use crate::color::rgb_to_hue;
use crate::table::NamedEntityTable;

/// Entity kind tag of a snapshot entry.
///
/// The wire form is a raw `u32`. Tags this build does not know decode to
/// [`EntityKind::Unrecognized`] with the raw value preserved, so a decoded
/// file re-encodes byte-for-byte and callers must decide explicitly what to
/// do with future kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Reserved "invalid/unset" sentinel. Never produced by a capture; only
    /// possible from malformed input.
    None,
    Ball,
    /// A tag outside the known range.
    Unrecognized(u32),
}

impl EntityKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => EntityKind::None,
            1 => EntityKind::Ball,
            other => EntityKind::Unrecognized(other),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            EntityKind::None => 0,
            EntityKind::Ball => 1,
            EntityKind::Unrecognized(raw) => raw,
        }
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(EntityKind::from_raw(u32::deserialize(deserializer)?))
    }
}

/// One savable entity: kind tag, bound name (empty when unnamed), and named
/// numeric properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub kind: EntityKind,
    pub name: String,
    pub properties: BTreeMap<String, f32>,
}

impl SnapshotEntry {
    /// Property lookup with a per-key default for absent entries.
    pub fn prop(&self, key: &str, default: f32) -> f32 {
        self.properties.get(key).copied().unwrap_or(default)
    }
}

/// The full object store at capture time, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub entities: Vec<SnapshotEntry>,
}

impl SceneSnapshot {
    /// Capture every live entity that has both a transform and a shape.
    ///
    /// The bound name is recorded as-is, or as the empty string for unnamed
    /// entities; the hue is derived from the shape's RGB color.
    pub fn capture(table: &NamedEntityTable) -> Self {
        let mut entities = Vec::new();

        for (id, entity) in table.iter() {
            let (Some(transform), Some(shape)) = (entity.transform, entity.shape) else {
                continue;
            };

            let mut properties = BTreeMap::new();
            properties.insert("x".to_string(), transform.position.x);
            properties.insert("y".to_string(), transform.position.y);
            properties.insert("z".to_string(), transform.position.z);
            properties.insert("scale".to_string(), transform.scale.x);
            properties.insert("hue".to_string(), rgb_to_hue(shape.color));

            entities.push(SnapshotEntry {
                kind: shape.kind,
                name: table.name_of(id).unwrap_or("").to_string(),
                properties,
            });
        }

        Self { entities }
    }
}

/// Why a snapshot entry was skipped during restore.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreIssue {
    /// The entry carried the reserved invalid sentinel.
    NullKind { name: String },
    /// The entry's tag is outside the known range.
    UnknownKind { name: String, raw: u32 },
    /// The entry's name is already bound in the store.
    NameTaken { name: String },
}

/// Outcome of restoring a snapshot, as plain data for the caller to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Entities removed by the initial clear.
    pub cleared: usize,
    /// Handles created, in snapshot order.
    pub created: Vec<EntityId>,
    /// Entries skipped, in snapshot order.
    pub skipped: Vec<RestoreIssue>,
}

/// Rebuild the store from a snapshot, optionally clearing it first.
///
/// Malformed entries (null or unrecognized kind, duplicate name) are
/// skipped and reported; they never create an entity. Absent properties
/// fall back to `x=y=z=0`, `scale=1`, `hue=0`.
pub fn restore(
    snapshot: &SceneSnapshot,
    table: &mut NamedEntityTable,
    clear_first: bool,
) -> RestoreReport {
    let mut report = RestoreReport::default();

    if clear_first {
        report.cleared = table.clear();
    }

    for entry in &snapshot.entities {
        match entry.kind {
            EntityKind::None => {
                report.skipped.push(RestoreIssue::NullKind {
                    name: entry.name.clone(),
                });
            }
            EntityKind::Unrecognized(raw) => {
                report.skipped.push(RestoreIssue::UnknownKind {
                    name: entry.name.clone(),
                    raw,
                });
            }
            EntityKind::Ball => {
                let position = Vec3::new(
                    entry.prop("x", 0.0),
                    entry.prop("y", 0.0),
                    entry.prop("z", 0.0),
                );
                let size = entry.prop("scale", 1.0);
                let hue = entry.prop("hue", 0.0);

                match table.spawn(Entity::ball(position, size, hue), &entry.name) {
                    Ok(id) => report.created.push(id),
                    Err(_) => report.skipped.push(RestoreIssue::NameTaken {
                        name: entry.name.clone(),
                    }),
                }
            }
        }
    }

    report
}
