//! Live entity store and scene persistence for the Marble toolkit demo.
//!
//! This crate owns the object-store side of the developer console:
//! - **EntityArena**: a generational slot arena holding every live entity
//! - **NamedEntityTable**: the single owning wrapper that keeps the
//!   name→handle index consistent with arena membership
//! - **SceneSnapshot**: the flat, typed representation of all savable
//!   entities at a point in time
//! - **Codec**: binary encode/decode of snapshots plus scene file I/O
//!
//! # Example
//!
//! ```rust,ignore
//! use scene::{Entity, NamedEntityTable, SceneSnapshot};
//! use scene::glam::Vec3;
//!
//! let mut table = NamedEntityTable::new();
//! table.spawn(Entity::ball(Vec3::ZERO, 1.0, 120.0), "marble")?;
//!
//! let snapshot = SceneSnapshot::capture(&table);
//! scene::save_scene("scene.sav".as_ref(), &snapshot)?;
//! ```

mod arena;
mod codec;
mod color;
mod snapshot;
mod table;

pub use arena::{Entity, EntityArena, EntityId, Shape, Transform};
pub use codec::{decode_snapshot, encode_snapshot, load_scene, save_scene, CodecError};
pub use color::{hsv_to_rgb, rgb_to_hue};
pub use snapshot::{restore, EntityKind, RestoreIssue, RestoreReport, SceneSnapshot, SnapshotEntry};
pub use table::{NameTaken, NamedEntityTable};

// Re-export glam for downstream crates
pub use glam;
