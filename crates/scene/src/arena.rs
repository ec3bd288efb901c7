//! Generational entity arena.
//!
//! Entities live in a dense slot vector addressed by a stable [`EntityId`]
//! (slot index + generation). Freed slots are recycled; a stale handle can
//! never reach a recycled slot because its generation no longer matches.

use glam::Vec3;

use crate::color::hsv_to_rgb;
use crate::snapshot::EntityKind;

/// Saturation applied to every ball color; only the hue is user-supplied.
const BALL_SATURATION: f32 = 0.75;
/// Value (brightness) applied to every ball color.
const BALL_VALUE: f32 = 1.0;

/// Stable handle to a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Slot index of the handle.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Synthesized human-readable label for this handle (`#<index>`).
    ///
    /// Display only: never a lookup key, and not unique across the lifetime
    /// of a session since slots are recycled.
    pub fn display_id(&self) -> String {
        format!("#{}", self.index)
    }
}

/// Spatial placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
}

/// Renderable shape attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: EntityKind,
    /// Normalized RGB color (0.0-1.0 per channel).
    pub color: Vec3,
}

/// A live entity: a bag of optional components.
///
/// Only entities carrying both a [`Transform`] and a [`Shape`] are savable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Entity {
    pub transform: Option<Transform>,
    pub shape: Option<Shape>,
}

impl Entity {
    /// Build a ball entity at `position` with uniform `size` and a color
    /// derived from `hue` (degrees).
    pub fn ball(position: Vec3, size: f32, hue: f32) -> Self {
        Self {
            transform: Some(Transform {
                position,
                scale: Vec3::splat(size),
            }),
            shape: Some(Shape {
                kind: EntityKind::Ball,
                color: hsv_to_rgb(hue, BALL_SATURATION, BALL_VALUE),
            }),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Dense slot arena owning every live entity.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entity and return its stable handle.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            EntityId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entity: Some(entity),
            });
            EntityId {
                index,
                generation: 0,
            }
        }
    }

    /// Remove an entity, bumping the slot generation so the handle goes stale.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Remove every entity, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.len;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entity.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
        removed
    }

    /// Iterate live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    entity,
                )
            })
        })
    }
}
