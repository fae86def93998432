//! Canvas object model.
//!
//! Owns the free-form objects of the custom format. All changes go
//! through [`ObjectMutation`]s produced by the interaction layer and
//! applied here, so one place enforces the model's invariants:
//! positions stay inside [0, 100] and no two seats share a roster slot.

use seat_core::id::ObjectId;
use seat_core::model::{CustomObject, clamp_percent};
use std::collections::BTreeSet;

/// A change to the object set.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMutation {
    Add { object: Box<CustomObject> },
    /// Move to an absolute normalized position.
    Move { id: ObjectId, x: f32, y: f32 },
    Remove { id: ObjectId },
    /// Remove every object at once.
    Clear,
}

#[derive(Debug, Clone, Default)]
pub struct CanvasModel {
    objects: Vec<CustomObject>,
}

impl CanvasModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from restored objects. Seats that repeat an already used
    /// roster slot are dropped.
    pub fn from_objects(objects: Vec<CustomObject>) -> Self {
        let mut model = Self::new();
        for object in objects {
            model.apply(ObjectMutation::Add {
                object: Box::new(object),
            });
        }
        model
    }

    pub fn objects(&self) -> &[CustomObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&CustomObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Roster slots currently bound to a seat.
    pub fn assigned_slots(&self) -> BTreeSet<usize> {
        self.objects
            .iter()
            .filter_map(|o| o.kind.participant_index())
            .collect()
    }

    /// Smallest roster slot below `roster_len` with no seat yet.
    pub fn next_free_slot(&self, roster_len: usize) -> Option<usize> {
        let taken = self.assigned_slots();
        (0..roster_len).find(|slot| !taken.contains(slot))
    }

    /// Apply one mutation. Returns `true` if the object set changed.
    pub fn apply(&mut self, mutation: ObjectMutation) -> bool {
        match mutation {
            ObjectMutation::Add { object } => {
                if self.contains(object.id) {
                    log::warn!("object {} already on canvas", object.id);
                    return false;
                }
                if let Some(slot) = object.kind.participant_index()
                    && self.assigned_slots().contains(&slot)
                {
                    log::warn!("roster slot {slot} already has a seat");
                    return false;
                }
                let mut object = *object;
                object.x = clamp_percent(object.x);
                object.y = clamp_percent(object.y);
                log::debug!("add {} at ({}, {})", object.id, object.x, object.y);
                self.objects.push(object);
                true
            }
            ObjectMutation::Move { id, x, y } => {
                let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
                    return false;
                };
                let (x, y) = (clamp_percent(x), clamp_percent(y));
                if object.x == x && object.y == y {
                    return false;
                }
                object.x = x;
                object.y = y;
                true
            }
            ObjectMutation::Remove { id } => {
                let before = self.objects.len();
                self.objects.retain(|o| o.id != id);
                let removed = self.objects.len() != before;
                if removed {
                    log::debug!("remove {id}");
                }
                removed
            }
            ObjectMutation::Clear => {
                let changed = !self.objects.is_empty();
                self.objects.clear();
                changed
            }
        }
    }

    /// Apply a batch in order. Returns `true` if anything changed.
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = ObjectMutation>) -> bool {
        mutations
            .into_iter()
            .fold(false, |changed, m| self.apply(m) || changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_core::model::{ObjectKind, ObjectType};

    fn add(model: &mut CanvasModel, kind: ObjectKind, x: f32, y: f32) -> ObjectId {
        let object = CustomObject::new(kind, x, y);
        let id = object.id;
        assert!(model.apply(ObjectMutation::Add {
            object: Box::new(object)
        }));
        id
    }

    #[test]
    fn next_free_slot_fills_gaps() {
        let mut model = CanvasModel::new();
        assert_eq!(model.next_free_slot(3), Some(0));
        let a = add(&mut model, ObjectKind::seat(0), 10.0, 10.0);
        add(&mut model, ObjectKind::seat(1), 20.0, 10.0);
        assert_eq!(model.next_free_slot(3), Some(2));
        model.apply(ObjectMutation::Remove { id: a });
        assert_eq!(model.next_free_slot(3), Some(0));
        assert_eq!(model.next_free_slot(0), None);
    }

    #[test]
    fn duplicate_seat_slot_is_refused() {
        let mut model = CanvasModel::new();
        add(&mut model, ObjectKind::seat(4), 10.0, 10.0);
        let dup = CustomObject::new(ObjectKind::seat(4), 50.0, 50.0);
        assert!(!model.apply(ObjectMutation::Add {
            object: Box::new(dup)
        }));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn move_clamps_into_canvas() {
        let mut model = CanvasModel::new();
        let id = add(
            &mut model,
            ObjectKind::furniture(ObjectType::Plant).unwrap(),
            50.0,
            50.0,
        );
        assert!(model.apply(ObjectMutation::Move {
            id,
            x: 130.0,
            y: -20.0
        }));
        let o = model.get(id).unwrap();
        assert_eq!((o.x, o.y), (100.0, 0.0));
        // Same clamped spot again: no change.
        assert!(!model.apply(ObjectMutation::Move {
            id,
            x: 180.0,
            y: -1.0
        }));
    }

    #[test]
    fn clear_is_one_step() {
        let mut model = CanvasModel::new();
        add(&mut model, ObjectKind::seat(0), 1.0, 1.0);
        add(
            &mut model,
            ObjectKind::furniture(ObjectType::Stage).unwrap(),
            50.0,
            5.0,
        );
        assert!(model.apply(ObjectMutation::Clear));
        assert!(model.is_empty());
        assert!(!model.apply(ObjectMutation::Clear));
    }

    #[test]
    fn restore_drops_conflicting_seats() {
        let model = CanvasModel::from_objects(vec![
            CustomObject::new(ObjectKind::seat(0), 1.0, 1.0),
            CustomObject::new(ObjectKind::seat(0), 2.0, 2.0),
            CustomObject::new(ObjectKind::seat(1), 3.0, 3.0),
        ]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.assigned_slots().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }
}
