//! Interaction state machine for the custom canvas.
//!
//! Translates input events into `ObjectMutation`s that the caller applies
//! to its `CanvasModel`. The state is three independent fields (armed
//! tool, drag target, selection); [`InteractionPhase`] is derived from
//! them for display.
//!
//! | Event | Tool armed | No tool |
//! |-------|------------|---------|
//! | **Click on empty canvas** | Place object, disarm, select it | Clear selection |
//! | **Pointer down on object** | Drag + select (tool stays armed) | Drag + select |
//! | **Pointer move** | Move drag target | Move drag target |
//! | **Pointer up / leave** | End drag | End drag |

use crate::canvas::{CanvasModel, ObjectMutation};
use crate::input::InputEvent;
use seat_core::id::ObjectId;
use seat_core::model::{CustomObject, ObjectKind, ObjectType, clamp_percent};
use smallvec::{SmallVec, smallvec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    ToolArmed,
    Dragging,
}

/// Result of a click while a tool is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Created(ObjectId),
    /// Every roster slot already has a seat. Nothing was created and the
    /// tool stays armed.
    Rejected,
}

/// What one event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutcome {
    pub mutations: SmallVec<[ObjectMutation; 2]>,
    pub placement: Option<Placement>,
}

impl ToolOutcome {
    fn mutation(m: ObjectMutation) -> Self {
        Self {
            mutations: smallvec![m],
            placement: None,
        }
    }
}

/// Context an event is interpreted against.
pub struct EventContext<'a> {
    /// Topmost object under the pointer, if any.
    pub hit: Option<ObjectId>,
    /// Pointer position in canvas percent, already clamped.
    pub position: Option<(f32, f32)>,
    pub canvas: &'a CanvasModel,
    pub roster_len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    pub active_tool: Option<ObjectType>,
    pub dragging: Option<ObjectId>,
    pub selected: Option<ObjectId>,
    read_only: bool,
}

impl Interaction {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Self::default()
        }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn phase(&self) -> InteractionPhase {
        if self.dragging.is_some() {
            InteractionPhase::Dragging
        } else if self.active_tool.is_some() {
            InteractionPhase::ToolArmed
        } else {
            InteractionPhase::Idle
        }
    }

    /// Arm a placement tool, replacing any armed one.
    pub fn arm(&mut self, tool: ObjectType) -> bool {
        if self.read_only {
            return false;
        }
        log::debug!("arm tool {}", tool.as_str());
        self.active_tool = Some(tool);
        true
    }

    pub fn cancel(&mut self) {
        self.active_tool = None;
    }

    /// Drop the drag target and the armed tool, keep the selection.
    pub fn reset_gesture(&mut self) {
        self.active_tool = None;
        self.dragging = None;
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Remove the selected object.
    pub fn delete_selected(&mut self) -> Option<ObjectMutation> {
        if self.read_only {
            return None;
        }
        let id = self.selected.take()?;
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        Some(ObjectMutation::Remove { id })
    }

    /// Remove every object.
    pub fn clear(&mut self) -> Option<ObjectMutation> {
        if self.read_only {
            return None;
        }
        self.selected = None;
        self.dragging = None;
        Some(ObjectMutation::Clear)
    }

    pub fn handle(&mut self, event: &InputEvent, cx: &EventContext<'_>) -> ToolOutcome {
        if self.read_only {
            return ToolOutcome::default();
        }
        match event {
            InputEvent::PointerDown { .. } => {
                if let Some(id) = cx.hit {
                    self.dragging = Some(id);
                    self.selected = Some(id);
                    log::debug!("drag start {id}");
                }
                ToolOutcome::default()
            }
            InputEvent::PointerMove { .. } => match (self.dragging, cx.position) {
                (Some(id), Some((x, y))) => ToolOutcome::mutation(ObjectMutation::Move {
                    id,
                    x: clamp_percent(x),
                    y: clamp_percent(y),
                }),
                _ => ToolOutcome::default(),
            },
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                let Some(id) = self.dragging.take() else {
                    return ToolOutcome::default();
                };
                log::debug!("drag end {id}");
                match cx.position {
                    Some((x, y)) => ToolOutcome::mutation(ObjectMutation::Move {
                        id,
                        x: clamp_percent(x),
                        y: clamp_percent(y),
                    }),
                    None => ToolOutcome::default(),
                }
            }
            InputEvent::Click { .. } => {
                if cx.hit.is_some() {
                    return ToolOutcome::default();
                }
                match (self.active_tool, cx.position) {
                    (Some(tool), Some((x, y))) => self.place(tool, x, y, cx),
                    _ => {
                        self.selected = None;
                        ToolOutcome::default()
                    }
                }
            }
        }
    }

    fn place(&mut self, tool: ObjectType, x: f32, y: f32, cx: &EventContext<'_>) -> ToolOutcome {
        let kind = match tool {
            ObjectType::Seat => cx.canvas.next_free_slot(cx.roster_len).map(ObjectKind::seat),
            other => ObjectKind::furniture(other),
        };
        let Some(kind) = kind else {
            log::debug!("seat placement rejected: all {} roster slots taken", cx.roster_len);
            return ToolOutcome {
                mutations: SmallVec::new(),
                placement: Some(Placement::Rejected),
            };
        };

        let object = CustomObject::new(kind, x, y);
        let id = object.id;
        self.active_tool = None;
        self.selected = Some(id);
        ToolOutcome {
            mutations: smallvec![ObjectMutation::Add {
                object: Box::new(object),
            }],
            placement: Some(Placement::Created(id)),
        }
    }
}
