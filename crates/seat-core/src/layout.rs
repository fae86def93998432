//! Geometry for a partition.
//!
//! Turns zones into seat centers and furniture shapes, all in
//! percentage space (0..=100 of the surface bounding box). The custom
//! format takes its geometry from the canvas objects instead.

use crate::id::ObjectId;
use crate::model::{Color, CustomObject, LayoutFormat, ObjectType, ShapeTag};
use crate::partition::Partition;
use serde::Serialize;
use std::f32::consts::{PI, TAU};
use std::ops::Range;

/// The surface's pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Pixel position → percentage of the surface. Not clamped.
    pub fn normalize(&self, px: f32, py: f32) -> (f32, f32) {
        let w = if self.width > 0.0 { self.width } else { 1.0 };
        let h = if self.height > 0.0 { self.height } else { 1.0 };
        (px / w * 100.0, py / h * 100.0)
    }

    /// Percentage position → pixels.
    pub fn to_pixels(&self, x: f32, y: f32) -> (f32, f32) {
        (x / 100.0 * self.width, y / 100.0 * self.height)
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Size of a placed item: fixed formats scale with the surface, custom
/// furniture keeps its pixel footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum ItemSize {
    Percent { width: f32, height: f32 },
    Pixels { width: f32, height: f32 },
}

impl ItemSize {
    pub fn to_pixels(self, viewport: Viewport) -> (f32, f32) {
        match self {
            ItemSize::Percent { width, height } => viewport.to_pixels(width, height),
            ItemSize::Pixels { width, height } => (width, height),
        }
    }
}

/// A seat center bound to a roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSeat {
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    /// The canvas object backing this seat (custom format only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectId>,
}

/// Furniture or decoration drawn behind the seats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    pub kind: ObjectType,
    pub x: f32,
    pub y: f32,
    pub size: ItemSize,
    pub rotation: f32,
    pub shape: ShapeTag,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayout {
    pub format: LayoutFormat,
    pub seats: Vec<PlacedSeat>,
    pub items: Vec<PlacedItem>,
}

const TABLE_COLOR: Color = Color::rgb8(0xD6, 0xC3, 0xA5);
const STAGE_COLOR: Color = Color::rgb8(0x4B, 0x55, 0x63);

struct Builder {
    format: LayoutFormat,
    seats: Vec<PlacedSeat>,
    items: Vec<PlacedItem>,
}

impl Builder {
    fn new(format: LayoutFormat) -> Self {
        Self {
            format,
            seats: Vec::new(),
            items: Vec::new(),
        }
    }

    fn seat(&mut self, slot: usize, x: f32, y: f32) {
        self.seats.push(PlacedSeat {
            slot,
            x,
            y,
            object: None,
        });
    }

    fn item(&mut self, kind: ObjectType, shape: ShapeTag, x: f32, y: f32, w: f32, h: f32) {
        let color = if kind == ObjectType::Stage {
            STAGE_COLOR
        } else {
            TABLE_COLOR
        };
        self.items.push(PlacedItem {
            kind,
            x,
            y,
            size: ItemSize::Percent {
                width: w,
                height: h,
            },
            rotation: 0.0,
            shape,
            color,
            object: None,
        });
    }

    /// Seats of `range` evenly spread on the segment (x0, y0) → (x1, y1).
    fn line(&mut self, range: Range<usize>, (x0, y0): (f32, f32), (x1, y1): (f32, f32)) {
        let count = range.len() as f32;
        for (i, slot) in range.enumerate() {
            let t = (i as f32 + 0.5) / count;
            self.seat(slot, x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
        }
    }

    fn grid(&mut self, rows: &[Range<usize>], columns: usize, area: (f32, f32, f32, f32)) {
        let (left, top, right, bottom) = area;
        let cell_w = (right - left) / columns.max(1) as f32;
        let cell_h = (bottom - top) / rows.len().max(1) as f32;
        for (r, row) in rows.iter().enumerate() {
            let y = top + (r as f32 + 0.5) * cell_h;
            for (c, slot) in row.clone().enumerate() {
                self.seat(slot, left + (c as f32 + 0.5) * cell_w, y);
            }
        }
    }

    /// One table per range, laid out on a square-ish grid, seats in a
    /// ring around each table.
    fn tables(&mut self, tables: &[Range<usize>], kind: ObjectType, table_scale: f32) {
        if tables.is_empty() {
            return;
        }
        let cols = (tables.len() as f32).sqrt().ceil() as usize;
        let rows = tables.len().div_ceil(cols);
        let cell_w = 100.0 / cols as f32;
        let cell_h = 100.0 / rows as f32;
        for (i, range) in tables.iter().enumerate() {
            let cx = (i % cols) as f32 * cell_w + cell_w / 2.0;
            let cy = (i / cols) as f32 * cell_h + cell_h / 2.0;
            self.item(
                kind,
                ShapeTag::Circle,
                cx,
                cy,
                cell_w * table_scale,
                cell_h * table_scale,
            );
            let (rx, ry) = (cell_w * 0.36, cell_h * 0.36);
            let count = range.len() as f32;
            for (k, slot) in range.clone().enumerate() {
                let angle = TAU * k as f32 / count - PI / 2.0;
                self.seat(slot, cx + rx * angle.cos(), cy + ry * angle.sin());
            }
        }
    }

    fn finish(self) -> ResolvedLayout {
        ResolvedLayout {
            format: self.format,
            seats: self.seats,
            items: self.items,
        }
    }
}

/// Place every zone of `partition`.
pub fn resolve_layout(partition: &Partition) -> ResolvedLayout {
    match partition {
        Partition::Theater { columns, rows } => {
            let mut b = Builder::new(LayoutFormat::Teatro);
            b.item(ObjectType::Stage, ShapeTag::Square, 50.0, 8.0, 60.0, 8.0);
            b.grid(rows, *columns, (5.0, 18.0, 95.0, 98.0));
            b.finish()
        }
        Partition::Classroom { rows } => {
            let mut b = Builder::new(LayoutFormat::SalaAula);
            b.item(ObjectType::Stage, ShapeTag::Square, 50.0, 6.0, 40.0, 6.0);
            let (top, bottom) = (14.0, 98.0);
            let row_h = (bottom - top) / rows.len().max(1) as f32;
            for r in 0..rows.len() {
                let y = top + (r as f32 + 0.5) * row_h;
                b.item(
                    ObjectType::TableRect,
                    ShapeTag::Rounded,
                    50.0,
                    y - row_h * 0.3,
                    84.0,
                    row_h * 0.2,
                );
            }
            b.grid(rows, crate::partition::CLASSROOM_COLUMNS, (8.0, top, 92.0, bottom));
            b.finish()
        }
        Partition::Conference { table } => {
            let mut b = Builder::new(LayoutFormat::Conferencia);
            b.item(ObjectType::TableRect, ShapeTag::Rounded, 50.0, 50.0, 70.0, 30.0);
            let upper = table.len().div_ceil(2);
            let split = table.start + upper;
            b.line(table.start..split, (15.0, 28.0), (85.0, 28.0));
            b.line(split..table.end, (15.0, 72.0), (85.0, 72.0));
            b.finish()
        }
        Partition::UTable { left, top, right } => {
            let mut b = Builder::new(LayoutFormat::MesaU);
            b.item(ObjectType::TableRect, ShapeTag::Square, 50.0, 24.0, 60.0, 6.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 23.0, 60.0, 6.0, 66.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 77.0, 60.0, 6.0, 66.0);
            b.line(left.clone(), (14.0, 93.0), (14.0, 27.0));
            b.line(top.clone(), (20.0, 14.0), (80.0, 14.0));
            b.line(right.clone(), (86.0, 27.0), (86.0, 93.0));
            b.finish()
        }
        Partition::TTable { top, leg } => {
            let mut b = Builder::new(LayoutFormat::MesaT);
            b.item(ObjectType::TableRect, ShapeTag::Square, 50.0, 20.0, 84.0, 6.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 50.0, 60.0, 6.0, 70.0);
            b.line(top.clone(), (8.0, 11.0), (92.0, 11.0));
            // The leg seats alternate left and right of the stem.
            let pairs = leg.len().div_ceil(2).max(1) as f32;
            for (i, slot) in leg.clone().enumerate() {
                let x = if i % 2 == 0 { 42.0 } else { 58.0 };
                let y = 27.0 + ((i / 2) as f32 + 0.5) * (70.0 / pairs);
                b.seat(slot, x, y);
            }
            b.finish()
        }
        Partition::OTable {
            top,
            right,
            bottom,
            left,
        } => {
            let mut b = Builder::new(LayoutFormat::MesaO);
            b.item(ObjectType::TableRect, ShapeTag::Square, 50.0, 22.0, 60.0, 6.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 78.0, 50.0, 6.0, 56.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 50.0, 78.0, 60.0, 6.0);
            b.item(ObjectType::TableRect, ShapeTag::Square, 22.0, 50.0, 6.0, 56.0);
            // Clockwise around the square.
            b.line(top.clone(), (22.0, 12.0), (78.0, 12.0));
            b.line(right.clone(), (88.0, 22.0), (88.0, 78.0));
            b.line(bottom.clone(), (78.0, 88.0), (22.0, 88.0));
            b.line(left.clone(), (12.0, 78.0), (12.0, 22.0));
            b.finish()
        }
        Partition::Reception { clusters } => {
            let mut b = Builder::new(LayoutFormat::Recepcao);
            b.tables(clusters, ObjectType::TableRound, 0.18);
            b.finish()
        }
        Partition::Buffet { tables } => {
            let mut b = Builder::new(LayoutFormat::Buffet);
            b.tables(tables, ObjectType::TableRound, 0.42);
            b.finish()
        }
        Partition::Custom => Builder::new(LayoutFormat::Custom).finish(),
    }
}

/// Geometry of the custom canvas. Seats bound past the end of the
/// roster are skipped.
pub fn resolve_custom(objects: &[CustomObject], roster_len: usize) -> ResolvedLayout {
    let mut b = Builder::new(LayoutFormat::Custom);
    for object in objects {
        if let Some(slot) = object.kind.participant_index() {
            if slot >= roster_len {
                log::debug!("seat {} points past the roster ({slot})", object.id);
                continue;
            }
            b.seats.push(PlacedSeat {
                slot,
                x: object.x,
                y: object.y,
                object: Some(object.id),
            });
        } else if let Some(fp) = object.kind.footprint() {
            b.items.push(PlacedItem {
                kind: object.object_type(),
                x: object.x,
                y: object.y,
                size: ItemSize::Pixels {
                    width: fp.width,
                    height: fp.height,
                },
                rotation: fp.rotation,
                shape: fp.shape,
                color: fp.color,
                object: Some(object.id),
            });
        }
    }
    b.finish()
}
