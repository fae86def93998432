//! Format partitioner.
//!
//! Maps the linear roster onto the zones of a room format: rows, table
//! sides, or one table per seating group. Every zone is a contiguous range
//! of roster slots. All functions here are pure; the same roster length
//! and format always produce the same boundaries, and `n == 0` yields
//! empty zones.

use crate::model::{LayoutFormat, LinearRoster};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

/// Seats per classroom row.
pub const CLASSROOM_COLUMNS: usize = 4;

/// Minimum head-table size of the T format (clamped to the roster).
pub const T_TABLE_MIN_TOP: usize = 6;

/// Which part of the room a zone occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum ZoneKind {
    Row(usize),
    Cluster,
    Left,
    Top,
    Right,
    Bottom,
    Leg,
    Table(usize),
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::Row(r) => write!(f, "row {}", r + 1),
            ZoneKind::Cluster => f.write_str("cluster"),
            ZoneKind::Left => f.write_str("left"),
            ZoneKind::Top => f.write_str("top"),
            ZoneKind::Right => f.write_str("right"),
            ZoneKind::Bottom => f.write_str("bottom"),
            ZoneKind::Leg => f.write_str("leg"),
            ZoneKind::Table(t) => write!(f, "table {}", t + 1),
        }
    }
}

/// A named subset of the roster rendered as one spatial group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    #[serde(flatten)]
    pub kind: ZoneKind,
    pub seats: Range<usize>,
}

impl Zone {
    fn new(kind: ZoneKind, seats: Range<usize>) -> Self {
        Self { kind, seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

/// Zone assignment for one format. One variant per format family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    Theater {
        columns: usize,
        rows: Vec<Range<usize>>,
    },
    Classroom {
        rows: Vec<Range<usize>>,
    },
    Conference {
        table: Range<usize>,
    },
    UTable {
        left: Range<usize>,
        top: Range<usize>,
        right: Range<usize>,
    },
    TTable {
        top: Range<usize>,
        leg: Range<usize>,
    },
    OTable {
        top: Range<usize>,
        right: Range<usize>,
        bottom: Range<usize>,
        left: Range<usize>,
    },
    Reception {
        clusters: Vec<Range<usize>>,
    },
    Buffet {
        tables: Vec<Range<usize>>,
    },
    /// Geometry comes from the canvas objects instead.
    Custom,
}

impl Partition {
    /// Labelled zones in rendering order.
    pub fn zones(&self) -> SmallVec<[Zone; 4]> {
        let mut zones = SmallVec::new();
        match self {
            Partition::Theater { rows, .. } | Partition::Classroom { rows } => {
                for (r, seats) in rows.iter().enumerate() {
                    zones.push(Zone::new(ZoneKind::Row(r), seats.clone()));
                }
            }
            Partition::Conference { table } => {
                zones.push(Zone::new(ZoneKind::Cluster, table.clone()));
            }
            Partition::UTable { left, top, right } => {
                zones.push(Zone::new(ZoneKind::Left, left.clone()));
                zones.push(Zone::new(ZoneKind::Top, top.clone()));
                zones.push(Zone::new(ZoneKind::Right, right.clone()));
            }
            Partition::TTable { top, leg } => {
                zones.push(Zone::new(ZoneKind::Top, top.clone()));
                zones.push(Zone::new(ZoneKind::Leg, leg.clone()));
            }
            Partition::OTable {
                top,
                right,
                bottom,
                left,
            } => {
                zones.push(Zone::new(ZoneKind::Top, top.clone()));
                zones.push(Zone::new(ZoneKind::Right, right.clone()));
                zones.push(Zone::new(ZoneKind::Bottom, bottom.clone()));
                zones.push(Zone::new(ZoneKind::Left, left.clone()));
            }
            Partition::Reception { clusters: tables } | Partition::Buffet { tables } => {
                for (i, seats) in tables.iter().enumerate() {
                    zones.push(Zone::new(ZoneKind::Table(i), seats.clone()));
                }
            }
            Partition::Custom => {}
        }
        zones
    }

    /// Total number of seats across all zones.
    pub fn seat_count(&self) -> usize {
        self.zones().iter().map(Zone::len).sum()
    }
}

/// Partition `roster` for `format`.
///
/// `available_width` (pixels) only matters to the theater grid.
pub fn partition(format: LayoutFormat, roster: &LinearRoster, available_width: f32) -> Partition {
    let n = roster.len();
    let result = match format {
        LayoutFormat::Teatro => theater(n, theater_columns(available_width)),
        LayoutFormat::SalaAula => classroom(n),
        LayoutFormat::Conferencia => conference(n),
        LayoutFormat::MesaU => u_table(n),
        LayoutFormat::MesaT => t_table(n),
        LayoutFormat::MesaO => o_table(n),
        LayoutFormat::Recepcao => Partition::Reception {
            clusters: roster.group_ranges().to_vec(),
        },
        LayoutFormat::Buffet => Partition::Buffet {
            tables: roster.group_ranges().to_vec(),
        },
        LayoutFormat::Custom => Partition::Custom,
    };
    log::debug!("partitioned {n} seats for {format}");
    result
}

/// Responsive theater column count for a surface `width` pixels wide.
pub fn theater_columns(width: f32) -> usize {
    match width {
        w if w >= 1024.0 => 5,
        w if w >= 768.0 => 4,
        w if w >= 640.0 => 3,
        _ => 2,
    }
}

pub fn theater(n: usize, columns: usize) -> Partition {
    let columns = columns.max(1);
    Partition::Theater {
        columns,
        rows: rows_of(n, columns),
    }
}

pub fn classroom(n: usize) -> Partition {
    Partition::Classroom {
        rows: rows_of(n, CLASSROOM_COLUMNS),
    }
}

pub fn conference(n: usize) -> Partition {
    Partition::Conference { table: 0..n }
}

/// Left and right get `n / 3` each; the head of the U takes the rest.
pub fn u_table(n: usize) -> Partition {
    let side = n / 3;
    let top = n - 2 * side;
    Partition::UTable {
        left: 0..side,
        top: side..side + top,
        right: side + top..n,
    }
}

/// Head table of `max(6, ceil(0.4 n))` seats, clamped to `n`; the leg
/// takes whatever is left.
pub fn t_table(n: usize) -> Partition {
    let top = T_TABLE_MIN_TOP.max((2 * n).div_ceil(5)).min(n);
    Partition::TTable {
        top: 0..top,
        leg: top..n,
    }
}

/// Top, right and bottom get `n / 4` each; left absorbs the remainder.
pub fn o_table(n: usize) -> Partition {
    let side = n / 4;
    Partition::OTable {
        top: 0..side,
        right: side..2 * side,
        bottom: 2 * side..3 * side,
        left: 3 * side..n,
    }
}

fn rows_of(n: usize, columns: usize) -> Vec<Range<usize>> {
    (0..n)
        .step_by(columns)
        .map(|start| start..(start + columns).min(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Directory, Participant, SeatingGroup};
    use pretty_assertions::assert_eq;

    fn roster_of(n: usize) -> LinearRoster {
        let people = (0..n)
            .map(|i| Participant {
                id: format!("p{i}"),
                name: format!("Person {i}"),
                company: String::new(),
                segment: String::new(),
                score: None,
                is_host: None,
            })
            .collect();
        LinearRoster::from_groups(&Directory::new(people), &[])
    }

    #[test]
    fn u_table_seven() {
        assert_eq!(
            u_table(7),
            Partition::UTable {
                left: 0..2,
                top: 2..5,
                right: 5..7,
            }
        );
    }

    #[test]
    fn o_table_ten() {
        let Partition::OTable {
            top,
            right,
            bottom,
            left,
        } = o_table(10)
        else {
            panic!("expected OTable");
        };
        assert_eq!((top.len(), right.len(), bottom.len()), (2, 2, 2));
        assert_eq!(left, 6..10);
    }

    #[test]
    fn t_table_clamps_head_to_roster() {
        assert_eq!(
            t_table(4),
            Partition::TTable {
                top: 0..4,
                leg: 4..4,
            }
        );
        // ceil(0.4 * 20) = 8
        assert_eq!(
            t_table(20),
            Partition::TTable {
                top: 0..8,
                leg: 8..20,
            }
        );
        // ceil(0.4 * 16) = ceil(6.4) = 7
        assert_eq!(
            t_table(16),
            Partition::TTable {
                top: 0..7,
                leg: 7..16,
            }
        );
    }

    #[test]
    fn classroom_rows_of_four() {
        let Partition::Classroom { rows } = classroom(10) else {
            panic!("expected Classroom");
        };
        assert_eq!(rows, vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn theater_columns_follow_width() {
        assert_eq!(theater_columns(320.0), 2);
        assert_eq!(theater_columns(700.0), 3);
        assert_eq!(theater_columns(800.0), 4);
        assert_eq!(theater_columns(1440.0), 5);
        assert_eq!(theater_columns(f32::NAN), 2);
    }

    #[test]
    fn empty_roster_yields_empty_zones() {
        for format in LayoutFormat::ALL {
            let p = partition(format, &roster_of(0), 1024.0);
            assert_eq!(p.seat_count(), 0, "{format}");
        }
    }

    #[test]
    fn grouped_formats_keep_group_boundaries() {
        let people: Vec<Participant> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| Participant {
                id: id.to_string(),
                name: id.to_uppercase(),
                company: String::new(),
                segment: String::new(),
                score: None,
                is_host: None,
            })
            .collect();
        let dir = Directory::new(people);
        let groups = vec![
            SeatingGroup::from_iter(["a", "b", "c"]),
            SeatingGroup::from_iter(["d", "e"]),
        ];
        let roster = LinearRoster::from_groups(&dir, &groups);

        assert_eq!(
            partition(LayoutFormat::Buffet, &roster, 800.0),
            Partition::Buffet {
                tables: vec![0..3, 3..5],
            }
        );
        let zones = partition(LayoutFormat::Recepcao, &roster, 800.0).zones();
        assert_eq!(zones[1].kind, ZoneKind::Table(1));
        assert_eq!(zones[1].seats, 3..5);
    }

    #[test]
    fn custom_format_has_no_zones() {
        assert!(partition(LayoutFormat::Custom, &roster_of(5), 800.0).zones().is_empty());
    }

    #[test]
    fn zone_json_names_the_side() {
        let zones = u_table(7).zones();
        let json = serde_json::to_value(&zones[0]).unwrap();
        assert_eq!(json["kind"], "left");
        assert_eq!(json["seats"]["start"], 0);
        assert_eq!(json["seats"]["end"], 2);
    }
}
