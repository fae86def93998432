//! Data model for seating arrangements.
//!
//! Participants are owned by the [`Directory`] and never mutated here.
//! Everything that lays them out refers to a participant by its position
//! in the [`LinearRoster`], the flattened order of the seating groups.
//! Free-form canvas items are [`CustomObject`]s whose per-type shape data
//! lives in the tagged [`ObjectKind`].

use crate::error::SeatError;
use crate::id::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Rendered diameter of a seat, in canvas pixels.
pub const SEAT_DIAMETER: f32 = 40.0;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, each channel in [0.0, 1.0]. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize, len: usize| -> Option<f32> {
            let v = u8::from_str_radix(&hex[i..i + len], 16).ok()?;
            let v = if len == 1 { v * 17 } else { v };
            Some(v as f32 / 255.0)
        };
        match hex.len() {
            3 => Some(Self::rgba(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 1.0)),
            6 => Some(Self::rgba(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 1.0)),
            8 => Some(Self::rgba(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Participants ────────────────────────────────────────────────────────

/// One attendee, as supplied by the participant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub segment: String,
    /// Synergy score, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_host: Option<bool>,
}

impl Participant {
    pub fn is_host(&self) -> bool {
        self.is_host.unwrap_or(false)
    }

    /// Up to two uppercase initials from the participant's name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// An externally supplied cluster of participant ids destined for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatingGroup(pub Vec<String>);

impl SeatingGroup {
    pub fn members(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for SeatingGroup {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The precomputed result handed over by the scoring collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub suggested_layout: LayoutFormat,
    #[serde(default)]
    pub seating_groups: Vec<SeatingGroup>,
}

impl ScoringResult {
    pub fn from_json(json: &str) -> Result<Self, SeatError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read-only participant lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    participants: Vec<Participant>,
    by_id: HashMap<String, usize>,
}

impl Directory {
    /// Build the directory. A repeated id keeps its first occurrence.
    pub fn new(participants: Vec<Participant>) -> Self {
        let mut by_id = HashMap::with_capacity(participants.len());
        let mut kept = Vec::with_capacity(participants.len());
        for p in participants {
            if by_id.contains_key(&p.id) {
                log::warn!("duplicate participant id {:?} ignored", p.id);
                continue;
            }
            by_id.insert(p.id.clone(), kept.len());
            kept.push(p);
        }
        Self {
            participants: kept,
            by_id,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.position(id).map(|i| &self.participants[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn at(&self, position: usize) -> Option<&Participant> {
        self.participants.get(position)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }
}

/// Seating groups flattened into one ordered sequence.
///
/// Each slot holds a directory position. Slot order equals the
/// concatenation order of the groups, minus ids the directory cannot
/// resolve. Groups stay recoverable as contiguous slot ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearRoster {
    slots: Vec<usize>,
    groups: Vec<Range<usize>>,
}

impl LinearRoster {
    /// Flatten `groups` against `directory`.
    ///
    /// With no groups at all, the roster is the directory order and
    /// counts as a single group.
    pub fn from_groups(directory: &Directory, groups: &[SeatingGroup]) -> Self {
        if groups.is_empty() {
            let slots: Vec<usize> = (0..directory.len()).collect();
            let groups = if slots.is_empty() {
                Vec::new()
            } else {
                vec![0..slots.len()]
            };
            return Self { slots, groups };
        }

        let mut slots = Vec::new();
        let mut ranges = Vec::with_capacity(groups.len());
        for group in groups {
            let start = slots.len();
            for id in group.members() {
                match directory.position(id) {
                    Some(pos) => slots.push(pos),
                    None => log::warn!("seating group references unknown participant {id:?}"),
                }
            }
            if slots.len() > start {
                ranges.push(start..slots.len());
            }
        }
        Self {
            slots,
            groups: ranges,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Directory position of roster slot `index`.
    pub fn slot(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    /// The participant seated at roster slot `index`.
    pub fn participant<'d>(
        &self,
        directory: &'d Directory,
        index: usize,
    ) -> Option<&'d Participant> {
        self.slot(index).and_then(|pos| directory.at(pos))
    }

    /// Non-empty seating groups as contiguous roster ranges.
    pub fn group_ranges(&self) -> &[Range<usize>] {
        &self.groups
    }
}

// ─── Layout formats ──────────────────────────────────────────────────────

/// The nine room formats. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFormat {
    /// Theater: responsive grid facing a stage.
    #[default]
    Teatro,
    /// Classroom: rows of four.
    SalaAula,
    /// Hollow square.
    MesaO,
    /// One conference table.
    Conferencia,
    MesaU,
    MesaT,
    /// Reception: one cluster per seating group.
    Recepcao,
    /// Buffet: one round table per seating group.
    Buffet,
    /// Free-form canvas.
    Custom,
}

impl LayoutFormat {
    pub const ALL: [LayoutFormat; 9] = [
        LayoutFormat::Teatro,
        LayoutFormat::SalaAula,
        LayoutFormat::MesaO,
        LayoutFormat::Conferencia,
        LayoutFormat::MesaU,
        LayoutFormat::MesaT,
        LayoutFormat::Recepcao,
        LayoutFormat::Buffet,
        LayoutFormat::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutFormat::Teatro => "teatro",
            LayoutFormat::SalaAula => "sala_aula",
            LayoutFormat::MesaO => "mesa_o",
            LayoutFormat::Conferencia => "conferencia",
            LayoutFormat::MesaU => "mesa_u",
            LayoutFormat::MesaT => "mesa_t",
            LayoutFormat::Recepcao => "recepcao",
            LayoutFormat::Buffet => "buffet",
            LayoutFormat::Custom => "custom",
        }
    }

    /// Human-readable name for pickers and document captions.
    pub fn label(self) -> &'static str {
        match self {
            LayoutFormat::Teatro => "Theater",
            LayoutFormat::SalaAula => "Classroom",
            LayoutFormat::MesaO => "O-shaped table",
            LayoutFormat::Conferencia => "Conference table",
            LayoutFormat::MesaU => "U-shaped table",
            LayoutFormat::MesaT => "T-shaped table",
            LayoutFormat::Recepcao => "Reception",
            LayoutFormat::Buffet => "Buffet",
            LayoutFormat::Custom => "Custom",
        }
    }
}

impl fmt::Display for LayoutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutFormat {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SeatError::UnknownFormat(s.to_string()))
    }
}

// ─── Canvas objects ──────────────────────────────────────────────────────

/// The placeable object types; also the set of placement tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Seat,
    TableRound,
    TableRect,
    Stage,
    Plant,
}

impl ObjectType {
    pub const ALL: [ObjectType; 5] = [
        ObjectType::Seat,
        ObjectType::TableRound,
        ObjectType::TableRect,
        ObjectType::Stage,
        ObjectType::Plant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Seat => "seat",
            ObjectType::TableRound => "table_round",
            ObjectType::TableRect => "table_rect",
            ObjectType::Stage => "stage",
            ObjectType::Plant => "plant",
        }
    }
}

impl FromStr for ObjectType {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SeatError::UnknownObjectType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeTag {
    Circle,
    Square,
    Rounded,
}

/// Size and look of a furniture or decoration item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    /// Pixels.
    pub width: f32,
    /// Pixels.
    pub height: f32,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f32,
    pub shape: ShapeTag,
    pub color: Color,
}

impl Footprint {
    const fn new(width: f32, height: f32, shape: ShapeTag, color: Color) -> Self {
        Self {
            width,
            height,
            rotation: 0.0,
            shape,
            color,
        }
    }
}

/// Per-type payload of a [`CustomObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// A seat bound to a roster slot. Always circular, no fixed size.
    Seat {
        #[serde(rename = "participantIndex")]
        participant_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
    },
    TableRound(Footprint),
    TableRect(Footprint),
    Stage(Footprint),
    Plant(Footprint),
}

impl ObjectKind {
    pub fn seat(participant_index: usize) -> Self {
        ObjectKind::Seat {
            participant_index,
            color: None,
        }
    }

    /// Default payload for a furniture type; `None` for seats, which
    /// need a roster slot.
    pub fn furniture(ty: ObjectType) -> Option<Self> {
        let kind = match ty {
            ObjectType::Seat => return None,
            ObjectType::TableRound => ObjectKind::TableRound(Footprint::new(
                80.0,
                80.0,
                ShapeTag::Circle,
                Color::rgb8(0xD6, 0xC3, 0xA5),
            )),
            ObjectType::TableRect => ObjectKind::TableRect(Footprint::new(
                100.0,
                60.0,
                ShapeTag::Rounded,
                Color::rgb8(0xD6, 0xC3, 0xA5),
            )),
            ObjectType::Stage => ObjectKind::Stage(Footprint::new(
                200.0,
                80.0,
                ShapeTag::Square,
                Color::rgb8(0x4B, 0x55, 0x63),
            )),
            ObjectType::Plant => ObjectKind::Plant(Footprint::new(
                40.0,
                40.0,
                ShapeTag::Circle,
                Color::rgb8(0x22, 0xC5, 0x5E),
            )),
        };
        Some(kind)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectKind::Seat { .. } => ObjectType::Seat,
            ObjectKind::TableRound(_) => ObjectType::TableRound,
            ObjectKind::TableRect(_) => ObjectType::TableRect,
            ObjectKind::Stage(_) => ObjectType::Stage,
            ObjectKind::Plant(_) => ObjectType::Plant,
        }
    }

    pub fn participant_index(&self) -> Option<usize> {
        match self {
            ObjectKind::Seat {
                participant_index, ..
            } => Some(*participant_index),
            _ => None,
        }
    }

    pub fn footprint(&self) -> Option<&Footprint> {
        match self {
            ObjectKind::Seat { .. } => None,
            ObjectKind::TableRound(f)
            | ObjectKind::TableRect(f)
            | ObjectKind::Stage(f)
            | ObjectKind::Plant(f) => Some(f),
        }
    }

    /// Pixel size on the canvas.
    pub fn size(&self) -> (f32, f32) {
        self.footprint()
            .map(|f| (f.width, f.height))
            .unwrap_or((SEAT_DIAMETER, SEAT_DIAMETER))
    }
}

/// A free-form item placed on the custom canvas.
///
/// `x`/`y` are the item's center as a percentage (0..=100) of the canvas
/// bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomObject {
    pub id: ObjectId,
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl CustomObject {
    /// Create an object with a freshly generated id. The position is
    /// clamped into the canvas.
    pub fn new(kind: ObjectKind, x: f32, y: f32) -> Self {
        let id = ObjectId::generate(kind.object_type().as_str());
        Self {
            id,
            x: clamp_percent(x),
            y: clamp_percent(y),
            kind,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }
}

/// Clamp a normalized coordinate into [0, 100]. NaN maps to 0.
pub fn clamp_percent(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person(id: &str, name: &str) -> Participant {
        Participant {
            id: id.into(),
            name: name.into(),
            company: "Acme".into(),
            segment: "tech".into(),
            score: None,
            is_host: None,
        }
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#D6C3A5").unwrap();
        assert_eq!(c.to_hex(), "#D6C3A5");
        assert_eq!(Color::from_hex("fff").unwrap().to_hex(), "#FFFFFF");
        assert_eq!(Color::from_hex("#00000080").unwrap().to_hex(), "#00000080");
        assert!(Color::from_hex("#12").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn format_tags_parse_and_print() {
        for format in LayoutFormat::ALL {
            assert_eq!(format.as_str().parse::<LayoutFormat>().unwrap(), format);
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
        assert!("banquet".parse::<LayoutFormat>().is_err());
    }

    #[test]
    fn roster_concatenates_groups_and_skips_unknown_ids() {
        let dir = Directory::new(vec![
            person("a", "Ana"),
            person("b", "Bruno"),
            person("c", "Carla"),
            person("d", "Davi"),
        ]);
        let groups = vec![
            SeatingGroup::from_iter(["c", "ghost", "a"]),
            SeatingGroup::from_iter(["nobody"]),
            SeatingGroup::from_iter(["d", "b"]),
        ];
        let roster = LinearRoster::from_groups(&dir, &groups);

        let ids: Vec<&str> = (0..roster.len())
            .map(|i| roster.participant(&dir, i).unwrap().id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
        assert_eq!(roster.group_ranges(), &[0..2, 2..4]);
    }

    #[test]
    fn roster_without_groups_uses_directory_order() {
        let dir = Directory::new(vec![person("a", "Ana"), person("b", "Bruno")]);
        let roster = LinearRoster::from_groups(&dir, &[]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.slot(1), Some(1));
        assert_eq!(roster.group_ranges(), &[0..2]);

        let empty = LinearRoster::from_groups(&Directory::default(), &[]);
        assert!(empty.is_empty());
        assert!(empty.group_ranges().is_empty());
    }

    #[test]
    fn duplicate_directory_ids_keep_first() {
        let dir = Directory::new(vec![person("a", "Ana"), person("a", "Impostor")]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("a").unwrap().name, "Ana");
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(person("x", "maria da silva").initials(), "MD");
        assert_eq!(person("x", "Zé").initials(), "Z");
        assert_eq!(person("x", "").initials(), "");
    }

    #[test]
    fn furniture_defaults_by_type() {
        let round = ObjectKind::furniture(ObjectType::TableRound).unwrap();
        assert_eq!(round.size(), (80.0, 80.0));
        assert_eq!(round.footprint().unwrap().shape, ShapeTag::Circle);
        assert_eq!(
            ObjectKind::furniture(ObjectType::TableRect).unwrap().size(),
            (100.0, 60.0)
        );
        assert_eq!(
            ObjectKind::furniture(ObjectType::Stage).unwrap().size(),
            (200.0, 80.0)
        );
        assert!(ObjectKind::furniture(ObjectType::Seat).is_none());
        assert_eq!(ObjectKind::seat(3).participant_index(), Some(3));
        assert!(ObjectKind::seat(3).footprint().is_none());
    }

    #[test]
    fn custom_object_json_is_tagged_by_type() {
        let seat = CustomObject::new(ObjectKind::seat(2), 150.0, -4.0);
        assert_eq!((seat.x, seat.y), (100.0, 0.0));

        let json = serde_json::to_value(&seat).unwrap();
        assert_eq!(json["type"], "seat");
        assert_eq!(json["participantIndex"], 2);

        let stage =
            CustomObject::new(ObjectKind::furniture(ObjectType::Stage).unwrap(), 50.0, 10.0);
        let json = serde_json::to_string(&stage).unwrap();
        let back: CustomObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stage);
    }

    #[test]
    fn scoring_result_reads_camel_case() {
        let json = r#"{
            "participants": [
                {"id": "p1", "name": "Ana", "company": "X", "segment": "tech", "score": 88, "isHost": true}
            ],
            "suggestedLayout": "mesa_u",
            "seatingGroups": [["p1"]],
            "connections": []
        }"#;
        let result = ScoringResult::from_json(json).unwrap();
        assert_eq!(result.suggested_layout, LayoutFormat::MesaU);
        assert_eq!(result.participants[0].score, Some(88));
        assert!(result.participants[0].is_host());
        assert_eq!(result.seating_groups[0].members(), &["p1".to_string()]);
    }
}
