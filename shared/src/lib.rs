use std::fmt;

use serde::{Deserialize, Serialize};

pub mod geometry;
mod figure_file;

pub use figure_file::{decode_figure_file, encode_figure_file, FigureFileError};

pub const DEFAULT_COLOR: &str = "#000";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Figure identifier. Saved boards from older clients carry numeric ids,
/// which are read back as their decimal text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "RawFigureId", into = "String")]
pub struct FigureId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFigureId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawFigureId> for FigureId {
    fn from(raw: RawFigureId) -> Self {
        match raw {
            RawFigureId::Text(text) => Self(text),
            RawFigureId::Integer(value) => Self(value.to_string()),
            RawFigureId::Float(value) => Self(value.to_string()),
        }
    }
}

impl FigureId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<FigureId> for String {
    fn from(id: FigureId) -> Self {
        id.0
    }
}

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Figure {
    pub id: FigureId,
    #[serde(rename = "rgb")]
    pub color: String,
    #[serde(rename = "lines", default)]
    pub segments: Vec<Segment>,
}

impl Figure {
    pub fn new(id: FigureId, color: impl Into<String>) -> Self {
        Self {
            id,
            color: color.into(),
            segments: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum BoardCommand {
    #[serde(rename = "figure:new")]
    NewFigure {
        #[serde(default)]
        id: Option<FigureId>,
        #[serde(default)]
        rgb: Option<String>,
    },
    #[serde(rename = "segment:append")]
    AppendSegment { figure: FigureId, segment: Segment },
    #[serde(rename = "figure:recolor")]
    Recolor { figure: FigureId, rgb: String },
    #[serde(rename = "figure:remove")]
    RemoveFigure { figure: FigureId },
    #[serde(rename = "clear")]
    Clear,
    #[serde(rename = "load")]
    Load { figures: Vec<Figure> },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum BoardEvent {
    #[serde(rename = "sync")]
    Synced { figures: Vec<Figure> },
    #[serde(rename = "figure:added")]
    FigureAdded { id: FigureId, rgb: String },
    #[serde(rename = "segment:appended")]
    SegmentAppended { figure: FigureId, segment: Segment },
    #[serde(rename = "figure:recolored")]
    FigureRecolored { figure: FigureId, rgb: String },
    #[serde(rename = "figure:removed")]
    FigureRemoved { figure: FigureId },
    #[serde(rename = "clear")]
    Cleared,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HitResponse {
    pub inside: bool,
    pub figure: Option<FigureId>,
}
