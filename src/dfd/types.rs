use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Shape family an element is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Entity,
    Process,
    Store,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Entity, EntityKind::Process, EntityKind::Store];

    /// Distance from the center to the bottom edge of the drawn shape.
    pub fn half_height(self) -> f32 {
        match self {
            EntityKind::Entity => super::shapes::ENTITY_HEIGHT / 2.0,
            EntityKind::Process => super::shapes::PROCESS_RADIUS,
            EntityKind::Store => super::shapes::STORE_HEIGHT / 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Entity => "External Entity",
            EntityKind::Process => "Process",
            EntityKind::Store => "Data Store",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Entity => "entity",
            EntityKind::Process => "process",
            EntityKind::Store => "store",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entity" | "external_entity" | "external-entity" => Ok(EntityKind::Entity),
            "process" => Ok(EntityKind::Process),
            "store" | "data_store" | "data-store" => Ok(EntityKind::Store),
            other => Err(format!(
                "Unknown element kind '{}' (use entity, process or store)",
                other
            )),
        }
    }
}

/// A directed `source → process → target` relationship between named elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFlow {
    pub source: String,
    pub process: String,
    pub target: String,
}

impl DataFlow {
    pub fn new(
        source: impl Into<String>,
        process: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            process: process.into(),
            target: target.into(),
        }
    }

    pub fn references(&self, name: &str) -> bool {
        self.source == name || self.process == name || self.target == name
    }
}

impl fmt::Display for DataFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} → {}", self.source, self.process, self.target)
    }
}

/// The whole diagram description.
///
/// Names double as references: flows point at elements by display name and
/// nothing checks that those names exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramModel {
    pub external_entities: Vec<String>,
    pub processes: Vec<String>,
    pub data_stores: Vec<String>,
    pub data_flows: Vec<DataFlow>,
    pub deployment: String,
    pub piidata: Vec<String>,
}

impl DiagramModel {
    pub fn elements(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Entity => &self.external_entities,
            EntityKind::Process => &self.processes,
            EntityKind::Store => &self.data_stores,
        }
    }

    pub(crate) fn elements_mut(&mut self, kind: EntityKind) -> &mut Vec<String> {
        match kind {
            EntityKind::Entity => &mut self.external_entities,
            EntityKind::Process => &mut self.processes,
            EntityKind::Store => &mut self.data_stores,
        }
    }
}

/// Where an element landed and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub kind: EntityKind,
}

impl Position {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.kind.half_height()
    }
}

/// A non-fatal irregularity found while parsing or rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A `data_flows` string that is not `N. A → P → B`.
    UnmatchedFlow { index: usize, text: String },
    /// A `null`, array or object where a name was expected.
    NonStringValue { field: &'static str, index: usize },
    /// One leg of a flow names an element that was never placed.
    DanglingReference { flow: usize, name: String },
    /// The same name is declared in two categories.
    NameCollision {
        name: String,
        first: EntityKind,
        second: EntityKind,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnmatchedFlow { index, text } => {
                write!(f, "data flow #{} ignored, expected 'N. A → P → B': {:?}", index, text)
            }
            Warning::NonStringValue { field, index } => {
                write!(f, "{}[{}] is not a name and was ignored", field, index)
            }
            Warning::DanglingReference { flow, name } => {
                write!(f, "data flow #{} references unknown element '{}'", flow, name)
            }
            Warning::NameCollision {
                name,
                first,
                second,
            } => write!(
                f,
                "'{}' is both a {} and a {}; drawn as {}",
                name, first, second, second
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_cli_spellings() {
        assert_eq!("Entity".parse::<EntityKind>(), Ok(EntityKind::Entity));
        assert_eq!("data-store".parse::<EntityKind>(), Ok(EntityKind::Store));
        assert_eq!(" process ".parse::<EntityKind>(), Ok(EntityKind::Process));
        assert!("actor".parse::<EntityKind>().is_err());
    }

    #[test]
    fn flow_display_uses_arrow_glyph() {
        let flow = DataFlow::new("User", "Login", "Sessions");
        assert_eq!(flow.to_string(), "User → Login → Sessions");
        assert!(flow.references("Login"));
        assert!(!flow.references("login"));
    }

    #[test]
    fn bottom_edge_depends_on_shape() {
        let entity = Position { x: 0.0, y: 150.0, kind: EntityKind::Entity };
        let process = Position { x: 0.0, y: 150.0, kind: EntityKind::Process };
        assert_eq!(entity.bottom(), 180.0);
        assert_eq!(process.bottom(), 200.0);
    }
}
