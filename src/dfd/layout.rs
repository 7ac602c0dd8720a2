use indexmap::IndexMap;
use indexmap::map::Entry;

use super::types::{DiagramModel, EntityKind, Position, Warning};

/// Horizontal margin on both sides of the three columns.
pub const MARGIN: f32 = 100.0;
/// Center of the first row.
pub const TOP_OFFSET: f32 = 150.0;
pub const ROW_SPACING: f32 = 120.0;

/// Element name → position, in first-insertion order.
pub type LayoutTable = IndexMap<String, Position>;

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub positions: LayoutTable,
    pub warnings: Vec<Warning>,
}

impl Layout {
    pub fn get(&self, name: &str) -> Option<&Position> {
        self.positions.get(name)
    }

    /// Lowest bottom edge of any placed shape, `0.0` when nothing is placed.
    pub fn lowest_bottom(&self) -> f32 {
        self.positions
            .values()
            .map(Position::bottom)
            .fold(0.0, f32::max)
    }
}

/// Column-per-category layout.
///
/// Entities, processes and stores each get a fixed column and stack downward
/// in declaration order. There is no overlap handling: a long column simply
/// runs past the bottom of the canvas.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl LayoutEngine {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
        }
    }

    /// Horizontal center of a category's column.
    pub fn column_x(&self, kind: EntityKind) -> f32 {
        let section_width = (self.canvas_width - 2.0 * MARGIN) / 3.0;
        let offset = match kind {
            EntityKind::Entity => 0.3,
            EntityKind::Process => 1.5,
            EntityKind::Store => 2.7,
        };
        MARGIN + section_width * offset
    }

    pub fn row_y(&self, index: usize) -> f32 {
        TOP_OFFSET + index as f32 * ROW_SPACING
    }

    pub fn layout(&self, model: &DiagramModel) -> Layout {
        let mut positions = LayoutTable::new();
        let mut warnings = Vec::new();

        for kind in EntityKind::ALL {
            let x = self.column_x(kind);
            for (index, name) in model.elements(kind).iter().enumerate() {
                let position = Position {
                    x,
                    y: self.row_y(index),
                    kind,
                };

                match positions.entry(name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(position);
                    }
                    Entry::Occupied(mut slot) => {
                        let previous = slot.insert(position);
                        if previous.kind != kind {
                            warnings.push(Warning::NameCollision {
                                name: name.clone(),
                                first: previous.kind,
                                second: kind,
                            });
                        }
                    }
                }
            }
        }

        log::debug!(
            "laid out {} elements on {}x{} canvas",
            positions.len(),
            self.canvas_width,
            self.canvas_height
        );

        Layout {
            positions,
            warnings,
        }
    }
}
