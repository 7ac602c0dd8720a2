use std::sync::Arc;

use super::edit;
use super::parser::parse_dfd;
use super::scene::{RenderReport, render};
use super::surface::Surface;
use super::types::{DiagramModel, EntityKind, Warning};
use crate::theme::DiagramTheme;

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddElement { kind: EntityKind, name: String },
    RemoveElement { kind: EntityKind, name: String },
    AddFlow {
        source: String,
        process: String,
        target: String,
    },
    RemoveFlow { index: usize },
}

impl Edit {
    fn apply(&self, model: &DiagramModel) -> Option<DiagramModel> {
        match self {
            Edit::AddElement { kind, name } => edit::add_element(model, *kind, name),
            Edit::RemoveElement { kind, name } => model
                .elements(*kind)
                .contains(name)
                .then(|| edit::remove_element(model, *kind, name)),
            Edit::AddFlow {
                source,
                process,
                target,
            } => edit::add_data_flow(model, source, process, target),
            Edit::RemoveFlow { index } => edit::remove_data_flow_at(model, *index),
        }
    }
}

/// In-memory editing state: the current diagram snapshot and the last error.
///
/// Snapshots are immutable; every accepted edit swaps in a new `Arc`, so a
/// caller holding [`Workspace::snapshot`] keeps a consistent view.
#[derive(Debug, Default)]
pub struct Workspace {
    model: Option<Arc<DiagramModel>>,
    error: Option<String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> Option<&DiagramModel> {
        self.model.as_deref()
    }

    pub fn snapshot(&self) -> Option<Arc<DiagramModel>> {
        self.model.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Parse `input` and replace the current diagram.
    ///
    /// Blank input is ignored. On failure the current diagram is dropped and
    /// the error is kept for display.
    pub fn load(&mut self, input: &str) -> Result<Vec<Warning>, String> {
        if input.trim().is_empty() {
            log::debug!("ignoring blank diagram input");
            return Ok(Vec::new());
        }

        match parse_dfd(input) {
            Ok(parsed) => {
                self.model = Some(Arc::new(parsed.model));
                self.error = None;
                Ok(parsed.warnings)
            }
            Err(e) => {
                let message = format!("Parse Error: {}", e);
                self.model = None;
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Apply an edit. Returns `false` when there is no diagram or the edit was
    /// rejected, such as removing a name the category does not hold.
    pub fn apply(&mut self, edit: &Edit) -> bool {
        let Some(current) = self.model.as_deref() else {
            return false;
        };

        match edit.apply(current) {
            Some(next) => {
                self.model = Some(Arc::new(next));
                true
            }
            None => {
                log::debug!("edit rejected: {:?}", edit);
                false
            }
        }
    }

    /// Redraw the current diagram onto `surface`.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        theme: &DiagramTheme,
    ) -> Option<RenderReport> {
        let model = self.model.as_deref()?;
        Some(render(surface, model, theme))
    }
}
