mod connector;
mod edit;
mod layout;
mod parser;
mod scene;
mod shapes;
mod surface;
mod types;
mod workspace;

pub use connector::{ARROW_HEAD_LENGTH, ArrowGeometry, ENDPOINT_OFFSET, draw_arrow};
pub use edit::{Summary, add_data_flow, add_element, all_elements, remove_data_flow_at, remove_element};
pub use layout::{Layout, LayoutEngine, LayoutTable};
pub use parser::{FEATURES_KEY, Parsed, parse_dfd, parse_flow};
pub use scene::{RenderReport, legend_top, render};
pub use shapes::{draw_shape, wrap_text};
pub use surface::{Canvas, DrawOp, Font, Stroke, Surface, TextAlign, TextBaseline, TextStyle};
pub use types::{DataFlow, DiagramModel, EntityKind, Point, Position, Warning};
pub use workspace::{Edit, Workspace};
