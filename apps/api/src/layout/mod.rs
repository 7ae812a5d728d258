// Preview layouts: a static template table, a pure renderer producing a
// serializable visual tree, and an HTML writer for the share view.

pub mod html;
pub mod renderer;
pub mod templates;

use serde::Serialize;

use crate::models::resume::LayoutId;

pub use html::render_page;
pub use renderer::{render, Node, VisualTree};
pub use templates::{template, LayoutTemplate, SectionTag, TEMPLATES};

/// One entry of the layout picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOption {
    pub id: LayoutId,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn catalogue() -> Vec<LayoutOption> {
    TEMPLATES
        .iter()
        .map(|t| LayoutOption {
            id: t.id,
            name: t.name,
            description: t.description,
        })
        .collect()
}
