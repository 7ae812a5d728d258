use axum::Json;
use serde::Serialize;

use crate::layout::{catalogue, LayoutOption};
use crate::models::resume::{DEFAULT_THEME_COLOR, THEME_PALETTE};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationOptions {
    pub layouts: Vec<LayoutOption>,
    pub theme_palette: &'static [&'static str],
    pub default_theme_color: &'static str,
}

/// GET /api/v1/layouts
pub async fn handle_list_layouts() -> Json<PresentationOptions> {
    Json(PresentationOptions {
        layouts: catalogue(),
        theme_palette: THEME_PALETTE,
        default_theme_color: DEFAULT_THEME_COLOR,
    })
}
