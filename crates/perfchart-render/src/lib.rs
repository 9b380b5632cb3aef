#![forbid(unsafe_code)]

//! Headless chart construction for benchmark histories: per-scenario scales, stacked panel
//! layout, an eager chart model, drawing onto a [`Surface`] and hover interaction.

pub mod color;
pub mod format;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod panel;
pub mod scale;
pub mod surface;
pub mod svg;

pub use color::{BranchPalette, UNKNOWN_BRANCH_COLOR};
pub use format::{format_timestamp, format_value, tooltip_label};
pub use interaction::{
    InteractionController, PointId, PointState, PointerEvent, TooltipState, embed_hover_script,
};
pub use layout::{ChartLayout, PanelLayout, layout_for_config, layout_panels};
pub use model::{ChartModel, LegendEntry, PanelModel, PointModel, TickModel, build_chart_model};
pub use panel::{
    RenderedChart, RenderedPanel, RenderedPoint, TooltipNodes, draw_chart, render_chart,
    render_chart_with_options,
};
pub use scale::{ChartScales, LinearScale, TimeScale, build_scales, nice_ticks};
pub use surface::{Element, NodeId, Surface, SvgSurface};
pub use svg::{SvgRenderOptions, render_chart_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("surface has no node {0:?}")]
    UnknownNode(NodeId),
    #[error("chart has no point {0:?}")]
    UnknownPoint(PointId),
}

pub type Result<T> = std::result::Result<T, Error>;
