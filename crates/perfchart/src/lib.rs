#![forbid(unsafe_code)]

//! `perfchart` draws benchmark histories (per-build read/write throughput for six scenarios) as a
//! stack of interactive scatter panels, without a browser.
//!
//! # Features
//!
//! - `render` (default): scales, layout, SVG output and hover interaction (`perfchart::render`)

pub use perfchart_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use perfchart_render::{
        ChartModel, InteractionController, NodeId, PointId, PointState, PointerEvent,
        RenderedChart, Surface, SvgRenderOptions, SvgSurface, TooltipState, build_chart_model,
        render_chart, render_chart_svg,
    };

    use perfchart_core::{ChartConfig, Dataset, RecordSource};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Load(#[from] perfchart_core::Error),
        #[error(transparent)]
        Render(#[from] perfchart_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns an arbitrary string into an `id` token that is safe both as an SVG id and inside
    /// the embedded CSS selectors.
    pub fn sanitize_chart_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }
        if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.insert_str(0, "c-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_end_matches('-');
        if out.is_empty() || out == "c" {
            return "perfchart".to_string();
        }
        out.to_string()
    }

    /// Synchronous model helper (executor-free).
    pub fn chart_model_sync(source: &dyn RecordSource, config: &ChartConfig) -> Result<ChartModel> {
        let dataset = perfchart_core::load_dataset_sync(source, config)?;
        Ok(build_chart_model(&dataset, config))
    }

    pub async fn chart_model(source: &dyn RecordSource, config: &ChartConfig) -> Result<ChartModel> {
        let dataset = perfchart_core::load_dataset(source, config).await?;
        Ok(build_chart_model(&dataset, config))
    }

    pub fn render_dataset_svg(
        dataset: &Dataset,
        config: &ChartConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        Ok(render_chart_svg(dataset, config, svg_options)?)
    }

    /// Synchronous load-then-render helper (executor-free).
    pub fn render_source_to_svg_sync(
        source: &dyn RecordSource,
        config: &ChartConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let dataset = perfchart_core::load_dataset_sync(source, config)?;
        render_dataset_svg(&dataset, config, svg_options)
    }

    /// Loads the whole history, then renders it. A failed load renders nothing.
    pub async fn render_source_to_svg(
        source: &dyn RecordSource,
        config: &ChartConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let dataset = perfchart_core::load_dataset(source, config).await?;
        render_dataset_svg(&dataset, config, svg_options)
    }

    /// Bundles a config and SVG options so integrations pass one value around.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub config: ChartConfig,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: ChartConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_chart_id(mut self, id: &str) -> Self {
            self.svg.chart_id = sanitize_chart_id(id);
            self
        }

        pub fn load_sync(&self, source: &dyn RecordSource) -> Result<Dataset> {
            Ok(perfchart_core::load_dataset_sync(source, &self.config)?)
        }

        pub fn chart_model_sync(&self, source: &dyn RecordSource) -> Result<ChartModel> {
            chart_model_sync(source, &self.config)
        }

        pub fn render_svg_sync(&self, source: &dyn RecordSource) -> Result<String> {
            render_source_to_svg_sync(source, &self.config, &self.svg)
        }

        pub async fn render_svg(&self, source: &dyn RecordSource) -> Result<String> {
            render_source_to_svg(source, &self.config, &self.svg).await
        }
    }
}
