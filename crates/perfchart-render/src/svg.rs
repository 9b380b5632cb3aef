use crate::Result;
use crate::interaction::embed_hover_script;
use crate::panel::render_chart_with_options;
use crate::surface::{Surface, SvgSurface};
use perfchart_core::{ChartConfig, Dataset};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// `id` of the root `<svg>`; also scopes the embedded CSS.
    pub chart_id: String,
    /// When true, embed the chart stylesheet.
    pub include_style: bool,
    /// When true, embed a script that reproduces the hover behaviour in a browser.
    pub include_hover_script: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            chart_id: "perfchart".to_string(),
            include_style: true,
            include_hover_script: true,
        }
    }
}

/// Renders `dataset` into a standalone SVG document.
pub fn render_chart_svg(
    dataset: &Dataset,
    config: &ChartConfig,
    options: &SvgRenderOptions,
) -> Result<String> {
    let mut surface = SvgSurface::new();
    let root = surface.root();
    let chart = render_chart_with_options(dataset, &mut surface, root, config, options)?;
    if options.include_hover_script {
        embed_hover_script(&mut surface, &chart, &options.chart_id)?;
    }
    Ok(surface.to_svg_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dataset_still_renders_six_panels() {
        let svg = render_chart_svg(
            &Dataset::default(),
            &ChartConfig::default(),
            &SvgRenderOptions::default(),
        )
        .unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="panel""#).count(), 6);
        assert!(!svg.contains("<circle"));
        assert!(svg.contains(r#"viewBox="0 0 1250 3400""#));
    }

    #[test]
    fn script_is_optional() {
        let with = render_chart_svg(
            &Dataset::default(),
            &ChartConfig::default(),
            &SvgRenderOptions::default(),
        )
        .unwrap();
        let without = render_chart_svg(
            &Dataset::default(),
            &ChartConfig::default(),
            &SvgRenderOptions {
                include_hover_script: false,
                ..SvgRenderOptions::default()
            },
        )
        .unwrap();
        assert!(with.contains("<script"));
        assert!(with.contains(r#"getElementById("perfchart")"#));
        assert!(!without.contains("<script"));
    }
}
