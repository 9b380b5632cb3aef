use crate::Result;
use crate::format::{fmt, fmt_coord};
use crate::model::{ChartModel, PanelModel, build_chart_model};
use crate::surface::{Element, NodeId, Surface};
use crate::svg::SvgRenderOptions;
use perfchart_core::{ChartConfig, Dataset, ScenarioDefinition};
use serde::Serialize;

const TICK_SIZE: f64 = 6.0;
const LEGEND_OFFSET: f64 = -70.0;
const LEGEND_ENTRY_WIDTH: f64 = 120.0;
const PANEL_TITLE_OFFSET: f64 = -20.0;

/// Nodes of one panel's tooltip overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TooltipNodes {
    pub group: NodeId,
    pub rect: NodeId,
    pub text: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPoint {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    /// Idle fill (the branch colour).
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPanel {
    pub scenario: ScenarioDefinition,
    pub group: NodeId,
    pub tooltip: TooltipNodes,
    pub points: Vec<RenderedPoint>,
}

/// Handle to a chart drawn on a surface. Owns no surface state; it only names the nodes the
/// interaction layer is allowed to touch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub svg: NodeId,
    pub emphasis_color: String,
    pub panels: Vec<RenderedPanel>,
}

impl RenderedChart {
    pub fn point_count(&self) -> usize {
        self.panels.iter().map(|p| p.points.len()).sum()
    }
}

/// Builds the chart model for `dataset` and draws it under `container`.
///
/// Drawing twice into the same container duplicates the chart.
pub fn render_chart(
    dataset: &Dataset,
    surface: &mut dyn Surface,
    container: NodeId,
    config: &ChartConfig,
) -> Result<RenderedChart> {
    render_chart_with_options(
        dataset,
        surface,
        container,
        config,
        &SvgRenderOptions::default(),
    )
}

pub fn render_chart_with_options(
    dataset: &Dataset,
    surface: &mut dyn Surface,
    container: NodeId,
    config: &ChartConfig,
    options: &SvgRenderOptions,
) -> Result<RenderedChart> {
    let model = build_chart_model(dataset, config);
    draw_chart(&model, surface, container, options)
}

fn chart_css(chart_id: &str) -> String {
    let id = chart_id;
    let font = r#""trebuchet ms",verdana,arial,sans-serif"#;
    format!(
        "#{id}{{font-family:{font};font-size:12px;}}\
         #{id} .panel-title{{font-size:16px;font-weight:bold;}}\
         #{id} .axis path,#{id} .axis line{{fill:none;stroke:#000;shape-rendering:crispEdges;}}\
         #{id} .axis text{{font-size:11px;}}\
         #{id} .axis-label{{text-anchor:middle;}}\
         #{id} .measurement{{stroke:none;cursor:pointer;}}\
         #{id} .tooltip rect{{fill:white;stroke:#333;opacity:0.9;}}\
         #{id} .legend text{{font-size:12px;}}"
    )
}

/// The imperative half of the pipeline. Only appends to the surface.
pub fn draw_chart(
    model: &ChartModel,
    surface: &mut dyn Surface,
    container: NodeId,
    options: &SvgRenderOptions,
) -> Result<RenderedChart> {
    let layout = &model.layout;
    let svg = surface.append(
        container,
        Element::new("svg")
            .attr("id", options.chart_id.as_str())
            .attr("class", "chart")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("width", fmt(layout.width))
            .attr("height", fmt(layout.height))
            .attr(
                "viewBox",
                format!("0 0 {} {}", fmt(layout.width), fmt(layout.height)),
            ),
    )?;
    if options.include_style {
        surface.append(
            svg,
            Element::new("style").text(chart_css(&options.chart_id)),
        )?;
    }

    let content = surface.append(
        svg,
        Element::new("g").attr("class", "content").attr(
            "transform",
            format!(
                "translate({},{})",
                fmt(layout.origin_x),
                fmt(layout.origin_y)
            ),
        ),
    )?;
    draw_legend(model, surface, content)?;

    let mut panels = Vec::with_capacity(model.panels.len());
    for panel in &model.panels {
        panels.push(draw_panel(model, panel, surface, content)?);
    }

    tracing::debug!(
        panels = panels.len(),
        points = panels.iter().map(|p| p.points.len()).sum::<usize>(),
        "drew chart"
    );
    Ok(RenderedChart {
        svg,
        emphasis_color: model.emphasis_color.clone(),
        panels,
    })
}

fn draw_legend(model: &ChartModel, surface: &mut dyn Surface, parent: NodeId) -> Result<()> {
    let legend = surface.append(
        parent,
        Element::new("g")
            .attr("class", "legend")
            .attr("transform", format!("translate(0,{})", fmt(LEGEND_OFFSET))),
    )?;
    for (i, entry) in model.legend.iter().enumerate() {
        let item = surface.append(
            legend,
            Element::new("g")
                .attr("class", "legend-entry")
                .attr("data-branch", entry.branch.as_str())
                .attr(
                    "transform",
                    format!("translate({},0)", fmt(i as f64 * LEGEND_ENTRY_WIDTH)),
                ),
        )?;
        surface.append(
            item,
            Element::new("rect")
                .attr("width", "12")
                .attr("height", "12")
                .attr("fill", entry.color.as_str()),
        )?;
        surface.append(
            item,
            Element::new("text")
                .attr("x", "18")
                .attr("y", "10")
                .text(entry.branch.as_str()),
        )?;
    }
    Ok(())
}

fn draw_panel(
    model: &ChartModel,
    panel: &PanelModel,
    surface: &mut dyn Surface,
    parent: NodeId,
) -> Result<RenderedPanel> {
    let layout = &model.layout;
    let (w, h) = (layout.panel_width, layout.panel_height);
    let key = panel.scenario.key;

    let group = surface.append(
        parent,
        Element::new("g")
            .attr("class", "panel")
            .attr("data-scenario", key)
            .attr(
                "transform",
                format!("translate(0,{})", fmt(panel.vertical_offset)),
            ),
    )?;
    surface.append(
        group,
        Element::new("text")
            .attr("class", "panel-title")
            .attr("y", fmt(PANEL_TITLE_OFFSET))
            .text(panel.scenario.display_name),
    )?;

    // x axis along the panel bottom
    let x_axis = surface.append(
        group,
        Element::new("g")
            .attr("class", "axis x")
            .attr("transform", format!("translate(0,{})", fmt(h))),
    )?;
    surface.append(
        x_axis,
        Element::new("path")
            .attr("class", "domain")
            .attr("d", format!("M0,{t}V0H{w}V{t}", t = fmt(TICK_SIZE), w = fmt(w))),
    )?;
    for tick in &panel.x_ticks {
        let g = surface.append(
            x_axis,
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate({},0)", fmt(tick.position))),
        )?;
        surface.append(g, Element::new("line").attr("y2", fmt(TICK_SIZE)))?;
        surface.append(
            g,
            Element::new("text")
                .attr("y", fmt(TICK_SIZE + 3.0))
                .attr("dy", "0.71em")
                .attr("text-anchor", "middle")
                .text(tick.label.as_str()),
        )?;
    }

    let y_axis = surface.append(group, Element::new("g").attr("class", "axis y"))?;
    surface.append(
        y_axis,
        Element::new("path")
            .attr("class", "domain")
            .attr("d", format!("M-{t},{h}H0V0H-{t}", t = fmt(TICK_SIZE), h = fmt(h))),
    )?;
    for tick in &panel.y_ticks {
        let g = surface.append(
            y_axis,
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate(0,{})", fmt(tick.position))),
        )?;
        surface.append(g, Element::new("line").attr("x2", fmt(-TICK_SIZE)))?;
        surface.append(
            g,
            Element::new("text")
                .attr("x", fmt(-(TICK_SIZE + 3.0)))
                .attr("dy", "0.32em")
                .attr("text-anchor", "end")
                .text(tick.label.as_str()),
        )?;
    }
    surface.append(
        group,
        Element::new("text")
            .attr("class", "axis-label y")
            .attr(
                "transform",
                format!(
                    "translate({},{}) rotate(-90)",
                    fmt(-(layout.origin_x * 2.0 / 3.0)),
                    fmt(h / 2.0)
                ),
            )
            .text(model.value_axis_label.as_str()),
    )?;

    let points_group = surface.append(group, Element::new("g").attr("class", "points"))?;
    let mut points = Vec::with_capacity(panel.points.len());
    for p in &panel.points {
        let mut circle = Element::new("circle")
            .attr("class", "measurement")
            .attr("cx", fmt_coord(p.x))
            .attr("cy", fmt_coord(p.y))
            .attr("r", fmt(model.point_radius))
            .attr("fill", p.color.as_str())
            .attr("data-fill", p.color.as_str())
            .attr("data-emphasis", model.emphasis_color.as_str())
            .attr("data-label", p.tooltip.as_str())
            .attr("data-tooltip", key);
        if let Some(branch) = &p.branch {
            circle = circle.attr("data-branch", branch.as_str());
        }
        let node = surface.append(points_group, circle)?;
        points.push(RenderedPoint {
            node,
            x: p.x,
            y: p.y,
            color: p.color.clone(),
            label: p.tooltip.clone(),
        });
    }

    // Drawn last so it stays above the points.
    let tooltip_group = surface.append(
        group,
        Element::new("g")
            .attr("class", "tooltip")
            .attr("data-scenario", key)
            .attr("visibility", "hidden")
            .attr("pointer-events", "none"),
    )?;
    let rect = surface.append(
        tooltip_group,
        Element::new("rect")
            .attr("x", "8")
            .attr("y", "-26")
            .attr("rx", "3")
            .attr("width", "0")
            .attr("height", "20"),
    )?;
    let text = surface.append(
        tooltip_group,
        Element::new("text").attr("x", "14").attr("y", "-12"),
    )?;

    Ok(RenderedPanel {
        scenario: panel.scenario,
        group,
        tooltip: TooltipNodes {
            group: tooltip_group,
            rect,
            text,
        },
        points,
    })
}
