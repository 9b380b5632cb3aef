//! Hover behaviour for rendered points.
//!
//! Every point is either idle (branch colour) or hovered (emphasis colour). Each panel has one
//! tooltip, owned by the point that last entered it. The controller only rewrites attributes and
//! text of nodes the renderer created; it never appends or removes elements.

use crate::format::{fmt, fmt_coord};
use crate::panel::{RenderedChart, RenderedPoint, TooltipNodes};
use crate::surface::{Element, NodeId, Surface};
use crate::{Error, Result};
use serde::Serialize;

/// Approximate glyph advance used to size the tooltip background.
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;
const TOOLTIP_PADDING: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PointId {
    pub panel: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PointState {
    #[default]
    Idle,
    Hovered,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TooltipState {
    pub visible: bool,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter(PointId),
    Leave(PointId),
}

#[derive(Debug, Clone)]
struct PanelBinding {
    scenario: &'static str,
    tooltip: TooltipNodes,
    points: Vec<RenderedPoint>,
    states: Vec<PointState>,
    owner: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    emphasis_color: String,
    panels: Vec<PanelBinding>,
}

fn tooltip_width(label: &str) -> f64 {
    label.chars().count() as f64 * TOOLTIP_CHAR_WIDTH + TOOLTIP_PADDING
}

impl InteractionController {
    pub fn new(chart: &RenderedChart) -> Self {
        Self::with_emphasis(chart, &chart.emphasis_color)
    }

    pub fn with_emphasis(chart: &RenderedChart, emphasis_color: &str) -> Self {
        let panels = chart
            .panels
            .iter()
            .map(|p| PanelBinding {
                scenario: p.scenario.key,
                tooltip: p.tooltip,
                points: p.points.clone(),
                states: vec![PointState::Idle; p.points.len()],
                owner: None,
            })
            .collect();
        Self {
            emphasis_color: emphasis_color.to_string(),
            panels,
        }
    }

    /// All point ids, panel by panel.
    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.panels.iter().enumerate().flat_map(|(panel, binding)| {
            (0..binding.points.len()).map(move |index| PointId { panel, index })
        })
    }

    pub fn point_at(&self, panel: usize, index: usize) -> Option<PointId> {
        let binding = self.panels.get(panel)?;
        (index < binding.points.len()).then_some(PointId { panel, index })
    }

    /// Resolves a surface node back to the point drawn on it.
    pub fn point_for_node(&self, node: NodeId) -> Option<PointId> {
        self.panels.iter().enumerate().find_map(|(panel, binding)| {
            binding
                .points
                .iter()
                .position(|p| p.node == node)
                .map(|index| PointId { panel, index })
        })
    }

    pub fn point_state(&self, id: PointId) -> Option<PointState> {
        self.panels.get(id.panel)?.states.get(id.index).copied()
    }

    pub fn tooltip_state(&self, panel: usize) -> Option<TooltipState> {
        let binding = self.panels.get(panel)?;
        Some(match binding.owner {
            Some(owner) => TooltipState {
                visible: true,
                label: Some(binding.points[owner].label.clone()),
            },
            None => TooltipState::default(),
        })
    }

    pub fn tooltip_state_for(&self, scenario_key: &str) -> Option<TooltipState> {
        let panel = self.panels.iter().position(|p| p.scenario == scenario_key)?;
        self.tooltip_state(panel)
    }

    pub fn dispatch(&mut self, surface: &mut dyn Surface, event: PointerEvent) -> Result<()> {
        match event {
            PointerEvent::Enter(id) => self.pointer_enter(surface, id),
            PointerEvent::Leave(id) => self.pointer_leave(surface, id),
        }
    }

    /// idle → hovered. Entering a point that is already hovered changes nothing.
    pub fn pointer_enter(&mut self, surface: &mut dyn Surface, id: PointId) -> Result<()> {
        let binding = self
            .panels
            .get_mut(id.panel)
            .ok_or(Error::UnknownPoint(id))?;
        let state = binding
            .states
            .get_mut(id.index)
            .ok_or(Error::UnknownPoint(id))?;
        if *state == PointState::Hovered {
            return Ok(());
        }
        let point = &binding.points[id.index];
        let tooltip = binding.tooltip;

        surface.set_attr(point.node, "fill", &self.emphasis_color)?;
        surface.set_attr(
            tooltip.group,
            "transform",
            &format!(
                "translate({},{})",
                fmt_coord(point.x),
                fmt_coord(point.y)
            ),
        )?;
        surface.set_text(tooltip.text, &point.label)?;
        surface.set_attr(
            tooltip.rect,
            "width",
            &fmt(tooltip_width(&point.label)),
        )?;
        surface.set_attr(tooltip.group, "visibility", "visible")?;

        *state = PointState::Hovered;
        binding.owner = Some(id.index);
        tracing::trace!(
            scenario = binding.scenario,
            point = id.index,
            "pointer enter"
        );
        Ok(())
    }

    /// hovered → idle. Restores the branch colour and hides the tooltip if this point owns it.
    pub fn pointer_leave(&mut self, surface: &mut dyn Surface, id: PointId) -> Result<()> {
        let binding = self
            .panels
            .get_mut(id.panel)
            .ok_or(Error::UnknownPoint(id))?;
        let state = binding
            .states
            .get_mut(id.index)
            .ok_or(Error::UnknownPoint(id))?;
        if *state == PointState::Idle {
            return Ok(());
        }
        let point = &binding.points[id.index];
        surface.set_attr(point.node, "fill", &point.color)?;
        *state = PointState::Idle;

        if binding.owner == Some(id.index) {
            surface.set_attr(binding.tooltip.group, "visibility", "hidden")?;
            binding.owner = None;
        }
        tracing::trace!(
            scenario = binding.scenario,
            point = id.index,
            "pointer leave"
        );
        Ok(())
    }
}

const HOVER_SCRIPT: &str = r#"(function () {
  var svg = document.getElementById(CHART_ID);
  if (!svg) { return; }
  var points = svg.querySelectorAll('circle.measurement');
  Array.prototype.forEach.call(points, function (c) {
    var tip = svg.querySelector('g.tooltip[data-scenario="' + c.getAttribute('data-tooltip') + '"]');
    c.addEventListener('mouseenter', function () {
      c.setAttribute('fill', c.getAttribute('data-emphasis'));
      if (!tip) { return; }
      var label = c.getAttribute('data-label') || '';
      tip.setAttribute('transform', 'translate(' + c.getAttribute('cx') + ',' + c.getAttribute('cy') + ')');
      tip.querySelector('text').textContent = label;
      tip.querySelector('rect').setAttribute('width', Array.from(label).length * 7 + 12);
      tip.setAttribute('visibility', 'visible');
      tip.__owner = c;
    });
    c.addEventListener('mouseleave', function () {
      c.setAttribute('fill', c.getAttribute('data-fill'));
      if (tip && tip.__owner === c) {
        tip.setAttribute('visibility', 'hidden');
        tip.__owner = null;
      }
    });
  });
})();"#;

fn js_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '<' => out.push_str("\\u003c"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Appends a script that replays the controller's transitions in a browser, driven by the
/// `data-*` attributes the renderer puts on every point.
pub fn embed_hover_script(
    surface: &mut dyn Surface,
    chart: &RenderedChart,
    chart_id: &str,
) -> Result<NodeId> {
    let script = HOVER_SCRIPT.replace("CHART_ID", &js_string_literal(chart_id));
    surface.append(
        chart.svg,
        Element::new("script")
            .attr("type", "application/ecmascript")
            .cdata(script),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_width_tracks_label_length() {
        assert_eq!(tooltip_width(""), 12.0);
        assert_eq!(tooltip_width("02-01 10:00 [main] 6"), 20.0 * 7.0 + 12.0);
    }

    #[test]
    fn tooltip_width_counts_code_points_like_the_script() {
        // Four code points, one of them outside the BMP (two UTF-16 units in a browser).
        assert_eq!(tooltip_width("é🚀ab"), 4.0 * 7.0 + 12.0);
        assert!(HOVER_SCRIPT.contains("Array.from(label).length * 7 + 12"));
        assert!(!HOVER_SCRIPT.contains("label.length"));
    }

    #[test]
    fn chart_id_is_quoted_for_the_script() {
        assert_eq!(js_string_literal("perfchart"), "\"perfchart\"");
        assert_eq!(js_string_literal("a\"b\\</"), "\"a\\\"b\\\\\\u003c/\"");
    }
}
