use perfchart_core::{ChartConfig, Margins};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelLayout {
    pub index: usize,
    /// Offset of the panel's top edge from the top of the plotting area.
    pub vertical_offset: f64,
}

/// Overall drawing box plus the stacked panel offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Translation of the plotting area inside the drawing box (left and top margins).
    pub origin_x: f64,
    pub origin_y: f64,
    pub panel_width: f64,
    pub panel_height: f64,
    pub panels: Vec<PanelLayout>,
}

/// Stacks `panel_count` panels vertically. Depends only on the count and the size constants.
pub fn layout_panels(
    panel_count: usize,
    panel_width: f64,
    panel_height: f64,
    margins: &Margins,
) -> ChartLayout {
    let stride = panel_height + margins.between;
    let stacked = if panel_count == 0 {
        0.0
    } else {
        panel_count as f64 * stride - margins.between
    };

    ChartLayout {
        width: panel_width + margins.left + margins.right,
        height: stacked + margins.top + margins.bottom,
        origin_x: margins.left,
        origin_y: margins.top,
        panel_width,
        panel_height,
        panels: (0..panel_count)
            .map(|index| PanelLayout {
                index,
                vertical_offset: index as f64 * stride,
            })
            .collect(),
    }
}

pub fn layout_for_config(panel_count: usize, config: &ChartConfig) -> ChartLayout {
    layout_panels(
        panel_count,
        config.panel_width,
        config.panel_height,
        &config.margins,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_panels_with_default_margins() {
        let layout = layout_for_config(6, &ChartConfig::default());
        assert_eq!(layout.height, 3400.0);
        assert_eq!(layout.width, 1000.0 + 150.0 + 100.0);
        let offsets: Vec<f64> = layout.panels.iter().map(|p| p.vertical_offset).collect();
        assert_eq!(offsets, [0.0, 550.0, 1100.0, 1650.0, 2200.0, 2750.0]);
    }

    #[test]
    fn panels_never_overlap() {
        let margins = Margins {
            between: 0.0,
            ..Margins::default()
        };
        let layout = layout_panels(4, 300.0, 200.0, &margins);
        for pair in layout.panels.windows(2) {
            assert!(pair[1].vertical_offset >= pair[0].vertical_offset + layout.panel_height);
        }
        let last = layout.panels.last().unwrap();
        assert_eq!(
            layout.height,
            margins.top + last.vertical_offset + layout.panel_height + margins.bottom
        );
    }

    #[test]
    fn no_panels_leaves_only_the_outer_margins() {
        let layout = layout_for_config(0, &ChartConfig::default());
        assert!(layout.panels.is_empty());
        assert_eq!(layout.height, 100.0 + 150.0);
    }
}
