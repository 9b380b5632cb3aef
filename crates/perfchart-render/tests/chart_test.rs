use chrono::NaiveDateTime;
use perfchart_core::{ChartConfig, Dataset, TsvSource, load_dataset_sync};
use perfchart_render::{
    Error, InteractionController, PointId, PointState, PointerEvent, Surface, SvgRenderOptions,
    SvgSurface, TooltipState, build_chart_model, render_chart, render_chart_svg,
};
use std::collections::HashMap;
use std::path::PathBuf;

fn load(name: &str) -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name);
    load_dataset_sync(&TsvSource::from_path(path), &ChartConfig::default()).expect("fixture loads")
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

#[test]
fn sample_history_end_to_end() {
    let dataset = load("sample.tsv");
    let model = build_chart_model(&dataset, &ChartConfig::default());

    assert_eq!(model.panels.len(), 6);
    assert_eq!(model.point_count(), 12);
    assert!(model.panels.iter().all(|p| p.points.len() == 2));
    assert_eq!(
        model.time_domain,
        Some((ts("2012-01-01 10:00"), ts("2012-01-02 10:00")))
    );

    let avgr = model.panel("avgr").unwrap();
    assert_eq!(avgr.value_domain, (0.0, 6.0));
    assert_eq!(avgr.points[0].x, 0.0);
    assert_eq!(avgr.points[1].x, 1000.0);
    assert_eq!(avgr.points[1].y, 0.0);
    assert_eq!(avgr.points[1].tooltip, "02-01 10:00 [main] 6");

    // Each panel is scaled by its own maximum only.
    assert_eq!(model.panel("peakr").unwrap().value_domain, (0.0, 10.0));
    assert_eq!(model.panel("susw").unwrap().value_domain, (0.0, 3.0));

    assert_eq!(model.layout.height, 3400.0);
    let offsets: Vec<f64> = model.panels.iter().map(|p| p.vertical_offset).collect();
    assert_eq!(offsets, [0.0, 550.0, 1100.0, 1650.0, 2200.0, 2750.0]);
}

#[test]
fn sample_svg_has_one_circle_per_measurement() {
    let svg = render_chart_svg(
        &load("sample.tsv"),
        &ChartConfig::default(),
        &SvgRenderOptions::default(),
    )
    .unwrap();
    assert_eq!(svg.matches("<circle").count(), 12);
    assert!(svg.contains(r#"data-label="02-01 10:00 [main] 6""#));
    assert!(svg.contains(">Average reads</text>"));
    assert!(svg.contains(">Operations/s</text>"));
}

#[test]
fn branch_colours_agree_across_panels() {
    let dataset = load("history.tsv");
    let model = build_chart_model(&dataset, &ChartConfig::default());

    let mut seen: HashMap<Option<String>, String> = HashMap::new();
    for panel in &model.panels {
        for p in &panel.points {
            let color = seen.entry(p.branch.clone()).or_insert_with(|| p.color.clone());
            assert_eq!(*color, p.color, "branch {:?}", p.branch);
        }
    }
    assert_eq!(seen[&Some("master".to_string())], "#1f77b4");
    assert_eq!(seen[&Some("1.8-maint".to_string())], "#ff7f0e");
    assert_eq!(seen[&None], "#000000");

    let legend: Vec<&str> = model.legend.iter().map(|e| e.branch.as_str()).collect();
    assert_eq!(legend, ["master", "1.8-maint", "1.7-maint"]);

    // Same dataset, same colours.
    let again = build_chart_model(&dataset, &ChartConfig::default());
    assert_eq!(again.legend, model.legend);
}

#[test]
fn hover_round_trip_restores_the_point_and_hides_the_tooltip() {
    let mut surface = SvgSurface::new();
    let root = surface.root();
    let chart = render_chart(
        &load("sample.tsv"),
        &mut surface,
        root,
        &ChartConfig::default(),
    )
    .unwrap();
    let mut controller = InteractionController::new(&chart);

    let id = controller.point_at(0, 1).unwrap();
    let node = chart.panels[0].points[1].node;
    let tooltip = chart.panels[0].tooltip;

    controller
        .dispatch(&mut surface, PointerEvent::Enter(id))
        .unwrap();
    assert_eq!(controller.point_state(id), Some(PointState::Hovered));
    assert_eq!(surface.attr(node, "fill"), Some("red"));
    assert_eq!(surface.attr(tooltip.group, "visibility"), Some("visible"));
    assert_eq!(surface.attr(tooltip.group, "transform"), Some("translate(1000,0)"));
    assert_eq!(surface.text(tooltip.text), Some("02-01 10:00 [main] 6"));
    assert_eq!(surface.attr(tooltip.rect, "width"), Some("152"));
    assert_eq!(
        controller.tooltip_state(0),
        Some(TooltipState {
            visible: true,
            label: Some("02-01 10:00 [main] 6".to_string()),
        })
    );
    // Other panels are untouched.
    assert_eq!(controller.tooltip_state_for("avgw"), Some(TooltipState::default()));
    assert_eq!(
        surface.attr(chart.panels[1].tooltip.group, "visibility"),
        Some("hidden")
    );

    controller
        .dispatch(&mut surface, PointerEvent::Leave(id))
        .unwrap();
    assert_eq!(controller.point_state(id), Some(PointState::Idle));
    assert_eq!(surface.attr(node, "fill"), Some("#1f77b4"));
    assert_eq!(surface.attr(tooltip.group, "visibility"), Some("hidden"));
    assert_eq!(controller.tooltip_state(0), Some(TooltipState::default()));
    assert!(!surface.to_svg_string().contains(r#"fill="red""#));
}

#[test]
fn repeated_and_stray_events_are_ignored() {
    let mut surface = SvgSurface::new();
    let root = surface.root();
    let chart = render_chart(
        &load("sample.tsv"),
        &mut surface,
        root,
        &ChartConfig::default(),
    )
    .unwrap();
    let mut controller = InteractionController::new(&chart);
    let a = controller.point_at(2, 0).unwrap();
    let b = controller.point_at(2, 1).unwrap();

    controller.pointer_leave(&mut surface, a).unwrap();
    assert_eq!(controller.point_state(a), Some(PointState::Idle));

    controller.pointer_enter(&mut surface, a).unwrap();
    controller.pointer_enter(&mut surface, a).unwrap();
    controller.pointer_enter(&mut surface, b).unwrap();
    // `b` took over the tooltip, so leaving `a` must not hide it.
    controller.pointer_leave(&mut surface, a).unwrap();
    let state = controller.tooltip_state(2).unwrap();
    assert!(state.visible);
    assert_eq!(state.label.as_deref(), Some("02-01 10:00 [main] 10"));

    controller.pointer_leave(&mut surface, b).unwrap();
    assert!(!controller.tooltip_state(2).unwrap().visible);
    assert_eq!(controller.points().count(), 12);
}

#[test]
fn unknown_points_are_rejected() {
    let mut surface = SvgSurface::new();
    let root = surface.root();
    let chart = render_chart(
        &load("sample.tsv"),
        &mut surface,
        root,
        &ChartConfig::default(),
    )
    .unwrap();
    let mut controller = InteractionController::new(&chart);
    let bogus = PointId { panel: 0, index: 7 };
    assert!(matches!(
        controller.pointer_enter(&mut surface, bogus),
        Err(Error::UnknownPoint(_))
    ));
    assert_eq!(controller.point_at(6, 0), None);
    assert_eq!(
        controller.point_for_node(chart.panels[3].points[1].node),
        Some(PointId { panel: 3, index: 1 })
    );
}

#[test]
fn malformed_rows_render_as_anomalies() {
    let dataset = load("history.tsv");
    assert_eq!(dataset.anomalous_records().count(), 1);

    let model = build_chart_model(&dataset, &ChartConfig::default());
    assert_eq!(model.point_count(), dataset.records.len() * 6);

    let peakr = model.panel("peakr").unwrap();
    let anomaly = peakr
        .points
        .iter()
        .find(|p| p.branch.is_none())
        .expect("anomalous point is kept");
    assert!(anomaly.x.is_nan());
    assert!(anomaly.y.is_nan());
    assert_eq!(anomaly.tooltip, "invalid date [unknown] NaN");
    assert!(peakr.value_domain.1.is_finite());

    let svg = render_chart_svg(&dataset, &ChartConfig::default(), &SvgRenderOptions::default())
        .unwrap();
    assert!(svg.contains(r#"cx="NaN""#));
}

#[test]
fn infinite_values_render_as_anomalies() {
    let text = "build\tavgr\tavgw\tpeakr\tpeakw\tsusr\tsusw\n\
01-01 10:00[main]\t5\t3\t9\t7\t4\t2\n\
02-01 10:00[main]\t1e400\t4\t10\t8\t5\t3\n";
    let dataset =
        load_dataset_sync(&TsvSource::from_text(text), &ChartConfig::default()).unwrap();
    let model = build_chart_model(&dataset, &ChartConfig::default());

    let avgr = model.panel("avgr").unwrap();
    assert_eq!(avgr.value_domain, (0.0, 5.0));
    let inf = &avgr.points[1];
    assert!(inf.value.is_infinite());
    assert_eq!(inf.x, 1000.0);
    assert!(inf.y.is_nan());
    assert_eq!(inf.tooltip, "02-01 10:00 [main] Infinity");
    // The finite maximum still owns the top of the panel.
    assert_eq!(avgr.points[0].y, 0.0);

    let svg = render_chart_svg(&dataset, &ChartConfig::default(), &SvgRenderOptions::default())
        .unwrap();
    assert!(svg.contains(
        r##"cx="1000" cy="NaN" data-branch="main" data-emphasis="red" data-fill="#1f77b4" data-label="02-01 10:00 [main] Infinity""##
    ));
}
