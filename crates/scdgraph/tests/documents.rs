//! JSON graph documents from the CLI and browser front-ends

use scdgraph::{render_document, ColorMode, GraphDocument, GraphError, LegendPlacement};

#[test]
fn test_full_document() {
    let doc = GraphDocument::from_json(
        r##"{
            "title": "Tier 1",
            "y_label": "Words correct",
            "y_max": 80,
            "y_tick": 20,
            "fixed_max_x": 15,
            "legend_placement": "upper-left",
            "visibility": { "phase_titles": false, "legend_files": false },
            "color_mode": { "mode": "custom", "colors": ["#000", "#336699"] },
            "multiple_baseline": { "enabled": true, "stair_step": true },
            "phases": [
                { "title": "Baseline", "measures": [ { "name": "WCPM", "data": "30 32 x 31" } ] },
                { "title": "Intervention", "measures": [ { "name": "WCPM", "data": [45, 50, null, 58] } ] }
            ]
        }"##,
    )
    .unwrap();

    assert_eq!(doc.config.legend_placement, LegendPlacement::UpperLeft);
    assert!(!doc.config.visibility.phase_titles);
    assert!(doc.config.visibility.x_axis_line);
    match &doc.config.color_mode {
        ColorMode::Custom { colors } => {
            let hex: Vec<&str> = colors.iter().map(|c| c.as_str()).collect();
            assert_eq!(hex, vec!["#000000", "#336699"]);
        }
        other => panic!("expected custom colors, got {other:?}"),
    }

    let graph = doc.into_graph().unwrap();
    assert_eq!(graph.phases()[1].measures[0].values[2], None);
    assert_eq!(graph.config().fixed_max_x, Some(15.0));
    assert!(graph.diagnostics().is_empty());
}

#[test]
fn test_default_names() {
    let graph = GraphDocument::from_json(
        r#"{ "phases": [ { "measures": [ { "data": "1" }, { "name": "  ", "data": "2" } ] } ] }"#,
    )
    .unwrap()
    .into_graph()
    .unwrap();
    let phase = &graph.phases()[0];
    assert_eq!(phase.title, "Phase 1");
    assert_eq!(phase.measures[0].name, "Measure 1 (Phase 1)");
    assert_eq!(phase.measures[1].name, "Measure 2 (Phase 1)");
}

#[test]
fn test_bad_color_is_document_error() {
    let err = GraphDocument::from_json(
        r#"{ "color_mode": { "mode": "custom", "colors": ["blue"] } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, GraphError::Document { .. }));
    assert!(err.to_string().contains("blue"));
}

#[test]
fn test_config_error_surfaces_on_build() {
    let err = GraphDocument::from_json(r#"{ "y_min": 10, "y_max": 5 }"#)
        .unwrap()
        .into_graph()
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidConfig { .. }));
}

#[test]
fn test_template_renders() {
    let json = GraphDocument::template().to_json_pretty().unwrap();
    let (svg, warnings) = render_document(&json).unwrap();
    assert!(svg.contains("Correct responses"));
    assert!(warnings.is_empty());
}

#[test]
fn test_bad_series_still_renders_other_measures() {
    let (svg, warnings) = render_document(
        r#"{ "phases": [
            { "title": "A", "measures": [ { "name": "good", "data": "1 2" }, { "name": "bad", "data": "1 two" } ] }
        ] }"#,
    )
    .unwrap();
    assert_eq!(warnings, vec!["A / bad: Invalid entry 'two'. Use numbers or 'x'/'-'/'na' for missing."]);
    assert!(svg.contains(">good<"));
    assert!(!svg.contains(">bad<"));
}

#[test]
fn test_measure_color_reaches_svg() {
    let (svg, _) = render_document(
        r##"{
            "color_mode": { "mode": "custom" },
            "phases": [ { "title": "A", "measures": [ { "name": "m", "data": "1 2", "color": "#123456" } ] } ]
        }"##,
    )
    .unwrap();
    assert!(svg.contains("#123456"));
    assert!(!svg.contains("#1f77b4"));
}
