use pipeline_viewer::{
    LayoutConfig, OutputFormat, PipelineError, compute_layout, filter_by_step, format_graph,
    parse_diagnostics, resource_color, wrap_step_name,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const BUILD_PIPELINE: &str = "\
Step: build
    Dependencies: ✓ build-app, ✓ build-frontend
Step: build-app
    Dependencies: ✓ build-prereq
    Resource: app (ExecutableContainerResource)
Step: build-frontend
    Dependencies: ✓ build-prereq
    Resource: frontend (ExecutableContainerResource)
Step: build-prereq
    Dependencies: none
";

const PREFIXED_DUMP: &str = "\
02:04:01 (pipeline) i Starting diagnostics...
02:04:05 (diagnostics) i PIPELINE DEPENDENCY GRAPH DIAGNOSTICS
02:04:05 (diagnostics) i DETAILED STEP ANALYSIS
02:04:05 (diagnostics) i =====================
02:04:05 (diagnostics) i Step: build
02:04:05 (diagnostics) i     Description: Aggregation step for all build operations.
02:04:05 (diagnostics) i     Dependencies: ✓ build-app, ✓ build-frontend
02:04:05 (diagnostics) i
02:04:05 (diagnostics) i Step: build-app
02:04:05 (diagnostics) i     Dependencies: ✓ build-frontend, ✓ build-prereq
02:04:05 (diagnostics) i     Resource: app (ExecutableContainerResource)
02:04:05 (diagnostics) i     Tags: build-compute
02:04:05 (diagnostics) i
02:04:05 (diagnostics) i Step: build-frontend
02:04:05 (diagnostics) i     Dependencies: ✓ build-prereq
02:04:05 (diagnostics) i     Resource: frontend (ExecutableContainerResource)
02:04:05 (diagnostics) i
02:04:05 (diagnostics) i Step: build-prereq
02:04:05 (diagnostics) i     Description: Prerequisite step that runs before any
02:04:05 (diagnostics) i build operations.
02:04:05 (diagnostics) i     Dependencies: ✓ process-parameters
02:04:05 (diagnostics) i
02:04:05 (diagnostics) i Step: push-app
02:04:05 (diagnostics) i     Dependencies: ✓ build-app, ✓ build-app, ✓ push-prereq, ✓ push-prereq
02:04:05 (diagnostics) i     Resource: app (ExecutableContainerResource)
02:04:05 (diagnostics) i     Tags: push-container-image
02:04:05 (diagnostics) i
02:04:05 (diagnostics) i POTENTIAL ISSUES:
02:04:05 (diagnostics) i Step: ghost
";

fn edge_set(graph: &pipeline_viewer::Graph) -> BTreeSet<(String, String)> {
    graph
        .edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect()
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

#[test]
fn build_pipeline_end_to_end() {
    let graph = parse_diagnostics(BUILD_PIPELINE);

    assert_eq!(graph.steps.len(), 4);
    let build = graph.step("build").unwrap();
    assert_eq!(
        build.dependencies,
        Some(vec!["build-app".to_string(), "build-frontend".to_string()])
    );
    assert_eq!(build.resource, None);
    assert!(build.is_aggregator());

    assert_eq!(
        edge_set(&graph),
        BTreeSet::from([
            pair("build-prereq", "build-app"),
            pair("build-prereq", "build-frontend"),
            pair("build-app", "build"),
            pair("build-frontend", "build"),
        ])
    );

    let layout = compute_layout(&graph, &LayoutConfig::default());
    assert!(layout.rows["build"] > layout.rows["build-app"]);
    assert!(layout.rows["build"] > layout.rows["build-frontend"]);
    assert!(layout.positions["build"].y > layout.positions["build-app"].y);
    assert!(layout.positions["build"].y > layout.positions["build-frontend"].y);
    assert!(layout.center_lane.is_some());

    let names: Vec<_> = layout
        .resource_columns
        .iter()
        .map(|c| (c.name.as_str(), c.color.as_str()))
        .collect();
    assert_eq!(names, vec![("app", "#d63031"), ("frontend", "#0984e3")]);
}

#[test]
fn prefixed_dump_is_parsed_inside_markers() {
    let graph = parse_diagnostics(PREFIXED_DUMP);

    let ids: Vec<_> = graph.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["build", "build-app", "build-frontend", "build-prereq", "push-app"]
    );
    assert_eq!(graph.id, "aspire-pipeline");

    let prereq = graph.step("build-prereq").unwrap();
    assert_eq!(
        prereq.description.as_deref(),
        Some("Prerequisite step that runs before any build operations.")
    );

    let push = graph.step("push-app").unwrap();
    assert_eq!(
        push.dependencies,
        Some(vec!["build-app".to_string(), "push-prereq".to_string()])
    );
    assert_eq!(push.tags, Some(vec!["push-container-image".to_string()]));
}

#[test]
fn layout_keeps_steps_below_their_dependencies() {
    let graph = parse_diagnostics(PREFIXED_DUMP);
    let layout = compute_layout(&graph, &LayoutConfig::default());

    for step in &graph.steps {
        for dep in step.deps() {
            let (Some(row), Some(dep_row)) = (layout.rows.get(&step.id), layout.rows.get(dep))
            else {
                continue;
            };
            assert!(row > dep_row, "{} ({row}) vs {dep} ({dep_row})", step.id);
        }
    }

    let max_row = layout.rows.values().copied().max().unwrap();
    assert_eq!(
        layout.canvas_height,
        100.0 + (max_row + 1) as f64 * 140.0 + 100.0
    );
}

#[test]
fn filter_closure() {
    let graph = parse_diagnostics(BUILD_PIPELINE);
    let filtered = filter_by_step(&graph, "build-app").unwrap();

    let ids: Vec<_> = filtered.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["build-app", "build-prereq"]);
    assert_eq!(edge_set(&filtered), BTreeSet::from([pair("build-prereq", "build-app")]));

    let err = filter_by_step(&graph, "nonexistent").unwrap_err();
    assert!(matches!(err, PipelineError::StepNotFound(_)));
}

#[test]
fn filtered_text_report() {
    let graph = parse_diagnostics(BUILD_PIPELINE);
    let text = format_graph(&graph, OutputFormat::Text, Some("build-frontend")).unwrap();

    assert!(text.contains("Pipeline: aspire-pipeline"));
    assert!(text.contains("Steps: 2\n"));
    assert!(text.contains("Edges: 1\n"));
    assert!(text.contains("  • build-frontend (build-frontend)\n"));
    assert!(text.contains("    Resource: frontend (ExecutableContainerResource)\n"));
    assert!(!text.contains("build-app"));
}

#[test]
fn text_without_steps_is_an_empty_graph() {
    for text in ["", "nothing to see\n", "DETAILED STEP ANALYSIS\nPOTENTIAL ISSUES:\n"] {
        let graph = parse_diagnostics(text);
        assert_eq!(graph.id, "aspire-pipeline");
        assert!(graph.steps.is_empty());
        assert!(graph.edges.is_empty());

        let layout = compute_layout(&graph, &LayoutConfig::default());
        assert!(layout.positions.is_empty());
        assert_eq!(layout.canvas_height, 200.0);
    }
}

#[test]
fn none_versus_absent_dependencies() {
    let graph = parse_diagnostics("Step: a\n  Dependencies: none\nStep: b\n  Resource: x\n");
    assert_eq!(graph.step("a").unwrap().dependencies, Some(vec![]));
    assert_eq!(graph.step("b").unwrap().dependencies, None);
}

#[test]
fn layout_json_is_stable() {
    let graph = parse_diagnostics(PREFIXED_DUMP);
    let config = LayoutConfig::default();
    let first = serde_json::to_string(&compute_layout(&graph, &config)).unwrap();
    let second = serde_json::to_string(&compute_layout(&graph, &config)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\"resourceColumns\""));
    assert!(first.contains("\"canvasHeight\""));
}

#[test]
fn colors_and_wrapping() {
    assert_eq!(resource_color(Some("custom (X)")), resource_color(Some("custom (X)")));
    assert_eq!(resource_color(None), "#607d8b");

    assert_eq!(wrap_step_name("build-app1", 10), vec!["build-app1"]);
    let lines = wrap_step_name("build-app12", 10);
    assert!(lines.len() >= 2);
    assert!(lines.iter().all(|l| l.chars().count() <= 10), "{lines:?}");
}
