use crate::layout::config::{AGGREGATOR_WIDTH, NODE_WIDTH};
use crate::layout::style::{DEFAULT_WRAP_WIDTH, resource_color, wrap_step_name};
use crate::layout::{CenterLane, LayoutResult, ResourceColumn};
use crate::model::Graph;

use serde::Serialize;
use std::collections::HashSet;

/// One drawable step.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    /// Display name wrapped for the node box.
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub color: String,
    pub aggregator: bool,
    pub resource: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub tags: Vec<String>,
    pub status: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Everything the report page needs, embedded as a single JSON literal.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub title: String,
    pub graph_id: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub columns: Vec<ResourceColumn>,
    pub center_lane: Option<CenterLane>,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

/// Join a graph with its layout into drawable nodes and edges.
///
/// Steps without a position (only possible for a layout computed from a
/// different graph) are left out, together with their edges. A repeated step
/// id is drawn once.
pub fn build_report_data(graph: &Graph, layout: &LayoutResult) -> ReportData {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(graph.steps.len());

    for step in &graph.steps {
        let Some(pos) = layout.positions.get(&step.id) else {
            continue;
        };
        if !seen.insert(step.id.as_str()) {
            continue;
        }

        let aggregator = step.is_aggregator();
        nodes.push(NodeView {
            id: step.id.clone(),
            name: step.name.clone(),
            lines: wrap_step_name(&step.name, DEFAULT_WRAP_WIDTH),
            x: pos.x,
            y: pos.y,
            width: if aggregator { AGGREGATOR_WIDTH } else { NODE_WIDTH },
            color: resource_color(step.resource.as_deref()).to_string(),
            aggregator,
            resource: step.resource.clone(),
            description: step.description.clone(),
            dependencies: step.deps().to_vec(),
            tags: step.tags.clone().unwrap_or_default(),
            status: step.status.map(|s| s.as_str()),
        });
    }

    let edges = graph
        .edges
        .iter()
        .filter(|e| seen.contains(e.source.as_str()) && seen.contains(e.target.as_str()))
        .map(|e| EdgeView {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
        })
        .collect();

    ReportData {
        title: graph.display_name().to_string(),
        graph_id: graph.id.clone(),
        canvas_width: layout.canvas_width,
        canvas_height: layout.canvas_height,
        columns: layout.resource_columns.clone(),
        center_lane: layout.center_lane,
        nodes,
        edges,
    }
}

/// Render a self-contained HTML report (data embedded as JSON).
///
/// The page draws the layout as SVG; clicking a node shows its details.
/// `format!()` is avoided on purpose: the template is full of `{}` from JS
/// template literals.
pub fn render_html_report(data: &ReportData) -> anyhow::Result<String> {
    // `</` would end the script element early.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Pipeline Viewer</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .container { display: flex; height: calc(100vh - 58px); }
  .canvas { flex: 1; overflow: auto; background: #fcfcfc; }
  .sidebar { width: 340px; border-left: 1px solid #ddd; padding: 12px; overflow: auto; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .muted { color: #777; font-size: 12px; }

  .node { cursor: pointer; }
  .node rect { stroke-width: 2; }
  .node.selected rect { stroke-width: 4; }
  .node text { font-size: 12px; fill: #222; text-anchor: middle; dominant-baseline: middle; pointer-events: none; }
  .edge { fill: none; stroke: #9aa5b1; stroke-width: 1.5; }
  .edge.active { stroke: #2d3436; stroke-width: 2.5; }
  .column-label { font-size: 13px; font-weight: 600; text-anchor: middle; }

  dl { margin: 8px 0; font-size: 14px; }
  dt { color: #777; font-size: 12px; margin-top: 8px; }
  dd { margin: 2px 0 0 0; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="canvas"><svg id="graph" xmlns="http://www.w3.org/2000/svg"></svg></div>
  <div class="sidebar">
    <h2 id="title">Select a step</h2>
    <div id="details" class="muted"></div>
  </div>
</div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const SVG_NS = "http://www.w3.org/2000/svg";
const LINE_HEIGHT = 16;
const NODE_PADDING = 14;

const nodesById = new Map(DATA.nodes.map((n) => [n.id, n]));
let selected = null;

function el(tag, attrs, text) {
  const e = document.createElementNS(SVG_NS, tag);
  for (const [k, v] of Object.entries(attrs || {})) e.setAttribute(k, v);
  if (text !== undefined) e.textContent = text;
  return e;
}

function nodeHeight(n) {
  return n.lines.length * LINE_HEIGHT + 2 * NODE_PADDING;
}

function renderSummary() {
  const aggregators = DATA.nodes.filter((n) => n.aggregator).length;
  const summary = document.getElementById("summary");
  summary.innerHTML = "";
  const pills = [
    ["pipeline", DATA.title],
    ["steps", DATA.nodes.length],
    ["edges", DATA.edges.length],
    ["resources", DATA.columns.length],
    ["aggregators", aggregators],
  ];
  for (const [k, v] of pills) {
    const p = document.createElement("span");
    p.className = "pill";
    p.textContent = `${k}: ${v}`;
    summary.appendChild(p);
  }
}

function renderGraph() {
  const svg = document.getElementById("graph");
  svg.innerHTML = "";
  svg.setAttribute("width", DATA.canvas_width);
  svg.setAttribute("height", DATA.canvas_height);

  for (const c of DATA.columns) {
    svg.appendChild(el("rect", {
      x: c.startX, y: 20, width: c.width, height: DATA.canvas_height - 40,
      rx: 8, fill: c.color, "fill-opacity": 0.06, stroke: c.color, "stroke-opacity": 0.3,
    }));
    svg.appendChild(el("text", { x: c.centerX, y: 50, class: "column-label", fill: c.color }, c.displayName));
  }

  const lane = DATA.center_lane;
  if (lane) {
    svg.appendChild(el("rect", {
      x: lane.startX, y: 20, width: lane.width, height: DATA.canvas_height - 40,
      rx: 8, fill: "#607d8b", "fill-opacity": 0.05, stroke: "#607d8b", "stroke-dasharray": "6 4",
    }));
    svg.appendChild(el("text", { x: lane.centerX, y: 50, class: "column-label", fill: "#607d8b" }, "Pipeline"));
  }

  for (const e of DATA.edges) {
    const s = nodesById.get(e.source);
    const t = nodesById.get(e.target);
    const x1 = s.x, y1 = s.y + nodeHeight(s) / 2;
    const x2 = t.x, y2 = t.y - nodeHeight(t) / 2;
    const my = (y1 + y2) / 2;
    const active = selected && (e.source === selected || e.target === selected);
    svg.appendChild(el("path", {
      d: `M ${x1} ${y1} C ${x1} ${my}, ${x2} ${my}, ${x2} ${y2}`,
      class: active ? "edge active" : "edge",
    }));
  }

  for (const n of DATA.nodes) {
    const h = nodeHeight(n);
    const g = el("g", { class: n.id === selected ? "node selected" : "node" });
    g.appendChild(el("rect", {
      x: n.x - n.width / 2, y: n.y - h / 2, width: n.width, height: h,
      rx: n.aggregator ? h / 2 : 6, fill: "white", stroke: n.color,
    }));
    const top = n.y - ((n.lines.length - 1) * LINE_HEIGHT) / 2;
    n.lines.forEach((line, i) => {
      g.appendChild(el("text", { x: n.x, y: top + i * LINE_HEIGHT }, line));
    });
    g.addEventListener("click", () => selectNode(n.id));
    svg.appendChild(g);
  }
}

function addField(dl, label, value) {
  if (value === null || value === undefined || value === "" || (Array.isArray(value) && !value.length)) return;
  const dt = document.createElement("dt");
  dt.textContent = label;
  const dd = document.createElement("dd");
  dd.textContent = Array.isArray(value) ? value.join(", ") : String(value);
  dl.appendChild(dt);
  dl.appendChild(dd);
}

function selectNode(id) {
  selected = id;
  const n = nodesById.get(id);
  document.getElementById("title").textContent = n.name;

  const details = document.getElementById("details");
  details.innerHTML = "";
  const dl = document.createElement("dl");
  addField(dl, "id", n.id);
  addField(dl, "kind", n.aggregator ? "aggregator" : "resource step");
  addField(dl, "resource", n.resource);
  addField(dl, "description", n.description);
  addField(dl, "dependencies", n.dependencies);
  addField(dl, "tags", n.tags);
  addField(dl, "status", n.status);
  details.appendChild(dl);

  renderGraph();
}

renderSummary();
renderGraph();
if (!DATA.nodes.length) {
  document.getElementById("title").textContent = "No pipeline steps found";
}
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
