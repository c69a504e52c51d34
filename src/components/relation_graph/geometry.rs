use super::filter::mean_std_dev;
use super::simulation::{SimNode, Simulation};

/// Control-point offset for bidirectional pairs, as a fraction of the
/// segment length.
const CURVE_RATIO: f64 = 0.2;
const BASE_STROKE_WIDTH: f64 = 3.0;
const MIN_STROKE_WIDTH: f64 = 1.0;
const MAX_STROKE_WIDTH: f64 = 6.0;
const HOVER_WIDTH_SHIFT: f64 = 0.5;
/// Opacity of nodes outside the hovered node's neighborhood.
const DIMMED_OPACITY: f64 = 0.15;
const LABEL_OFFSET: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
	Line {
		from: (f64, f64),
		to: (f64, f64),
	},
	Curve {
		from: (f64, f64),
		control: (f64, f64),
		to: (f64, f64),
	},
}

impl EdgePath {
	pub fn end(&self) -> (f64, f64) {
		match self {
			EdgePath::Line { to, .. } | EdgePath::Curve { to, .. } => *to,
		}
	}

	/// Unit direction of travel at the target end, for anchoring the
	/// arrowhead.
	pub fn end_tangent(&self) -> (f64, f64) {
		let ((sx, sy), (ex, ey)) = match self {
			EdgePath::Line { from, to } => (*from, *to),
			EdgePath::Curve { control, to, .. } => (*control, *to),
		};
		let (dx, dy) = (ex - sx, ey - sy);
		let len = (dx * dx + dy * dy).sqrt();
		if len <= f64::EPSILON {
			(1.0, 0.0)
		} else {
			(dx / len, dy / len)
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	pub value: u32,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSprite {
	pub path: EdgePath,
	pub width: f64,
	/// True when the edge touches the hovered node.
	pub emphasized: bool,
	pub label: Option<EdgeLabel>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub hovered: bool,
	pub opacity: f64,
}

/// One frame's worth of drawable geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub nodes: Vec<NodeSprite>,
	pub edges: Vec<EdgeSprite>,
}

/// Resolve the current snapshot into renderable geometry. Reads positions
/// only; identical inputs produce identical scenes.
pub fn resolve(sim: &Simulation, hovered: Option<&str>) -> Scene {
	let links = sim.links();
	let weights: Vec<f64> = links.iter().map(|l| f64::from(l.value)).collect();
	let (mean, std_dev) = if weights.is_empty() {
		(0.0, 1.0)
	} else {
		mean_std_dev(&weights)
	};

	let mut edges = Vec::with_capacity(links.len());
	for link in links {
		let Some(source) = node_by_id(sim, &link.source) else {
			continue;
		};
		let Some(target) = node_by_id(sim, &link.target) else {
			continue;
		};

		let dx = target.x - source.x;
		let dy = target.y - source.y;
		let dist = (dx * dx + dy * dy).sqrt();
		if dist <= f64::EPSILON {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		// trim to the circumference so the path clears both node glyphs
		let from = (source.x + ux * source.radius, source.y + uy * source.radius);
		let to = (target.x - ux * target.radius, target.y - uy * target.radius);
		let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);

		let has_reverse = links
			.iter()
			.any(|l| l.source == link.target && l.target == link.source);
		// Lexical tie-break keeps each bend stable regardless of render
		// order; the two directions of a pair end up bowing to opposite
		// sides.
		let lexical_sign = if link.source < link.target { 1.0 } else { -1.0 };
		let bend = if has_reverse {
			lexical_sign * dist * CURVE_RATIO
		} else {
			0.0
		};
		let control = (
			mid.0 - uy * bend * lexical_sign,
			mid.1 + ux * bend * lexical_sign,
		);
		let path = if has_reverse {
			EdgePath::Curve { from, control, to }
		} else {
			EdgePath::Line { from, to }
		};

		let z_score = (f64::from(link.value) - mean) / std_dev;
		let base_width = (BASE_STROKE_WIDTH + z_score).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
		let touches_hover =
			hovered.is_some_and(|h| link.source == h || link.target == h);
		let width = match hovered {
			None => base_width,
			Some(_) if touches_hover => base_width + HOVER_WIDTH_SHIFT,
			Some(_) => base_width - HOVER_WIDTH_SHIFT,
		};

		let label = touches_hover.then(|| EdgeLabel {
			value: link.value,
			x: control.0,
			y: control.1 - lexical_sign * LABEL_OFFSET,
		});

		edges.push(EdgeSprite {
			path,
			width,
			emphasized: touches_hover,
			label,
		});
	}

	let nodes = sim
		.nodes()
		.iter()
		.map(|node| {
			let is_hovered = hovered == Some(node.id.as_str());
			let opacity = match hovered {
				None => 1.0,
				Some(h) if node.id == h || is_neighbor(sim, h, &node.id) => 1.0,
				Some(_) => DIMMED_OPACITY,
			};
			NodeSprite {
				id: node.id.clone(),
				x: node.x,
				y: node.y,
				radius: node.radius,
				hovered: is_hovered,
				opacity,
			}
		})
		.collect();

	Scene { nodes, edges }
}

fn node_by_id<'a>(sim: &'a Simulation, id: &str) -> Option<&'a SimNode> {
	sim.nodes().iter().find(|n| n.id == id)
}

fn is_neighbor(sim: &Simulation, hovered: &str, id: &str) -> bool {
	sim.links().iter().any(|l| {
		(l.source == hovered && l.target == id) || (l.target == hovered && l.source == id)
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::super::simulation::{NODE_RADIUS, Simulation};
	use super::super::types::GraphLink;
	use super::*;

	fn items(names: &[&str]) -> Vec<String> {
		names.iter().map(ToString::to_string).collect()
	}

	fn link(source: &str, target: &str, value: u32) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			value,
		}
	}

	/// Two-node simulation with the pair pinned at a known horizontal
	/// separation.
	fn pinned_pair(links: Vec<GraphLink>) -> Simulation {
		let mut sim = Simulation::new(&items(&["cookie", "pastry"]), links, 800.0, 600.0);
		sim.place_node("cookie", 200.0, 300.0);
		sim.place_node("pastry", 500.0, 300.0);
		sim
	}

	#[test]
	fn unreciprocated_link_renders_as_a_trimmed_segment() {
		let sim = pinned_pair(vec![link("cookie", "pastry", 7)]);
		let scene = resolve(&sim, None);

		assert_eq!(scene.edges.len(), 1);
		assert_eq!(
			scene.edges[0].path,
			EdgePath::Line {
				from: (200.0 + NODE_RADIUS, 300.0),
				to: (500.0 - NODE_RADIUS, 300.0),
			}
		);
	}

	#[test]
	fn reciprocated_links_bow_to_opposite_sides() {
		let sim = pinned_pair(vec![link("cookie", "pastry", 5), link("pastry", "cookie", 3)]);
		let scene = resolve(&sim, None);
		assert_eq!(scene.edges.len(), 2);

		let offsets: Vec<f64> = scene
			.edges
			.iter()
			.map(|e| match e.path {
				// both segments lie on y = 300, so the bow is purely vertical
				EdgePath::Curve { control, .. } => control.1 - 300.0,
				EdgePath::Line { .. } => panic!("expected curves for a reciprocated pair"),
			})
			.collect();

		assert!(offsets[0].abs() > 1.0 && offsets[1].abs() > 1.0);
		assert!(
			offsets[0] * offsets[1] < 0.0,
			"curves must bow to opposite sides: {offsets:?}"
		);
		// magnitude is proportional to the source-target distance
		for offset in &offsets {
			assert!((offset.abs() - 300.0 * CURVE_RATIO).abs() < 1e-9);
		}
	}

	#[test]
	fn resolve_is_idempotent_on_an_unchanged_snapshot() {
		let sim = pinned_pair(vec![link("cookie", "pastry", 5), link("pastry", "cookie", 3)]);
		assert_eq!(resolve(&sim, Some("cookie")), resolve(&sim, Some("cookie")));
	}

	#[test]
	fn stroke_width_tracks_the_weight_z_score() {
		// weights 5 and 3: mean 4, deviation 1
		let sim = pinned_pair(vec![link("cookie", "pastry", 5), link("pastry", "cookie", 3)]);
		let scene = resolve(&sim, None);
		assert_eq!(scene.edges[0].width, 4.0);
		assert_eq!(scene.edges[1].width, 2.0);
	}

	#[test]
	fn stroke_width_is_clamped_before_the_hover_shift() {
		// ten weight-1 links plus one weight-40 link: the outlier z-scores to
		// sqrt(10) and saturates the upper clamp
		let names: Vec<String> = (0..11)
			.map(|i| format!("n{i}"))
			.chain(["hub".to_string()])
			.collect();
		let mut links: Vec<GraphLink> =
			(0..10).map(|i| link(&format!("n{i}"), "hub", 1)).collect();
		links.push(link("n10", "hub", 40));
		let sim = Simulation::new(&names, links, 800.0, 600.0);

		let scene = resolve(&sim, None);
		assert!(
			scene
				.edges
				.iter()
				.all(|e| e.width >= MIN_STROKE_WIDTH && e.width <= MAX_STROKE_WIDTH)
		);
		assert_eq!(scene.edges.last().unwrap().width, MAX_STROKE_WIDTH);

		// the hover shift applies after the clamp
		let scene = resolve(&sim, Some("n10"));
		assert_eq!(
			scene.edges.last().unwrap().width,
			MAX_STROKE_WIDTH + HOVER_WIDTH_SHIFT
		);
	}

	#[test]
	fn single_edge_set_gets_the_neutral_base_width() {
		let sim = pinned_pair(vec![link("cookie", "pastry", 7)]);
		let scene = resolve(&sim, None);
		assert_eq!(scene.edges[0].width, BASE_STROKE_WIDTH);
	}

	#[test]
	fn labels_appear_only_on_edges_touching_the_hovered_node() {
		let mut sim = Simulation::new(
			&items(&["bread", "cake", "pie"]),
			vec![link("bread", "cake", 4), link("cake", "pie", 2)],
			800.0,
			600.0,
		);
		sim.place_node("bread", 100.0, 100.0);
		sim.place_node("cake", 400.0, 100.0);
		sim.place_node("pie", 400.0, 400.0);

		let scene = resolve(&sim, None);
		assert!(scene.edges.iter().all(|e| e.label.is_none()));

		let scene = resolve(&sim, Some("bread"));
		assert_eq!(scene.edges[0].label.as_ref().map(|l| l.value), Some(4));
		assert!(scene.edges[0].emphasized);
		assert!(scene.edges[1].label.is_none());
		assert!(!scene.edges[1].emphasized);
	}

	#[test]
	fn hover_dims_nodes_outside_the_neighborhood() {
		let mut sim = Simulation::new(
			&items(&["bread", "cake", "pie"]),
			vec![link("bread", "cake", 4)],
			800.0,
			600.0,
		);
		sim.place_node("bread", 100.0, 100.0);
		sim.place_node("cake", 400.0, 100.0);
		sim.place_node("pie", 400.0, 400.0);

		let scene = resolve(&sim, Some("bread"));
		let by_id = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap();
		assert!(by_id("bread").hovered);
		assert_eq!(by_id("bread").opacity, 1.0);
		assert_eq!(by_id("cake").opacity, 1.0);
		assert_eq!(by_id("pie").opacity, DIMMED_OPACITY);

		let scene = resolve(&sim, None);
		assert!(scene.nodes.iter().all(|n| n.opacity == 1.0 && !n.hovered));
	}

	#[test]
	fn dangling_links_are_skipped_not_fatal() {
		let sim = Simulation::new(
			&items(&["bread"]),
			vec![link("bread", "ghost", 3)],
			800.0,
			600.0,
		);
		let scene = resolve(&sim, None);
		assert!(scene.edges.is_empty());
		assert_eq!(scene.nodes.len(), 1);
	}

	#[test]
	fn arrow_anchor_points_along_the_path_end() {
		let sim = pinned_pair(vec![link("cookie", "pastry", 7)]);
		let scene = resolve(&sim, None);
		let path = &scene.edges[0].path;
		assert_eq!(path.end(), (500.0 - NODE_RADIUS, 300.0));
		assert_eq!(path.end_tangent(), (1.0, 0.0));
	}
}
