use log::debug;

use super::filter::significant_links;
use super::simulation::Simulation;
use super::types::StatsMap;

/// Pointer hits register slightly outside the disc so touch drags start
/// reliably.
pub const HIT_RADIUS: f64 = 32.0;

/// Which node, if any, the pointer currently holds. At most one node can be
/// held; claiming is only possible from `Idle`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging(String),
}

/// Single owner of the live node/edge snapshot. The scheduler ticks it, the
/// input handlers mutate drag/hover, and the renderer only ever reads.
pub struct RelationGraphState {
	pub sim: Simulation,
	pub drag: DragState,
	pub hovered: Option<String>,
}

impl RelationGraphState {
	pub fn new(items: &[String], stats: &StatsMap, width: f64, height: f64) -> Self {
		let links = significant_links(items, stats);
		debug!(
			"installed dataset: {} nodes, {} significant links",
			items.len(),
			links.len()
		);
		Self {
			sim: Simulation::new(items, links, width, height),
			drag: DragState::Idle,
			hovered: None,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.sim.resize(width, height);
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<&str> {
		// later nodes draw on top, so prefer the last hit
		self.sim
			.nodes()
			.iter()
			.rev()
			.find(|n| {
				let (dx, dy) = (n.x - x, n.y - y);
				(dx * dx + dy * dy).sqrt() < HIT_RADIUS
			})
			.map(|n| n.id.as_str())
	}

	/// Pointer-down: claim the node under the pointer, if any, and mark it
	/// hovered. Returns whether a drag started.
	pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
		if self.is_dragging() {
			return false;
		}
		let Some(id) = self.node_at_position(x, y).map(str::to_owned) else {
			return false;
		};
		self.hovered = Some(id.clone());
		self.drag = DragState::Dragging(id);
		true
	}

	/// Pointer-move while a node is held; ignored when idle. The held node
	/// follows the pointer instead of the forces.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if let DragState::Dragging(id) = &self.drag {
			self.sim.place_node(id, x, y);
		}
	}

	/// Pointer-up, anywhere in the viewport: release and clear hover.
	pub fn end_drag(&mut self) {
		self.drag = DragState::Idle;
		self.hovered = None;
	}

	/// Hover tracking is frozen while a drag is in progress, so passing over
	/// other nodes mid-drag doesn't flicker the highlight.
	pub fn set_hover(&mut self, node: Option<String>) {
		if self.is_dragging() {
			return;
		}
		self.hovered = node;
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.drag, DragState::Dragging(_))
	}

	/// One scheduler tick. The whole force pass is suspended while any node
	/// is held; only the pointer moves the held node, and the rest of the
	/// layout freezes until release.
	pub fn tick(&mut self) {
		if self.is_dragging() {
			return;
		}
		self.sim.step();
	}
}
