use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry::{self, EdgePath, EdgeSprite, Scene};
use super::state::RelationGraphState;

const BACKGROUND: &str = "#ffffff";
const BASIC_STROKE: &str = "#6b7280";
const FADED_STROKE: &str = "#e5e7eb";
const ACTIVE_ARROW: &str = "#666666";
const LABEL_COLOR: &str = "#3b82f6";
const NODE_FILL: &str = "#ffffff";
const TEXT_COLOR: &str = "#000000";
const EDGE_OPACITY: f64 = 0.6;
const ARROW_SIZE: f64 = 8.0;

/// Paint the current snapshot. Pure consumer of the resolved geometry; node
/// positions are never touched from here.
pub fn render(state: &RelationGraphState, ctx: &CanvasRenderingContext2d) {
	let (width, height) = state.sim.size();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);

	let scene = geometry::resolve(&state.sim, state.hovered.as_deref());
	let hover_active = state.hovered.is_some();
	draw_edges(&scene, hover_active, ctx);
	draw_nodes(&scene, ctx);
}

fn draw_edges(scene: &Scene, hover_active: bool, ctx: &CanvasRenderingContext2d) {
	for edge in &scene.edges {
		let stroke = if !hover_active || edge.emphasized {
			BASIC_STROKE
		} else {
			FADED_STROKE
		};

		ctx.set_global_alpha(EDGE_OPACITY);
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(edge.width);
		ctx.begin_path();
		match edge.path {
			EdgePath::Line { from, to } => {
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
			}
			EdgePath::Curve { from, control, to } => {
				ctx.move_to(from.0, from.1);
				ctx.quadratic_curve_to(control.0, control.1, to.0, to.1);
			}
		}
		ctx.stroke();
		ctx.set_global_alpha(1.0);

		let arrow_color = if edge.emphasized { ACTIVE_ARROW } else { stroke };
		draw_arrowhead(&edge.path, arrow_color, ctx);
		draw_label(edge, ctx);
	}
}

fn draw_arrowhead(path: &EdgePath, color: &str, ctx: &CanvasRenderingContext2d) {
	let (tip_x, tip_y) = path.end();
	let (ux, uy) = path.end_tangent();
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);

	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_label(edge: &EdgeSprite, ctx: &CanvasRenderingContext2d) {
	let Some(label) = &edge.label else {
		return;
	};
	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("bold 11px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	let _ = ctx.fill_text(&label.value.to_string(), label.x, label.y);
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for node in &scene.nodes {
		ctx.set_global_alpha(node.opacity);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_stroke_style_str(if node.hovered { TEXT_COLOR } else { BASIC_STROKE });
		ctx.set_line_width(if node.hovered { 3.0 } else { 1.0 });
		ctx.stroke();

		ctx.set_fill_style_str(TEXT_COLOR);
		ctx.set_font(if node.hovered {
			"bold 12px sans-serif"
		} else {
			"12px sans-serif"
		});
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.id, node.x, node.y);

		ctx.set_global_alpha(1.0);
	}
}
