use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::highlight::{FocusMode, LinkEmphasis};
use super::layout::Point;
use super::state::{FLOW_SCALE, NODE_WIDTH, SystemMapState, pill_height};
use crate::model::{Direction, NodeData, NodeKind};

const BACKGROUND: &str = "#f8fafc";
const FLOW_COLOR: &str = "#6366f1";
/// Seconds for the particle to cross one edge.
const PARTICLE_PERIOD: f64 = 1.5;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn ease_in_out(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

/// Control points of the horizontal S-curve between two nodes.
fn curve(start: Point, end: Point) -> [Point; 4] {
	let dist = (end.x - start.x).abs();
	[
		start,
		Point {
			x: start.x + dist * 0.5,
			y: start.y,
		},
		Point {
			x: end.x - dist * 0.5,
			y: end.y,
		},
		end,
	]
}

fn bezier_point([p0, p1, p2, p3]: [Point; 4], t: f64) -> Point {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	Point {
		x: a * p0.x + b * p1.x + c * p2.x + d * p3.x,
		y: a * p0.y + b * p1.y + c * p2.y + d * p3.y,
	}
}

/// Draws one frame.
pub fn render(state: &SystemMapState, live: &FocusMode, ctx: &CanvasRenderingContext2d) {
	let (width, height) = (state.viewport.width, state.viewport.height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	if state.viewport.is_degenerate() {
		return;
	}

	let focus = state.render_focus(live);
	let t = ease_out_cubic(state.emphasis.t);
	draw_columns(state, ctx);
	draw_edges(state, focus, t, ctx);
	draw_nodes(state, focus, t, ctx);
}

fn draw_columns(state: &SystemMapState, ctx: &CanvasRenderingContext2d) {
	let (width, height) = (state.viewport.width, state.viewport.height);
	ctx.set_font("bold 10px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for kind in NodeKind::ALL {
		let x = width * kind.column_fraction();

		ctx.set_stroke_style_str("rgba(203, 213, 225, 0.5)");
		ctx.set_line_width(1.0);
		ctx.begin_path();
		ctx.move_to(x, 44.0);
		ctx.line_to(x, height);
		ctx.stroke();

		ctx.set_fill_style_str("#ffffff");
		rounded_rect(ctx, x - 60.0, 18.0, 120.0, 24.0, 4.0);
		ctx.fill();
		ctx.set_stroke_style_str("#e2e8f0");
		ctx.stroke();
		ctx.set_fill_style_str("#64748b");
		let _ = ctx.fill_text(kind.column_label(), x, 30.0);
	}
}

fn draw_edges(state: &SystemMapState, focus: &FocusMode, t: f64, ctx: &CanvasRenderingContext2d) {
	for link in state.model.links {
		let (Some(start), Some(end)) = (
			state.drawn_position(link.source),
			state.drawn_position(link.target),
		) else {
			continue;
		};
		let [p0, p1, p2, p3] = curve(start, end);
		let emphasis = focus.link_emphasis(link);

		// t=0: every edge at rest, t=1: the focus fully applied
		let (stroke, width, alpha) = match emphasis {
			LinkEmphasis::Flow(_) => (FLOW_COLOR, 1.0 + 2.0 * t, 0.6 + 0.4 * t),
			LinkEmphasis::Highlighted => ("#94a3b8", 1.0 + t, 0.6 + 0.4 * t),
			LinkEmphasis::Normal => ("#cbd5e1", 1.0, 0.6),
			LinkEmphasis::Suppressed => ("#cbd5e1", 1.0, 0.6 - 0.5 * t),
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		if let LinkEmphasis::Flow(direction) = emphasis {
			let (dash, gap) = (8.0, 4.0);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			let offset = (state.flow_time * 30.0) % (dash + gap);
			ctx.set_line_dash_offset(match direction {
				Direction::Forward => -offset,
				Direction::Reverse => offset,
			});
		}
		ctx.begin_path();
		ctx.move_to(p0.x, p0.y);
		ctx.bezier_curve_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if let LinkEmphasis::Flow(direction) = emphasis {
			draw_particle(state, [p0, p1, p2, p3], direction, ctx);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_particle(
	state: &SystemMapState,
	points: [Point; 4],
	direction: Direction,
	ctx: &CanvasRenderingContext2d,
) {
	let phase = ease_in_out((state.flow_time % PARTICLE_PERIOD) / PARTICLE_PERIOD);
	let along = match direction {
		Direction::Forward => phase,
		Direction::Reverse => 1.0 - phase,
	};
	let p = bezier_point(points, along);
	ctx.set_global_alpha(1.0);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, 6.0, 0.0, std::f64::consts::TAU);
	ctx.set_fill_style_str(FLOW_COLOR);
	ctx.fill();
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_line_width(2.0);
	ctx.stroke();
}

fn draw_nodes(state: &SystemMapState, focus: &FocusMode, t: f64, ctx: &CanvasRenderingContext2d) {
	// suppressed first so emphasized pills sit on top
	for pass_emphasized in [false, true] {
		for node in state.model.nodes {
			if focus.is_node_emphasized(node.id) != pass_emphasized {
				continue;
			}
			let Some(p) = state.drawn_position(node.id) else {
				continue;
			};
			draw_node(node, p, focus, t, ctx);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(node: &NodeData, p: Point, focus: &FocusMode, t: f64, ctx: &CanvasRenderingContext2d) {
	let in_flow = matches!(focus, FocusMode::FlowStep { .. }) && focus.is_node_emphasized(node.id);
	let scale = if in_flow { 1.0 + (FLOW_SCALE - 1.0) * t } else { 1.0 };
	let alpha = if focus.is_node_suppressed(node.id) {
		1.0 - 0.7 * t
	} else {
		1.0
	};
	let (w, h) = (NODE_WIDTH * scale, pill_height(node.kind) * scale);
	let (left, top) = (p.x - w / 2.0, p.y - h / 2.0);

	ctx.set_global_alpha(alpha);
	ctx.save();
	if in_flow {
		ctx.set_shadow_color(&format!("rgba(99, 102, 241, {})", 0.3 * t));
		ctx.set_shadow_blur(20.0);
	} else {
		ctx.set_shadow_color("rgba(0, 0, 0, 0.1)");
		ctx.set_shadow_blur(6.0);
		ctx.set_shadow_offset_y(2.0);
	}
	ctx.set_fill_style_str("#ffffff");
	rounded_rect(ctx, left, top, w, h, 8.0);
	ctx.fill();
	ctx.restore();

	let border = if in_flow {
		FLOW_COLOR
	} else if focus.is_node_emphasized(node.id) {
		node.accent()
	} else {
		"#e2e8f0"
	};
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(if focus.is_focus_node(node.id) { 2.0 } else { 1.0 });
	rounded_rect(ctx, left, top, w, h, 8.0);
	ctx.stroke();

	// icon badge
	let badge = 28.0 * scale;
	let (bx, by) = (left + 12.0 * scale, top + 12.0 * scale);
	ctx.set_fill_style_str(node.accent());
	ctx.set_global_alpha(alpha * 0.15);
	rounded_rect(ctx, bx, by, badge, badge, 4.0);
	ctx.fill();
	ctx.set_global_alpha(alpha);
	ctx.set_font(&format!("bold {}px sans-serif", 12.0 * scale));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let glyph: String = node.icon.chars().take(1).collect();
	let _ = ctx.fill_text(&glyph, bx + badge / 2.0, by + badge / 2.0);

	let text_x = bx + badge + 10.0 * scale;
	ctx.set_text_align("left");
	ctx.set_fill_style_str("#0f172a");
	ctx.set_font(&format!("600 {}px sans-serif", 13.0 * scale));
	let _ = ctx.fill_text(node.label, text_x, by + 8.0 * scale);

	if let Some(file) = node.context_file {
		ctx.set_fill_style_str("#64748b");
		ctx.set_font(&format!("{}px monospace", 10.0 * scale));
		let _ = ctx.fill_text(file, text_x, by + 22.0 * scale);
	}

	if node.kind == NodeKind::Orchestrator {
		let (rx, ry) = (text_x, by + 34.0 * scale);
		ctx.set_fill_style_str("#eef2ff");
		rounded_rect(ctx, rx, ry, 110.0 * scale, 18.0 * scale, 4.0);
		ctx.fill();
		ctx.set_fill_style_str("#4338ca");
		ctx.set_font(&format!("bold {}px sans-serif", 10.0 * scale));
		let _ = ctx.fill_text("\u{25B6} RUN SCENARIOS", rx + 8.0 * scale, ry + 9.0 * scale);
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
