use leptos::prelude::*;

use crate::components::relation_graph::{
	ComparisonStats, RelationGraphCanvas, StatsMap, analysis, pair_key,
};

/// Item universe for the demo relation.
const ITEMS: &[&str] = &[
	"bread", "cake", "cookie", "pastry", "pie", "roll", "muffin", "donut", "brownie", "biscuit",
	"scone", "cracker", "tortilla", "crepe", "pancake", "waffle", "pita",
];

/// Generate deterministic sample tallies standing in for the voting
/// backend's retrieval endpoint.
fn generate_sample_stats(items: &[&str]) -> StatsMap {
	let mut stats = StatsMap::new();
	for (i, source) in items.iter().enumerate() {
		for (j, target) in items.iter().enumerate() {
			if i == j {
				continue;
			}
			let seed = i * items.len() + j;
			let yes = (rand_simple(seed) * 12.0) as u32;
			let no = (rand_simple(seed + 7919) * 12.0) as u32;
			if yes + no > 0 {
				stats.insert(pair_key(source, target), ComparisonStats { yes, no });
			}
		}
	}
	stats
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let sample = generate_sample_stats(ITEMS);
	let digest = analysis::digest(&sample);

	let items = Signal::derive(|| ITEMS.iter().map(ToString::to_string).collect::<Vec<_>>());
	let stats = Signal::derive(move || sample.clone());

	let generic_line = digest
		.most_generic
		.map(|f| format!("Most generic: {} has {} different subtypes", f.item, f.count));
	let versatile_line = digest.most_versatile.map(|f| {
		format!(
			"Most versatile: {} is classified as {} different types",
			f.item, f.count
		)
	});
	let controversial_line = digest.most_controversial.map(|f| {
		format!(
			"Most controversial: is a {} a type of {}? {} say yes, {} say no ({}% yes)",
			f.source, f.target, f.stats.yes, f.stats.no, f.percentage
		)
	});
	let clear_cut_line = digest.most_clear_cut.map(|f| {
		format!(
			"Most clear-cut: {}% agree that a {} is a type of {} ({} vs {})",
			f.percentage, f.source, f.target, f.stats.yes, f.stats.no
		)
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<RelationGraphCanvas items=items stats=stats fullscreen=true />
				<div class="graph-overlay">
					<h1>"Relationship Graph"</h1>
					<p class="subtitle">
						"Arrows point from the subtype to the supertype. Drag nodes to reposition; hover one to inspect its neighborhood."
					</p>
					{generic_line.map(|line| view! { <p>{line}</p> })}
					{versatile_line.map(|line| view! { <p>{line}</p> })}
					{controversial_line.map(|line| view! { <p>{line}</p> })}
					{clear_cut_line.map(|line| view! { <p>{line}</p> })}
				</div>
			</div>
		</ErrorBoundary>
	}
}
