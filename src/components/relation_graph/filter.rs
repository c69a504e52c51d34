use super::types::{GraphLink, StatsMap, pair_key};

/// Pairs whose net favorable count sits more than two standard deviations
/// below the mean are dropped as noise; everything else is kept.
const Z_SCORE_FLOOR: f64 = -2.0;

/// Build the displayed edge set from raw vote tallies.
///
/// Only ordered pairs with more yes- than no-votes are candidates; their net
/// counts form the sample against which each candidate is z-scored.
pub fn significant_links(items: &[String], stats: &StatsMap) -> Vec<GraphLink> {
	// First pass: collect net counts for the whole relation
	let mut values: Vec<f64> = Vec::new();
	for source in items {
		for target in items {
			if source != target {
				if let Some(net) = net_favorable(stats, source, target) {
					values.push(f64::from(net));
				}
			}
		}
	}

	if values.is_empty() {
		return Vec::new();
	}
	let (mean, std_dev) = mean_std_dev(&values);

	// Second pass: keep everything above the z-score floor
	let mut links = Vec::new();
	for source in items {
		for target in items {
			if source == target {
				continue;
			}
			let Some(net) = net_favorable(stats, source, target) else {
				continue;
			};
			let z_score = (f64::from(net) - mean) / std_dev;
			if z_score > Z_SCORE_FLOOR {
				links.push(GraphLink {
					source: source.clone(),
					target: target.clone(),
					value: net,
				});
			}
		}
	}
	links
}

fn net_favorable(stats: &StatsMap, source: &str, target: &str) -> Option<u32> {
	let tally = stats.get(&pair_key(source, target))?;
	(tally.yes > tally.no).then(|| tally.yes - tally.no)
}

/// Mean and population standard deviation, with 1 substituted for a zero
/// deviation so callers can divide unconditionally.
pub(super) fn mean_std_dev(values: &[f64]) -> (f64, f64) {
	let mean = values.iter().sum::<f64>() / values.len() as f64;
	let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
	let std_dev = variance.sqrt();
	(mean, if std_dev == 0.0 { 1.0 } else { std_dev })
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::super::types::{ComparisonStats, GraphLink, StatsMap, pair_key};
	use super::*;

	fn items(names: &[&str]) -> Vec<String> {
		names.iter().map(ToString::to_string).collect()
	}

	fn stats(entries: &[(&str, &str, u32, u32)]) -> StatsMap {
		entries
			.iter()
			.map(|&(source, target, yes, no)| {
				(pair_key(source, target), ComparisonStats { yes, no })
			})
			.collect()
	}

	#[test]
	fn one_sided_pair_yields_a_single_link() {
		let items = items(&["bread", "pastry"]);
		let stats = stats(&[("bread", "pastry", 8, 1), ("pastry", "bread", 1, 7)]);

		let links = significant_links(&items, &stats);
		assert_eq!(
			links,
			vec![GraphLink {
				source: "bread".into(),
				target: "pastry".into(),
				value: 7,
			}]
		);
	}

	#[test]
	fn reciprocated_pairs_keep_both_directions() {
		let items = items(&["cookie", "pastry"]);
		let stats = stats(&[("cookie", "pastry", 6, 1), ("pastry", "cookie", 5, 2)]);

		let links = significant_links(&items, &stats);
		assert_eq!(links.len(), 2);
		assert!(
			links
				.iter()
				.any(|l| l.source == "cookie" && l.target == "pastry" && l.value == 5)
		);
		assert!(
			links
				.iter()
				.any(|l| l.source == "pastry" && l.target == "cookie" && l.value == 3)
		);
	}

	#[test]
	fn low_outlier_is_dropped_at_the_floor() {
		// Nets are [10, 10, 10, 10, 1]; the last one z-scores to exactly -2,
		// which the strict floor excludes.
		let items = items(&["a", "b", "c", "d", "e", "f"]);
		let stats = stats(&[
			("a", "b", 11, 1),
			("b", "c", 12, 2),
			("c", "d", 10, 0),
			("d", "e", 13, 3),
			("e", "f", 2, 1),
		]);

		let links = significant_links(&items, &stats);
		assert_eq!(links.len(), 4);
		assert!(!links.iter().any(|l| l.source == "e"));
	}

	#[test]
	fn empty_stats_produce_no_links() {
		let items = items(&["bread", "cake", "pie"]);
		assert_eq!(significant_links(&items, &StatsMap::new()), vec![]);
	}

	#[test]
	fn ties_and_losses_are_not_candidates() {
		let items = items(&["bread", "cake"]);
		let stats = stats(&[("bread", "cake", 4, 4), ("cake", "bread", 2, 5)]);
		assert_eq!(significant_links(&items, &stats), vec![]);
	}

	#[test]
	fn uniform_sample_survives_zero_deviation() {
		// All nets equal: the deviation degenerates to 0 and is replaced by 1,
		// so every candidate z-scores to 0 and stays.
		let items = items(&["a", "b", "c"]);
		let stats = stats(&[("a", "b", 5, 2), ("b", "c", 6, 3)]);

		let links = significant_links(&items, &stats);
		assert_eq!(links.len(), 2);
		assert!(links.iter().all(|l| l.value == 3));
	}

	#[test]
	fn mean_std_dev_is_population_based() {
		let (mean, std_dev) = mean_std_dev(&[5.0, 3.0]);
		assert_eq!(mean, 4.0);
		assert_eq!(std_dev, 1.0);
	}
}
