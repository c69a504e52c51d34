//! Headline facts derived from the raw tallies, shown alongside the graph.

use super::types::{ComparisonStats, StatsMap};

/// Pairs need this many votes before "controversial" means anything.
const CONTROVERSIAL_MIN_VOTES: u32 = 10;
const CLEAR_CUT_MIN_VOTES: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFact {
	pub item: String,
	pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairFact {
	pub source: String,
	pub target: String,
	pub stats: ComparisonStats,
	/// Rounded whole-number percentage of favorable votes.
	pub percentage: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsDigest {
	/// Item with the most distinct incoming subtype relationships.
	pub most_generic: Option<ItemFact>,
	/// Item classified as a subtype of the most distinct targets.
	pub most_versatile: Option<ItemFact>,
	/// Pair with ≥ 10 votes whose split is closest to 50/50.
	pub most_controversial: Option<PairFact>,
	/// Pair with ≥ 5 votes and the highest agreement ratio.
	pub most_clear_cut: Option<PairFact>,
}

pub fn digest(stats: &StatsMap) -> StatsDigest {
	StatsDigest {
		most_generic: relationship_counts(stats, |_, target| target),
		most_versatile: relationship_counts(stats, |source, _| source),
		most_controversial: most_controversial(stats),
		most_clear_cut: most_clear_cut(stats),
	}
}

fn yes_percentage(yes: u32, no: u32) -> u32 {
	let total = yes + no;
	if total == 0 {
		0
	} else {
		(f64::from(yes) / f64::from(total) * 100.0).round() as u32
	}
}

/// Count `yes > no` relationships per item, keyed by whichever end `pick`
/// selects, and return the item with the most.
fn relationship_counts<'a>(
	stats: &'a StatsMap,
	pick: fn(&'a str, &'a str) -> &'a str,
) -> Option<ItemFact> {
	let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
	for (key, tally) in stats {
		let Some((source, target)) = key.split_once('-') else {
			continue;
		};
		if tally.yes > tally.no {
			*counts.entry(pick(source, target)).or_default() += 1;
		}
	}
	counts
		.into_iter()
		.max_by_key(|&(_, count)| count)
		.map(|(item, count)| ItemFact {
			item: item.to_owned(),
			count,
		})
}

fn most_controversial(stats: &StatsMap) -> Option<PairFact> {
	let mut closest: Option<PairFact> = None;
	let mut smallest_diff = u32::MAX;
	for (key, tally) in stats {
		if tally.total() < CONTROVERSIAL_MIN_VOTES {
			continue;
		}
		let Some((source, target)) = key.split_once('-') else {
			continue;
		};
		let percentage = yes_percentage(tally.yes, tally.no);
		let diff_from_50 = percentage.abs_diff(50);
		if diff_from_50 < smallest_diff {
			smallest_diff = diff_from_50;
			closest = Some(PairFact {
				source: source.to_owned(),
				target: target.to_owned(),
				stats: *tally,
				percentage,
			});
		}
	}
	closest
}

fn most_clear_cut(stats: &StatsMap) -> Option<PairFact> {
	let mut clearest: Option<PairFact> = None;
	let mut highest_ratio = 0.0_f64;
	for (key, tally) in stats {
		if tally.total() < CLEAR_CUT_MIN_VOTES {
			continue;
		}
		let Some((source, target)) = key.split_once('-') else {
			continue;
		};
		let ratio = f64::from(tally.yes) / f64::from(tally.total());
		if ratio > highest_ratio {
			highest_ratio = ratio;
			// report the winning side's share either way around
			let percentage = if tally.yes > tally.no {
				yes_percentage(tally.yes, tally.no)
			} else {
				yes_percentage(tally.no, tally.yes)
			};
			clearest = Some(PairFact {
				source: source.to_owned(),
				target: target.to_owned(),
				stats: *tally,
				percentage,
			});
		}
	}
	clearest
}
