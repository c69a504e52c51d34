use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComparisonStats {
	pub yes: u32,
	pub no: u32,
}

impl ComparisonStats {
	pub fn total(&self) -> u32 {
		self.yes + self.no
	}
}

/// Vote tallies keyed by `"source-target"` composite keys.
pub type StatsMap = HashMap<String, ComparisonStats>;

pub fn pair_key(source: &str, target: &str) -> String {
	format!("{source}-{target}")
}

/// A significant directed relationship: `source` is a subtype of `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub value: u32,
}
