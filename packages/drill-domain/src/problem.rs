use std::{cmp::Ordering, collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type ProblemId = i64;

#[derive(Clone, Debug)]
pub struct Problem {
	pub id: ProblemId,
	pub title: String,
	pub tags: Vec<String>,
	/// Raw difficulty label as stored in the catalog. Compared case-insensitively.
	pub difficulty: String,
	pub embedding: Option<Vec<f32>>,
	/// Submission count.
	pub popularity: u64,
	pub created_at: OffsetDateTime,
}
impl Problem {
	/// Severity rank used by the tag-only ordering. Unknown labels sort after `hard`.
	pub fn severity(&self) -> u8 {
		self.difficulty.parse::<Difficulty>().map(Difficulty::severity).unwrap_or(u8::MAX)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	Easy,
	Medium,
	Hard,
}
impl Difficulty {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Easy => "easy",
			Self::Medium => "medium",
			Self::Hard => "hard",
		}
	}

	pub fn severity(self) -> u8 {
		match self {
			Self::Easy => 0,
			Self::Medium => 1,
			Self::Hard => 2,
		}
	}
}
impl FromStr for Difficulty {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"easy" => Ok(Self::Easy),
			"medium" => Ok(Self::Medium),
			"hard" => Ok(Self::Hard),
			other => Err(format!("Unknown difficulty {other:?}.")),
		}
	}
}
impl fmt::Display for Difficulty {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl PartialOrd for Difficulty {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for Difficulty {
	fn cmp(&self, other: &Self) -> Ordering {
		self.severity().cmp(&other.severity())
	}
}

/// Canonical form of a difficulty label for equality checks: trimmed and lowercased.
pub fn normalize_difficulty(label: &str) -> String {
	label.trim().to_lowercase()
}

/// Trims labels, drops empty ones, and collapses duplicates keeping the first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for tag in tags {
		let trimmed = tag.as_ref().trim();

		if trimmed.is_empty() {
			continue;
		}
		if seen.insert(trimmed.to_string()) {
			out.push(trimmed.to_string());
		}
	}

	out
}
