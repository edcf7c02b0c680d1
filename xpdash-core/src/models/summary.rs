use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One point of the running xp total. `x` serializes as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub x: DateTime<Utc>,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillSummary {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project: String,
    pub xp: i64,
}

/// Attempt counts per exercise, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptCounts {
    entries: Vec<(String, u32)>,
}

impl AttemptCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, exercise: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == exercise) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((exercise.to_string(), 1)),
        }
    }

    pub fn get(&self, exercise: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == exercise)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttemptCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttemptStats {
    pub pass: u32,
    pub fail: u32,
    pub attempts: AttemptCounts,
}

impl AttemptStats {
    pub fn total(&self) -> u32 {
        self.pass + self.fail
    }
}
