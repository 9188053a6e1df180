use crate::types::{Scholar, ScholarId};

use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_END_DEPTH: u32 = 15;
pub const DEFAULT_WAIT: Duration = Duration::from_millis(2500);
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub start_id: ScholarId,
    /// Stop once this record's generation has been fully collected.
    pub end_id: Option<ScholarId>,
    /// Deepest generation to visit while `end_id` has not been found.
    pub end_depth: u32,
    pub wait: Duration,
}

impl CrawlConfig {
    pub fn new(start_id: ScholarId) -> Self {
        Self {
            start_id,
            end_id: None,
            end_depth: DEFAULT_END_DEPTH,
            wait: DEFAULT_WAIT,
        }
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.start_id == 0 {
            return Err("Start ID must be greater than 0".to_string());
        }
        if self.end_id.is_some_and(|id| id == 0) {
            return Err("End ID must be greater than 0".to_string());
        }
        if self.end_depth == 0 {
            return Err("End depth must be greater than 0".to_string());
        }
        if self.wait > MAX_WAIT {
            return Err(format!(
                "Wait must be at most {} seconds",
                MAX_WAIT.as_secs()
            ));
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub struct LineageStats {
    /// Record count per generation, in generation order.
    pub per_level: BTreeMap<u32, usize>,
    pub total: usize,
}

impl LineageStats {
    pub fn from_scholars(scholars: &[Scholar]) -> LineageStats {
        let mut per_level = BTreeMap::new();
        for scholar in scholars {
            *per_level.entry(scholar.level).or_insert(0) += 1;
        }

        LineageStats {
            per_level,
            total: scholars.len(),
        }
    }
}

impl std::fmt::Display for LineageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        for (level, count) in &self.per_level {
            writeln!(f, "  Generation {:<3} {}", format!("{}:", level), count)?;
        }
        writeln!(f, "  Total:         {}", self.total)
    }
}
