use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Numeric record identifier, as used in `id.php?id=<n>`.
pub type ScholarId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholar {
    pub name: String,
    pub id: ScholarId,
    pub university: String,
    pub year: String,
    pub degree_type: String,
    pub nationality: String,
    /// Generation relative to the starting record, which is level 1.
    pub level: u32,
    pub url: String,
    pub advisors: Vec<ScholarId>,
}

impl Scholar {
    /// Advisor IDs joined the way they appear in the `descended_from` column.
    pub fn descended_from(&self) -> String {
        self.advisors
            .iter()
            .map(ScholarId::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Scholar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[L{}] {} ({})", self.level, self.name, self.id)?;

        let degree = [
            self.degree_type.as_str(),
            self.university.as_str(),
            self.year.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        if !degree.is_empty() {
            write!(f, " - {}", degree)?;
        }
        if !self.nationality.is_empty() {
            write!(f, " [{}]", self.nationality)?;
        }
        if !self.advisors.is_empty() {
            write!(f, "\n     Advisors: {}", self.descended_from())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum StopReason {
    /// The end record was reached and its whole generation was collected.
    TargetFound { id: ScholarId, level: u32 },
    /// No end record was found within the depth limit.
    DepthLimit { depth: u32 },
    /// Every reachable advisor was visited.
    Exhausted,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::TargetFound { id, level } => write!(
                f,
                "target {} found at generation {}; collected every record up to that generation",
                id, level
            ),
            StopReason::DepthLimit { depth } => write!(
                f,
                "target not found; collected every record up to the depth limit ({})",
                depth
            ),
            StopReason::Exhausted => write!(f, "no advisors left to visit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub scholars: Vec<Scholar>,
    pub failed: Vec<ScholarId>,
    pub stop: StopReason,
}

impl Display for Lineage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} record(s)", self.scholars.len())?;
        if !self.failed.is_empty() {
            let failed = self
                .failed
                .iter()
                .map(ScholarId::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "│  Failed: {}", failed)?;
        }
        writeln!(f, "└─ Stopped: {}", self.stop)?;
        writeln!(f)?;
        for (i, scholar) in self.scholars.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, scholar)?;
        }
        Ok(())
    }
}
