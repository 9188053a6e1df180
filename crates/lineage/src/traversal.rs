//! Breadth-first frontier over advisor links.
//!
//! The frontier owns the queue and the visited set and decides when a crawl
//! stops. It never touches the network; the scraper drives it.

use std::collections::{HashSet, VecDeque};

use crate::types::{ScholarId, StopReason};

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<(ScholarId, u32)>,
    visited: HashSet<ScholarId>,
    end_id: Option<ScholarId>,
    end_depth: u32,
    target_level: Option<u32>,
    halted_at_depth: bool,
}

impl Frontier {
    pub fn new(start_id: ScholarId, end_id: Option<ScholarId>, end_depth: u32) -> Self {
        Self {
            queue: VecDeque::from([(start_id, 1)]),
            visited: HashSet::new(),
            end_id,
            end_depth,
            target_level: None,
            halted_at_depth: false,
        }
    }

    /// Next record to fetch with its generation, or `None` once the crawl is over.
    ///
    /// Returned IDs are marked visited immediately, so a page that later fails
    /// to load is not retried.
    pub fn next_visit(&mut self) -> Option<(ScholarId, u32)> {
        while let Some((id, level)) = self.queue.pop_front() {
            match self.target_level {
                Some(target_level) if level > target_level => {
                    self.queue.clear();
                    return None;
                }
                None if level > self.end_depth => {
                    self.halted_at_depth = true;
                    self.queue.clear();
                    return None;
                }
                _ => {}
            }

            if !self.visited.insert(id) {
                log::debug!("Skipping already visited record {}", id);
                continue;
            }

            return Some((id, level));
        }

        None
    }

    /// Feed back a successfully parsed record and enqueue its advisors.
    pub fn record(&mut self, id: ScholarId, level: u32, advisors: &[ScholarId]) {
        if self.target_level.is_none() && self.end_id == Some(id) {
            log::info!("Found target record {} at generation {}", id, level);
            self.target_level = Some(level);
        }

        for &advisor in advisors {
            if !self.visited.contains(&advisor) {
                self.queue.push_back((advisor, level + 1));
            }
        }
    }

    pub fn target_level(&self) -> Option<u32> {
        self.target_level
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn finish(self) -> StopReason {
        match (self.end_id, self.target_level) {
            (Some(id), Some(level)) => StopReason::TargetFound { id, level },
            _ if self.halted_at_depth => StopReason::DepthLimit {
                depth: self.end_depth,
            },
            _ => StopReason::Exhausted,
        }
    }
}
