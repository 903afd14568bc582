//! Lazy commit listing
//!
//! ## Ordering
//!
//! The walk keeps a frontier of commits that have been discovered but not produced yet and
//! always produces the newest one, ties broken by discovery order. On a linear history this is
//! plain reverse-chronological order; on merges it is date order, so the parents of a merge
//! come out after the merge as long as commit clocks are not skewed.
//!
//! ## Laziness
//!
//! Nothing beyond the starting commits is read up front. The parents of a produced commit are
//! only loaded when the next item is pulled, so memory holds the frontier plus the set of
//! commit IDs already seen, and stopping early never touches older history.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

/// A discovered commit waiting in the frontier
struct Queued {
    timestamp: DateTime<FixedOffset>,
    order: usize,
    oid: ObjectId,
    commit: Commit,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

pub struct RevList<'r> {
    database: &'r Database,
    seen: HashSet<ObjectId>,
    frontier: BinaryHeap<Queued>,
    /// Parents of the last produced commit, loaded on the next pull
    unexpanded: Vec<ObjectId>,
    failed: bool,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, starts: &[ObjectId]) -> anyhow::Result<Self> {
        let mut rev_list = RevList {
            database,
            seen: HashSet::new(),
            frontier: BinaryHeap::new(),
            unexpanded: Vec::new(),
            failed: false,
        };

        for start in starts {
            rev_list.enqueue(start)?;
        }

        Ok(rev_list)
    }

    fn enqueue(&mut self, oid: &ObjectId) -> anyhow::Result<()> {
        if !self.seen.insert(oid.clone()) {
            return Ok(());
        }

        let commit = self.database.parse_object_as_commit(oid)?;
        self.frontier.push(Queued {
            timestamp: commit.author().timestamp(),
            order: self.seen.len(),
            oid: oid.clone(),
            commit,
        });
        trace!(%oid, frontier = self.frontier.len(), "queued commit");

        Ok(())
    }

    fn expand(&mut self) -> anyhow::Result<()> {
        for parent in std::mem::take(&mut self.unexpanded) {
            self.enqueue(&parent)?;
        }

        Ok(())
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if let Err(err) = self.expand() {
            self.failed = true;
            return Some(Err(err));
        }

        let Queued { oid, commit, .. } = self.frontier.pop()?;
        self.unexpanded = commit.parents().to_vec();

        Some(Ok((oid, commit)))
    }
}
