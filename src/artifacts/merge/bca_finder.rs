//! Best common ancestor lookup
//!
//! ## Algorithm
//!
//! Both commits are walked at once, newest first, painting every commit with the side(s) it
//! was reached from. A commit painted from both sides is a common ancestor; its parents are
//! marked stale since anything below it can only be a worse answer. The remaining candidates
//! are then filtered with the best common ancestor rule:
//!
//! > a best common ancestor of X and Y is a common ancestor of X and Y that is not an
//! > ancestor of any other common ancestor.
//!
//! When several best ancestors remain (criss-cross histories) the newest one is returned,
//! ties broken by object ID, so the answer is deterministic.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::trace;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const FROM_SOURCE = 0b0001;
        const FROM_TARGET = 0b0010;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
        const STALE = 0b0100;
        const RESULT = 0b1000;
    }
}

/// Finds merge bases over any commit source
///
/// The loader returns the parents and timestamp of a commit; the database-backed loader is
/// `Database::load_slim_commit`.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        BCAFinder { commit_loader }
    }

    /// The best common ancestor of two commits, or `None` for unrelated histories
    pub fn find_best_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let candidates = self.find_common_ancestors(source, target)?;
        trace!(candidates = candidates.len(), "found common ancestors");

        let mut best = Vec::new();
        for candidate in &candidates {
            let mut redundant = false;
            for other in candidates.iter().filter(|other| *other != candidate) {
                if self.is_ancestor(candidate, other)? {
                    redundant = true;
                    break;
                }
            }

            if !redundant {
                best.push((self.load(candidate)?.timestamp, candidate.clone()));
            }
        }

        best.sort_by(|(a_time, a_oid), (b_time, b_oid)| {
            b_time.cmp(a_time).then_with(|| a_oid.cmp(b_oid))
        });

        Ok(best.into_iter().next().map(|(_, oid)| oid))
    }

    fn find_common_ancestors(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<HashSet<ObjectId>> {
        if source == target {
            return Ok(HashSet::from([source.clone()]));
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut queue = BinaryHeap::<(DateTime<FixedOffset>, ObjectId)>::new();

        for (oid, side) in [(source, VisitState::FROM_SOURCE), (target, VisitState::FROM_TARGET)] {
            states.insert(oid.clone(), side);
            queue.push((self.load(oid)?.timestamp, oid.clone()));
        }

        while let Some((_, oid)) = queue.pop() {
            let mut state = states.get(&oid).copied().unwrap_or(VisitState::empty());
            if state.contains(VisitState::STALE) {
                continue;
            }

            if state.contains(VisitState::FROM_BOTH) {
                state |= VisitState::RESULT;
                states.insert(oid.clone(), state);
            }
            trace!(%oid, ?state, "visiting commit");

            let inherited = if state.contains(VisitState::RESULT) {
                (state & VisitState::FROM_BOTH) | VisitState::STALE
            } else {
                state & VisitState::FROM_BOTH
            };

            for parent in self.load(&oid)?.parents {
                let parent_state = states.get(&parent).copied().unwrap_or(VisitState::empty());
                if parent_state.contains(inherited) {
                    continue;
                }

                states.insert(parent.clone(), parent_state | inherited);
                queue.push((self.load(&parent)?.timestamp, parent));
            }
        }

        Ok(states
            .into_iter()
            .filter(|(_, state)| {
                state.contains(VisitState::RESULT) && !state.contains(VisitState::STALE)
            })
            .map(|(oid, _)| oid)
            .collect())
    }

    /// Whether `ancestor` is reachable from `descendant` through parent links
    fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        let mut seen = HashSet::new();
        let mut pending = vec![descendant.clone()];

        while let Some(oid) = pending.pop() {
            if &oid == ancestor {
                return Ok(true);
            }
            if !seen.insert(oid.clone()) {
                continue;
            }

            pending.extend(self.load(&oid)?.parents);
        }

        Ok(false)
    }

    fn load(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        (self.commit_loader)(oid)
    }
}
