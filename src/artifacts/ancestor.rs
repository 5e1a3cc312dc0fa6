//! Common-ancestor search over the commit graph
//!
//! The finder is generic over a loader closure so history can come from the
//! on-disk store in production and from an in-memory map in tests. Commits are
//! loaded lazily as the search touches them; the commit directory is never
//! scanned up front.
//!
//! The search is a bidirectional BFS: one frontier per starting commit,
//! alternately advanced a node at a time, each popped node checked against the
//! other side's visited set. The result is *a* common ancestor — in
//! criss-cross topologies not necessarily the unique best one — which is
//! sufficient for two-parent merges.

use crate::artifacts::digest::Digest;
use derive_new::new;
use std::collections::{HashSet, VecDeque};

/// Parent links only; all the traversal needs.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct SlimCommit {
    pub hash: Digest,
    pub parents: Vec<Digest>,
}

#[derive(Debug)]
struct Frontier {
    queue: VecDeque<Digest>,
    visited: HashSet<Digest>,
}

impl Frontier {
    fn starting_at(start: &Digest) -> Self {
        Frontier {
            queue: VecDeque::from([start.clone()]),
            visited: HashSet::from([start.clone()]),
        }
    }
}

#[derive(new)]
pub struct CommonAncestorFinder<F>
where
    F: Fn(&Digest) -> anyhow::Result<SlimCommit>,
{
    load: F,
}

impl<F> CommonAncestorFinder<F>
where
    F: Fn(&Digest) -> anyhow::Result<SlimCommit>,
{
    pub fn find(&self, left: &Digest, right: &Digest) -> anyhow::Result<Option<Digest>> {
        if left == right {
            return Ok(Some(left.clone()));
        }

        let mut left_side = Frontier::starting_at(left);
        let mut right_side = Frontier::starting_at(right);

        while !left_side.queue.is_empty() || !right_side.queue.is_empty() {
            if let Some(found) = self.step(&mut left_side, &right_side)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.step(&mut right_side, &left_side)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }

    fn step(&self, side: &mut Frontier, other: &Frontier) -> anyhow::Result<Option<Digest>> {
        let Some(hash) = side.queue.pop_front() else {
            return Ok(None);
        };

        if other.visited.contains(&hash) {
            return Ok(Some(hash));
        }

        let commit = (self.load)(&hash)?;
        for parent in commit.parents {
            if side.visited.insert(parent.clone()) {
                side.queue.push_back(parent);
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    type CommitStore = HashMap<Digest, SlimCommit>;

    fn d(tag: &str) -> Digest {
        Digest::of_str(tag)
    }

    fn commit(store: &mut CommitStore, tag: &str, parents: &[&str]) {
        let hash = d(tag);
        store.insert(
            hash.clone(),
            SlimCommit::new(hash, parents.iter().map(|p| d(p)).collect()),
        );
    }

    fn finder(store: CommitStore) -> CommonAncestorFinder<impl Fn(&Digest) -> anyhow::Result<SlimCommit>> {
        CommonAncestorFinder::new(move |hash: &Digest| {
            store
                .get(hash)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("commit {} not in store", hash))
        })
    }

    /// root <- a <- b <- c
    #[fixture]
    fn linear_history() -> CommitStore {
        let mut store = CommitStore::new();
        commit(&mut store, "root", &[]);
        commit(&mut store, "a", &["root"]);
        commit(&mut store, "b", &["a"]);
        commit(&mut store, "c", &["b"]);
        store
    }

    /// root <- base, base <- left and base <- right
    #[fixture]
    fn simple_divergence() -> CommitStore {
        let mut store = CommitStore::new();
        commit(&mut store, "root", &[]);
        commit(&mut store, "base", &["root"]);
        commit(&mut store, "left", &["base"]);
        commit(&mut store, "right", &["base"]);
        store
    }

    /// Two merge commits that each merged the other side's branch tip.
    #[fixture]
    fn criss_cross() -> CommitStore {
        let mut store = CommitStore::new();
        commit(&mut store, "root", &[]);
        commit(&mut store, "x", &["root"]);
        commit(&mut store, "y", &["root"]);
        commit(&mut store, "left", &["x", "y"]);
        commit(&mut store, "right", &["x", "y"]);
        store
    }

    #[rstest]
    fn ancestor_of_a_descendant_is_the_ancestor(linear_history: CommitStore) {
        let finder = finder(linear_history);
        assert_eq!(finder.find(&d("a"), &d("c")).unwrap(), Some(d("a")));
    }

    #[rstest]
    fn divergent_branches_meet_at_the_fork(simple_divergence: CommitStore) {
        let finder = finder(simple_divergence);
        assert_eq!(finder.find(&d("left"), &d("right")).unwrap(), Some(d("base")));
    }

    #[rstest]
    fn identical_commits_are_their_own_ancestor(linear_history: CommitStore) {
        let finder = finder(linear_history);
        assert_eq!(finder.find(&d("b"), &d("b")).unwrap(), Some(d("b")));
    }

    #[rstest]
    fn criss_cross_yields_a_shared_parent(criss_cross: CommitStore) {
        let finder = finder(criss_cross);
        let found = finder.find(&d("left"), &d("right")).unwrap().unwrap();
        assert!(found == d("x") || found == d("y"));
    }

    #[rstest]
    fn disjoint_histories_have_no_ancestor() {
        let mut store = CommitStore::new();
        commit(&mut store, "a", &[]);
        commit(&mut store, "b", &[]);
        let finder = finder(store);
        assert_eq!(finder.find(&d("a"), &d("b")).unwrap(), None);
    }

    #[rstest]
    #[case("left", "right")]
    #[case("a", "c")]
    #[case("root", "c")]
    fn search_is_symmetric_in_its_arguments(
        #[case] first: &str,
        #[case] second: &str,
        linear_history: CommitStore,
        simple_divergence: CommitStore,
    ) {
        let mut store = linear_history;
        store.extend(simple_divergence);
        let finder = finder(store);

        assert_eq!(
            finder.find(&d(first), &d(second)).unwrap(),
            finder.find(&d(second), &d(first)).unwrap()
        );
    }
}
