use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::digest::Digest;
use crate::artifacts::merge::state::MergeState;
use std::collections::{BTreeSet, VecDeque};
use std::io::Write;

impl Repository {
    /// Drop every object unreachable from a root: branch tips, a detached
    /// HEAD, the merge marker's tips and the stash chain (including the
    /// commits stash entries were taken on).
    pub fn gc(&self) -> anyhow::Result<()> {
        let mut commit_queue = VecDeque::new();
        for branch in self.refs().all_branches()? {
            commit_queue.push_back(branch.commit_hash);
        }
        if let HeadState::Detached {
            commit, orig_head, ..
        } = self.refs().head_state()?
        {
            commit_queue.push_back(commit);
            commit_queue.push_back(orig_head);
        }
        if let MergeState::Conflict { left, right } = self.merge_state()? {
            commit_queue.push_back(left);
            commit_queue.push_back(right);
        }

        // the stash chain roots both its own trees and its base commits
        let mut live_stash = BTreeSet::new();
        let mut stash_trees = Vec::new();
        let mut next = self.refs().stash_head()?;
        while let Some(hash) = next {
            let stash = self.database().load_stash_commit(&hash)?;
            stash_trees.push(stash.commit().tree_hash().clone());
            commit_queue.push_back(stash.base_commit_hash().clone());
            next = stash.previous().cloned();
            live_stash.insert(hash);
        }

        let mut live_commits = BTreeSet::new();
        while let Some(hash) = commit_queue.pop_front() {
            if !live_commits.insert(hash.clone()) {
                continue;
            }
            let commit = self.database().load_commit(&hash)?;
            commit_queue.extend(commit.parents().iter().cloned());
        }

        let mut live_trees = BTreeSet::new();
        let mut live_blobs = BTreeSet::new();
        let snapshots = self.snapshots();
        for hash in &live_commits {
            let commit = self.database().load_commit(hash)?;
            snapshots.tree_closure(commit.tree_hash(), &mut live_trees, &mut live_blobs)?;
        }
        for tree_hash in &stash_trees {
            snapshots.tree_closure(tree_hash, &mut live_trees, &mut live_blobs)?;
        }
        // staged-but-uncommitted blobs are live through the index
        for record in self.index().records().values() {
            live_blobs.insert(record.blob_hash().clone());
        }

        let all_trees = self.database().all_trees()?;

        let mut removed_commits = 0usize;
        for hash in self.database().all_commits()?.difference(&live_commits) {
            let commit = self.database().load_commit(hash)?;
            snapshots.delete_tree(commit.tree_hash(), &live_trees)?;
            self.database().delete_commit(hash)?;
            removed_commits += 1;
        }
        for hash in collect_dead(self.database().all_stash_commits()?, &live_stash) {
            self.database().delete_stash_commit(&hash)?;
        }

        // trees under dead commits are already gone; sweep the rest flat
        let mut removed_trees = 0usize;
        for hash in all_trees.difference(&live_trees) {
            if self.database().tree_exists(hash) {
                self.database().delete_tree_node(hash)?;
            }
            removed_trees += 1;
        }
        let mut removed_blobs = 0usize;
        for hash in collect_dead(self.database().all_blobs()?, &live_blobs) {
            self.database().delete_blob(&hash)?;
            removed_blobs += 1;
        }

        writeln!(
            self.writer(),
            "Removed {removed_commits} commits, {removed_trees} trees, {removed_blobs} blobs"
        )?;
        Ok(())
    }
}

fn collect_dead(all: BTreeSet<Digest>, live: &BTreeSet<Digest>) -> Vec<Digest> {
    all.difference(live).cloned().collect()
}
