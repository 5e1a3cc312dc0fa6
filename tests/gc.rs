mod common;

fn object_count(dir: &std::path::Path, kind: &str) -> usize {
    let path = dir.join(".vit/objects").join(kind);
    if !path.is_dir() {
        return 0;
    }
    std::fs::read_dir(path).unwrap().count()
}

#[test]
fn gc_removes_commits_orphaned_by_a_reset() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "v1\n");
    common::commit_all(dir.path(), "v1");
    let first = common::branch_tip(dir.path(), "main");

    common::write_file(dir.path(), "notes.txt", "v2\n");
    common::commit_all(dir.path(), "v2");
    let orphan = common::branch_tip(dir.path(), "main");

    common::run(dir.path(), &["reset", "--hard", &first]);
    let output = common::run(dir.path(), &["gc"]);

    assert!(output.contains("Removed 1 commits"));
    assert!(!dir.path().join(".vit/objects/commits").join(&orphan).exists());
    assert!(dir.path().join(".vit/objects/commits").join(&first).exists());

    // the surviving history still checks out
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "v1\n");
    let log = common::run(dir.path(), &["log"]);
    assert!(log.contains("v1"));
    assert!(!log.contains("v2"));
}

#[test]
fn gc_on_a_fully_reachable_store_removes_nothing() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "v1\n");
    common::commit_all(dir.path(), "v1");

    let commits = object_count(dir.path(), "commits");
    let trees = object_count(dir.path(), "trees");
    let blobs = object_count(dir.path(), "blobs");

    let output = common::run(dir.path(), &["gc"]);
    assert_eq!(output, "Removed 0 commits, 0 trees, 0 blobs\n");

    assert_eq!(object_count(dir.path(), "commits"), commits);
    assert_eq!(object_count(dir.path(), "trees"), trees);
    assert_eq!(object_count(dir.path(), "blobs"), blobs);
}

#[test]
fn gc_keeps_objects_reachable_only_through_the_stash() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "committed\n");
    common::commit_all(dir.path(), "notes");

    common::write_file(dir.path(), "notes.txt", "stashed edit\n");
    common::run(dir.path(), &["stash"]);

    common::run(dir.path(), &["gc"]);

    common::run(dir.path(), &["stash", "--pop"]);
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "stashed edit\n");
}

#[test]
fn gc_keeps_blobs_staged_but_not_yet_committed() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "staged.txt", "staged before gc\n");
    common::run(dir.path(), &["add", "staged.txt"]);

    let output = common::run(dir.path(), &["gc"]);
    assert_eq!(output, "Removed 0 commits, 0 trees, 0 blobs\n");

    // the staged snapshot still commits and checks out afterwards
    common::run(dir.path(), &["commit", "-m", "staged file"]);
    common::write_file(dir.path(), "staged.txt", "scribbles\n");
    common::run(dir.path(), &["restore", "staged.txt"]);
    assert_eq!(
        common::read_file(dir.path(), "staged.txt"),
        "staged before gc\n"
    );
}

#[test]
fn gc_removes_blobs_only_staged_then_unstaged() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "draft.txt", "never committed\n");
    common::run(dir.path(), &["add", "draft.txt"]);
    common::run(dir.path(), &["unstage", "draft.txt"]);

    let output = common::run(dir.path(), &["gc"]);
    assert!(output.contains("1 blobs"));
}
