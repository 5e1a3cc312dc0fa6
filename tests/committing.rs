use predicates::prelude::predicate;

mod common;

#[test]
fn commit_reports_branch_short_digest_and_message() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "hello\n");
    common::run(dir.path(), &["add", "notes.txt"]);

    let output = common::run(dir.path(), &["commit", "-m", "add notes"]);
    let tip = common::branch_tip(dir.path(), "main");
    assert_eq!(output, format!("[main {}] add notes\n", &tip[..7]));
}

#[test]
fn committing_an_unchanged_index_is_refused() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "hello\n");
    common::commit_all(dir.path(), "add notes");
    let tip_before = common::branch_tip(dir.path(), "main");

    common::vit(dir.path())
        .args(["commit", "-m", "nothing new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit"));

    assert_eq!(common::branch_tip(dir.path(), "main"), tip_before);
}

#[test]
fn multi_line_messages_are_flattened() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "hello\n");
    common::run(dir.path(), &["add", "notes.txt"]);

    let output = common::run(dir.path(), &["commit", "-m", "first line\nsecond line"]);
    assert!(output.contains("first line second line"));
}

#[test]
fn log_walks_history_back_to_the_root_commit() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "a.txt", "a\n");
    common::commit_all(dir.path(), "first");
    common::write_file(dir.path(), "b.txt", "b\n");
    common::commit_all(dir.path(), "second");

    let log = common::run(dir.path(), &["log"]);
    let second = log.find("second").expect("second commit is listed");
    let first = log.find("first").expect("first commit is listed");
    let root = log.find("root commit").expect("root commit is listed");
    assert!(second < first && first < root);
}

#[test]
fn restore_rewrites_a_file_from_its_staged_blob() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "committed\n");
    common::commit_all(dir.path(), "add notes");

    common::write_file(dir.path(), "notes.txt", "scribbles\n");
    common::run(dir.path(), &["restore", "notes.txt"]);

    assert_eq!(common::read_file(dir.path(), "notes.txt"), "committed\n");
}

#[test]
fn hard_reset_moves_head_and_rewrites_the_working_tree() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "v1\n");
    common::commit_all(dir.path(), "v1");
    let first = common::branch_tip(dir.path(), "main");

    common::write_file(dir.path(), "notes.txt", "v2\n");
    common::commit_all(dir.path(), "v2");

    let output = common::run(dir.path(), &["reset", "--hard", &first]);
    assert!(output.contains(&format!("HEAD is now at {}", &first[..7])));
    assert_eq!(common::branch_tip(dir.path(), "main"), first);
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "v1\n");
}

#[test]
fn soft_reset_leaves_index_and_working_tree_alone() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "v1\n");
    common::commit_all(dir.path(), "v1");
    let first = common::branch_tip(dir.path(), "main");

    common::write_file(dir.path(), "notes.txt", "v2\n");
    common::commit_all(dir.path(), "v2");

    common::run(dir.path(), &["reset", "--soft", &first]);
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "v2\n");

    // the v2 snapshot is still staged, so it shows against the moved HEAD
    let status = common::run(dir.path(), &["status"]);
    assert!(status.contains("modified: notes.txt"));
}

#[test]
fn mixed_reset_resets_the_index_but_not_the_working_tree() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "v1\n");
    common::commit_all(dir.path(), "v1");
    let first = common::branch_tip(dir.path(), "main");

    common::write_file(dir.path(), "notes.txt", "v2\n");
    common::commit_all(dir.path(), "v2");

    let output = common::run(dir.path(), &["reset", "--mixed", &first]);
    assert!(output.contains(&format!("HEAD is now at {}", &first[..7])));
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "v2\n");

    // the index matches the moved HEAD, so the v2 edit shows as unstaged
    let status = common::run(dir.path(), &["status"]);
    assert!(!status.contains("Changes to be committed:"));
    assert!(status.contains("Changes not staged for commit:"));
    assert!(status.contains("modified: notes.txt"));
}

#[test]
fn reset_to_an_unknown_commit_fails() {
    let dir = common::init_repo();

    common::vit(dir.path())
        .args(["reset", "0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("commit '0000000' not found"));
}
