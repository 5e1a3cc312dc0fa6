use predicates::prelude::predicate;

mod common;

/// base -> main edit and feature edit on separate files
fn divergent_repo() -> assert_fs::TempDir {
    let dir = common::init_repo();
    common::write_file(dir.path(), "shared.txt", "a\nb\nc\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);

    common::run(dir.path(), &["switch", "feature"]);
    common::write_file(dir.path(), "feature.txt", "feature work\n");
    common::commit_all(dir.path(), "feature work");

    common::run(dir.path(), &["switch", "main"]);
    common::write_file(dir.path(), "main.txt", "main work\n");
    common::commit_all(dir.path(), "main work");

    dir
}

#[test]
fn merging_a_descendant_fast_forwards_without_a_new_commit() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "base\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);

    common::run(dir.path(), &["switch", "feature"]);
    common::write_file(dir.path(), "notes.txt", "feature edit\n");
    common::commit_all(dir.path(), "feature edit");
    let feature_tip = common::branch_tip(dir.path(), "feature");

    common::run(dir.path(), &["switch", "main"]);
    let output = common::run(dir.path(), &["merge", "feature"]);

    assert!(output.contains("Fast-forwarded"));
    assert_eq!(common::branch_tip(dir.path(), "main"), feature_tip);
    assert_eq!(common::read_file(dir.path(), "notes.txt"), "feature edit\n");
}

#[test]
fn merging_an_ancestor_is_already_up_to_date() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "notes.txt", "base\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);
    common::write_file(dir.path(), "notes.txt", "ahead\n");
    common::commit_all(dir.path(), "ahead");

    let output = common::run(dir.path(), &["merge", "feature"]);
    assert_eq!(output, "Already up to date.\n");
}

#[test]
fn non_conflicting_divergence_produces_a_merge_commit() {
    let dir = divergent_repo();
    let main_tip = common::branch_tip(dir.path(), "main");
    let feature_tip = common::branch_tip(dir.path(), "feature");

    let output = common::run(dir.path(), &["merge", "feature"]);
    assert!(output.contains("Merge branch 'feature' into main"));

    // both sides' work is present
    assert_eq!(common::read_file(dir.path(), "main.txt"), "main work\n");
    assert_eq!(common::read_file(dir.path(), "feature.txt"), "feature work\n");

    // the merge commit carries both tips as parents
    let merge_tip = common::branch_tip(dir.path(), "main");
    let commit_file = common::read_file(dir.path(), &format!(".vit/objects/commits/{merge_tip}"));
    assert!(commit_file.contains(&main_tip));
    assert!(commit_file.contains(&feature_tip));
}

#[test]
fn conflicting_edits_leave_markers_and_a_merge_in_progress() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "shared.txt", "a\nb\nc\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);

    common::run(dir.path(), &["switch", "feature"]);
    common::write_file(dir.path(), "shared.txt", "a\nfeature-b\nc\n");
    common::commit_all(dir.path(), "feature edit");

    common::run(dir.path(), &["switch", "main"]);
    common::write_file(dir.path(), "shared.txt", "a\nmain-b\nc\n");
    common::commit_all(dir.path(), "main edit");

    let output = common::run(dir.path(), &["merge", "feature"]);
    assert!(output.contains("CONFLICT (content): Merge conflict in shared.txt"));
    assert!(output.contains("Automatic merge failed"));

    assert_eq!(
        common::read_file(dir.path(), "shared.txt"),
        "a\n<<<<<< main\nmain-b\n======\nfeature-b\n>>>>>> feature\nc\n"
    );
    assert!(dir.path().join(".vit/MERGE_HEAD").is_file());

    // resolving and committing creates the merge commit and clears the marker
    common::write_file(dir.path(), "shared.txt", "a\nresolved\nc\n");
    common::run(dir.path(), &["add", "shared.txt"]);
    let commit_output = common::run(dir.path(), &["commit", "-m", "resolve merge"]);
    assert!(commit_output.contains("resolve merge"));
    assert!(!dir.path().join(".vit/MERGE_HEAD").exists());
}

#[test]
fn a_conflicted_merge_leaves_the_index_untouched() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "shared.txt", "a\nb\nc\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);

    common::run(dir.path(), &["switch", "feature"]);
    common::write_file(dir.path(), "shared.txt", "a\nfeature-b\nc\n");
    common::commit_all(dir.path(), "feature edit");

    common::run(dir.path(), &["switch", "main"]);
    common::write_file(dir.path(), "shared.txt", "a\nmain-b\nc\n");
    common::commit_all(dir.path(), "main edit");

    let index_before = common::read_file(dir.path(), ".vit/index");
    let output = common::run(dir.path(), &["merge", "feature"]);
    assert!(output.contains("CONFLICT (content)"));

    // only the working tree carries the markers; the staged side is as it was
    assert_eq!(common::read_file(dir.path(), ".vit/index"), index_before);
    let status = common::run(dir.path(), &["status"]);
    assert!(status.contains("Changes not staged for commit:"));
    assert!(status.contains("modified: shared.txt"));
}

#[test]
fn merge_abort_restores_the_pre_merge_state() {
    let dir = common::init_repo();
    common::write_file(dir.path(), "shared.txt", "a\nb\nc\n");
    common::commit_all(dir.path(), "base");
    common::run(dir.path(), &["branch", "feature"]);

    common::run(dir.path(), &["switch", "feature"]);
    common::write_file(dir.path(), "shared.txt", "a\nfeature-b\nc\n");
    common::commit_all(dir.path(), "feature edit");

    common::run(dir.path(), &["switch", "main"]);
    common::write_file(dir.path(), "shared.txt", "a\nmain-b\nc\n");
    common::commit_all(dir.path(), "main edit");

    common::run(dir.path(), &["merge", "feature"]);
    common::run(dir.path(), &["merge", "--abort"]);

    assert_eq!(
        common::read_file(dir.path(), "shared.txt"),
        "a\nmain-b\nc\n"
    );
    assert!(!dir.path().join(".vit/MERGE_HEAD").exists());
}

#[test]
fn merge_refuses_a_dirty_working_tree() {
    let dir = divergent_repo();
    common::write_file(dir.path(), "main.txt", "uncommitted edit\n");

    common::vit(dir.path())
        .args(["merge", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("local changes"));
}

#[test]
fn merge_while_detached_is_refused() {
    let dir = divergent_repo();
    let tip = common::branch_tip(dir.path(), "main");
    common::run(dir.path(), &["switch", &tip]);

    common::vit(dir.path())
        .args(["merge", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot merge while HEAD is detached"));
}

#[test]
fn merging_an_unknown_branch_fails() {
    let dir = common::init_repo();

    common::vit(dir.path())
        .args(["merge", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch 'ghost' not found"));
}
