use predicates::prelude::predicate;

mod common;

#[test]
fn init_creates_the_metadata_skeleton() {
    let dir = assert_fs::TempDir::new().unwrap();

    common::vit(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty vit repository"));

    assert!(dir.path().join(".vit/HEAD").is_file());
    assert!(dir.path().join(".vit/index").is_file());
    assert!(dir.path().join(".vit/refs/heads/main").is_file());
}

#[test]
fn init_starts_on_main_with_a_root_commit() {
    let dir = common::init_repo();

    let branches = common::run(dir.path(), &["branch"]);
    assert_eq!(branches, "* main\n");

    let log = common::run(dir.path(), &["log"]);
    assert!(log.contains("root commit"));
}

#[test]
fn init_into_an_existing_repository_reinitializes() {
    let dir = common::init_repo();
    let tip_before = common::branch_tip(dir.path(), "main");

    common::vit(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reinitialized existing vit repository"));

    assert_eq!(common::branch_tip(dir.path(), "main"), tip_before);
}

#[test]
fn commands_outside_a_repository_fail() {
    let dir = assert_fs::TempDir::new().unwrap();

    common::vit(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a vit repository"));
}
