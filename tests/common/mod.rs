#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub fn vit(dir: &Path) -> Command {
    let mut command = Command::cargo_bin("vit").expect("binary is built");
    command.current_dir(dir);
    command
}

/// A fresh temp directory with an initialized repository inside.
pub fn init_repo() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
    vit(dir.path()).arg("init").assert().success();
    dir
}

pub fn run(dir: &Path, args: &[&str]) -> String {
    let output = vit(dir).args(args).output().expect("command runs");
    assert!(
        output.status.success(),
        "`vit {}` failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directories");
    }
    std::fs::write(path, content).expect("failed to write file");
}

pub fn read_file(dir: &Path, relative: &str) -> String {
    std::fs::read_to_string(dir.join(relative)).expect("failed to read file")
}

pub fn commit_all(dir: &Path, message: &str) {
    run(dir, &["add", "."]);
    run(dir, &["commit", "-m", message]);
}

/// The digest a branch ref currently points at.
pub fn branch_tip(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(".vit/refs/heads").join(name))
        .expect("branch file exists")
        .trim()
        .to_string()
}
