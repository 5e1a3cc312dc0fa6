//! `.vitignore` rules
//!
//! Three rule forms, one per line: an exact repository-relative path
//! (`notes.txt`), a directory prefix (`target/`), and a glob pattern
//! (`*.log`). Blank lines and `#` comments are skipped. The `.vit` metadata
//! directory and the `.vitignore` file itself are always ignored.

use anyhow::Context;
use regex::Regex;
use std::path::Path;

pub const IGNORE_FILE: &str = ".vitignore";

use crate::areas::repository::METADATA_DIR;

#[derive(Debug)]
enum Rule {
    Path(String),
    Directory(String),
    Pattern(Regex),
}

#[derive(Debug, Default)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let ignore_path = root.join(IGNORE_FILE);
        if !ignore_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&ignore_path)
            .with_context(|| format!("unable to read ignore file {}", ignore_path.display()))?;

        let mut rules = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(dir) = line.strip_suffix('/') {
                rules.push(Rule::Directory(dir.to_string()));
            } else if line.contains('*') {
                rules.push(Rule::Pattern(glob_to_regex(line)?));
            } else {
                rules.push(Rule::Path(line.to_string()));
            }
        }

        Ok(IgnoreRules { rules })
    }

    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        let path = relative_path.to_string_lossy().replace('\\', "/");

        if path == METADATA_DIR
            || path.starts_with(&format!("{METADATA_DIR}/"))
            || path == IGNORE_FILE
        {
            return true;
        }

        let file_name = path.rsplit('/').next().unwrap_or(&path);

        self.rules.iter().any(|rule| match rule {
            Rule::Path(p) => &path == p,
            Rule::Directory(dir) => path == *dir || path.starts_with(&format!("{dir}/")),
            // patterns without a separator match the file name, with one the full path
            Rule::Pattern(re) => {
                if re.as_str().contains('/') {
                    re.is_match(&path)
                } else {
                    re.is_match(file_name)
                }
            }
        })
    }
}

fn glob_to_regex(pattern: &str) -> anyhow::Result<Regex> {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$"))
        .with_context(|| format!("invalid ignore pattern: {}", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    #[fixture]
    fn rules() -> (assert_fs::TempDir, IgnoreRules) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        std::fs::write(
            dir.path().join(IGNORE_FILE),
            "# build output\ntarget/\n*.log\nsecret.txt\n",
        )
        .unwrap();
        let rules = IgnoreRules::load(dir.path()).unwrap();
        (dir, rules)
    }

    #[rstest]
    #[case("target/debug/app", true)]
    #[case("target", true)]
    #[case("untargeted.rs", false)]
    #[case("trace.log", true)]
    #[case("logs/deep/run.log", true)]
    #[case("secret.txt", true)]
    #[case("nested/secret.txt", false)]
    #[case("src/main.rs", false)]
    fn rule_forms(#[case] path: &str, #[case] expected: bool, rules: (assert_fs::TempDir, IgnoreRules)) {
        let (_dir, rules) = rules;
        assert_eq!(rules.is_ignored(&PathBuf::from(path)), expected);
    }

    #[rstest]
    fn metadata_and_ignore_file_are_always_ignored() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(&PathBuf::from(".vit")));
        assert!(rules.is_ignored(&PathBuf::from(".vit/index")));
        assert!(rules.is_ignored(&PathBuf::from(IGNORE_FILE)));
        assert!(!rules.is_ignored(&PathBuf::from("src/main.rs")));
    }
}
