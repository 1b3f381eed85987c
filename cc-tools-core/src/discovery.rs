//! Given a working directory, find the project root and the lint/test
//! commands appropriate to that project.

use std::path::{Path, PathBuf};

use crate::error::CcToolsError;

/// An argv + working-directory description of a command to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    fn from_words(words: &[&str], cwd: &Path) -> Self {
        let (program, args) = words.split_first().expect("marker table rows are non-empty");
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }
}

/// The outcome of a successful discovery: the project root plus whichever
/// lint/test commands apply to that project type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProject {
    pub root: PathBuf,
    pub lint_cmd: Option<CommandSpec>,
    pub test_cmd: Option<CommandSpec>,
}

struct ProjectType {
    markers: &'static [&'static str],
    lint: &'static [&'static str],
    test: &'static [&'static str],
}

/// The static, ordered project-marker table. First-match-wins, both across
/// the table (top-to-bottom) and across ancestor directories (nearest wins).
const PROJECT_TABLE: &[ProjectType] = &[
    ProjectType {
        markers: &["Cargo.toml"],
        lint: &["cargo", "clippy", "--all-targets", "--quiet"],
        test: &["cargo", "test", "--quiet"],
    },
    ProjectType {
        markers: &["package.json"],
        lint: &["npm", "run", "lint", "--if-present"],
        test: &["npm", "test", "--if-present"],
    },
    ProjectType {
        markers: &["go.mod"],
        lint: &["go", "vet", "./..."],
        test: &["go", "test", "./..."],
    },
    ProjectType {
        markers: &["pyproject.toml", "setup.py"],
        lint: &["ruff", "check", "."],
        test: &["pytest", "-q"],
    },
    ProjectType {
        markers: &["Gemfile"],
        lint: &["rubocop"],
        test: &["bundle", "exec", "rspec"],
    },
];

/// Walk `start_dir` and its ancestors looking for a recognized project
/// marker. Returns `Ok(None)` when no ancestor matches (the validation
/// command treats that as a no-op, not an error).
pub fn discover(start_dir: &Path) -> Result<Option<DiscoveredProject>, CcToolsError> {
    for dir in start_dir.ancestors() {
        for project_type in PROJECT_TABLE {
            let matched = project_type.markers.iter().any(|marker| {
                let candidate = dir.join(marker);
                match candidate.try_exists() {
                    Ok(exists) => exists,
                    Err(_) => false,
                }
            });
            if matched {
                return Ok(Some(DiscoveredProject {
                    root: dir.to_path_buf(),
                    lint_cmd: Some(CommandSpec::from_words(project_type.lint, dir)),
                    test_cmd: Some(CommandSpec::from_words(project_type.test, dir)),
                }));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn no_project_when_nothing_matches() {
        let dir = tempdir().unwrap();
        let result = discover(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn cargo_project_is_discovered_from_a_subdirectory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        let sub = dir.path().join("src").join("nested");
        std::fs::create_dir_all(&sub).unwrap();

        let project = discover(&sub).unwrap().expect("should find the cargo project");
        assert_eq!(project.root, dir.path());
        assert_eq!(project.lint_cmd.unwrap().program, "cargo");
        assert_eq!(project.test_cmd.unwrap().program, "cargo");
    }

    #[test]
    fn first_table_entry_wins_in_a_polyglot_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();

        let project = discover(dir.path()).unwrap().unwrap();
        assert_eq!(project.lint_cmd.unwrap().program, "cargo");
    }

    #[test]
    fn nearest_ancestor_wins_over_a_further_one() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        let nested = dir.path().join("crates").join("inner");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Cargo.toml"), "[package]\n").unwrap();

        let project = discover(&nested).unwrap().unwrap();
        assert_eq!(project.root, nested);
    }
}
