//! `cc-tools skip`/`unskip`/`skip-list`: mutate and inspect the skip
//! registry the validation gate consults before running lint/test.

use std::path::PathBuf;

use cc_tools_config::Config;
use cc_tools_core::{CcToolsError, SkipCategory, SkipRegistry};

use crate::cli::SkipCategoryArg;

fn to_core(category: SkipCategoryArg) -> SkipCategory {
    match category {
        SkipCategoryArg::Lint => SkipCategory::Lint,
        SkipCategoryArg::Test => SkipCategory::Test,
        SkipCategoryArg::All => SkipCategory::All,
    }
}

fn open_registry() -> Result<SkipRegistry, CcToolsError> {
    let path = cc_tools_config::paths::skip_registry_file().map_err(CcToolsError::ConfigError)?;
    let legacy = cc_tools_config::paths::legacy_skip_registry_file();
    SkipRegistry::load(path, legacy.as_deref())
}

fn absolute(dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir().map(|cwd| cwd.join(&dir)).unwrap_or(dir)
    }
}

fn exit_for(err: &CcToolsError) -> i32 {
    match err {
        CcToolsError::InvalidPath(_) => 2,
        _ => 1,
    }
}

pub fn skip(_config: &Config, category: SkipCategoryArg, dir: PathBuf) -> i32 {
    let registry = match open_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("cc-tools skip: {err}");
            return exit_for(&err);
        }
    };
    let dir = absolute(dir);
    match registry.add_skip(&dir, to_core(category)) {
        Ok(()) => {
            println!("skipping {:?} for {}", category, dir.display());
            0
        }
        Err(err) => {
            eprintln!("cc-tools skip: {err}");
            exit_for(&err)
        }
    }
}

pub fn unskip(_config: &Config, category: SkipCategoryArg, dir: PathBuf) -> i32 {
    let registry = match open_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("cc-tools unskip: {err}");
            return exit_for(&err);
        }
    };
    let dir = absolute(dir);
    match registry.remove_skip(&dir, to_core(category)) {
        Ok(()) => {
            println!("no longer skipping {:?} for {}", category, dir.display());
            0
        }
        Err(err) => {
            eprintln!("cc-tools unskip: {err}");
            exit_for(&err)
        }
    }
}

pub fn skip_list(_config: &Config) -> i32 {
    let registry = match open_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("cc-tools skip-list: {err}");
            return exit_for(&err);
        }
    };
    let mut entries = registry.list_all();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|(dir, categories)| {
            vec![
                dir,
                if categories.contains("lint") { "yes" } else { "no" }.to_string(),
                if categories.contains("test") { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print!("{}", cc_tools_core::table::render(&["Directory", "Lint", "Test"], &[48, 4, 4], &rows));
    0
}
