//! `cc-tools validate`: run the parallel validation gate for one hook event
//! read from stdin and exit with the code the host's hook configuration is
//! documented to interpret (0 pass/skip, 1 internal error, 2 blocking).

use std::io::{Read, Write};
use std::time::Duration;

use cc_tools_config::Config;
use cc_tools_core::{CooldownLock, HookEvent, SkipRegistry, SkippedReason, Verdict};

pub async fn run(config: &Config, timeout_override: Option<u64>, cooldown_override: Option<u64>) -> i32 {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("cc-tools validate: failed to read stdin");
        return 1;
    }
    dispatch(
        config,
        &input,
        timeout_override,
        cooldown_override,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

pub async fn dispatch(
    config: &Config,
    raw_event: &str,
    timeout_override: Option<u64>,
    cooldown_override: Option<u64>,
    stdout: &mut (dyn Write + Send),
    stderr: &mut (dyn Write + Send),
) -> i32 {
    let event = match HookEvent::parse_str(raw_event) {
        Ok(event) => Some(event),
        Err(err) => {
            let _ = writeln!(stderr, "cc-tools validate: {err}");
            return 1;
        }
    };

    let timeout = Duration::from_secs(
        timeout_override.unwrap_or_else(|| config.validate_timeout_secs().unwrap_or(60)),
    );
    let cooldown = Duration::from_secs(
        cooldown_override.unwrap_or_else(|| config.validate_cooldown_secs().unwrap_or(5)),
    );

    let skip_path = match cc_tools_config::paths::skip_registry_file() {
        Ok(path) => path,
        Err(err) => {
            let _ = writeln!(stderr, "cc-tools validate: {err}");
            return 1;
        }
    };
    let legacy_path = cc_tools_config::paths::legacy_skip_registry_file();
    let registry = match SkipRegistry::load(skip_path, legacy_path.as_deref()) {
        Ok(registry) => registry,
        Err(err) => {
            let _ = writeln!(stderr, "cc-tools validate: {err}");
            return 1;
        }
    };
    let cooldown_dir = match cc_tools_config::paths::cooldown_dir() {
        Ok(dir) => dir,
        Err(err) => {
            let _ = writeln!(stderr, "cc-tools validate: {err}");
            return 1;
        }
    };
    let lock = CooldownLock::new(cooldown_dir);
    let cwd = std::env::current_dir().unwrap_or_default();

    let verdict =
        cc_tools_core::validation::validate(event.as_ref(), &cwd, timeout, cooldown, &registry, &lock).await;
    let code = verdict.exit_code();

    match verdict {
        Verdict::Skipped {
            reason: SkippedReason::InProgress | SkippedReason::CooledDown,
            note,
        } => {
            let _ = writeln!(stderr, "{note}");
        }
        Verdict::Skipped { note, .. } => {
            let _ = writeln!(stdout, "{note}");
        }
        Verdict::Pass { advisory } => {
            let _ = writeln!(stdout, "{advisory}");
        }
        Verdict::Blocking { blocks } => {
            for block in &blocks {
                let _ = writeln!(stderr, "{block}");
            }
        }
        Verdict::InternalError { message } => {
            let _ = writeln!(stderr, "cc-tools validate: {message}");
        }
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::load_from(std::env::temp_dir().join("cc-tools-validate-cmd-test.json")).unwrap()
    }

    #[tokio::test]
    async fn non_edit_event_is_skipped_and_exits_zero() {
        let config = test_config();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(
            &config,
            r#"{"hook_event_name":"Notification"}"#,
            None,
            None,
            &mut stdout,
            &mut stderr,
        )
        .await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn malformed_json_exits_one() {
        let config = test_config();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(&config, "{not json", None, None, &mut stdout, &mut stderr).await;
        assert_eq!(code, 1);
        assert!(!stderr.is_empty());
    }

    #[tokio::test]
    async fn in_progress_skip_writes_to_stderr_not_stdout() {
        let config = test_config();
        let cache_dir = tempfile::tempdir().unwrap();
        // SAFETY: this test owns `cache_dir` and restores the var afterward;
        // `cc_tools_config::paths::cooldown_dir` and this test's direct
        // `CooldownLock` must resolve to the same directory.
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", cache_dir.path());
        }

        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join("Cargo.toml"), "[package]\nname=\"p\"\n").unwrap();
        let raw = format!(
            r#"{{"hook_event_name":"PreToolUse","tool_name":"Write","cwd":"{}"}}"#,
            project.path().display()
        );

        let lock = cc_tools_core::CooldownLock::new(cc_tools_config::paths::cooldown_dir().unwrap());
        let guard = match lock
            .acquire(project.path(), std::time::Duration::from_secs(5), std::time::Duration::from_secs(120))
            .unwrap()
        {
            cc_tools_core::AcquireOutcome::Acquired(guard) => guard,
            _ => panic!("expected to acquire the lock first"),
        };

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = dispatch(&config, &raw, Some(60), Some(5), &mut stdout, &mut stderr).await;

        drop(guard);
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }

        assert_eq!(code, 0);
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }
}
