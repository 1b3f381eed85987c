//! `cc-tools config`: typed get/set/list/reset over the persisted
//! configuration document.

use cc_tools_config::keys::ValueKind;
use cc_tools_config::{Config, ConfigKey};

pub fn get(config: &Config, key: &str) -> i32 {
    let Some(key) = ConfigKey::from_dotted(key) else {
        eprintln!("cc-tools config: unknown configuration key `{key}`");
        return 2;
    };
    let result = match key.kind() {
        ValueKind::Int => config.get_int(key, 0).map(|v| v.to_string()),
        ValueKind::Bool => config.get_bool(key, false).map(|v| v.to_string()),
        ValueKind::String => config.get_string(key, ""),
    };
    match result {
        Ok(value) => {
            println!("{value}");
            0
        }
        Err(err) => {
            eprintln!("cc-tools config: {err}");
            2
        }
    }
}

pub fn set(mut config: Config, key: &str, value: &str) -> i32 {
    let Some(key) = ConfigKey::from_dotted(key) else {
        eprintln!("cc-tools config: unknown configuration key `{key}`");
        return 2;
    };
    if let Err(err) = config.set(key, value) {
        eprintln!("cc-tools config: {err}");
        return 2;
    }
    match config.save() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("cc-tools config: {err}");
            1
        }
    }
}

pub fn list(config: &Config) -> i32 {
    for (key, value) in config.list() {
        println!("{key} = {value}");
    }
    0
}

pub fn reset(mut config: Config) -> i32 {
    config.reset();
    match config.save() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("cc-tools config: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_is_rejected() {
        let config = Config::load_from(std::env::temp_dir().join("cc-tools-config-cmd-test.json")).unwrap();
        assert_eq!(get(&config, "not.a.real.key"), 2);
    }
}
