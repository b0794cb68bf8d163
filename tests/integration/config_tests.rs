use dupeshell::config::Config;
use dupeshell::finder::LaunchMode;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config = Config::extract(figment).unwrap();
    assert_eq!(config.mode, LaunchMode::Auto);
    assert!(config.interpreter.is_none());
    assert!(config.timeout().is_none());
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "interpreter = \"python3.11\"\nhash_algorithm = \"md5\"\n").unwrap();

    std::env::set_var("DUPESHELL_TEST_LAYER_INTERPRETER", "pypy3");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed("DUPESHELL_TEST_LAYER_"));
    let config = Config::extract(figment).unwrap();

    assert_eq!(config.interpreter.as_deref(), Some("pypy3"));
    assert_eq!(config.hash_algorithm.as_deref(), Some("md5"));

    std::env::remove_var("DUPESHELL_TEST_LAYER_INTERPRETER");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
mode = "development"
app_root = "/srv/dupe-gui/app"
timeout_secs = 600
hash_algorithm = "sha256"
recursive = true
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.mode, LaunchMode::Development);
    assert_eq!(config.timeout(), Some(Duration::from_secs(600)));
    assert_eq!(config.hash_algorithm.as_deref(), Some("sha256"));
    assert!(config.recursive);
    assert_eq!(
        config.script_locator().locate().unwrap(),
        PathBuf::from("/srv/dupe-gui/app/../duplicate_finder.py")
    );
}

#[test]
fn test_explicit_script_wins_over_mode() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "script = \"/opt/finder/find.py\"\nmode = \"packaged\"\n",
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let command = config.finder_command().unwrap();
    assert_eq!(
        PathBuf::from(&command.leading_args[0]),
        PathBuf::from("/opt/finder/find.py")
    );
}

#[test]
fn test_malformed_toml_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "timeout_secs = \"soon\"\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(err.to_string().contains("Invalid configuration"));
}
