use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_spindle_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SPINDLE_CONFIG_PATH", "/tmp/spindle-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/spindle-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("spindle")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("spindle")
            .join("config.toml")
    );
}

#[test]
fn state_dir_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/spindle")
    );
}

#[test]
fn settings_path_defaults_next_to_config_and_env_wins() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg");
    let _g2 = EnvGuard::remove("SPINDLE_SETTINGS_PATH");

    let s = Settings::default();
    assert_eq!(
        s.settings_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg/spindle/settings.ini")
    );

    let _g3 = EnvGuard::set("SPINDLE_SETTINGS_PATH", "/tmp/elsewhere.ini");
    assert_eq!(
        s.settings_path().unwrap(),
        std::path::PathBuf::from("/tmp/elsewhere.ini")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_boundary_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
boundary = "stop-at-end"
repeat_one = true
tick_ms = 250

[controls]
seek_small_secs = 3
seek_large_secs = 30

[library]
extensions = ["mp3", "flac"]
recursive = false

[storage]
settings_path = "/tmp/spindle-settings.ini"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SPINDLE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SPINDLE__PLAYBACK__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.boundary, BoundarySetting::Clamp);
    assert!(s.playback.repeat_one);
    assert_eq!(s.playback.tick_ms, 250);
    assert_eq!(s.controls.seek_small_secs, 3);
    assert_eq!(s.controls.seek_large_secs, 30);
    assert_eq!(s.controls.column_step, 10);
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), "flac".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.follow_links);
    assert_eq!(
        s.storage.settings_path,
        Some(std::path::PathBuf::from("/tmp/spindle-settings.ini"))
    );
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SPINDLE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SPINDLE__PLAYBACK__TICK_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_ms, 50);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "SPINDLE_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.boundary, BoundarySetting::Wrap);
    assert_eq!(s.playback.tick_ms, 100);
    assert_eq!(s.controls.seek_small_secs, 5);
    assert_eq!(s.controls.seek_large_secs, 10);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
}

#[test]
fn validate_rejects_zero_tick() {
    let mut s = Settings::default();
    s.playback.tick_ms = 0;
    assert!(s.validate().is_err());
}
