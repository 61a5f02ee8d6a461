use highlights::config::{CacheBackend, ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const KEYS: &[&str] = &[
    "HIGHLIGHTS_PROFILE",
    "HIGHLIGHTS_API_BIND_ADDR",
    "HIGHLIGHTS_LOG_LEVEL",
    "HIGHLIGHTS_ADMIN_SECRET",
    "HIGHLIGHTS_CACHE_BACKEND",
    "HIGHLIGHTS_CACHE_TTL_SECONDS",
    "HIGHLIGHTS_FEED_URL",
    "HIGHLIGHTS_INGEST_INTERVAL_SECONDS",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        for key in KEYS {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.cache.backend, CacheBackend::None);
    assert_eq!(cfg.cache.ttl_seconds, 30);
    assert_eq!(cfg.feed.provider, "scorebat");
    assert!(!cfg.ingest.scheduler_enabled());
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "HIGHLIGHTS_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "HIGHLIGHTS_API_BIND_ADDR=192.168.0.10:5000\nHIGHLIGHTS_CACHE_BACKEND=memory\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "HIGHLIGHTS_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "HIGHLIGHTS_PROFILE=test\nHIGHLIGHTS_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.cache.backend, CacheBackend::Memory);
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "HIGHLIGHTS_API_BIND_ADDR=127.0.0.1:3000\nHIGHLIGHTS_CACHE_TTL_SECONDS=10\n",
    );

    unsafe {
        env::set_var("HIGHLIGHTS_API_BIND_ADDR", "0.0.0.0:9090");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.cache.ttl_seconds, 10);

    clear_env();
}

#[test]
fn unprefixed_keys_are_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "API_BIND_ADDR=not-an-addr\n");

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("unprefixed keys are not read");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HIGHLIGHTS_API_BIND_ADDR", "not-an-addr");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn production_profile_requires_admin_secret() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HIGHLIGHTS_PROFILE", "prod");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("prod without secret should fail");
    assert!(matches!(err, ConfigError::MissingAdminSecret));

    unsafe {
        env::set_var("HIGHLIGHTS_ADMIN_SECRET", "prod-secret");
    }
    let cfg = loader.load().expect("prod with secret loads");
    assert_eq!(cfg.admin_secret.as_deref(), Some("prod-secret"));

    clear_env();
}

#[test]
fn rejects_short_ingest_interval_and_unknown_backend() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));

    unsafe {
        env::set_var("HIGHLIGHTS_INGEST_INTERVAL_SECONDS", "5");
    }
    assert!(matches!(
        loader.load(),
        Err(ConfigError::InvalidIngestInterval { value: 5 })
    ));

    unsafe {
        env::remove_var("HIGHLIGHTS_INGEST_INTERVAL_SECONDS");
        env::set_var("HIGHLIGHTS_CACHE_BACKEND", "memcached");
    }
    assert!(matches!(
        loader.load(),
        Err(ConfigError::InvalidCacheBackend { .. })
    ));

    clear_env();
}
