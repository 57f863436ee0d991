use hostel_gate::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, path::PathBuf, time::Duration};

const CONFIG_VARS: [&str; 6] = [
    "APP_ENV",
    "API_BASE_URL",
    "API_TIMEOUT_SECS",
    "SESSION_FILE",
    "BIND_ADDR",
    "CLIENT_ORIGIN",
];

// --- Setup/Teardown Utilities ---

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    // Start every test from a clean slate
    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // API_BASE_URL is set, CLIENT_ORIGIN is missing
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("API_BASE_URL", "https://api.hostel.vn/api");
            }
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without a client origin"
    );
}

#[test]
#[serial]
fn test_app_config_production_requires_backend_url() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("CLIENT_ORIGIN", "https://hostel.vn");
            }
            AppConfig::load()
        })
    });

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_production_complete() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("API_BASE_URL", "https://api.hostel.vn/api");
            env::set_var("CLIENT_ORIGIN", "https://hostel.vn");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_base_url, "https://api.hostel.vn/api");
    assert_eq!(config.client_origin.as_deref(), Some("https://hostel.vn"));
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    // Local mode should not panic, and should use hardcoded defaults
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8080/api");
    assert_eq!(config.api_timeout, Duration::from_secs(10));
    assert_eq!(config.session_file, PathBuf::from(".hostel-session.json"));
    assert_eq!(config.bind_addr, "127.0.0.1:5173");
    assert_eq!(config.client_origin, None);
}

#[test]
#[serial]
fn test_app_config_local_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("API_BASE_URL", "http://10.0.0.5:8080/api");
            env::set_var("API_TIMEOUT_SECS", "3");
            env::set_var("SESSION_FILE", "/tmp/gate/session.json");
            env::set_var("CLIENT_ORIGIN", "http://localhost:3000");
        }
        AppConfig::load()
    });

    // APP_ENV unset means local
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://10.0.0.5:8080/api");
    assert_eq!(config.api_timeout, Duration::from_secs(3));
    assert_eq!(config.session_file, PathBuf::from("/tmp/gate/session.json"));
    assert_eq!(config.client_origin.as_deref(), Some("http://localhost:3000"));
}

#[test]
#[serial]
fn test_app_config_bad_timeout_falls_back() {
    for raw in ["soon", "0", "-4"] {
        let config = run_with_env(|| {
            unsafe {
                env::set_var("API_TIMEOUT_SECS", raw);
            }
            AppConfig::load()
        });
        assert_eq!(config.api_timeout, Duration::from_secs(10), "{}", raw);
    }
}
