use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const ALL_VARS: &[&str] = &[
    "LABELSCORE_PORT",
    "LABELSCORE_BIND_ADDR",
    "LABELSCORE_STORAGE_PATH",
    "LABELSCORE_NUTRITION_DB_URL",
    "LABELSCORE_EXTERNAL_TIMEOUT_SECS",
    "LABELSCORE_EXTERNAL_MAX_ATTEMPTS",
    "LABELSCORE_RETRY_BASE_DELAY_MS",
    "LABELSCORE_CACHE_TTL_SECS",
    "LABELSCORE_CACHE_MAX_ENTRIES",
    "LABELSCORE_EXTERNAL_ENABLED",
    "LABELSCORE_PERSIST_CACHE",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_labelscore_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.storage_path, PathBuf::from("./.data"));
    assert_eq!(config.nutrition_db_url, "https://world.openfoodfacts.org");
    assert_eq!(config.external_timeout, Duration::from_secs(8));
    assert_eq!(config.external_max_attempts, 3);
    assert_eq!(config.retry_base_delay, Duration::from_secs(1));
    assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
    assert_eq!(config.cache_max_entries, 500);
    assert!(config.external_enabled);
    assert!(config.persist_cache);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_retry_policy_from_config() {
    let config = Config {
        external_max_attempts: 5,
        retry_base_delay: Duration::from_millis(250),
        ..Default::default()
    };
    let policy = config.retry_policy();

    assert_eq!(policy.effective_attempts(), 5);
    assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
    assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_labelscore_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.cache_max_entries, 500);
    assert!(config.external_enabled);
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_labelscore_env();

    with_env_vars(
        &[
            ("LABELSCORE_PORT", "9090"),
            ("LABELSCORE_BIND_ADDR", "0.0.0.0"),
            ("LABELSCORE_STORAGE_PATH", "/var/lib/labelscore"),
            ("LABELSCORE_NUTRITION_DB_URL", "http://localhost:9999"),
            ("LABELSCORE_EXTERNAL_TIMEOUT_SECS", "2"),
            ("LABELSCORE_EXTERNAL_MAX_ATTEMPTS", "5"),
            ("LABELSCORE_RETRY_BASE_DELAY_MS", "200"),
            ("LABELSCORE_CACHE_TTL_SECS", "60"),
            ("LABELSCORE_CACHE_MAX_ENTRIES", "42"),
            ("LABELSCORE_EXTERNAL_ENABLED", "false"),
            ("LABELSCORE_PERSIST_CACHE", "0"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.port, 9090);
            assert_eq!(
                config.bind_addr,
                IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
            );
            assert_eq!(config.storage_path, PathBuf::from("/var/lib/labelscore"));
            assert_eq!(config.nutrition_db_url, "http://localhost:9999");
            assert_eq!(config.external_timeout, Duration::from_secs(2));
            assert_eq!(config.external_max_attempts, 5);
            assert_eq!(config.retry_base_delay, Duration::from_millis(200));
            assert_eq!(config.cache_ttl, Duration::from_secs(60));
            assert_eq!(config.cache_max_entries, 42);
            assert!(!config.external_enabled);
            assert!(!config.persist_cache);
        },
    );
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_PORT", "0")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_PORT", "eighty")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_BIND_ADDR", "not-an-ip")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    });
}

#[test]
#[serial]
fn test_bool_spellings() {
    clear_labelscore_env();

    for (value, expected) in [("YES", true), ("on", true), ("1", true), ("Off", false), ("no", false)] {
        with_env_vars(&[("LABELSCORE_EXTERNAL_ENABLED", value)], || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.external_enabled, expected, "value {value}");
        });
    }
}

#[test]
#[serial]
fn test_invalid_bool() {
    clear_labelscore_env();

    with_env_vars(&[("LABELSCORE_PERSIST_CACHE", "sometimes")], || {
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidBool {
                name: "LABELSCORE_PERSIST_CACHE",
                ..
            })
        ));
    });
}

#[test]
#[serial]
fn test_invalid_numbers_use_default() {
    clear_labelscore_env();

    with_env_vars(
        &[
            ("LABELSCORE_CACHE_MAX_ENTRIES", "lots"),
            ("LABELSCORE_EXTERNAL_TIMEOUT_SECS", "-1"),
        ],
        || {
            let config = Config::from_env().expect("should parse with fallback");
            assert_eq!(config.cache_max_entries, 500);
            assert_eq!(config.external_timeout, Duration::from_secs(8));
        },
    );
}

#[test]
fn test_validate_success_with_defaults() {
    let temp = TempDir::new().expect("tempdir");
    let config = Config {
        storage_path: temp.path().to_path_buf(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_storage_path_is_file() {
    let temp = TempDir::new().expect("tempdir");
    let file = temp.path().join("plain.txt");
    std::fs::write(&file, b"x").expect("write");

    let config = Config {
        storage_path: file,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_rejects_bad_values() {
    let bad_url = Config {
        nutrition_db_url: "ftp://example.org".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        bad_url.validate(),
        Err(ConfigError::InvalidValue { name: "LABELSCORE_NUTRITION_DB_URL", .. })
    ));

    let disabled = Config {
        nutrition_db_url: "ftp://example.org".to_string(),
        external_enabled: false,
        storage_path: PathBuf::from("./does-not-exist-yet"),
        ..Default::default()
    };
    assert!(disabled.validate().is_ok());

    let zero_attempts = Config {
        external_max_attempts: 0,
        ..Default::default()
    };
    assert!(zero_attempts.validate().is_err());

    let zero_capacity = Config {
        cache_max_entries: 0,
        ..Default::default()
    };
    assert!(zero_capacity.validate().is_err());

    let zero_timeout = Config {
        external_timeout: Duration::ZERO,
        ..Default::default()
    };
    assert!(zero_timeout.validate().is_err());
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("invalid port"));
    assert!(err.to_string().contains("1 and 65535"));

    let err = ConfigError::InvalidBool {
        name: "LABELSCORE_PERSIST_CACHE",
        value: "maybe".to_string(),
    };
    assert!(err.to_string().contains("LABELSCORE_PERSIST_CACHE"));
    assert!(err.to_string().contains("maybe"));

    let err = ConfigError::NotADirectory {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));
}
