//! Unit tests for configuration loading and validation.

use super::*;
use std::ffi::OsString;
use std::io::Write;

use env_lock::lock_env;
use rstest::{fixture, rstest};

const ENV_KEYS: [&str; 7] = [
    "CITY_LOCATOR_STORE_URL",
    "CITY_LOCATOR_STORE_AUTH",
    "CITY_LOCATOR_STORE_COLLECTION",
    "CITY_LOCATOR_CACHE_TTL_SECS",
    "CITY_LOCATOR_CACHE_SCOPE",
    "CITY_LOCATOR_ADMIN_EMAIL",
    "CITY_LOCATOR_USE_MEMORY_STORE",
];

fn load_from_empty_args() -> AppSettings {
    AppSettings::load_from_iter([OsString::from("city-locator")]).expect("config should load")
}

#[fixture]
fn settings() -> AppSettings {
    AppSettings {
        store_url: Some("https://example-db.example.com".to_owned()),
        store_auth: Some("secret-token".to_owned()),
        store_collection: None,
        store_timeout_secs: None,
        use_memory_store: false,
        cache_ttl_secs: None,
        cache_scope: None,
        admin_email: Some("admin@example.com".to_owned()),
        admin_password: Some("123456".to_owned()),
        bind_addr: None,
        session_key_file: None,
        session_cookie_secure: true,
        session_allow_ephemeral: false,
    }
}

#[rstest]
fn environment_values_are_loaded() {
    let _guard = lock_env([
        (ENV_KEYS[0], Some("https://env-db.example.com")),
        (ENV_KEYS[1], Some("env-token")),
        (ENV_KEYS[2], Some("places/cities")),
        (ENV_KEYS[3], Some("30")),
        (ENV_KEYS[4], Some("session")),
        (ENV_KEYS[5], Some("ops@example.com")),
        (ENV_KEYS[6], None),
    ]);

    let loaded = load_from_empty_args();
    assert_eq!(
        loaded.store_url.as_deref(),
        Some("https://env-db.example.com")
    );
    assert_eq!(loaded.store_collection.as_deref(), Some("places/cities"));
    assert_eq!(loaded.cache_ttl_secs, Some(30));
    assert_eq!(loaded.admin_email.as_deref(), Some("ops@example.com"));
    assert!(!loaded.use_memory_store);
    assert!(loaded.session_cookie_secure);
}

#[rstest]
fn defaults_apply_when_unset() {
    let _guard = lock_env(ENV_KEYS.map(|key| (key, None::<&str>)));

    let loaded = load_from_empty_args();
    let cache = loaded.cache_settings().expect("defaults are valid");
    assert_eq!(cache.ttl, Some(Duration::from_secs(5)));
    assert_eq!(cache.scope, CacheScope::Process);
    assert_eq!(
        loaded.bind_addr().expect("default address"),
        "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
    );
}

#[rstest]
fn rest_store_uses_default_collection(settings: AppSettings) {
    let StoreBackend::Rest(store) = settings.store_backend().expect("valid store") else {
        panic!("expected REST store");
    };
    assert_eq!(store.collection, "cities");
    assert_eq!(store.auth.as_str(), "secret-token");
    assert!(store.timeout.is_none());
}

#[rstest]
fn memory_store_ignores_missing_store_url(mut settings: AppSettings) {
    settings.use_memory_store = true;
    settings.store_url = None;
    settings.store_auth = None;
    assert!(matches!(
        settings.store_backend().expect("memory store"),
        StoreBackend::Memory
    ));
}

#[rstest]
#[case(None, "store_url")]
#[case(Some("   "), "store_url")]
fn missing_store_url_is_fatal(
    mut settings: AppSettings,
    #[case] url: Option<&str>,
    #[case] expected: &str,
) {
    settings.store_url = url.map(str::to_owned);
    let error = settings.store_backend().expect_err("missing url");
    assert!(matches!(error, SettingsError::Missing { name } if name == expected));
}

#[rstest]
#[case("not a url")]
#[case("ftp://example.com")]
fn malformed_store_url_is_rejected(mut settings: AppSettings, #[case] url: &str) {
    settings.store_url = Some(url.to_owned());
    let error = settings.store_backend().expect_err("invalid url");
    assert!(matches!(error, SettingsError::InvalidStoreUrl { .. }));
}

#[rstest]
fn missing_credential_is_fatal(mut settings: AppSettings) {
    settings.store_auth = None;
    let error = settings.store_backend().expect_err("missing auth");
    assert!(matches!(error, SettingsError::Missing { name: "store_auth" }));
}

#[rstest]
fn blank_collection_is_rejected(mut settings: AppSettings) {
    settings.store_collection = Some(" / ".to_owned());
    let error = settings.store_backend().expect_err("blank collection");
    assert!(matches!(error, SettingsError::EmptyCollection));
}

#[rstest]
fn zero_ttl_disables_the_cache(mut settings: AppSettings) {
    settings.cache_ttl_secs = Some(0);
    assert_eq!(settings.cache_settings().expect("valid").ttl, None);
}

#[rstest]
fn unknown_cache_scope_is_rejected(mut settings: AppSettings) {
    settings.cache_scope = Some("galaxy".to_owned());
    let error = settings.cache_settings().expect_err("bad scope");
    assert!(matches!(error, SettingsError::InvalidCacheScope(_)));
}

#[rstest]
fn admin_pair_is_required(mut settings: AppSettings) {
    settings.admin_password = Some(String::new());
    let error = settings.admin_account().expect_err("blank password");
    assert!(matches!(
        error,
        SettingsError::Missing {
            name: "admin_password"
        }
    ));
}

#[rstest]
fn debug_output_redacts_secrets(settings: AppSettings) {
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(!rendered.contains("123456"));
}

#[rstest]
fn release_requires_a_readable_key(mut settings: AppSettings) {
    settings.session_key_file = Some(PathBuf::from("/nonexistent/session_key"));
    let result = settings.session_settings(BuildMode::Release);
    assert!(matches!(result, Err(SettingsError::KeyRead { .. })));
}

#[rstest]
fn release_accepts_ephemeral_when_allowed(mut settings: AppSettings) {
    settings.session_key_file = Some(PathBuf::from("/nonexistent/session_key"));
    settings.session_allow_ephemeral = true;
    assert!(settings.session_settings(BuildMode::Release).is_ok());
}

#[rstest]
fn debug_falls_back_to_a_generated_key(mut settings: AppSettings) {
    settings.session_key_file = Some(PathBuf::from("/nonexistent/session_key"));
    settings.session_cookie_secure = false;
    let session = settings
        .session_settings(BuildMode::Debug)
        .expect("ephemeral key");
    assert!(!session.cookie_secure);
}

#[rstest]
#[case(vec![b'k'; 16], false)]
#[case(vec![b'k'; 64], true)]
fn key_file_length_is_checked(
    mut settings: AppSettings,
    #[case] contents: Vec<u8>,
    #[case] accepted: bool,
) {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&contents).expect("write key");
    settings.session_key_file = Some(file.path().to_path_buf());

    let result = settings.session_settings(BuildMode::Release);
    if accepted {
        assert!(result.is_ok());
    } else {
        assert!(matches!(result, Err(SettingsError::KeyTooShort { .. })));
    }
}

#[rstest]
fn validate_collects_every_section(mut settings: AppSettings) {
    settings.bind_addr = Some("127.0.0.1:9000".to_owned());
    let validated = settings.validate(BuildMode::Debug).expect("valid settings");
    assert_eq!(validated.bind_addr.port(), 9000);
    assert_eq!(validated.admin.email(), "admin@example.com");
    assert!(matches!(validated.store, StoreBackend::Rest(_)));
}
