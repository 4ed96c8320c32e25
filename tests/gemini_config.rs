use photo_enhancer::enhance::{ConfigError, GeminiTransport};
use photo_enhancer::settings::Settings;
use serial_test::serial;

fn settings_reading(var: &str) -> Settings {
    Settings {
        api_key_env: var.into(),
        ..Settings::default()
    }
}

#[test]
#[serial]
fn unset_credential_is_fatal() {
    std::env::remove_var("API_KEY");
    let err = GeminiTransport::from_settings(&Settings::default())
        .err()
        .expect("missing key must fail");
    assert!(matches!(err, ConfigError::MissingCredential(ref v) if v == "API_KEY"));
    assert_eq!(err.to_string(), "API_KEY environment variable is not set.");
}

#[test]
#[serial]
fn blank_credential_is_fatal() {
    std::env::set_var("PHOTO_ENHANCER_BLANK_KEY", "   ");
    let err = GeminiTransport::from_settings(&settings_reading("PHOTO_ENHANCER_BLANK_KEY"))
        .err()
        .expect("blank key must fail");
    std::env::remove_var("PHOTO_ENHANCER_BLANK_KEY");
    assert!(matches!(err, ConfigError::MissingCredential(ref v) if v == "PHOTO_ENHANCER_BLANK_KEY"));
    assert_eq!(
        err.to_string(),
        "PHOTO_ENHANCER_BLANK_KEY environment variable is not set."
    );
}

#[test]
#[serial]
fn present_credential_builds_model_url() {
    std::env::set_var("PHOTO_ENHANCER_TEST_KEY", "secret");
    let transport = GeminiTransport::from_settings(&settings_reading("PHOTO_ENHANCER_TEST_KEY"));
    std::env::remove_var("PHOTO_ENHANCER_TEST_KEY");
    let transport = transport.ok().expect("key is set");
    assert_eq!(
        transport.url().as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
    );
}
