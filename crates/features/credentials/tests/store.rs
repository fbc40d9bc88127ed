use callkit_credentials::{AccountCredentials, CredentialStore, CredentialsError};
use proptest::prelude::*;
use std::fs;

fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join(".env"))
}

#[test]
fn missing_file_means_no_credentials() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);

    assert_eq!(store.load().expect("load"), None);
    assert!(!store.is_set().expect("is_set"));
    assert_eq!(store.masked().expect("masked"), None);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);

    store.save("AC0123456789abcdef", "secret-token-value").expect("save");

    let loaded = store.load().expect("load").expect("credentials present");
    assert_eq!(loaded.account_sid, "AC0123456789abcdef");
    assert_eq!(loaded.auth_token, "secret-token-value");

    let masked = store.masked().expect("masked").expect("credentials present");
    assert_eq!(masked.account_sid, "AC01**********cdef");
    assert_eq!(masked.auth_token, "secr**********alue");
}

#[test]
fn blank_fields_are_rejected_and_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let original = "PORT=3000\n";
    fs::write(store.path(), original).expect("seed");

    for (sid, token) in [("", "token"), ("AC1", ""), ("   ", "token"), ("AC1", "\t")] {
        let err = store.save(sid, token).expect_err("blank field");
        assert!(matches!(err, CredentialsError::Validation { .. }));
        assert_eq!(err.to_string(), "Account SID and Auth Token are required");
    }

    assert_eq!(fs::read_to_string(store.path()).expect("read"), original);
}

#[test]
fn line_breaks_are_rejected_and_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let original = "PORT=3000\n";
    fs::write(store.path(), original).expect("seed");

    for (sid, token) in [
        ("AC0123456789abcdef", "tok\nOPENAI_API_KEY=attacker"),
        ("AC0123456789abcdef", "tok\rOPENAI_API_KEY=attacker"),
        ("AC01\n23", "secret-token-value"),
        ("AC0123456789abcdef", "tok\0en"),
    ] {
        let err = store.save(sid, token).expect_err("control character");
        assert!(matches!(err, CredentialsError::Validation { .. }));
    }

    assert_eq!(fs::read_to_string(store.path()).expect("read"), original);
}

#[test]
fn values_the_parser_would_alter_survive_a_save() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);

    for token in ["abc #def", "\"quoted\"", "'single'", "ends\\", " padded ", "a=b"] {
        store.save("AC0123456789abcdef", token).expect("save");
        let loaded = store.load().expect("load").expect("credentials present");
        assert_eq!(loaded.auth_token, token);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn save_then_load_is_exact_or_rejected(sid in "\\PC{0,24}", token in "[\\PC\r\n\t]{0,32}") {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let original = "PORT=3000\n";
        fs::write(store.path(), original).expect("seed");

        match store.save(&sid, &token) {
            Ok(()) => {
                let loaded = store.load().expect("load").expect("credentials present");
                prop_assert_eq!(loaded.account_sid, sid);
                prop_assert_eq!(loaded.auth_token, token);
                prop_assert!(fs::read_to_string(store.path()).expect("read").starts_with(original));
            },
            Err(err) => {
                prop_assert!(matches!(err, CredentialsError::Validation { .. }), "{err}");
                prop_assert!(
                    sid.trim().is_empty()
                        || token.trim().is_empty()
                        || token.chars().any(char::is_control)
                );
                prop_assert_eq!(fs::read_to_string(store.path()).expect("read"), original);
            },
        }
    }
}

#[test]
fn saving_twice_keeps_one_block_and_unrelated_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    fs::write(store.path(), "OPENAI_API_KEY=sk-test\n\n\n").expect("seed");

    store.save("AC1111222233334444", "token-1111222233334444").expect("first save");
    let first = fs::read_to_string(store.path()).expect("read");
    store.save("AC1111222233334444", "token-1111222233334444").expect("second save");
    let second = fs::read_to_string(store.path()).expect("read");

    assert_eq!(first, second);
    assert_eq!(
        second,
        "OPENAI_API_KEY=sk-test\n\n# Twilio credentials\nTWILIO_ACCOUNT_SID=\"AC1111222233334444\"\nTWILIO_AUTH_TOKEN=\"token-1111222233334444\"\n"
    );
}

#[test]
fn hand_edited_files_are_understood() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    fs::write(
        store.path(),
        "# local settings\nexport TWILIO_ACCOUNT_SID=\"ACabc\"\nTWILIO_AUTH_TOKEN='tok' \n",
    )
    .expect("seed");

    let loaded = store.load().expect("load");
    assert_eq!(
        loaded,
        AccountCredentials::from_parts(Some("ACabc"), Some("tok")),
    );
}

#[test]
fn one_missing_value_means_unset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    fs::write(store.path(), "TWILIO_ACCOUNT_SID=AC1\nTWILIO_AUTH_TOKEN=\n").expect("seed");

    assert!(!store.is_set().expect("is_set"));
}

#[test]
fn debug_output_hides_the_token() {
    let creds = AccountCredentials::from_parts(Some("AC0123456789abcdef"), Some("super-secret-token"))
        .expect("both present");
    let rendered = format!("{creds:?}");

    assert!(!rendered.contains("super-secret-token"));
    assert!(!rendered.contains("AC0123456789abcdef"));
}
