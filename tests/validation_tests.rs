use prereg_notify::{
    error::NotificationError,
    models::{
        notification::LocalizedValue,
        request::NotificationRequest,
        validation::{
            validate_email, validate_phone, validate_request, verify_name_match,
        },
    },
};

fn complete_request() -> NotificationRequest {
    NotificationRequest {
        pre_registration_id: Some("98765".to_string()),
        appointment_date: Some("2024-05-10".to_string()),
        appointment_time: Some("10:30 AM".to_string()),
        name: Some("Asha".to_string()),
        email_id: Some("asha@example.com".to_string()),
        mob_num: Some("+919876543210".to_string()),
        language_code: Some("eng".to_string()),
        ..Default::default()
    }
}

/// Test: every missing mandatory field is reported at once, not just the first
#[test]
fn missing_mandatory_fields_are_collected() {
    let raw = NotificationRequest::default();

    let err = validate_request(&raw, "eng").unwrap_err();

    match err {
        NotificationError::MandatoryField { fields } => {
            for expected in [
                "preRegistrationId",
                "appointmentDate",
                "appointmentTime",
                "name",
                "contact information",
            ] {
                assert!(
                    fields.iter().any(|field| field == expected),
                    "missing field list should contain {expected}, got {fields:?}"
                );
            }
        }
        other => panic!("expected MandatoryField, got {other:?}"),
    }
}

/// Test: no contact field at all fails the mandatory-contact rule
#[test]
fn absent_contacts_fail_mandatory_contact() {
    let mut raw = complete_request();
    raw.email_id = None;
    raw.mob_num = None;

    let err = validate_request(&raw, "eng").unwrap_err();

    match err {
        NotificationError::MandatoryField { fields } => {
            assert_eq!(fields, vec!["contact information".to_string()]);
        }
        other => panic!("expected MandatoryField, got {other:?}"),
    }
}

/// Test: a present but malformed email is an invalid-field failure, not a missing one
#[test]
fn malformed_email_is_invalid_not_missing() {
    let mut raw = complete_request();
    raw.email_id = Some("not-an-address".to_string());
    raw.mob_num = None;

    let err = validate_request(&raw, "eng").unwrap_err();

    match err {
        NotificationError::InvalidField { field } => assert_eq!(field, "emailID"),
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

/// Test: both contacts present and malformed still fail mandatory-contact
#[test]
fn both_contacts_malformed_fail_mandatory_contact() {
    let mut raw = complete_request();
    raw.email_id = Some("not-an-address".to_string());
    raw.mob_num = Some("call-me-maybe".to_string());

    let err = validate_request(&raw, "eng").unwrap_err();

    match err {
        NotificationError::MandatoryField { fields } => {
            assert!(fields.iter().any(|field| field == "contact information"));
        }
        other => panic!("expected MandatoryField, got {other:?}"),
    }
}

/// Test: one valid contact is enough, the malformed sibling is dropped
#[test]
fn valid_phone_survives_invalid_email() {
    let mut raw = complete_request();
    raw.email_id = Some("broken@".to_string());

    let notification = validate_request(&raw, "eng").unwrap();

    assert_eq!(notification.mob_num.as_deref(), Some("+919876543210"));
    assert!(notification.email_id.is_none());
}

/// Test: batch requests tolerate missing name and contacts
#[test]
fn batch_requests_relax_name_and_contact_rules() {
    let raw = NotificationRequest {
        pre_registration_id: Some("98765".to_string()),
        appointment_date: Some("2024-05-10".to_string()),
        appointment_time: Some("10:30 AM".to_string()),
        is_batch: true,
        ..Default::default()
    };

    let notification = validate_request(&raw, "eng").unwrap();

    assert!(notification.is_batch);
    assert!(notification.email_id.is_none());
    assert!(notification.mob_num.is_none());
}

/// Test: a missing language code falls back to the process default
#[test]
fn missing_language_defaults() {
    let mut raw = complete_request();
    raw.language_code = None;

    let notification = validate_request(&raw, "fra").unwrap();

    assert_eq!(notification.language_code, "fra");
}

/// Test: whitespace-only fields count as missing
#[test]
fn blank_fields_count_as_missing() {
    let mut raw = complete_request();
    raw.appointment_time = Some("   ".to_string());

    let err = validate_request(&raw, "eng").unwrap_err();

    match err {
        NotificationError::MandatoryField { fields } => {
            assert_eq!(fields, vec!["appointmentTime".to_string()]);
        }
        other => panic!("expected MandatoryField, got {other:?}"),
    }
}

/// Test: name matching ignores case and surrounding whitespace
#[test]
fn name_match_is_case_insensitive_and_trimmed() {
    let recorded = vec![
        LocalizedValue::new("fra", "Amira"),
        LocalizedValue::new("eng", "  ASHA  "),
    ];

    assert!(verify_name_match("asha", &recorded).is_ok());
    assert!(matches!(
        verify_name_match("someone else", &recorded),
        Err(NotificationError::NameMismatch)
    ));
}

/// Test: contact format validators accept the common shapes and nothing else
#[test]
fn contact_format_validators() {
    assert!(validate_email("asha@example.com"));
    assert!(validate_email("a.b+c@mail.example.co.in"));
    assert!(!validate_email("plainaddress"));
    assert!(!validate_email("broken@"));
    assert!(!validate_email("@example.com"));

    assert!(validate_phone("+919876543210"));
    assert!(validate_phone("9876543210"));
    assert!(!validate_phone("12345"));
    assert!(!validate_phone("phone-number"));
    assert!(!validate_phone("+1 234 567 8900"));
}
