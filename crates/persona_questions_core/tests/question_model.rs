use persona_questions_core::{Category, QuestionFields, QuestionRecord, QuestionValidationError};

#[test]
fn from_fields_applies_defaults() {
    let record = QuestionRecord::from_fields(QuestionFields::new().with_text("hi"), 3);

    assert_eq!(record.text, "hi");
    assert_eq!(record.category, Category::Other);
    assert_eq!(record.priority, 3);
    assert!(!record.required);
    assert!(!record.attention);
    assert_eq!(record.notes, "");
}

#[test]
fn from_fields_coerces_unknown_category_and_clamps_priority() {
    let fields = QuestionFields::new()
        .with_text("favourite toy?")
        .with_category("toys")
        .with_priority(250);
    let record = QuestionRecord::from_fields(fields, 1);

    assert_eq!(record.category, Category::Other);
    assert_eq!(record.priority, 100);
}

#[test]
fn fields_validate_reports_invalid_category() {
    let err = QuestionFields::new()
        .with_text("x")
        .with_category("toys")
        .validate()
        .unwrap_err();
    assert_eq!(err, QuestionValidationError::InvalidCategory("toys".to_string()));
}

#[test]
fn fields_validate_reports_priority_bounds() {
    for priority in [0, 101, -3] {
        let err = QuestionFields::new()
            .with_priority(priority)
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionValidationError::InvalidPriority(priority));
    }
    QuestionFields::new().with_priority(1).validate().unwrap();
    QuestionFields::new().with_priority(100).validate().unwrap();
}

#[test]
fn fields_validate_rejects_whitespace_text_and_ignores_omitted_fields() {
    let err = QuestionFields::new()
        .with_text(" \n\t")
        .validate()
        .unwrap_err();
    assert_eq!(err, QuestionValidationError::EmptyText);

    assert!(QuestionFields::new().is_empty());
    QuestionFields::new().validate().unwrap();
}

#[test]
fn record_validate_checks_priority_and_text() {
    QuestionRecord::new("When did you first walk?", 1)
        .validate()
        .unwrap();

    let err = QuestionRecord::new("ok", 0).validate().unwrap_err();
    assert_eq!(err, QuestionValidationError::InvalidPriority(0));

    let err = QuestionRecord::new("   ", 5).validate().unwrap_err();
    assert_eq!(err, QuestionValidationError::EmptyText);
}

#[test]
fn record_serializes_every_field_in_order() {
    let record = QuestionRecord::new("Any siblings?", 2)
        .with_category(Category::Family)
        .with_required(true)
        .with_attention(true)
        .with_notes("ask gently");

    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(
        json,
        r#"{"text":"Any siblings?","category":"family","priority":2,"required":true,"attention":true,"notes":"ask gently"}"#
    );
}

#[test]
fn category_names_round_trip() {
    for category in Category::ALL {
        assert_eq!(Category::parse(category.as_str()), Some(category));
        assert_eq!(category.to_string(), category.as_str());
    }
}

#[test]
fn preview_truncates_long_text() {
    let record = QuestionRecord::new("a".repeat(50), 1);
    let preview = record.preview(40);
    assert_eq!(preview.chars().count(), 43);
    assert!(preview.ends_with("..."));
}
