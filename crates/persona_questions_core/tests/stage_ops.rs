use persona_questions_core::{
    Category, PermutationDefect, QuestionFields, QuestionRecord, Stage, StageError,
    DEFAULT_STAGE_STATUS,
};

fn stage_with(texts: &[&str]) -> Stage {
    let mut stage = Stage::new("infancy");
    for text in texts {
        let priority = stage.next_priority();
        stage.add_question(QuestionRecord::new(*text, priority));
    }
    stage
}

fn texts(stage: &Stage) -> Vec<&str> {
    stage.questions().iter().map(|q| q.text.as_str()).collect()
}

#[test]
fn new_stage_is_empty_and_building() {
    let stage = Stage::new("infancy");
    assert_eq!(stage.name(), "infancy");
    assert_eq!(stage.status(), DEFAULT_STAGE_STATUS);
    assert!(stage.is_empty());
    assert_eq!(stage.next_priority(), 1);
}

#[test]
fn add_question_appends_and_returns_index() {
    let mut stage = stage_with(&["a", "b"]);
    let index = stage.add_question(QuestionRecord::new("c", 9));

    assert_eq!(index, 2);
    assert_eq!(texts(&stage), vec!["a", "b", "c"]);
    assert_eq!(stage.questions()[1].priority, 2);
    assert_eq!(stage.next_priority(), 4);
}

#[test]
fn update_question_merges_fields() {
    let mut stage = stage_with(&["a"]);
    let updated = stage
        .update_question(
            0,
            QuestionFields::new()
                .with_category("illness")
                .with_attention(true),
        )
        .unwrap();

    assert_eq!(updated.text, "a");
    assert_eq!(updated.category, Category::Illness);
    assert!(updated.attention);
    assert_eq!(updated.priority, 1);
}

#[test]
fn update_question_out_of_range_changes_nothing() {
    let mut stage = stage_with(&["a"]);
    let before = stage.clone();

    let err = stage
        .update_question(1, QuestionFields::new().with_text("b"))
        .unwrap_err();
    assert_eq!(err, StageError::IndexOutOfRange { index: 1, len: 1 });
    assert_eq!(stage, before);
}

#[test]
fn delete_question_shifts_survivors_in_order() {
    let mut stage = stage_with(&["q0", "q1", "q2"]);

    let removed = stage.delete_question(1).unwrap();
    assert_eq!(removed.text, "q1");
    assert_eq!(texts(&stage), vec!["q0", "q2"]);

    let err = stage.delete_question(5).unwrap_err();
    assert_eq!(err, StageError::IndexOutOfRange { index: 5, len: 2 });
    assert_eq!(stage.len(), 2);
}

#[test]
fn delete_out_of_range_keeps_three_questions() {
    let mut stage = stage_with(&["q0", "q1", "q2"]);
    assert!(matches!(
        stage.delete_question(5),
        Err(StageError::IndexOutOfRange { index: 5, len: 3 })
    ));
    assert_eq!(stage.len(), 3);
}

#[test]
fn reorder_applies_permutation() {
    let mut stage = stage_with(&["a", "b", "c", "d"]);
    stage.reorder(&[2, 0, 3, 1]).unwrap();
    assert_eq!(texts(&stage), vec!["c", "a", "d", "b"]);
}

#[test]
fn reorder_rejects_non_permutations_without_changes() {
    let mut stage = stage_with(&["a", "b", "c"]);
    let before = stage.clone();

    let cases = vec![
        (
            vec![0, 1],
            PermutationDefect::LengthMismatch {
                expected: 3,
                actual: 2,
            },
        ),
        (
            vec![0, 1, 2, 0],
            PermutationDefect::LengthMismatch {
                expected: 3,
                actual: 4,
            },
        ),
        (vec![0, 0, 1], PermutationDefect::Duplicate(0)),
        (vec![0, 1, 3], PermutationDefect::OutOfRange(3)),
    ];
    for (order, defect) in cases {
        let err = stage.reorder(&order).unwrap_err();
        assert_eq!(err, StageError::InvalidPermutation(defect));
        assert_eq!(stage, before);
    }
}

#[test]
fn reorder_of_empty_stage_accepts_empty_order() {
    let mut stage = Stage::new("empty");
    stage.reorder(&[]).unwrap();
    assert!(stage.is_empty());
}

#[test]
fn move_question_shifts_between_positions() {
    let mut stage = stage_with(&["a", "b", "c", "d"]);

    stage.move_question(0, 2).unwrap();
    assert_eq!(texts(&stage), vec!["b", "c", "a", "d"]);

    stage.move_question(3, 0).unwrap();
    assert_eq!(texts(&stage), vec!["d", "b", "c", "a"]);

    let err = stage.move_question(0, 4).unwrap_err();
    assert_eq!(err, StageError::IndexOutOfRange { index: 4, len: 4 });
}

#[test]
fn set_status_is_free_form() {
    let mut stage = Stage::new("teens");
    stage.set_status("ready for review");
    assert_eq!(stage.status(), "ready for review");
}
