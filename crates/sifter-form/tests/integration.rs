//! Integration tests for sifter-form.
//!
//! These drive the form and the search coordinator against a shared
//! `FilterBoard`, the way a host UI wires them together.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;
use sifter_engine::{
    DataType, DateStorage, EngineConfig, Field, Filter, FilterBoard, FilterScheme, FilterValue,
    Operator, Primitive, RangeValue, SchemaSnapshot, Scope, Source,
};
use sifter_form::{
    FilterForm, FormError, FormField, FormStage, SearchCoordinator, SearchResult, ValueKind,
};

fn schema() -> SchemaSnapshot {
    let scheme = FilterScheme::default()
        .with_data_type(
            "clock",
            DataType::new(Primitive::Time, Scope::Time)
                .with_operator("at", Operator::scalar("at"))
                .with_operator("during", Operator::range("during")),
        )
        .with_data_type(
            "day",
            DataType::new(Primitive::Date, Scope::Date)
                .with_operator("on", Operator::scalar("on"))
                .with_operator("between", Operator::range("between")),
        )
        .with_data_type(
            "money",
            DataType::new(Primitive::Number, Scope::Number)
                .with_operator("eq", Operator::scalar("equals"))
                .with_operator("between", Operator::range("between")),
        )
        .with_data_type(
            "status",
            DataType::new(Primitive::Option, Scope::Option)
                .with_operator("is", Operator::scalar("is"))
                .with_option("paid", "Paid")
                .with_option("due", "Due"),
        );
    let invoices = Source::new("invoices", "Invoices")
        .with_field("sent_at", Field::new("Sent at", "clock"))
        .with_field("issued", Field::new("Issued", "day"))
        .with_field("total", Field::new("Total", "money"))
        .with_field("status", Field::new("Status", "status"));
    SchemaSnapshot::new(vec![invoices], scheme)
}

fn board() -> FilterBoard {
    FilterBoard::new(schema(), EngineConfig::default())
}

fn form_for(field: &str, operator: &str, board: &FilterBoard) -> FilterForm {
    let mut form = FilterForm::new();
    form.select_source("invoices");
    form.select_field(field);
    form.select_operator(operator, board.schema());
    form
}

// ============================================================================
// Submitting drafts
// ============================================================================

#[test]
fn time_range_draft_submits_as_json() {
    let mut board = board();
    let mut form = form_for("sent_at", "during", &board);
    form.set_range_from("09:00:00");
    form.set_range_to("17:00:00");

    assert!(form.submit_to(&mut board).unwrap());
    assert_eq!(
        board.filters(),
        &[Filter::new(
            "invoices",
            "sent_at",
            "during",
            r#"{"from":"09:00:00","to":"17:00:00"}"#
        )]
    );
}

#[test]
fn date_drafts_store_in_configured_form() {
    let mut board = FilterBoard::new(
        schema(),
        EngineConfig {
            date_storage: DateStorage::Iso,
            ..EngineConfig::default()
        },
    );
    let mut form = form_for("issued", "on", &board);
    form.set_value("29-02-2024");
    form.submit_to(&mut board).unwrap();
    assert_eq!(board.filters()[0].value, "2024-02-29");

    // The same day stored in display form is a duplicate.
    assert!(!board.add(Filter::new("invoices", "issued", "on", "29-02-2024")));
    assert_eq!(board.len(), 1);
}

#[test]
fn equivalent_numbers_are_not_added_twice() {
    let mut board = board();
    for entry in ["7", "007", "7.0"] {
        let mut form = form_for("total", "eq", &board);
        form.set_value(entry);
        form.submit_to(&mut board).unwrap();
    }
    assert_eq!(board.len(), 1);
    assert_eq!(board.filters()[0].value, "7");
}

#[test]
fn invalid_drafts_leave_board_untouched() {
    let mut board = board();
    let mut form = form_for("total", "between", &board);
    form.set_range_from("10");

    let err = form.submit_to(&mut board).unwrap_err();
    let FormError::Invalid(errors) = &err;
    assert!(errors.get(FormField::RangeTo).is_some());
    assert!(board.is_empty());
    assert_eq!(form.stage(board.schema()), FormStage::OperatorChosen);
}

#[test]
fn option_fields_offer_their_labels() {
    let board = board();
    let form = form_for("status", "is", &board);
    let shape = form.value_shape(board.schema()).unwrap();
    let ValueKind::Choice(choices) = shape.kind else {
        panic!("expected a choice input, got {:?}", shape.kind);
    };
    let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Paid", "Due"]);
}

// ============================================================================
// Editing existing filters
// ============================================================================

#[test]
fn editing_a_date_range_round_trips() {
    let mut board = board();
    let stored = Filter::new(
        "invoices",
        "issued",
        "between",
        r#"{"from":"01-01-2024","to":"31-01-2024"}"#,
    );
    board.add(stored.clone());

    let mut form = FilterForm::from_filter(&stored, board.schema());
    assert_eq!(
        form.draft().value,
        FilterValue::from(RangeValue::new("01-01-2024", "31-01-2024"))
    );
    form.set_range_to("15-01-2024");
    assert!(form.submit_to(&mut board).unwrap());
    assert_eq!(
        board.filters()[0].value,
        r#"{"from":"01-01-2024","to":"15-01-2024"}"#
    );
    assert_eq!(board.len(), 1);
}

#[test]
fn editing_into_an_existing_filter_keeps_one_copy() {
    let mut board = board();
    let first = Filter::new("invoices", "total", "eq", "10");
    let second = Filter::new("invoices", "total", "eq", "20");
    board.add(first.clone());
    board.add(second.clone());

    let mut form = FilterForm::from_filter(&first, board.schema());
    form.set_value("020");
    assert!(form.submit_to(&mut board).unwrap());
    assert_eq!(board.filters(), &[second]);
}

// ============================================================================
// Search results
// ============================================================================

#[tokio::test(start_paused = true)]
async fn latest_search_result_replaces_schema_and_filters() {
    let coordinator = SearchCoordinator::new(Duration::from_millis(200));
    let changes = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&changes);
    let mut board = FilterBoard::new(SchemaSnapshot::default(), EngineConfig::default())
        .on_change(move |_| *counter.lock().unwrap() += 1);

    let fetch = |query: String| async move {
        Ok::<_, String>(SearchResult {
            schema: schema(),
            filters: Some(vec![Filter::global(query)]),
        })
    };
    let (stale, fresh) = tokio::join!(coordinator.run("inv", fetch), coordinator.run("invoice", fetch));
    assert!(stale.is_none());

    assert!(fresh.unwrap().apply(&mut board));
    assert_eq!(board.filters(), &[Filter::global("invoice")]);
    assert!(board.schema().source("invoices").is_some());
    assert_eq!(*changes.lock().unwrap(), 1);
}

#[tokio::test]
async fn failed_search_keeps_filters() {
    let coordinator = SearchCoordinator::new(Duration::ZERO);
    let mut board = board();
    board.add(Filter::global("keep"));

    let outcome = coordinator
        .run("q", |_| async { Err::<SearchResult, _>("timeout") })
        .await;
    assert!(outcome.is_none());
    assert_eq!(board.filters(), &[Filter::global("keep")]);
}

#[test]
fn schema_only_results_keep_filters() {
    let mut board = board();
    board.add(Filter::global("keep"));
    let result = SearchResult {
        schema: SchemaSnapshot::default(),
        filters: None,
    };
    assert!(!result.apply(&mut board));
    assert_eq!(board.len(), 1);
    assert!(board.schema().sources.is_empty());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn scalar_survives_operator_round_trip(value in "[0-9]{1,6}") {
        let schema = schema();
        let mut form = FilterForm::new();
        form.select_source("invoices");
        form.select_field("total");
        form.select_operator("eq", &schema);
        form.set_value(value.as_str());
        form.select_operator("between", &schema);
        form.select_operator("eq", &schema);
        prop_assert_eq!(&form.draft().value, &FilterValue::from(value.as_str()));
    }

    #[test]
    fn fresh_operator_is_not_ready(field in prop::sample::select(vec!["sent_at", "issued", "total", "status"])) {
        let schema = schema();
        let mut form = FilterForm::new();
        form.select_source("invoices");
        form.select_field(field);
        let operator = sifter_form::operator_choices(&schema, "invoices", field)
            .into_iter()
            .next()
            .unwrap();
        form.select_operator(operator.value, &schema);
        prop_assert_eq!(form.stage(&schema), FormStage::OperatorChosen);
        prop_assert!(form.submit(&schema, &EngineConfig::default()).is_err());
    }
}
