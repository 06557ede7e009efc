//! The filter form: a draft filter built one choice at a time.
//!
//! A draft moves through [`FormStage`]s as the user picks a source, a
//! field, an operator and finally a value. Each upstream choice resets
//! the choices that depend on it, and changing between scalar and range
//! operators reshapes the value already entered.

use sifter_engine::date::parse_any_date;
use sifter_engine::{
    clamp_time, decrement_time_value, increment_time_value, parse_number, parse_time_string,
    DataType, EngineConfig, Filter, FilterBoard, FilterValue, RangeValue, SchemaSnapshot, Scope,
    Time, TimeUnit,
};
use tracing::debug;

use crate::choices::{value_kind, ValueShape};
use crate::error::{FormError, FormField, ValidationErrors};
use crate::serialize::{editable_value, serialize_value};

/// How far a draft has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormStage {
    /// No source chosen.
    Empty,
    SourceChosen,
    /// Field chosen; its operators are available.
    FieldChosen,
    /// Operator chosen; the value input is shown.
    OperatorChosen,
    /// Everything is filled in and valid.
    Ready,
}

/// Which value input an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePart {
    /// The single value of a scalar operator.
    Value,
    From,
    To,
}

impl ValuePart {
    fn form_field(self) -> FormField {
        match self {
            ValuePart::Value => FormField::Value,
            ValuePart::From => FormField::RangeFrom,
            ValuePart::To => FormField::RangeTo,
        }
    }
}

/// The in-progress filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDraft {
    pub source: String,
    pub field: String,
    pub operator: String,
    pub value: FilterValue,
}

/// Collects a filter from successive user choices.
///
/// # Example
///
/// ```
/// use sifter_engine::{
///     DataType, EngineConfig, Field, FilterScheme, Operator, Primitive, SchemaSnapshot,
///     Scope, Source,
/// };
/// use sifter_form::{FilterForm, FormStage};
///
/// let scheme = FilterScheme::default().with_data_type(
///     "text",
///     DataType::new(Primitive::String, Scope::Default)
///         .with_operator("eq", Operator::scalar("equals")),
/// );
/// let people = Source::new("people", "People").with_field("name", Field::new("Name", "text"));
/// let schema = SchemaSnapshot::new(vec![people], scheme);
///
/// let mut form = FilterForm::new();
/// form.select_source("people");
/// form.select_field("name");
/// form.select_operator("eq", &schema);
/// form.set_value("Ada");
/// assert_eq!(form.stage(&schema), FormStage::Ready);
///
/// let filter = form.submit(&schema, &EngineConfig::default()).unwrap();
/// assert_eq!(filter.value, "Ada");
/// assert_eq!(form.stage(&schema), FormStage::Empty);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    draft: FilterDraft,
    errors: ValidationErrors,
    editing: Option<Filter>,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an existing filter for editing.
    ///
    /// Submitting through [`submit_to`](Self::submit_to) then replaces
    /// `filter` instead of adding a new one.
    pub fn from_filter(filter: &Filter, schema: &SchemaSnapshot) -> Self {
        let resolution = schema.resolve(&filter.source, &filter.field, &filter.operator);
        FilterForm {
            draft: FilterDraft {
                source: filter.source.clone(),
                field: filter.field.clone(),
                operator: filter.operator.clone(),
                value: editable_value(&filter.value, &resolution),
            },
            errors: ValidationErrors::new(),
            editing: Some(filter.clone()),
        }
    }

    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    /// Messages from the last failed submission, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The filter being edited, if the form was opened on one.
    pub fn editing(&self) -> Option<&Filter> {
        self.editing.as_ref()
    }

    /// Clears the draft, any errors and the edited filter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn select_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source == self.draft.source {
            return;
        }
        self.draft = FilterDraft {
            source,
            ..FilterDraft::default()
        };
        self.errors = ValidationErrors::new();
    }

    pub fn select_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if field == self.draft.field {
            return;
        }
        self.draft.field = field;
        self.draft.operator.clear();
        self.draft.value = FilterValue::default();
        for cleared in [
            FormField::Field,
            FormField::Operator,
            FormField::Value,
            FormField::RangeFrom,
            FormField::RangeTo,
        ] {
            self.errors.clear(cleared);
        }
    }

    /// Chooses an operator and reshapes the value to match it.
    ///
    /// A scalar value becomes the `from` end of a range. A range collapses
    /// to its `from` end.
    pub fn select_operator(&mut self, operator: impl Into<String>, schema: &SchemaSnapshot) {
        self.draft.operator = operator.into();
        self.errors.clear(FormField::Operator);

        let range = self.resolves_to_range(schema);
        let current = std::mem::take(&mut self.draft.value);
        self.draft.value = match (range, current) {
            (true, FilterValue::Scalar(scalar)) => {
                FilterValue::Range(RangeValue::new(scalar.to_canonical_string(), ""))
            }
            (false, FilterValue::Range(range)) => FilterValue::from(range.from),
            (_, unchanged) => unchanged,
        };
    }

    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.draft.value = value.into();
        self.errors.clear(FormField::Value);
    }

    pub fn set_range_from(&mut self, from: impl Into<String>) {
        let from = from.into();
        self.edit_range(|range| range.from = from);
        self.errors.clear(FormField::RangeFrom);
    }

    pub fn set_range_to(&mut self, to: impl Into<String>) {
        let to = to.into();
        self.edit_range(|range| range.to = to);
        self.errors.clear(FormField::RangeTo);
    }

    fn edit_range(&mut self, edit: impl FnOnce(&mut RangeValue)) {
        let mut range = match std::mem::take(&mut self.draft.value) {
            FilterValue::Range(range) => range,
            FilterValue::Scalar(scalar) => RangeValue::new(scalar.to_canonical_string(), ""),
        };
        edit(&mut range);
        self.draft.value = FilterValue::Range(range);
    }

    fn part_text(&self, part: ValuePart) -> String {
        match (&self.draft.value, part) {
            (FilterValue::Range(range), ValuePart::From) => range.from.clone(),
            (FilterValue::Range(range), ValuePart::To) => range.to.clone(),
            (FilterValue::Range(range), ValuePart::Value) => range.from.clone(),
            (FilterValue::Scalar(scalar), _) => scalar.to_canonical_string(),
        }
    }

    fn set_part(&mut self, part: ValuePart, text: String) {
        match part {
            ValuePart::Value => self.set_value(text),
            ValuePart::From => self.set_range_from(text),
            ValuePart::To => self.set_range_to(text),
        }
    }

    /// The time currently entered in `part`, if it parses.
    pub fn time_of(&self, part: ValuePart) -> Option<Time> {
        parse_time_string(&self.part_text(part))
    }

    fn store_time(&mut self, part: ValuePart, time: Time) -> Time {
        // A range's ends never cross.
        let time = match part {
            ValuePart::From => clamp_time(&time, None, self.time_of(ValuePart::To).as_ref()),
            ValuePart::To => clamp_time(&time, self.time_of(ValuePart::From).as_ref(), None),
            ValuePart::Value => time,
        };
        self.set_part(part, time.to_storage_string());
        time
    }

    /// Sets one component of a time input from raw user input.
    ///
    /// Out-of-range input is clamped: hours to `0..=23`, minutes and
    /// seconds to `0..=59`. A part without a valid time starts at midnight.
    pub fn set_time_component(&mut self, part: ValuePart, unit: TimeUnit, raw: i64) -> Time {
        let current = self.time_of(part).unwrap_or_default();
        let (mut h, mut m, mut s) = (current.hours_24(), current.minutes, current.seconds);
        match unit {
            TimeUnit::Hours => h = raw.clamp(0, 23) as u8,
            TimeUnit::Minutes => m = raw.clamp(0, 59) as u8,
            TimeUnit::Seconds => s = raw.clamp(0, 59) as u8,
        }
        let time = Time::from_24h(h, m, s).unwrap_or(current);
        self.store_time(part, time)
    }

    /// Steps a time input up by one `unit`, wrapping past midnight.
    pub fn increment_time(&mut self, part: ValuePart, unit: TimeUnit) -> Time {
        let current = self.time_of(part).unwrap_or_default();
        self.store_time(part, increment_time_value(&current, unit))
    }

    /// Steps a time input down by one `unit`, wrapping past midnight.
    pub fn decrement_time(&mut self, part: ValuePart, unit: TimeUnit) -> Time {
        let current = self.time_of(part).unwrap_or_default();
        self.store_time(part, decrement_time_value(&current, unit))
    }

    fn resolves_to_range(&self, schema: &SchemaSnapshot) -> bool {
        schema
            .operator(&self.draft.source, &self.draft.field, &self.draft.operator)
            .is_some_and(|op| op.range)
    }

    /// The input to show for the value, once an operator is chosen.
    pub fn value_shape(&self, schema: &SchemaSnapshot) -> Option<ValueShape> {
        let d = &self.draft;
        let resolution = schema.resolve(&d.source, &d.field, &d.operator);
        let (data_type, operator) = (resolution.data_type?, resolution.operator?);
        Some(ValueShape {
            kind: value_kind(data_type),
            range: operator.range,
        })
    }

    pub fn stage(&self, schema: &SchemaSnapshot) -> FormStage {
        let d = &self.draft;
        if d.source.is_empty() {
            FormStage::Empty
        } else if d.field.is_empty() {
            FormStage::SourceChosen
        } else if schema.operator(&d.source, &d.field, &d.operator).is_none() {
            FormStage::FieldChosen
        } else if self.validate(schema).is_err() {
            FormStage::OperatorChosen
        } else {
            FormStage::Ready
        }
    }

    /// Checks the draft against `schema` and collects per-field messages.
    pub fn validate(&self, schema: &SchemaSnapshot) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let d = &self.draft;

        if d.source.trim().is_empty() {
            errors.insert(FormField::Source, "Choose a source");
        } else if schema.source(&d.source).is_none() {
            errors.insert(FormField::Source, format!("Unknown source '{}'", d.source));
        }
        if d.field.trim().is_empty() {
            errors.insert(FormField::Field, "Choose a field");
        } else if schema.field(&d.source, &d.field).is_none() {
            errors.insert(FormField::Field, format!("Unknown field '{}'", d.field));
        }

        let resolution = schema.resolve(&d.source, &d.field, &d.operator);
        if d.operator.trim().is_empty() {
            errors.insert(FormField::Operator, "Choose an operator");
        } else if resolution.data_type.is_some() && resolution.operator.is_none() {
            errors.insert(
                FormField::Operator,
                format!("Operator '{}' does not apply to this field", d.operator),
            );
        }

        match (&d.value, resolution.is_range()) {
            (FilterValue::Range(range), true) => {
                check_part(&mut errors, FormField::RangeFrom, &range.from, resolution.data_type);
                check_part(&mut errors, FormField::RangeTo, &range.to, resolution.data_type);
            }
            (FilterValue::Scalar(_), true) => {
                errors.insert(FormField::Value, "Enter both ends of the range");
            }
            (FilterValue::Range(_), false) if resolution.operator.is_some() => {
                errors.insert(FormField::Value, "Enter a single value");
            }
            (value, _) => {
                let text = value.to_stored_string();
                check_part(&mut errors, FormField::Value, &text, resolution.data_type);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and serializes the draft into a filter.
    ///
    /// On success the form resets to [`FormStage::Empty`]. On failure the
    /// draft is kept and [`errors`](Self::errors) holds the messages.
    pub fn submit(
        &mut self,
        schema: &SchemaSnapshot,
        config: &EngineConfig,
    ) -> Result<Filter, FormError> {
        if let Err(errors) = self.validate(schema) {
            debug!(%errors, "filter draft rejected");
            self.errors = errors.clone();
            return Err(FormError::Invalid(errors));
        }

        let d = &self.draft;
        let data_type = schema.data_type(&d.source, &d.field);
        let value = serialize_value(&d.value, data_type, config);
        let filter = Filter::new(d.source.clone(), d.field.clone(), d.operator.clone(), value);
        self.reset();
        Ok(filter)
    }

    /// Submits into `board`, replacing the edited filter if there is one.
    ///
    /// An edit that turns the filter into one already on the board leaves
    /// a single copy. Returns whether the board changed.
    pub fn submit_to(&mut self, board: &mut FilterBoard) -> Result<bool, FormError> {
        let editing = self.editing.take();
        let filter = match self.submit(board.schema(), board.config()) {
            Ok(filter) => filter,
            Err(err) => {
                self.editing = editing;
                return Err(err);
            }
        };
        Ok(match editing {
            Some(previous) => board.update(&previous, filter),
            None => board.add(filter),
        })
    }
}

fn check_part(
    errors: &mut ValidationErrors,
    field: FormField,
    text: &str,
    data_type: Option<&DataType>,
) {
    if text.trim().is_empty() {
        errors.insert(field, "Enter a value");
        return;
    }
    let Some(data_type) = data_type else {
        return;
    };
    match data_type.scope {
        Scope::Time if parse_time_string(text).is_none() => {
            errors.insert(field, "Enter a time as HH:MM:SS");
        }
        Scope::Date if parse_any_date(text).is_none() => {
            errors.insert(field, "Enter a date as DD-MM-YYYY");
        }
        Scope::Number if parse_number(text).is_nan() => {
            errors.insert(field, "Enter a number");
        }
        Scope::Option if data_type.option_label(text).is_none() => {
            errors.insert(field, "Choose one of the listed options");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sifter_engine::{Field, FilterScheme, Operator, Primitive, Source};

    fn schema() -> SchemaSnapshot {
        let scheme = FilterScheme::default()
            .with_data_type(
                "number",
                DataType::new(Primitive::Number, Scope::Number)
                    .with_operator("eq", Operator::scalar("equals"))
                    .with_operator("between", Operator::range("between")),
            )
            .with_data_type(
                "clock",
                DataType::new(Primitive::Time, Scope::Time)
                    .with_operator("at", Operator::scalar("at"))
                    .with_operator("during", Operator::range("during")),
            )
            .with_data_type(
                "day",
                DataType::new(Primitive::Date, Scope::Date)
                    .with_operator("on", Operator::scalar("on")),
            )
            .with_data_type(
                "state",
                DataType::new(Primitive::Option, Scope::Option)
                    .with_operator("is", Operator::scalar("is"))
                    .with_option("open", "Open"),
            );
        let store = Source::new("store", "Store")
            .with_field("stock", Field::new("Stock", "number"))
            .with_field("opens", Field::new("Opens", "clock"))
            .with_field("since", Field::new("Since", "day"))
            .with_field("state", Field::new("State", "state"));
        SchemaSnapshot::new(vec![store, Source::new("other", "Other")], scheme)
    }

    fn form_at(field: &str, operator: &str) -> FilterForm {
        let mut form = FilterForm::new();
        form.select_source("store");
        form.select_field(field);
        form.select_operator(operator, &schema());
        form
    }

    // ====================================================================
    // Stages and resets
    // ====================================================================

    #[test]
    fn stages_advance_with_each_choice() {
        let schema = schema();
        let mut form = FilterForm::new();
        assert_eq!(form.stage(&schema), FormStage::Empty);
        form.select_source("store");
        assert_eq!(form.stage(&schema), FormStage::SourceChosen);
        form.select_field("stock");
        assert_eq!(form.stage(&schema), FormStage::FieldChosen);
        form.select_operator("eq", &schema);
        assert_eq!(form.stage(&schema), FormStage::OperatorChosen);
        form.set_value("12");
        assert_eq!(form.stage(&schema), FormStage::Ready);
    }

    #[test]
    fn new_source_resets_downstream_choices() {
        let mut form = form_at("stock", "eq");
        form.set_value("3");
        form.select_source("other");
        assert_eq!(
            form.draft(),
            &FilterDraft {
                source: "other".into(),
                ..FilterDraft::default()
            }
        );
    }

    #[test]
    fn same_source_keeps_choices() {
        let mut form = form_at("stock", "eq");
        form.select_source("store");
        assert_eq!(form.draft().field, "stock");
    }

    #[test]
    fn new_field_resets_operator_and_value() {
        let mut form = form_at("stock", "eq");
        form.set_value("3");
        form.select_field("opens");
        assert_eq!(form.draft().operator, "");
        assert!(form.draft().value.is_empty());
        assert_eq!(form.draft().source, "store");
    }

    // ====================================================================
    // Operator changes
    // ====================================================================

    #[test]
    fn range_operator_promotes_scalar() {
        let schema = schema();
        let mut form = form_at("stock", "eq");
        form.set_value("5");
        form.select_operator("between", &schema);
        assert_eq!(form.draft().value, FilterValue::from(RangeValue::new("5", "")));
    }

    #[test]
    fn scalar_operator_collapses_range() {
        let schema = schema();
        let mut form = form_at("stock", "between");
        form.set_range_from("1");
        form.set_range_to("9");
        form.select_operator("eq", &schema);
        assert_eq!(form.draft().value, FilterValue::from("1"));
    }

    #[test]
    fn value_shape_follows_scope_and_operator() {
        let schema = schema();
        let shape = form_at("opens", "during").value_shape(&schema).unwrap();
        assert!(shape.range);
        assert_eq!(shape.kind, crate::ValueKind::Time);
        assert!(FilterForm::new().value_shape(&schema).is_none());
    }

    // ====================================================================
    // Validation and submission
    // ====================================================================

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = FilterForm::new().validate(&schema()).unwrap_err();
        assert!(errors.get(FormField::Source).is_some());
        assert!(errors.get(FormField::Field).is_some());
        assert!(errors.get(FormField::Operator).is_some());
        assert!(errors.get(FormField::Value).is_some());
    }

    #[test]
    fn ranges_need_both_ends() {
        let mut form = form_at("stock", "between");
        form.set_range_from("1");
        let errors = form.validate(&schema()).unwrap_err();
        assert_eq!(errors.get(FormField::RangeTo), Some("Enter a value"));
        assert_eq!(errors.get(FormField::RangeFrom), None);
    }

    #[test]
    fn values_are_checked_against_scope() {
        let schema = schema();
        let mut form = form_at("opens", "at");
        form.set_value("25:00:00");
        assert!(form.validate(&schema).unwrap_err().get(FormField::Value).is_some());

        let mut form = form_at("state", "is");
        form.set_value("closed");
        assert!(form.validate(&schema).is_err());
        form.set_value("open");
        assert!(form.validate(&schema).is_ok());
    }

    #[test]
    fn failed_submit_keeps_draft_and_records_errors() {
        let schema = schema();
        let mut form = form_at("stock", "eq");
        let err = form.submit(&schema, &EngineConfig::default()).unwrap_err();
        assert!(err.errors().get(FormField::Value).is_some());
        assert_eq!(form.errors(), err.errors());
        assert_eq!(form.draft().field, "stock");

        form.set_value("4");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn submit_serializes_and_resets() {
        let schema = schema();
        let mut form = form_at("opens", "at");
        form.set_value("09:05:00 PM");
        let filter = form.submit(&schema, &EngineConfig::default()).unwrap();
        assert_eq!(filter, Filter::new("store", "opens", "at", "21:05:00"));
        assert_eq!(form.draft(), &FilterDraft::default());
    }

    // ====================================================================
    // Time editing
    // ====================================================================

    #[test]
    fn time_components_are_clamped() {
        let mut form = form_at("opens", "at");
        form.set_time_component(ValuePart::Value, TimeUnit::Hours, 30);
        form.set_time_component(ValuePart::Value, TimeUnit::Minutes, -4);
        form.set_time_component(ValuePart::Value, TimeUnit::Seconds, 75);
        assert_eq!(form.draft().value, FilterValue::from("23:00:59"));
    }

    #[test]
    fn stepping_wraps_around_midnight() {
        let mut form = form_at("opens", "at");
        form.set_value("23:59:59");
        form.increment_time(ValuePart::Value, TimeUnit::Seconds);
        assert_eq!(form.draft().value, FilterValue::from("00:00:00"));
        form.decrement_time(ValuePart::Value, TimeUnit::Hours);
        assert_eq!(form.draft().value, FilterValue::from("23:00:00"));
    }

    #[test]
    fn range_ends_do_not_cross() {
        let mut form = form_at("opens", "during");
        form.set_range_from("10:00:00");
        form.set_range_to("09:00:00");
        form.increment_time(ValuePart::To, TimeUnit::Minutes);
        assert_eq!(form.time_of(ValuePart::To), parse_time_string("10:00:00"));
    }

    // ====================================================================
    // Editing existing filters
    // ====================================================================

    #[test]
    fn from_filter_loads_draft() {
        let schema = schema();
        let filter = Filter::new("store", "stock", "between", r#"{"from":"1","to":"5"}"#);
        let form = FilterForm::from_filter(&filter, &schema);
        assert_eq!(form.draft().value, FilterValue::from(RangeValue::new("1", "5")));
        assert_eq!(form.editing(), Some(&filter));
        assert_eq!(form.stage(&schema), FormStage::Ready);
    }

    #[test]
    fn submit_to_replaces_edited_filter() {
        let mut board = FilterBoard::new(schema(), EngineConfig::default());
        let original = Filter::new("store", "stock", "eq", "1");
        board.add(original.clone());
        board.add(Filter::global("x"));

        let mut form = FilterForm::from_filter(&original, board.schema());
        form.set_value("2");
        assert!(form.submit_to(&mut board).unwrap());
        assert_eq!(
            board.filters(),
            &[Filter::new("store", "stock", "eq", "2"), Filter::global("x")]
        );
        assert!(form.editing().is_none());
    }
}
