//! Declarative field constraints and the generic validator that enforces them.
//!
//! Each constrained type publishes a static table of [`FieldRule`]s: the field
//! name, a reader projecting the field to a JSON value, and the constraints
//! that value must satisfy. [`validate`] walks the table and reports every
//! violation rather than stopping at the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single predicate over a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The value must be present; strings must contain a non-blank character.
    Required {
        /// Message reported when the constraint fails.
        message: &'static str,
    },
    /// Strings may hold at most `max` characters.
    MaxLength {
        /// Inclusive character limit.
        max: usize,
        /// Message reported when the constraint fails.
        message: &'static str,
    },
    /// Integers must fall within `min..=max`.
    Range {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
        /// Message reported when the constraint fails.
        message: &'static str,
    },
}

impl Constraint {
    /// Evaluate the constraint, returning the failure message if it is violated.
    ///
    /// Absent values only ever violate [`Constraint::Required`].
    pub fn check(&self, value: &Value) -> Result<(), &'static str> {
        match (self, value) {
            (Self::Required { message }, Value::Null) => Err(*message),
            (Self::Required { message }, Value::String(text)) if text.trim().is_empty() => {
                Err(*message)
            }
            (Self::MaxLength { max, message }, Value::String(text))
                if text.chars().count() > *max =>
            {
                Err(*message)
            }
            (Self::Range { min, max, message }, Value::Number(number)) => {
                match number.as_i64() {
                    Some(n) if (*min..=*max).contains(&n) => Ok(()),
                    _ => Err(*message),
                }
            }
            _ => Ok(()),
        }
    }
}

/// Constraint table entry for one field of `T`.
pub struct FieldRule<T> {
    /// Field name reported in violations.
    pub field: &'static str,
    /// Projects the field into a JSON value for checking.
    pub read: fn(&T) -> Value,
    /// Constraints evaluated in declaration order.
    pub constraints: &'static [Constraint],
}

/// Types that publish a constraint table.
pub trait Constrained: Sized + 'static {
    /// The constraint table for this type.
    fn rules() -> &'static [FieldRule<Self>];
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field the constraint applies to.
    pub field: String,
    /// Human readable failure message.
    pub message: String,
}

/// Every constraint violated by a value, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field constraint(s) violated", .0.len())]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    /// Violations in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Consume the error, returning the violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }

    /// Nest every field name under `prefix`, as in `prefix.field`.
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|violation| Violation {
                    field: format!("{prefix}.{}", violation.field),
                    message: violation.message,
                })
                .collect(),
        )
    }
}

/// Check `value` against its constraint table.
///
/// # Examples
/// ```
/// use company_registry::domain::EditableCompany;
/// use company_registry::domain::validation::validate;
///
/// let company = EditableCompany {
///     name: None,
///     address: Some("1 Main St".to_owned()),
///     country: Some("a country name that is far too long".to_owned()),
/// };
/// let errors = validate(&company).expect_err("two violations");
/// assert_eq!(errors.violations().len(), 2);
/// ```
pub fn validate<T: Constrained>(value: &T) -> Result<(), ValidationErrors> {
    let violations: Vec<Violation> = T::rules()
        .iter()
        .flat_map(|rule| {
            let field_value = (rule.read)(value);
            rule.constraints
                .iter()
                .filter_map(move |constraint| constraint.check(&field_value).err())
                .map(move |message| Violation {
                    field: rule.field.to_owned(),
                    message: message.to_owned(),
                })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

/// Check a nested collection, prefixing field names with `prefix[index]`.
pub fn validate_each<'a, T, I>(values: I, prefix: &str) -> Result<(), ValidationErrors>
where
    T: Constrained,
    I: IntoIterator<Item = &'a T>,
{
    let violations: Vec<Violation> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            validate(value)
                .err()
                .map(|errors| errors.with_prefix(&format!("{prefix}[{index}]")).0)
        })
        .flatten()
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

/// Combine the outcome of several validations, keeping every violation.
pub fn merge_outcomes(
    outcomes: impl IntoIterator<Item = Result<(), ValidationErrors>>,
) -> Result<(), ValidationErrors> {
    let violations: Vec<Violation> = outcomes
        .into_iter()
        .filter_map(Result::err)
        .flat_map(ValidationErrors::into_violations)
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug)]
    struct Sample {
        label: Option<String>,
        count: Option<i64>,
    }

    fn label(sample: &Sample) -> Value {
        sample.label.clone().map_or(Value::Null, Value::String)
    }

    fn count(sample: &Sample) -> Value {
        sample.count.map_or(Value::Null, Value::from)
    }

    static SAMPLE_RULES: [FieldRule<Sample>; 2] = [
        FieldRule {
            field: "label",
            read: label,
            constraints: &[
                Constraint::Required {
                    message: "label is required",
                },
                Constraint::MaxLength {
                    max: 5,
                    message: "label is too long",
                },
            ],
        },
        FieldRule {
            field: "count",
            read: count,
            constraints: &[Constraint::Range {
                min: 1,
                max: 10,
                message: "count out of range",
            }],
        },
    ];

    impl Constrained for Sample {
        fn rules() -> &'static [FieldRule<Self>] {
            &SAMPLE_RULES
        }
    }

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!("   "), false)]
    #[case(json!(""), false)]
    #[case(json!("x"), true)]
    #[case(json!(0), true)]
    fn required_rejects_absent_and_blank_values(#[case] value: Value, #[case] passes: bool) {
        let constraint = Constraint::Required { message: "req" };
        assert_eq!(constraint.check(&value).is_ok(), passes);
    }

    #[rstest]
    #[case(json!("abc"), true)]
    #[case(json!("abcd"), false)]
    #[case(json!(null), true)]
    fn max_length_counts_characters(#[case] value: Value, #[case] passes: bool) {
        let constraint = Constraint::MaxLength {
            max: 3,
            message: "long",
        };
        assert_eq!(constraint.check(&value).is_ok(), passes);
    }

    #[rstest]
    fn max_length_counts_unicode_scalars_not_bytes() {
        let constraint = Constraint::MaxLength {
            max: 3,
            message: "long",
        };
        assert!(constraint.check(&json!("äöü")).is_ok());
    }

    #[rstest]
    #[case(json!(18), true)]
    #[case(json!(17), false)]
    #[case(json!(2.5), false)]
    #[case(json!(null), true)]
    fn range_is_inclusive(#[case] value: Value, #[case] passes: bool) {
        let constraint = Constraint::Range {
            min: 18,
            max: i64::from(i32::MAX),
            message: "range",
        };
        assert_eq!(constraint.check(&value).is_ok(), passes);
    }

    #[rstest]
    fn validate_reports_every_violation() {
        let sample = Sample {
            label: Some("far too long".to_owned()),
            count: Some(42),
        };
        let errors = validate(&sample).expect_err("invalid sample");
        let fields: Vec<_> = errors.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["label", "count"]);
    }

    #[rstest]
    fn validate_accepts_valid_values() {
        let sample = Sample {
            label: Some("ok".to_owned()),
            count: None,
        };
        assert!(validate(&sample).is_ok());
    }

    #[rstest]
    fn validate_each_prefixes_with_index() {
        let samples = [
            Sample {
                label: Some("ok".to_owned()),
                count: None,
            },
            Sample {
                label: None,
                count: None,
            },
        ];
        let errors = validate_each(&samples, "items").expect_err("second sample invalid");
        assert_eq!(errors.violations()[0].field, "items[1].label");
        assert_eq!(errors.violations()[0].message, "label is required");
    }

    #[rstest]
    fn merge_outcomes_keeps_all_violations() {
        let first = Sample {
            label: None,
            count: None,
        };
        let second = Sample {
            label: Some("ok".to_owned()),
            count: Some(0),
        };
        let merged = merge_outcomes([validate(&first), validate(&second)]).expect_err("invalid");
        assert_eq!(merged.violations().len(), 2);
    }
}
