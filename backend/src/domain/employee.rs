//! Employee aggregate and its client-facing projection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::company::CompanyId;
use super::patch::{
    EditableProjection, PatchField, Patchable, ValueTypeError, integer_value, parse_integer,
    parse_text, text_value,
};
use super::unit_of_work::Aggregate;
use super::validation::{Constrained, Constraint, FieldRule};

/// Minimum employee age accepted by the registry.
pub const MIN_EMPLOYEE_AGE: i64 = 18;

/// Stable employee identifier.
///
/// The nil UUID marks an identifier that has not been assigned yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether the identifier is still the unassigned placeholder.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Stored employee record, always owned by exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    id: EmployeeId,
    company_id: CompanyId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i32,
    /// Job title.
    pub position: String,
}

impl Employee {
    /// Build an employee that is not yet attached to a company.
    pub fn new(name: impl Into<String>, age: i32, position: impl Into<String>) -> Self {
        Self::with_id(
            EmployeeId::default(),
            CompanyId::default(),
            name,
            age,
            position,
        )
    }

    /// Build an employee with known identifiers.
    pub fn with_id(
        id: EmployeeId,
        company_id: CompanyId,
        name: impl Into<String>,
        age: i32,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id,
            company_id,
            name: name.into(),
            age,
            position: position.into(),
        }
    }

    /// The employee identifier.
    pub fn id(&self) -> EmployeeId {
        self.id
    }

    /// Identifier of the owning company.
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub(crate) fn attach_to(&mut self, company_id: CompanyId) {
        self.company_id = company_id;
    }
}

impl Aggregate for Employee {
    type Id = EmployeeId;

    const KIND: &'static str = "employee";

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn ensure_id(&mut self) -> EmployeeId {
        if self.id.is_unassigned() {
            self.id = EmployeeId::random();
        }
        self.id
    }
}

fn stored_name(employee: &Employee) -> Value {
    Value::from(employee.name.as_str())
}

fn stored_age(employee: &Employee) -> Value {
    Value::from(employee.age)
}

fn stored_position(employee: &Employee) -> Value {
    Value::from(employee.position.as_str())
}

const NAME_CONSTRAINTS: &[Constraint] = &[
    Constraint::Required {
        message: "Employee name is a required field.",
    },
    Constraint::MaxLength {
        max: 30,
        message: "Maximum length for the Name is 30 characters.",
    },
];

/// Largest storable age; `i32::MAX` widened.
const MAX_EMPLOYEE_AGE: i64 = 2_147_483_647;

const AGE_RANGE: Constraint = Constraint::Range {
    min: MIN_EMPLOYEE_AGE,
    max: MAX_EMPLOYEE_AGE,
    message: "Age is required and it can't be lower than 18.",
};

const POSITION_CONSTRAINTS: &[Constraint] = &[
    Constraint::Required {
        message: "Position is a required field.",
    },
    Constraint::MaxLength {
        max: 20,
        message: "Maximum length for the Position is 20 characters.",
    },
];

static STORED_EMPLOYEE_RULES: [FieldRule<Employee>; 3] = [
    FieldRule {
        field: "name",
        read: stored_name,
        constraints: NAME_CONSTRAINTS,
    },
    FieldRule {
        field: "age",
        read: stored_age,
        constraints: &[AGE_RANGE],
    },
    FieldRule {
        field: "position",
        read: stored_position,
        constraints: POSITION_CONSTRAINTS,
    },
];

impl Constrained for Employee {
    fn rules() -> &'static [FieldRule<Self>] {
        &STORED_EMPLOYEE_RULES
    }
}

/// Client-mutable employee fields.
///
/// Serves as the creation payload, the full-update payload and the target
/// of partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableEmployee {
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<i32>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
}

impl EditableEmployee {
    /// Convert a validated payload into an unattached employee.
    pub fn into_employee(self) -> Employee {
        Employee::new(
            self.name.unwrap_or_default(),
            self.age.unwrap_or_default(),
            self.position.unwrap_or_default(),
        )
    }
}

fn editable_name(employee: &EditableEmployee) -> Value {
    text_value(employee.name.as_deref())
}

fn editable_age(employee: &EditableEmployee) -> Value {
    integer_value(employee.age)
}

fn editable_position(employee: &EditableEmployee) -> Value {
    text_value(employee.position.as_deref())
}

fn set_editable_name(employee: &mut EditableEmployee, value: Value) -> Result<(), ValueTypeError> {
    employee.name = parse_text(value)?;
    Ok(())
}

fn set_editable_age(employee: &mut EditableEmployee, value: Value) -> Result<(), ValueTypeError> {
    employee.age = parse_integer(value)?;
    Ok(())
}

fn set_editable_position(
    employee: &mut EditableEmployee,
    value: Value,
) -> Result<(), ValueTypeError> {
    employee.position = parse_text(value)?;
    Ok(())
}

static EDITABLE_EMPLOYEE_RULES: [FieldRule<EditableEmployee>; 3] = [
    FieldRule {
        field: "name",
        read: editable_name,
        constraints: NAME_CONSTRAINTS,
    },
    FieldRule {
        field: "age",
        read: editable_age,
        constraints: &[
            Constraint::Required {
                message: "Age is a required field.",
            },
            AGE_RANGE,
        ],
    },
    FieldRule {
        field: "position",
        read: editable_position,
        constraints: POSITION_CONSTRAINTS,
    },
];

static EDITABLE_EMPLOYEE_FIELDS: [PatchField<EditableEmployee>; 3] = [
    PatchField {
        name: "name",
        read: editable_name,
        write: set_editable_name,
    },
    PatchField {
        name: "age",
        read: editable_age,
        write: set_editable_age,
    },
    PatchField {
        name: "position",
        read: editable_position,
        write: set_editable_position,
    },
];

impl Constrained for EditableEmployee {
    fn rules() -> &'static [FieldRule<Self>] {
        &EDITABLE_EMPLOYEE_RULES
    }
}

impl Patchable for EditableEmployee {
    fn fields() -> &'static [PatchField<Self>] {
        &EDITABLE_EMPLOYEE_FIELDS
    }
}

impl EditableProjection for Employee {
    type Editable = EditableEmployee;

    fn project(&self) -> EditableEmployee {
        EditableEmployee {
            name: Some(self.name.clone()),
            age: Some(self.age),
            position: Some(self.position.clone()),
        }
    }

    fn merge(&mut self, editable: &EditableEmployee) {
        self.name = editable.name.clone().unwrap_or_default();
        self.age = editable.age.unwrap_or_default();
        self.position = editable.position.clone().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate;
    use rstest::rstest;

    #[rstest]
    fn max_age_matches_the_stored_integer_width() {
        assert_eq!(MAX_EMPLOYEE_AGE, i64::from(i32::MAX));
        assert!(validate(&payload(Some("Old"), Some(i32::MAX), Some("Lead"))).is_ok());
    }

    fn payload(name: Option<&str>, age: Option<i32>, position: Option<&str>) -> EditableEmployee {
        EditableEmployee {
            name: name.map(str::to_owned),
            age,
            position: position.map(str::to_owned),
        }
    }

    #[rstest]
    #[case(payload(Some("Wile"), Some(18), Some("Engineer")), Vec::<&str>::new())]
    #[case(payload(Some("Wile"), Some(17), Some("Engineer")), vec!["age"])]
    #[case(payload(Some("Wile"), None, Some("Engineer")), vec!["age"])]
    #[case(payload(None, Some(30), None), vec!["name", "position"])]
    #[case(
        payload(Some("Wile"), Some(30), Some("Chief Executive of Rockets")),
        vec!["position"]
    )]
    fn editable_employee_constraints(
        #[case] employee: EditableEmployee,
        #[case] failing: Vec<&str>,
    ) {
        let fields: Vec<String> = validate(&employee)
            .err()
            .map(|errors| {
                errors
                    .into_violations()
                    .into_iter()
                    .map(|violation| violation.field)
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(fields, failing);
    }

    #[rstest]
    fn missing_age_reports_required_message() {
        let errors = validate(&payload(Some("Wile"), None, Some("Engineer")))
            .expect_err("age missing");
        assert_eq!(errors.violations()[0].message, "Age is a required field.");
    }

    #[rstest]
    fn merge_keeps_company_and_identity() {
        let company_id = CompanyId::random();
        let id = EmployeeId::random();
        let mut employee = Employee::with_id(id, company_id, "Wile", 30, "Engineer");
        employee.merge(&payload(Some("Road"), Some(40), Some("Runner")));
        assert_eq!(employee.id(), id);
        assert_eq!(employee.company_id(), company_id);
        assert_eq!(employee.age, 40);
    }

    #[rstest]
    fn into_employee_leaves_identifiers_unassigned() {
        let employee = payload(Some("Wile"), Some(30), Some("Engineer")).into_employee();
        assert!(employee.id().is_unassigned());
        assert!(employee.company_id().is_unassigned());
    }
}
