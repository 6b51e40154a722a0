//! Company aggregate and its client-facing projections.
//!
//! [`Company`] is the stored entity. [`EditableCompany`] is the subset a
//! client may change, used both as the full-update payload and as the
//! target of partial updates. [`CompanyDraft`] is the creation and
//! replacement payload, which may carry nested employees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::employee::{EditableEmployee, Employee};
use super::patch::{
    EditableProjection, PatchField, Patchable, ValueTypeError, parse_text, text_value,
};
use super::unit_of_work::Aggregate;
use super::validation::{
    Constrained, Constraint, FieldRule, ValidationErrors, merge_outcomes, validate, validate_each,
};

/// Stable company identifier.
///
/// The nil UUID marks an identifier that has not been assigned yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

impl CompanyId {
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

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompanyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Stored company record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    id: CompanyId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Country of registration.
    pub country: String,
}

impl Company {
    /// Build a company whose identifier is assigned when it is first tracked.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self::with_id(CompanyId::default(), name, address, country)
    }

    /// Build a company with a known identifier.
    pub fn with_id(
        id: CompanyId,
        name: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            country: country.into(),
        }
    }

    /// The company identifier.
    pub fn id(&self) -> CompanyId {
        self.id
    }

    /// Address and country joined for display.
    pub fn full_address(&self) -> String {
        format!("{} {}", self.address, self.country)
    }
}

impl Aggregate for Company {
    type Id = CompanyId;

    const KIND: &'static str = "company";

    fn id(&self) -> CompanyId {
        self.id
    }

    fn ensure_id(&mut self) -> CompanyId {
        if self.id.is_unassigned() {
            self.id = CompanyId::random();
        }
        self.id
    }
}

fn stored_name(company: &Company) -> Value {
    Value::from(company.name.as_str())
}

fn stored_address(company: &Company) -> Value {
    Value::from(company.address.as_str())
}

fn stored_country(company: &Company) -> Value {
    Value::from(company.country.as_str())
}

static STORED_COMPANY_RULES: [FieldRule<Company>; 3] = [
    FieldRule {
        field: "name",
        read: stored_name,
        constraints: &[
            Constraint::Required {
                message: "Company name is a required field.",
            },
            Constraint::MaxLength {
                max: 60,
                message: "Maximum length for the Name is 60 characters.",
            },
        ],
    },
    FieldRule {
        field: "address",
        read: stored_address,
        constraints: &[
            Constraint::Required {
                message: "Company address is a required field.",
            },
            Constraint::MaxLength {
                max: 60,
                message: "Maximum length for the Address is 60 characters.",
            },
        ],
    },
    FieldRule {
        field: "country",
        read: stored_country,
        constraints: &[Constraint::MaxLength {
            max: 20,
            message: "Maximum length for the Country is 20 characters.",
        }],
    },
];

impl Constrained for Company {
    fn rules() -> &'static [FieldRule<Self>] {
        &STORED_COMPANY_RULES
    }
}

/// Client-mutable company fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableCompany {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Country of registration.
    #[serde(default)]
    pub country: Option<String>,
}

fn editable_name(company: &EditableCompany) -> Value {
    text_value(company.name.as_deref())
}

fn editable_address(company: &EditableCompany) -> Value {
    text_value(company.address.as_deref())
}

fn editable_country(company: &EditableCompany) -> Value {
    text_value(company.country.as_deref())
}

fn set_editable_name(company: &mut EditableCompany, value: Value) -> Result<(), ValueTypeError> {
    company.name = parse_text(value)?;
    Ok(())
}

fn set_editable_address(
    company: &mut EditableCompany,
    value: Value,
) -> Result<(), ValueTypeError> {
    company.address = parse_text(value)?;
    Ok(())
}

fn set_editable_country(
    company: &mut EditableCompany,
    value: Value,
) -> Result<(), ValueTypeError> {
    company.country = parse_text(value)?;
    Ok(())
}

static EDITABLE_COMPANY_RULES: [FieldRule<EditableCompany>; 3] = [
    FieldRule {
        field: "name",
        read: editable_name,
        constraints: &[
            Constraint::Required {
                message: "Company name is a required field.",
            },
            Constraint::MaxLength {
                max: 30,
                message: "Maximum length for the Name is 30 characters.",
            },
        ],
    },
    FieldRule {
        field: "address",
        read: editable_address,
        constraints: &[
            Constraint::Required {
                message: "Company address is a required field.",
            },
            Constraint::MaxLength {
                max: 40,
                message: "Maximum length for the Address is 40 characters.",
            },
        ],
    },
    FieldRule {
        field: "country",
        read: editable_country,
        constraints: &[
            Constraint::Required {
                message: "Company country is a required field.",
            },
            Constraint::MaxLength {
                max: 20,
                message: "Maximum length for the Country is 20 characters.",
            },
        ],
    },
];

static EDITABLE_COMPANY_FIELDS: [PatchField<EditableCompany>; 3] = [
    PatchField {
        name: "name",
        read: editable_name,
        write: set_editable_name,
    },
    PatchField {
        name: "address",
        read: editable_address,
        write: set_editable_address,
    },
    PatchField {
        name: "country",
        read: editable_country,
        write: set_editable_country,
    },
];

impl Constrained for EditableCompany {
    fn rules() -> &'static [FieldRule<Self>] {
        &EDITABLE_COMPANY_RULES
    }
}

impl Patchable for EditableCompany {
    fn fields() -> &'static [PatchField<Self>] {
        &EDITABLE_COMPANY_FIELDS
    }
}

impl EditableProjection for Company {
    type Editable = EditableCompany;

    fn project(&self) -> EditableCompany {
        EditableCompany {
            name: Some(self.name.clone()),
            address: Some(self.address.clone()),
            country: Some(self.country.clone()),
        }
    }

    fn merge(&mut self, editable: &EditableCompany) {
        self.name = editable.name.clone().unwrap_or_default();
        self.address = editable.address.clone().unwrap_or_default();
        self.country = editable.country.clone().unwrap_or_default();
    }
}

/// Creation and replacement payload for a company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Country of registration.
    #[serde(default)]
    pub country: Option<String>,
    /// Employees created alongside the company.
    #[serde(default)]
    pub employees: Vec<EditableEmployee>,
}

impl CompanyDraft {
    /// The company fields without the nested employees.
    pub fn fields(&self) -> EditableCompany {
        EditableCompany {
            name: self.name.clone(),
            address: self.address.clone(),
            country: self.country.clone(),
        }
    }

    /// Validate the company fields and every nested employee.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        merge_outcomes([
            validate(&self.fields()),
            validate_each(&self.employees, "employees"),
        ])
    }

    /// Split the draft into an untracked company and its employees.
    ///
    /// Call [`CompanyDraft::validate`] first; absent fields become empty.
    pub fn into_parts(self) -> (Company, Vec<Employee>) {
        let company = Company::new(
            self.name.unwrap_or_default(),
            self.address.unwrap_or_default(),
            self.country.unwrap_or_default(),
        );
        let employees = self
            .employees
            .into_iter()
            .map(EditableEmployee::into_employee)
            .collect();
        (company, employees)
    }
}
