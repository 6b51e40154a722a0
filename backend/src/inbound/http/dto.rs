//! Request and response DTOs for the company and employee endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Company, CompanyDraft, EditableEmployee, Employee};

/// Request payload for creating or fully updating a company.
///
/// Omitted fields are treated as absent and reported by validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    #[schema(example = "Acme")]
    pub name: Option<String>,
    #[schema(example = "1 Main St")]
    pub address: Option<String>,
    #[schema(example = "US")]
    pub country: Option<String>,
    /// Employees created under the company in the same commit.
    #[serde(default)]
    #[schema(max_items = 1_000)]
    pub employees: Option<Vec<EmployeeRequest>>,
}

/// Request payload for creating or fully updating an employee.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[schema(example = "Wile E. Coyote")]
    pub name: Option<String>,
    #[schema(example = 40)]
    pub age: Option<i32>,
    #[schema(example = "Engineer")]
    pub position: Option<String>,
}

/// Response payload for a company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    /// Address and country joined by a single space.
    #[schema(example = "1 Main St US")]
    pub full_address: String,
}

/// Response payload for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl From<EmployeeRequest> for EditableEmployee {
    fn from(request: EmployeeRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            position: request.position,
        }
    }
}

impl From<CompanyRequest> for CompanyDraft {
    fn from(request: CompanyRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            country: request.country,
            employees: request
                .employees
                .unwrap_or_default()
                .into_iter()
                .map(EditableEmployee::from)
                .collect(),
        }
    }
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id().to_string(),
            full_address: company.full_address(),
            name: company.name,
        }
    }
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id().to_string(),
            name: employee.name,
            age: employee.age,
            position: employee.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyId, EmployeeId};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn company_response_joins_address_and_country() {
        let id = CompanyId::random();
        let response = CompanyResponse::from(Company::with_id(id, "Acme", "1 Main St", "US"));
        let value = serde_json::to_value(&response).expect("serialise");
        assert_eq!(
            value,
            json!({"id": id.to_string(), "name": "Acme", "fullAddress": "1 Main St US"})
        );
    }

    #[rstest]
    fn employee_response_hides_company_id() {
        let employee = Employee::with_id(
            EmployeeId::random(),
            CompanyId::random(),
            "Wile",
            40,
            "Engineer",
        );
        let value = serde_json::to_value(EmployeeResponse::from(employee)).expect("serialise");
        assert!(value.get("companyId").is_none());
        assert_eq!(value["age"], 40);
    }

    #[rstest]
    fn missing_employee_list_becomes_empty_draft_list() {
        let request: CompanyRequest =
            serde_json::from_value(json!({"name": "Acme"})).expect("deserialise");
        let draft = CompanyDraft::from(request);
        assert!(draft.employees.is_empty());
        assert_eq!(draft.address, None);
    }
}
