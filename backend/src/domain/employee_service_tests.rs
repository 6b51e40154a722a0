//! Tests for the employee service.

use super::*;
use crate::domain::patch::PatchOperation;
use crate::domain::ports::{CompanyCommand, MockEntityStore};
use crate::domain::{Company, CompanyDraft, CompanyService, ErrorCode};
use crate::outbound::memory::InMemoryEntityStore;
use rstest::{fixture, rstest};
use serde_json::json;

struct Harness {
    companies: CompanyService<InMemoryEntityStore>,
    employees: EmployeeService<InMemoryEntityStore>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryEntityStore::new());
    Harness {
        companies: CompanyService::new(store.clone()),
        employees: EmployeeService::new(store),
    }
}

fn hire(name: &str, age: i32) -> EditableEmployee {
    EditableEmployee {
        name: Some(name.to_owned()),
        age: Some(age),
        position: Some("Engineer".to_owned()),
    }
}

async fn company(harness: &Harness) -> Company {
    harness
        .companies
        .create(CompanyDraft {
            name: Some("Acme".to_owned()),
            address: Some("1 Main St".to_owned()),
            country: Some("US".to_owned()),
            employees: Vec::new(),
        })
        .await
        .expect("create company")
}

#[rstest]
#[tokio::test]
async fn create_then_get(harness: Harness) {
    let acme = company(&harness).await;
    let wile = harness
        .employees
        .create(acme.id(), hire("Wile", 40))
        .await
        .expect("create");

    let fetched = harness
        .employees
        .get(acme.id(), wile.id())
        .await
        .expect("get");
    assert_eq!(fetched, wile);
    assert_eq!(fetched.company_id(), acme.id());
}

#[rstest]
#[tokio::test]
async fn unknown_company_is_reported_first(harness: Harness) {
    let missing = CompanyId::random();
    let err = harness
        .employees
        .create(missing, EditableEmployee::default())
        .await
        .expect_err("no company");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.message().starts_with("Company with id"));
}

#[rstest]
#[tokio::test]
async fn employee_of_another_company_is_not_found(harness: Harness) {
    let acme = company(&harness).await;
    let globex = company(&harness).await;
    let wile = harness
        .employees
        .create(acme.id(), hire("Wile", 40))
        .await
        .expect("create");

    let err = harness
        .employees
        .get(globex.id(), wile.id())
        .await
        .expect_err("wrong company");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.message().starts_with("Employee with id"));
}

#[rstest]
#[tokio::test]
async fn underage_create_is_unprocessable(harness: Harness) {
    let acme = company(&harness).await;
    let err = harness
        .employees
        .create(acme.id(), hire("Kid", 12))
        .await
        .expect_err("underage");
    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn patch_updates_age_only(harness: Harness) {
    let acme = company(&harness).await;
    let wile = harness
        .employees
        .create(acme.id(), hire("Wile", 40))
        .await
        .expect("create");

    harness
        .employees
        .patch(
            acme.id(),
            wile.id(),
            PatchDocument::new(vec![PatchOperation::replace("/age", json!(41))]),
        )
        .await
        .expect("patch");

    let fetched = harness
        .employees
        .get(acme.id(), wile.id())
        .await
        .expect("get");
    assert_eq!(fetched.age, 41);
    assert_eq!(fetched.name, "Wile");
}

#[rstest]
#[tokio::test]
async fn failed_test_operation_is_unprocessable(harness: Harness) {
    let acme = company(&harness).await;
    let wile = harness
        .employees
        .create(acme.id(), hire("Wile", 40))
        .await
        .expect("create");

    let err = harness
        .employees
        .patch(
            acme.id(),
            wile.id(),
            PatchDocument::new(vec![
                PatchOperation::test("/age", json!(99)),
                PatchOperation::replace("/age", json!(41)),
            ]),
        )
        .await
        .expect_err("test fails");
    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
    assert_eq!(
        harness
            .employees
            .get(acme.id(), wile.id())
            .await
            .expect("get")
            .age,
        40
    );
}

#[rstest]
#[tokio::test]
async fn replace_and_delete(harness: Harness) {
    let acme = company(&harness).await;
    let wile = harness
        .employees
        .create(acme.id(), hire("Wile", 40))
        .await
        .expect("create");

    harness
        .employees
        .replace(acme.id(), wile.id(), hire("Wile E.", 45))
        .await
        .expect("replace");
    let fetched = harness
        .employees
        .get(acme.id(), wile.id())
        .await
        .expect("get");
    assert_eq!((fetched.name.as_str(), fetched.age), ("Wile E.", 45));

    harness
        .employees
        .delete(acme.id(), wile.id())
        .await
        .expect("delete");
    let err = harness
        .employees
        .get(acme.id(), wile.id())
        .await
        .expect_err("deleted");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_many_and_get_many(harness: Harness) {
    let acme = company(&harness).await;
    let created = harness
        .employees
        .create_many(acme.id(), vec![hire("Ann", 30), hire("Bob", 31)])
        .await
        .expect("create many");
    let ids: Vec<_> = created.iter().map(Employee::id).collect();

    let fetched = harness
        .employees
        .get_many(acme.id(), ids.clone())
        .await
        .expect("get many");
    assert_eq!(fetched, created);

    let mut partial = ids;
    partial.push(EmployeeId::random());
    let err = harness
        .employees
        .get_many(acme.id(), partial)
        .await
        .expect_err("partial");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_many_reports_positions(harness: Harness) {
    let acme = company(&harness).await;
    let err = harness
        .employees
        .create_many(acme.id(), vec![hire("Ann", 30), hire("Kid", 10)])
        .await
        .expect_err("second underage");
    let details = err.details().expect("details");
    assert_eq!(details["violations"][0]["field"], "[1].age");
}

#[rstest]
#[tokio::test]
async fn list_is_paged(harness: Harness) {
    let acme = company(&harness).await;
    harness
        .employees
        .create_many(
            acme.id(),
            vec![hire("Ann", 30), hire("Bob", 31), hire("Cy", 32)],
        )
        .await
        .expect("create many");

    let page = harness
        .employees
        .list(acme.id(), PageRequest::new(2, 2).expect("valid page"))
        .await
        .expect("list");
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].name, "Cy");
    let metadata = page.metadata();
    assert_eq!(metadata.total_pages, 2);
    assert!(metadata.has_previous);
    assert!(!metadata.has_next);
}

#[rstest]
#[tokio::test]
async fn list_for_missing_company_never_queries_employees() {
    let mut store = MockEntityStore::new();
    store.expect_company().times(1).return_once(|_| Ok(None));
    store.expect_employees_for_company().times(0);
    let service = EmployeeService::new(Arc::new(store));

    let err = service
        .list(CompanyId::random(), PageRequest::default())
        .await
        .expect_err("company missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn invalid_replacement_is_rejected_before_lookup() {
    let mut store = MockEntityStore::new();
    store.expect_company().times(0);
    store.expect_employee().times(0);
    let service = EmployeeService::new(Arc::new(store));

    let err = service
        .replace(CompanyId::random(), EmployeeId::random(), hire("Kid", 12))
        .await
        .expect_err("underage");
    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
}
