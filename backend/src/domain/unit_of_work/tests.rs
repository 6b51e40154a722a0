//! Behavioural coverage for staging and committing changes.

use super::*;
use crate::domain::patch::{PatchOperation, apply_patch};
use crate::domain::ports::MockEntityStore;
use crate::domain::{CompanyId, EmployeeId};
use crate::outbound::memory::InMemoryEntityStore;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn store() -> Arc<InMemoryEntityStore> {
    Arc::new(InMemoryEntityStore::new())
}

fn acme() -> Company {
    Company::new("Acme", "1 Main St", "US")
}

async fn seed_company(store: &Arc<InMemoryEntityStore>) -> Company {
    let mut uow = UnitOfWork::new(store.clone());
    let company = uow.companies().create(acme()).expect("stage create");
    uow.commit().await.expect("seed commit");
    company
}

#[rstest]
#[tokio::test]
async fn create_assigns_identity_and_commit_persists(store: Arc<InMemoryEntityStore>) {
    let mut uow = UnitOfWork::new(store.clone());
    let company = uow.companies().create(acme()).expect("stage create");
    assert!(!company.id().is_unassigned());
    assert_eq!(uow.change_set().companies.inserts, vec![company.clone()]);

    assert_eq!(uow.commit().await.expect("commit"), 1);
    assert!(!uow.has_changes());

    let mut reader = UnitOfWork::new(store);
    let fetched = reader
        .companies()
        .fetch(company.id(), Tracking::Disabled)
        .await
        .expect("fetch");
    assert_eq!(fetched, Some(company));
}

#[rstest]
#[tokio::test]
async fn empty_commit_never_reaches_the_store() {
    let mut store = MockEntityStore::new();
    store.expect_commit().times(0);
    let mut uow = UnitOfWork::new(Arc::new(store));
    assert_eq!(uow.commit().await.expect("nothing to do"), 0);
}

#[rstest]
#[tokio::test]
async fn untracked_reads_are_isolated(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store);

    let mut detached = uow
        .companies()
        .fetch(company.id(), Tracking::Disabled)
        .await
        .expect("fetch")
        .expect("exists");
    detached.name = "Mutated".to_owned();

    let again = uow
        .companies()
        .fetch(company.id(), Tracking::Disabled)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(again.name, "Acme");
    assert!(!uow.has_changes());
}

#[rstest]
#[tokio::test]
async fn staged_update_is_visible_to_tracked_reads_only(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store);

    let mut tracked = uow
        .companies()
        .fetch(company.id(), Tracking::Enabled)
        .await
        .expect("fetch")
        .expect("exists");
    tracked.name = "Acme Corp".to_owned();
    uow.companies().update(tracked).expect("tracked entity");

    let tracked_again = uow
        .companies()
        .fetch(company.id(), Tracking::Enabled)
        .await
        .expect("fetch")
        .expect("exists");
    let committed = uow
        .companies()
        .fetch(company.id(), Tracking::Disabled)
        .await
        .expect("fetch")
        .expect("exists");
    assert_eq!(tracked_again.name, "Acme Corp");
    assert_eq!(committed.name, "Acme");
}

#[rstest]
#[tokio::test]
async fn update_requires_a_tracked_entity(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store);

    let detached = uow
        .companies()
        .fetch(company.id(), Tracking::Disabled)
        .await
        .expect("fetch")
        .expect("exists");
    let err = uow.companies().update(detached).expect_err("not tracked");
    assert!(matches!(err, UnitOfWorkError::NotTracked { kind: "company", .. }));
}

#[rstest]
fn creating_a_tracked_id_twice_is_rejected() {
    let mut uow = UnitOfWork::new(Arc::new(InMemoryEntityStore::new()));
    let company = uow.companies().create(acme()).expect("stage create");
    let err = uow.companies().create(company).expect_err("duplicate");
    assert!(matches!(err, UnitOfWorkError::AlreadyTracked { .. }));
}

#[rstest]
fn deleting_a_pending_insert_drops_it() {
    let mut uow = UnitOfWork::new(Arc::new(InMemoryEntityStore::new()));
    let company = uow.companies().create(acme()).expect("stage create");
    uow.companies().delete(&company);
    assert!(!uow.has_changes());
}

#[rstest]
#[tokio::test]
async fn failed_commit_keeps_pending_changes() {
    let mut store = MockEntityStore::new();
    store
        .expect_commit()
        .times(1)
        .return_once(|_| Err(StoreError::connection("refused")));
    let mut uow = UnitOfWork::new(Arc::new(store));
    let company = uow.companies().create(acme()).expect("stage create");

    let err = uow.commit().await.expect_err("store down");
    assert_eq!(
        err,
        UnitOfWorkError::Persistence(StoreError::connection("refused"))
    );
    assert_eq!(uow.change_set().companies.inserts, vec![company]);
}

#[rstest]
#[tokio::test]
async fn orphaned_employee_fails_commit_and_store_is_unchanged(store: Arc<InMemoryEntityStore>) {
    let mut uow = UnitOfWork::new(store.clone());
    let ghost = CompanyId::random();
    uow.employees()
        .create_for_company(ghost, Employee::new("Lost", 30, "Nobody"))
        .expect("stage create");

    let err = uow.commit().await.expect_err("orphan");
    assert!(matches!(
        err,
        UnitOfWorkError::Persistence(StoreError::ReferentialIntegrity { .. })
    ));
    assert!(uow.has_changes());

    let (employees, total) = store
        .employees_for_company(ghost, PageRequest::default())
        .await
        .expect("read");
    assert!(employees.is_empty());
    assert_eq!(total, 0);
}

#[rstest]
#[tokio::test]
async fn no_op_patch_round_trip_commits_nothing(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store.clone());

    let mut tracked = uow
        .companies()
        .fetch(company.id(), Tracking::Enabled)
        .await
        .expect("fetch")
        .expect("exists");
    apply_patch(&mut tracked, &[]).expect("no-op patch");
    uow.companies().update(tracked).expect("tracked");

    assert_eq!(uow.commit().await.expect("commit"), 0);
    assert_eq!(
        store.company(company.id()).await.expect("read"),
        Some(company)
    );
}

#[rstest]
#[tokio::test]
async fn applying_the_same_patch_twice_is_idempotent(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let operations = [PatchOperation::replace("/name", json!("Acme Corp"))];

    let mut states = Vec::new();
    for _ in 0..2 {
        let mut uow = UnitOfWork::new(store.clone());
        let mut tracked = uow
            .companies()
            .fetch(company.id(), Tracking::Enabled)
            .await
            .expect("fetch")
            .expect("exists");
        apply_patch(&mut tracked, &operations).expect("valid patch");
        uow.companies().update(tracked).expect("tracked");
        uow.commit().await.expect("commit");
        states.push(store.company(company.id()).await.expect("read"));
    }
    assert_eq!(states[0], states[1]);
    assert_eq!(
        states[0].as_ref().map(|company| company.name.as_str()),
        Some("Acme Corp")
    );
}

#[rstest]
#[tokio::test]
async fn deleting_a_company_removes_its_employees(store: Arc<InMemoryEntityStore>) {
    let mut uow = UnitOfWork::new(store.clone());
    let company = uow.companies().create(acme()).expect("stage company");
    let wile = uow
        .employees()
        .create_for_company(company.id(), Employee::new("Wile", 40, "Engineer"))
        .expect("stage employee");
    uow.commit().await.expect("seed");

    let tracked = uow
        .companies()
        .fetch(company.id(), Tracking::Enabled)
        .await
        .expect("fetch")
        .expect("exists");
    uow.companies().delete(&tracked);
    assert_eq!(uow.commit().await.expect("delete"), 1);

    let gone = uow
        .employees()
        .fetch(company.id(), wile.id(), Tracking::Enabled)
        .await
        .expect("fetch");
    assert_eq!(gone, None);
}

#[rstest]
#[tokio::test]
async fn tracked_fetch_many_merges_identity_map(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store);
    let pending = uow
        .companies()
        .create(Company::new("Globex", "Cypress Creek", "US"))
        .expect("stage");

    let found = uow
        .companies()
        .fetch_many(
            &[pending.id(), company.id(), CompanyId::random(), company.id()],
            Tracking::Enabled,
        )
        .await
        .expect("fetch");
    let names: Vec<_> = found.iter().map(|company| company.name.as_str()).collect();
    assert_eq!(names, ["Globex", "Acme"]);
}

#[rstest]
#[tokio::test]
async fn employees_are_scoped_to_their_company(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut uow = UnitOfWork::new(store);
    let wile = uow
        .employees()
        .create_for_company(company.id(), Employee::new("Wile", 40, "Engineer"))
        .expect("stage");
    uow.commit().await.expect("commit");

    let elsewhere = uow
        .employees()
        .fetch(CompanyId::random(), wile.id(), Tracking::Enabled)
        .await
        .expect("fetch");
    assert_eq!(elsewhere, None);

    let page = uow
        .employees()
        .fetch_for_company(company.id(), PageRequest::default(), Tracking::Disabled)
        .await
        .expect("page");
    assert_eq!(page.items(), [wile]);
    assert_eq!(page.metadata().total_count, 1);

    let missing = uow
        .employees()
        .fetch_many(company.id(), &[EmployeeId::random()], Tracking::Disabled)
        .await
        .expect("fetch");
    assert!(missing.is_empty());
}

#[rstest]
#[tokio::test]
async fn overlapping_commits_surface_a_conflict(store: Arc<InMemoryEntityStore>) {
    let company = seed_company(&store).await;
    let mut renaming = UnitOfWork::new(store.clone());
    let mut moving = UnitOfWork::new(store.clone());

    for (uow, operation) in [
        (&mut renaming, PatchOperation::replace("/name", json!("Renamed"))),
        (&mut moving, PatchOperation::replace("/address", json!("2 Side St"))),
    ] {
        let mut tracked = uow
            .companies()
            .fetch(company.id(), Tracking::Enabled)
            .await
            .expect("fetch")
            .expect("exists");
        apply_patch(&mut tracked, &[operation]).expect("valid patch");
        uow.companies().update(tracked).expect("tracked");
    }

    assert_eq!(renaming.commit().await.expect("first commit"), 1);
    let err = moving.commit().await.expect_err("stale commit");
    assert!(matches!(
        err,
        UnitOfWorkError::Persistence(StoreError::Conflict { .. })
    ));
    assert!(moving.has_changes(), "pending changes survive a failed commit");

    let stored = store
        .company(company.id())
        .await
        .expect("read")
        .expect("exists");
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.address, company.address);
}
