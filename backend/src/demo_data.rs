//! Startup seeding of demo companies.
//!
//! Seeds two companies, each with a few employees, through the company
//! service so the data passes the same validation and single commit as a
//! client request would.

use tracing::info;

use crate::domain::ports::{CompanyCommand, CompanyQuery};
use crate::domain::{CompanyDraft, EditableEmployee, Error};
use crate::settings::ServerSettings;

fn employee(name: &str, age: i32, position: &str) -> EditableEmployee {
    EditableEmployee {
        name: Some(name.to_owned()),
        age: Some(age),
        position: Some(position.to_owned()),
    }
}

fn company(name: &str, address: &str, country: &str, employees: Vec<EditableEmployee>) -> CompanyDraft {
    CompanyDraft {
        name: Some(name.to_owned()),
        address: Some(address.to_owned()),
        country: Some(country.to_owned()),
        employees,
    }
}

/// Drafts inserted by [`seed_demo_data`].
#[must_use]
pub fn demo_companies() -> Vec<CompanyDraft> {
    vec![
        company(
            "IT_Solutions Ltd",
            "583 Wall Dr. Gwynn Oak, MD 21207",
            "USA",
            vec![
                employee("Sam Raiden", 26, "Software developer"),
                employee("Jana McLeaf", 30, "Software developer"),
            ],
        ),
        company(
            "Admin_Solutions Ltd",
            "312 Forest Avenue, BF 923",
            "USA",
            vec![employee("Kane Miller", 35, "Administrator")],
        ),
    ]
}

/// Seed the demo companies when enabled and the registry is empty.
///
/// Returns the number of companies created, or `None` when seeding was
/// skipped.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use company_registry::demo_data::seed_demo_data;
/// use company_registry::domain::CompanyService;
/// use company_registry::outbound::memory::InMemoryEntityStore;
/// use company_registry::settings::ServerSettings;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let service = CompanyService::new(Arc::new(InMemoryEntityStore::new()));
/// let settings = ServerSettings { host: None, port: None, seed_demo_data: true };
/// assert_eq!(seed_demo_data(&settings, &service).await.expect("seeded"), Some(2));
/// # });
/// ```
pub async fn seed_demo_data<S>(settings: &ServerSettings, service: &S) -> Result<Option<usize>, Error>
where
    S: CompanyCommand + CompanyQuery,
{
    if !settings.seed_demo_data {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }
    if !service.list().await?.is_empty() {
        info!(reason = "already populated", "demo data seeding skipped");
        return Ok(None);
    }

    let created = service.create_many(demo_companies()).await?;
    info!(company_count = created.len(), "demo data seeding applied");
    Ok(Some(created.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::CompanyService;
    use crate::outbound::memory::InMemoryEntityStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> CompanyService<InMemoryEntityStore> {
        CompanyService::new(Arc::new(InMemoryEntityStore::new()))
    }

    fn settings(seed_demo_data: bool) -> ServerSettings {
        ServerSettings {
            host: None,
            port: None,
            seed_demo_data,
        }
    }

    #[rstest]
    fn demo_drafts_are_valid() {
        for draft in demo_companies() {
            draft.validate().expect("demo draft passes validation");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_is_skipped(service: CompanyService<InMemoryEntityStore>) {
        let outcome = seed_demo_data(&settings(false), &service)
            .await
            .expect("skip");
        assert_eq!(outcome, None);
        assert!(service.list().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn second_run_is_skipped(service: CompanyService<InMemoryEntityStore>) {
        let first = seed_demo_data(&settings(true), &service).await.expect("seed");
        let second = seed_demo_data(&settings(true), &service).await.expect("seed");
        assert_eq!(first, Some(2));
        assert_eq!(second, None);
        assert_eq!(service.list().await.expect("list").len(), 2);
    }
}
