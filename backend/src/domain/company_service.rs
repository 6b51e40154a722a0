//! Company domain service.
//!
//! Implements the company driving ports on top of an [`EntityStore`]. Every
//! call opens its own [`RequestContext`]; mutations fetch with tracking,
//! stage through the unit of work and commit exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::context::RequestContext;
use crate::domain::patch::{PatchDocument, apply_patch};
use crate::domain::ports::{CompanyCommand, CompanyQuery, EntityStore};
use crate::domain::service_errors::{
    company_not_found, ensure_complete, patch_failure, unit_of_work_error, validation_error,
};
use crate::domain::unit_of_work::Tracking;
use crate::domain::validation::merge_outcomes;
use crate::domain::{Company, CompanyDraft, CompanyId, EditableProjection, Employee, Error};

/// Company service implementing [`CompanyQuery`] and [`CompanyCommand`].
#[derive(Clone)]
pub struct CompanyService<S> {
    store: Arc<S>,
}

impl<S> CompanyService<S> {
    /// Create a service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> CompanyService<S>
where
    S: EntityStore + 'static,
{
    fn context(&self) -> RequestContext {
        let store: Arc<dyn EntityStore> = self.store.clone();
        RequestContext::new(store)
    }

    async fn tracked_company(context: &mut RequestContext, id: CompanyId) -> Result<Company, Error> {
        context
            .companies()
            .fetch(id, Tracking::Enabled)
            .await
            .map_err(unit_of_work_error)?
            .ok_or_else(|| company_not_found(id))
    }

    fn stage_employees(
        context: &mut RequestContext,
        company_id: CompanyId,
        employees: Vec<Employee>,
    ) -> Result<(), Error> {
        for employee in employees {
            context
                .employees()
                .create_for_company(company_id, employee)
                .map_err(unit_of_work_error)?;
        }
        Ok(())
    }

    fn stage_draft(context: &mut RequestContext, draft: CompanyDraft) -> Result<Company, Error> {
        let (company, employees) = draft.into_parts();
        let company = context
            .companies()
            .create(company)
            .map_err(unit_of_work_error)?;
        Self::stage_employees(context, company.id(), employees)?;
        Ok(company)
    }

    async fn commit(context: &mut RequestContext) -> Result<(), Error> {
        context.commit().await.map_err(unit_of_work_error)?;
        Ok(())
    }
}

#[async_trait]
impl<S> CompanyQuery for CompanyService<S>
where
    S: EntityStore + 'static,
{
    async fn list(&self) -> Result<Vec<Company>, Error> {
        self.context()
            .companies()
            .fetch_all(Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)
    }

    async fn get(&self, id: CompanyId) -> Result<Company, Error> {
        self.context()
            .companies()
            .fetch(id, Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)?
            .ok_or_else(|| company_not_found(id))
    }

    async fn get_many(&self, ids: Vec<CompanyId>) -> Result<Vec<Company>, Error> {
        if ids.is_empty() {
            info!("company id collection is empty");
            return Err(Error::invalid_request("Parameter ids is null"));
        }
        let companies = self
            .context()
            .companies()
            .fetch_many(&ids, Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)?;
        ensure_complete(ids.len(), companies.len())?;
        Ok(companies)
    }
}

#[async_trait]
impl<S> CompanyCommand for CompanyService<S>
where
    S: EntityStore + 'static,
{
    async fn create(&self, draft: CompanyDraft) -> Result<Company, Error> {
        draft.validate().map_err(validation_error)?;
        let mut context = self.context();
        let company = Self::stage_draft(&mut context, draft)?;
        Self::commit(&mut context).await?;
        Ok(company)
    }

    async fn create_many(&self, drafts: Vec<CompanyDraft>) -> Result<Vec<Company>, Error> {
        if drafts.is_empty() {
            info!("company collection is empty");
            return Err(Error::invalid_request("Company collection is empty"));
        }
        merge_outcomes(drafts.iter().enumerate().map(|(index, draft)| {
            draft
                .validate()
                .map_err(|errors| errors.with_prefix(&format!("[{index}]")))
        }))
        .map_err(validation_error)?;

        let mut context = self.context();
        let companies = drafts
            .into_iter()
            .map(|draft| Self::stage_draft(&mut context, draft))
            .collect::<Result<Vec<_>, _>>()?;
        Self::commit(&mut context).await?;
        Ok(companies)
    }

    async fn replace(&self, id: CompanyId, draft: CompanyDraft) -> Result<(), Error> {
        draft.validate().map_err(validation_error)?;
        let mut context = self.context();
        let mut company = Self::tracked_company(&mut context, id).await?;

        company.merge(&draft.fields());
        context
            .companies()
            .update(company)
            .map_err(unit_of_work_error)?;
        let (_, employees) = draft.into_parts();
        Self::stage_employees(&mut context, id, employees)?;
        Self::commit(&mut context).await
    }

    async fn patch(&self, id: CompanyId, document: PatchDocument) -> Result<(), Error> {
        let mut context = self.context();
        let mut company = Self::tracked_company(&mut context, id).await?;
        apply_patch(&mut company, document.operations()).map_err(patch_failure)?;
        context
            .companies()
            .update(company)
            .map_err(unit_of_work_error)?;
        Self::commit(&mut context).await
    }

    async fn delete(&self, id: CompanyId) -> Result<(), Error> {
        let mut context = self.context();
        let company = Self::tracked_company(&mut context, id).await?;
        context.companies().delete(&company);
        Self::commit(&mut context).await
    }
}

#[cfg(test)]
#[path = "company_service_tests.rs"]
mod tests;
