//! Employee domain service.
//!
//! Every operation is scoped to a company and starts by checking that the
//! company exists, so an unknown company is reported before anything about
//! the employee.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::context::RequestContext;
use crate::domain::patch::{PatchDocument, apply_patch};
use crate::domain::ports::{EmployeeCommand, EmployeeQuery, EntityStore};
use crate::domain::service_errors::{
    company_not_found, employee_not_found, ensure_complete, patch_failure, unit_of_work_error,
    validation_error,
};
use crate::domain::unit_of_work::Tracking;
use crate::domain::validation::{validate, validate_each};
use crate::domain::{
    CompanyId, EditableEmployee, EditableProjection, Employee, EmployeeId, Error,
};

/// Employee service implementing [`EmployeeQuery`] and [`EmployeeCommand`].
#[derive(Clone)]
pub struct EmployeeService<S> {
    store: Arc<S>,
}

impl<S> EmployeeService<S> {
    /// Create a service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> EmployeeService<S>
where
    S: EntityStore + 'static,
{
    fn context(&self) -> RequestContext {
        let store: Arc<dyn EntityStore> = self.store.clone();
        RequestContext::new(store)
    }

    async fn ensure_company(context: &mut RequestContext, id: CompanyId) -> Result<(), Error> {
        context
            .companies()
            .fetch(id, Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)?
            .map(|_| ())
            .ok_or_else(|| company_not_found(id))
    }

    async fn employee(
        context: &mut RequestContext,
        company_id: CompanyId,
        id: EmployeeId,
        tracking: Tracking,
    ) -> Result<Employee, Error> {
        Self::ensure_company(context, company_id).await?;
        context
            .employees()
            .fetch(company_id, id, tracking)
            .await
            .map_err(unit_of_work_error)?
            .ok_or_else(|| employee_not_found(id))
    }

    fn stage(
        context: &mut RequestContext,
        company_id: CompanyId,
        payload: EditableEmployee,
    ) -> Result<Employee, Error> {
        context
            .employees()
            .create_for_company(company_id, payload.into_employee())
            .map_err(unit_of_work_error)
    }

    async fn commit(context: &mut RequestContext) -> Result<(), Error> {
        context.commit().await.map_err(unit_of_work_error)?;
        Ok(())
    }
}

#[async_trait]
impl<S> EmployeeQuery for EmployeeService<S>
where
    S: EntityStore + 'static,
{
    async fn list(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> Result<Page<Employee>, Error> {
        let mut context = self.context();
        Self::ensure_company(&mut context, company_id).await?;
        context
            .employees()
            .fetch_for_company(company_id, page, Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)
    }

    async fn get(&self, company_id: CompanyId, id: EmployeeId) -> Result<Employee, Error> {
        let mut context = self.context();
        Self::employee(&mut context, company_id, id, Tracking::Disabled).await
    }

    async fn get_many(
        &self,
        company_id: CompanyId,
        ids: Vec<EmployeeId>,
    ) -> Result<Vec<Employee>, Error> {
        if ids.is_empty() {
            info!("employee id collection is empty");
            return Err(Error::invalid_request("Parameter ids is null"));
        }
        let mut context = self.context();
        Self::ensure_company(&mut context, company_id).await?;
        let employees = context
            .employees()
            .fetch_many(company_id, &ids, Tracking::Disabled)
            .await
            .map_err(unit_of_work_error)?;
        ensure_complete(ids.len(), employees.len())?;
        Ok(employees)
    }
}

#[async_trait]
impl<S> EmployeeCommand for EmployeeService<S>
where
    S: EntityStore + 'static,
{
    async fn create(
        &self,
        company_id: CompanyId,
        payload: EditableEmployee,
    ) -> Result<Employee, Error> {
        let mut context = self.context();
        Self::ensure_company(&mut context, company_id).await?;
        validate(&payload).map_err(validation_error)?;
        let employee = Self::stage(&mut context, company_id, payload)?;
        Self::commit(&mut context).await?;
        Ok(employee)
    }

    async fn create_many(
        &self,
        company_id: CompanyId,
        payloads: Vec<EditableEmployee>,
    ) -> Result<Vec<Employee>, Error> {
        if payloads.is_empty() {
            info!("employee collection is empty");
            return Err(Error::invalid_request("Employee collection is empty"));
        }
        let mut context = self.context();
        Self::ensure_company(&mut context, company_id).await?;
        validate_each(&payloads, "").map_err(validation_error)?;
        let employees = payloads
            .into_iter()
            .map(|payload| Self::stage(&mut context, company_id, payload))
            .collect::<Result<Vec<_>, _>>()?;
        Self::commit(&mut context).await?;
        Ok(employees)
    }

    async fn replace(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
        payload: EditableEmployee,
    ) -> Result<(), Error> {
        validate(&payload).map_err(validation_error)?;
        let mut context = self.context();
        let mut employee = Self::employee(&mut context, company_id, id, Tracking::Enabled).await?;
        employee.merge(&payload);
        context
            .employees()
            .update(employee)
            .map_err(unit_of_work_error)?;
        Self::commit(&mut context).await
    }

    async fn patch(
        &self,
        company_id: CompanyId,
        id: EmployeeId,
        document: PatchDocument,
    ) -> Result<(), Error> {
        let mut context = self.context();
        let mut employee = Self::employee(&mut context, company_id, id, Tracking::Enabled).await?;
        apply_patch(&mut employee, document.operations()).map_err(patch_failure)?;
        context
            .employees()
            .update(employee)
            .map_err(unit_of_work_error)?;
        Self::commit(&mut context).await
    }

    async fn delete(&self, company_id: CompanyId, id: EmployeeId) -> Result<(), Error> {
        let mut context = self.context();
        let employee = Self::employee(&mut context, company_id, id, Tracking::Enabled).await?;
        context.employees().delete(&employee);
        Self::commit(&mut context).await
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
