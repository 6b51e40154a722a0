//! Translation of staging, validation and patch failures into domain errors.

use serde_json::json;
use tracing::{error, info};

use super::Error;
use super::patch::{PatchError, PatchFailure};
use super::ports::StoreError;
use super::unit_of_work::UnitOfWorkError;
use super::validation::ValidationErrors;
use super::{CompanyId, EmployeeId};

/// Message returned when an id-set does not fully resolve.
pub const PARTIAL_COLLECTION_MESSAGE: &str = "Some ids are not valid in a collection";

pub(crate) fn company_not_found(id: CompanyId) -> Error {
    info!(company_id = %id, "company does not exist");
    Error::not_found(format!(
        "Company with id: {id} doesn't exist in the database."
    ))
}

pub(crate) fn employee_not_found(id: EmployeeId) -> Error {
    info!(employee_id = %id, "employee does not exist");
    Error::not_found(format!(
        "Employee with id: {id} doesn't exist in the database."
    ))
}

/// Fail unless every requested id resolved.
pub(crate) fn ensure_complete(requested: usize, found: usize) -> Result<(), Error> {
    if requested == found {
        Ok(())
    } else {
        error!(requested, found, "id collection only partially resolved");
        Err(Error::not_found(PARTIAL_COLLECTION_MESSAGE))
    }
}

pub(crate) fn validation_error(errors: ValidationErrors) -> Error {
    error!(violations = errors.violations().len(), "invalid model state");
    Error::unprocessable("validation failed")
        .with_details(json!({ "violations": errors.into_violations() }))
}

pub(crate) fn patch_failure(failure: PatchFailure) -> Error {
    match failure {
        PatchFailure::Validation(errors) => validation_error(errors),
        PatchFailure::Patch(err) => {
            error!(error = %err, "invalid patch document");
            let details = patch_details(&err);
            Error::unprocessable(err.to_string()).with_details(details)
        }
    }
}

fn patch_details(err: &PatchError) -> serde_json::Value {
    let reason = match err {
        PatchError::UnresolvablePath { .. } => "unresolvable_path",
        PatchError::MissingFrom { .. } => "missing_from",
        PatchError::MissingValue { .. } => "missing_value",
        PatchError::TestFailed { .. } => "test_failed",
        PatchError::InvalidValue { .. } => "invalid_value",
    };
    json!({ "operation": err.index(), "reason": reason })
}

pub(crate) fn unit_of_work_error(err: UnitOfWorkError) -> Error {
    match err {
        UnitOfWorkError::Persistence(store) => store_error(store),
        other => {
            error!(error = %other, "unit of work misuse");
            Error::internal(other.to_string())
        }
    }
}

fn store_error(err: StoreError) -> Error {
    error!(error = %err, "entity store failure");
    match err {
        StoreError::Connection { message } => {
            Error::service_unavailable(format!("entity store unavailable: {message}"))
        }
        StoreError::Constraint { message } => Error::unprocessable(message),
        conflict @ (StoreError::MissingEntity { .. }
        | StoreError::Conflict { .. }
        | StoreError::DuplicateEntity { .. }
        | StoreError::ReferentialIntegrity { .. }) => Error::conflict(conflict.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::patch::OperationKind;
    use crate::domain::validation::validate;
    use crate::domain::EditableEmployee;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(StoreError::missing_entity("company", "1"), ErrorCode::Conflict)]
    #[case(StoreError::conflict("company", "1"), ErrorCode::Conflict)]
    #[case(StoreError::duplicate_entity("company", "1"), ErrorCode::Conflict)]
    #[case(StoreError::referential_integrity("orphan"), ErrorCode::Conflict)]
    #[case(StoreError::constraint("too long"), ErrorCode::UnprocessableEntity)]
    fn store_errors_map_to_codes(#[case] err: StoreError, #[case] expected: ErrorCode) {
        let mapped = unit_of_work_error(UnitOfWorkError::Persistence(err));
        assert_eq!(mapped.code(), expected);
    }

    #[rstest]
    fn tracking_misuse_is_internal() {
        let mapped = unit_of_work_error(UnitOfWorkError::not_tracked("company", "1"));
        assert_eq!(mapped.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn validation_details_list_every_violation() {
        let errors = validate(&EditableEmployee::default()).expect_err("all missing");
        let mapped = validation_error(errors);
        assert_eq!(mapped.code(), ErrorCode::UnprocessableEntity);
        let violations = mapped
            .details()
            .and_then(|details| details.get("violations"))
            .and_then(serde_json::Value::as_array)
            .expect("violations array");
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0]["field"], "name");
    }

    #[rstest]
    fn patch_errors_report_operation_index() {
        let mapped = patch_failure(PatchFailure::Patch(PatchError::UnresolvablePath {
            index: 2,
            op: OperationKind::Replace,
            path: "/nope".to_owned(),
        }));
        assert_eq!(mapped.code(), ErrorCode::UnprocessableEntity);
        assert_eq!(
            mapped.details(),
            Some(&json!({ "operation": 2, "reason": "unresolvable_path" }))
        );
    }

    #[rstest]
    #[case(3, 3, true)]
    #[case(3, 2, false)]
    fn ensure_complete_compares_counts(
        #[case] requested: usize,
        #[case] found: usize,
        #[case] ok: bool,
    ) {
        let outcome = ensure_complete(requested, found);
        assert_eq!(outcome.is_ok(), ok);
        if let Err(err) = outcome {
            assert_eq!(err.message(), PARTIAL_COLLECTION_MESSAGE);
        }
    }
}
