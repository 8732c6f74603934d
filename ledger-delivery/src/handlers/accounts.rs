//! Chart of accounts endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::classify::{ApiError, DomainError, ServiceError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::guard::Deadline;
use crate::pagination::{CountedList, Page, PageQuery};
use crate::services::{AccountResponse, LedgerEntry, NewAccount};
use crate::state::AppState;
use crate::validation;

fn list_accounts_error(err: ServiceError) -> ApiError {
    ApiError::unclassified(&err)
}

fn get_account_error(err: ServiceError) -> ApiError {
    match err.domain() {
        Some(DomainError::AccountNotFound) => {
            ApiError::domain(StatusCode::NOT_FOUND, DomainError::AccountNotFound)
        }
        _ => ApiError::unclassified(&err),
    }
}

fn create_account_error(err: ServiceError) -> ApiError {
    match err.domain() {
        Some(DomainError::AccountAlreadyExists) => {
            ApiError::domain(StatusCode::CONFLICT, DomainError::AccountAlreadyExists)
        }
        _ => ApiError::unclassified(&err),
    }
}

fn account_entries_error(err: ServiceError) -> ApiError {
    match err.domain() {
        Some(DomainError::AccountNotFound) => {
            ApiError::domain(StatusCode::NOT_FOUND, DomainError::AccountNotFound)
        }
        _ => ApiError::unclassified(&err),
    }
}

/// `GET /accounts`
pub async fn list_accounts(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Page<AccountResponse>, ApiError> {
    let window = query.window(&state.config().pagination)?;
    let listed = deadline
        .bound(state.accounts().list_accounts(&window))
        .await
        .map_err(list_accounts_error)?;
    Ok(listed.into_page("accounts", &window))
}

/// `GET /accounts/{code}`
pub async fn get_account(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = deadline
        .bound(state.accounts().get_account(&code))
        .await
        .map_err(get_account_error)?;
    Ok(Json(account.into()))
}

/// `POST /accounts`
pub async fn create_account(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiJson(body): ApiJson<NewAccount>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    validation::check(&body)?;
    let account = deadline
        .bound(state.accounts().create_account(body))
        .await
        .map_err(create_account_error)?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// `GET /accounts/{code}/entries`
pub async fn account_entries(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiPath(code): ApiPath<String>,
) -> Result<CountedList<LedgerEntry>, ApiError> {
    let listed = deadline
        .bound(state.accounts().account_entries(&code))
        .await
        .map_err(account_entries_error)?;
    Ok(CountedList::new("ledger_entries", listed.items, listed.total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_account_table() {
        let err = get_account_error(DomainError::AccountNotFound.into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = get_account_error(DomainError::AccountAlreadyExists.into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_create_account_table() {
        let err = create_account_error(DomainError::AccountAlreadyExists.into());
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = create_account_error(anyhow::anyhow!("disk full").into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_list_accounts_has_no_domain_entries() {
        let err = list_accounts_error(DomainError::AccountNotFound.into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
