//! Journal endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::classify::{ApiError, DomainError, ServiceError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::guard::Deadline;
use crate::pagination::{Listed, Page, PageQuery};
use crate::services::{JournalEntry, JournalFilter, JournalResponse, NewJournal};
use crate::state::AppState;
use crate::validation;

/// `details` of the journal list: the filter echo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalListDetails {
    #[serde(flatten)]
    pub filter: JournalFilter,
    /// False when the filter named an account that does not exist
    pub account_known: bool,
}

fn list_journals_error(err: ServiceError) -> ApiError {
    ApiError::unclassified(&err)
}

fn get_journal_error(err: ServiceError) -> ApiError {
    match err.domain() {
        Some(DomainError::JournalNotFound) => {
            ApiError::domain(StatusCode::NOT_FOUND, DomainError::JournalNotFound)
        }
        _ => ApiError::unclassified(&err),
    }
}

fn post_journal_error(err: ServiceError) -> ApiError {
    match err.domain() {
        Some(
            found @ (DomainError::JournalUnbalanced
            | DomainError::JournalEmpty
            | DomainError::AccountInactive
            | DomainError::CurrencyMismatch
            | DomainError::AmountOutOfRange),
        ) => ApiError::domain(StatusCode::UNPROCESSABLE_ENTITY, found),
        Some(DomainError::AccountNotFound) => {
            ApiError::domain(StatusCode::NOT_FOUND, DomainError::AccountNotFound)
        }
        Some(DomainError::PeriodClosed) => {
            ApiError::domain(StatusCode::CONFLICT, DomainError::PeriodClosed)
        }
        _ => ApiError::unclassified(&err),
    }
}

/// `GET /journals`
///
/// An unknown account in the filter yields an empty page, not an error.
pub async fn list_journals(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiQuery(query): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<JournalFilter>,
) -> Result<Page<JournalResponse, JournalListDetails>, ApiError> {
    let window = query.window(&state.config().pagination)?;
    let result = deadline
        .bound(state.journals().list_journals(&filter, &window))
        .await;

    let (listed, account_known) = match result {
        Ok(listed) => (listed, true),
        Err(err) if err.is(DomainError::AccountNotFound) => (Listed::<JournalEntry>::empty(), false),
        Err(err) => return Err(list_journals_error(err)),
    };

    Ok(listed.into_page("journals", &window).with_details(JournalListDetails {
        filter,
        account_known,
    }))
}

/// `GET /journals/{seq}`
pub async fn get_journal(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiPath(seq): ApiPath<u64>,
) -> Result<Json<JournalResponse>, ApiError> {
    let journal = deadline
        .bound(state.journals().get_journal(seq))
        .await
        .map_err(get_journal_error)?;
    Ok(Json(journal.into()))
}

/// `POST /journals`
pub async fn post_journal(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiJson(body): ApiJson<NewJournal>,
) -> Result<(StatusCode, Json<JournalResponse>), ApiError> {
    validation::check(&body)?;
    let journal = deadline
        .bound(state.journals().post_journal(body))
        .await
        .map_err(post_journal_error)?;
    Ok((StatusCode::CREATED, Json(journal.into())))
}
