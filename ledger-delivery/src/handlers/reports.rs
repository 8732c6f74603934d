//! Reporting endpoints

use axum::extract::State;

use crate::classify::{ApiError, ServiceError};
use crate::extract::ApiQuery;
use crate::guard::Deadline;
use crate::pagination::SummarizedList;
use crate::services::{TrialBalanceQuery, TrialBalanceRow, TrialBalanceSummary};
use crate::state::AppState;

fn trial_balance_error(err: ServiceError) -> ApiError {
    ApiError::unclassified(&err)
}

/// `GET /trial-balance?asOf=YYYY-MM-DD`
pub async fn trial_balance(
    State(state): State<AppState>,
    deadline: Deadline,
    ApiQuery(query): ApiQuery<TrialBalanceQuery>,
) -> Result<SummarizedList<TrialBalanceRow, TrialBalanceSummary>, ApiError> {
    let balance = deadline
        .bound(state.trial_balance().trial_balance(query.as_of))
        .await
        .map_err(trial_balance_error)?;
    Ok(SummarizedList::new("trial_balance", balance.rows, balance.summary))
}
