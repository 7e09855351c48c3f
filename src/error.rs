//! Error taxonomy for marketplace operations and its HTTP mapping.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{0}")]
    Validation(String),

    #[error("you have already placed a bid on gig {0}")]
    DuplicateBid(Uuid),

    #[error("gig {0} is not open for bids")]
    GigNotOpen(Uuid),

    #[error("bid {0} not found")]
    BidNotFound(Uuid),

    #[error("gig {0} not found")]
    GigNotFound(Uuid),

    #[error("gig {0} has already been assigned")]
    GigAlreadyAssigned(Uuid),

    #[error("bid {0} is no longer pending")]
    BidNotPending(Uuid),

    #[error("notification {0} not found")]
    NotificationNotFound(Uuid),

    #[error("{0}")]
    Forbidden(String),

    /// Storage abort, timeout or connection failure. The caller may retry.
    #[error("transaction failed: {0}")]
    Transaction(#[from] DbErr),
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;

impl MarketError {
    /// Stable machine-readable identifier sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Validation(_) => "validation_error",
            MarketError::DuplicateBid(_) => "duplicate_bid",
            MarketError::GigNotOpen(_) => "gig_not_open",
            MarketError::BidNotFound(_) => "bid_not_found",
            MarketError::GigNotFound(_) => "gig_not_found",
            MarketError::GigAlreadyAssigned(_) => "gig_already_assigned",
            MarketError::BidNotPending(_) => "bid_not_pending",
            MarketError::NotificationNotFound(_) => "notification_not_found",
            MarketError::Forbidden(_) => "forbidden",
            MarketError::Transaction(_) => "transaction_failure",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, MarketError::Transaction(_))
    }
}

impl ResponseError for MarketError {
    fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::BidNotFound(_)
            | MarketError::GigNotFound(_)
            | MarketError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            MarketError::DuplicateBid(_)
            | MarketError::GigNotOpen(_)
            | MarketError::GigAlreadyAssigned(_)
            | MarketError::BidNotPending(_) => StatusCode::CONFLICT,
            MarketError::Transaction(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let MarketError::Transaction(e) = self {
            tracing::error!("Storage failure: {e}");
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "retryable": self.is_retryable(),
        }))
    }
}
