// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use leave_intake::{CoreError, LedgerError};
use leave_intake_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The shared verification token was missing or wrong.
    AuthRejected,
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An external collaborator failed or answered with something unusable.
    Upstream {
        /// The collaborator that failed.
        service: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds an `Upstream` error for a named collaborator.
    #[must_use]
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthRejected => write!(f, "Invalid request token"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Upstream { service, message } => {
                write!(f, "{service} request failed: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::UnparseableDate { token } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Unparseable date: '{token}'"),
        },
        DomainError::InvalidCommand(command) => ApiError::InvalidInput {
            field: String::from("command"),
            message: format!("Invalid command '{command}'. Must be 'add' or 'cancel'"),
        },
        DomainError::InvalidSpan(span) => ApiError::InvalidInput {
            field: String::from("span"),
            message: format!("Invalid leave span: '{span}'"),
        },
        DomainError::InvalidTimezone(msg) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: msg,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::MalformedExtractorOutput(msg) => ApiError::upstream("extractor", msg),
        CoreError::Ledger(ledger_err) => translate_ledger_error(&ledger_err),
    }
}

fn translate_ledger_error(err: &LedgerError) -> ApiError {
    ApiError::upstream("ledger", err.to_string())
}
