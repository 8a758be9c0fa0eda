use super::status::RequestStatus;

/// A rule broken while turning raw input into a domain value.
///
/// Every variant names exactly one rule so callers (and tests) can tell which
/// check failed without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("tracking code must not be empty")]
    EmptyTrackingCode,
    #[error("tracking code '{0}' must be 'DES' followed by exactly 10 digits")]
    MalformedTrackingCode(String),

    #[error("registration number must not be empty")]
    EmptyRegistrationNumber,
    #[error("registration number must have at least {min} characters, got {len}")]
    RegistrationNumberTooShort { len: usize, min: usize },
    #[error("registration number must have at most {max} characters, got {len}")]
    RegistrationNumberTooLong { len: usize, max: usize },
    #[error("registration number may only contain letters, digits, '.', '-', '/' and spaces")]
    RegistrationNumberInvalidCharacters,

    #[error("request id must be a positive integer, got {0}")]
    NonPositiveRequestId(i64),
    #[error("request id must be a finite integer, got {0}")]
    NonIntegerRequestId(String),

    #[error("unknown request kind '{0}'")]
    UnknownRequestKind(String),
    #[error("unknown document medium '{0}'")]
    UnknownDocumentMedium(String),
    #[error("unknown request status '{0}'")]
    UnknownRequestStatus(String),
    #[error("status cannot move from {from} to {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("{field} date '{value}' is not a valid date or timestamp")]
    InvalidDateBound { field: &'static str, value: String },
    #[error("date range needs both a start and an end")]
    IncompleteDateRange,
    #[error("date range start must be strictly before its end")]
    DateRangeNotIncreasing,
    #[error("date range must not span more than {max_months} months")]
    DateRangeTooLong { max_months: u32 },
    #[error("user id must be a positive integer, got {0}")]
    NonPositiveUserId(i64),
    #[error("user id must be an integer, got {0}")]
    NonIntegerUserId(String),
    #[error("user roles must be a list of strings")]
    RolesNotAList,
    #[error("user roles must be non-blank strings")]
    BlankRole,
    #[error("malformed dashboard scope: {0}")]
    MalformedScope(String),
}
