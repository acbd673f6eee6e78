//! 공통 에러 타입
//!
//! Gatekeep 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Gatekeep 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Filter Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid filter input: {message}")]
    InvalidInput { message: String },

    #[error("invalid filter target: {target}")]
    InvalidTarget { target: String },

    #[error("unknown relationship '{relationship}' on entity '{entity}'")]
    UnknownRelationship { entity: String, relationship: String },

    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Policy Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid operator '{operator}' in rule for ruleset with action '{action}'")]
    UnknownOperator { action: String, operator: String },

    #[error("subject is not provided nor resolvable")]
    SubjectNotFound,

    #[error("duplicate ruleset for action: {action}")]
    DuplicateRuleset { action: String },

    #[error("ruleset parse error: {message}")]
    RulesetParse { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Schema Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema parse error: {message}")]
    SchemaParse { message: String },

    #[error("schema validation error: {message}")]
    SchemaValidation { message: String },

    #[error("duplicate entity: {tag}")]
    DuplicateEntity { tag: String },

    #[error("invalid reference: entity '{entity}' relation '{relation}' references non-existent entity '{target}'")]
    InvalidReference {
        entity: String,
        relation: String,
        target: String,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 잘못된 필터 입력 에러 생성
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::InvalidInput { .. }
            | Error::UnknownRelationship { .. }
            | Error::UnknownField { .. } => 400,

            // 401 Unauthorized
            Error::SubjectNotFound => 401,

            // 404 Not Found
            Error::InvalidTarget { .. } => 404,

            // 500 Internal Server Error
            _ => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "INVALID_INPUT",
            Error::InvalidTarget { .. } => "INVALID_TARGET",
            Error::UnknownRelationship { .. } => "UNKNOWN_RELATIONSHIP",
            Error::UnknownField { .. } => "UNKNOWN_FIELD",
            Error::UnknownOperator { .. } => "UNKNOWN_OPERATOR",
            Error::SubjectNotFound => "SUBJECT_NOT_FOUND",
            Error::DuplicateRuleset { .. } => "DUPLICATE_RULESET",
            Error::RulesetParse { .. } => "RULESET_PARSE_ERROR",
            Error::SchemaParse { .. } => "SCHEMA_PARSE_ERROR",
            Error::SchemaValidation { .. } => "SCHEMA_VALIDATION_ERROR",
            Error::DuplicateEntity { .. } => "DUPLICATE_ENTITY",
            Error::InvalidReference { .. } => "INVALID_REFERENCE",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
