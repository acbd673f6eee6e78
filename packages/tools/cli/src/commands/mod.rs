//! CLI 명령어 구현

pub mod filter;
pub mod policy;
