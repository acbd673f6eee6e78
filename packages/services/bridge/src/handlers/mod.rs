//! HTTP 핸들러

pub mod filter;
pub mod form;
pub mod health;
