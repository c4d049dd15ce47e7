//! # bjdms-entity
//!
//! Domain entity models for BJDMS. Every struct here is either a database row
//! or a value object derived from one. Database rows additionally derive
//! `sqlx::FromRow`.
//!
//! Each domain also declares the narrow store trait the auth core consumes,
//! so the Postgres repositories and the in-memory test stores implement the
//! same contract.

pub mod audit;
pub mod jurisdiction;
pub mod user;
