//! HTTP middleware: CORS, request logging, login throttling, and
//! jurisdiction scoping.

pub mod cors;
pub mod jurisdiction;
pub mod logging;
pub mod rate_limit;
