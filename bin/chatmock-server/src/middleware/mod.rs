//! HTTP middleware stack.

pub mod cookies;
pub mod cors;
pub mod trace;
