//! Request / response bodies of the HTTP API.

pub mod message;
pub mod upload;
