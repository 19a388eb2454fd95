//! Core domain types for the letter desk.
//!
//! - Workers and their reports
//! - Clients and listing filters
//! - Requests, their status enumeration and transition rules
//! - Worker auto-assignment

pub mod assignment;
pub mod client;
pub mod request;
pub mod worker;
