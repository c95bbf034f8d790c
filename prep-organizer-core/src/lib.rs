#![doc = "prep-organizer-core: core logic library for prep-organizer."]

//! This crate holds everything that is not command-line glue: turning a
//! problem URL into a [`problem::ProblemRecord`], rendering the solution file,
//! storing the GitHub credential, and the two-phase publish protocol driven by
//! [`publisher::RemotePublisher`] against any [`contract::HostingApi`].
//!
//! # Usage
//! The `prep-organizer` binary supplies the concrete HTTP client; tests use the
//! `MockHostingApi` generated under the `test-export-mocks` feature.

pub mod config;
pub mod contract;
pub mod encoding;
pub mod problem;
pub mod publisher;
pub mod store;
pub mod template;
