//! Relay-message grammar and the normalized command model.
//!
//! A relay frame is one short text token: the literal `ping`, or
//! `<action>-<part>` with a single `-` separator. [`parser::parse`] maps
//! every possible input string to exactly one [`types::Command`].

pub mod parser;
pub mod types;
