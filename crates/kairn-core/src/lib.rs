//! # kairn-core
//!
//! Core types, canonical encoding, hashing, and error types for Kairn.
//!
//! This crate provides the foundational types shared across all Kairn crates:
//! - Entity structs for units, versions, audit events, and sidecar documents
//! - Typed audit payloads decoded through a single dispatch point
//! - Event type and sidecar kind enums
//! - The canonical JSON encoder used as the input to every structured hash
//! - Content, sidecar, snapshot, and audit hash functions
//! - ID prefix constants and random ID generation
//! - The kernel error taxonomy
//! - Use case request and response types

pub mod audit_detail;
pub mod canonical;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod hashing;
pub mod ids;
pub mod responses;
