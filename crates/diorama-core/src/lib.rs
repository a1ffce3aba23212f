//! Diorama Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Diorama crates:
//!
//! - **Attributes**: Ordered key/value storage ([`attributes::AttributeMap`])
//! - **Document**: Document configuration and block nodes ([`document`] module)
//! - **Selectors**: Renderer, layout engine and view key types ([`selector`] module)

pub mod attributes;
pub mod document;
pub mod selector;
