//! Shopdesk Core - Shared types library.
//!
//! This crate provides the pieces of the admin that carry no I/O:
//! - cursor pagination (query arguments, page info, navigation state)
//! - Shopify GID newtypes for customers, products and variants
//! - money and price parsing
//! - the result type returned by single-field update mutations
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no database access,
//! no HTTP clients. The `shopdesk-admin` crate runs these against the
//! Shopify Admin API.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for GIDs and money
//! - [`pagination`] - Cursor pagination and the navigation state machine
//! - [`update`] - Update outcomes and user-error classification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pagination;
pub mod types;
pub mod update;

pub use pagination::{
    Cursor, Direction, DirectionError, NavState, NavigationError, Navigator, Page, PageArgs,
    PageInfo,
};
pub use types::*;
pub use update::{FailureKind, UpdateFailure, UpdateResult, UserError};
