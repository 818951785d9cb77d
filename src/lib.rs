// SPDX-License-Identifier: MPL-2.0

//! Client core for Trash Transit: crowd-sourced transit wait times and a
//! paginated comment feed, backed by an anonymous HTTP/JSON API and a small
//! on-device key/value store.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod feed;
pub mod runtime;
pub mod state;
pub mod store;
pub mod validate;
