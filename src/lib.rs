// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod holdings;
pub mod models;
pub mod pagination;
pub mod price;
pub mod query;
pub mod rows;
pub mod store;
pub mod utils;

pub use error::{LedgerError, Result};
