// SPDX-License-Identifier: MIT

pub mod error;
pub mod scope;

pub use error::ScopeFilterError;
