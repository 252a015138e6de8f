/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This library exposes methods for interacting with YAML
//! byte streams.
//!
//! It is currently still in development, and will likely
//! have multiple breaking changes to the exposed API before
//! stabilizing. Use at your own risk.
//!
//! The exposed APIs are grouped by module, and no high
//! level API yet exists for this library, though this will
//! change in the future.

#![allow(dead_code)]
#![allow(clippy::suspicious_else_formatting)]

pub mod node;
pub mod parser;
pub mod reader;
pub mod ser;

mod error;
mod position;
mod queue;
mod resolver;
mod scanner;
mod token;

pub use error::{Category, Error, Result};
pub use node::value::{Node, NodeValue};
pub use ser::{serialize, serialize_all};

use scanner::flag::O_ZEROED;

/// Parse the first YAML document out of `read`.
///
/// ## Errors
///
/// Returns an error if the stream is malformed, or if it
/// contains no documents at all.
pub fn deserialize<'de, T>(read: &'de T) -> Result<Node>
where
    T: reader::Read,
{
    node::build_one(read, O_ZEROED)
}

/// Parse every YAML document out of `read`, in stream order.
pub fn deserialize_all<'de, T>(read: &'de T) -> Result<Vec<Node>>
where
    T: reader::Read,
{
    node::build_all(read, O_ZEROED)
}
