/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod cache;
pub mod client;
pub mod creds;
pub mod encoding;
pub mod errors;
pub mod options;
pub mod params;
pub mod parsable;
mod parsers;
pub mod photo;
pub mod properties;
pub mod request;
pub mod response;
pub mod signing;
pub mod transport;

pub use cache::*;
pub use client::*;
pub use creds::*;
pub use errors::*;
pub use options::*;
pub use params::*;
pub use parsable::*;
pub use photo::*;
pub use properties::*;
pub use request::*;
pub use response::*;
pub use signing::*;
pub use transport::*;
