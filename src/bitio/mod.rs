//! streamflate
//!
//! # Licensing
//! This Source Code is subject to the terms of the Mozilla Public License
//! version 2.0 (the "License"). You can obtain a copy of the License at
//! <http://mozilla.org/MPL/2.0/>.

pub(crate) mod reader;
pub(crate) mod small_bit_vec;
pub(crate) mod writer;
