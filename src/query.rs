// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! The shared two-phase (size-probe / exact-fill) query helper.
//!
//! Phase one: the caller passes no buffer and gets the required byte
//! size. Phase two: the caller passes a buffer of exactly that size and
//! gets it filled. Any other buffer size fails before a single byte is
//! written; that check is what keeps the fill routines free of bounds
//! arithmetic.

use crate::error::Error;

pub(crate) fn two_phase<F>(mem: Option<&mut [u8]>, required: u64, fill: F) -> Result<u64, Error>
where
    F: FnOnce(&mut [u8]) -> Result<(), Error>,
{
    match mem {
        None => Ok(required),
        Some(buf) => {
            if buf.len() as u64 != required {
                return Err(Error::Parameter(format!(
                    "invalid byte size: query requires {required} bytes, buffer holds {}",
                    buf.len()
                )));
            }
            fill(buf)?;
            Ok(required)
        }
    }
}
