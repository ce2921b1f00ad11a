// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared-secret verification for inbound requests.

use crate::error::ApiError;

/// Checks a presented verification token against the configured one.
///
/// The comparison looks at every byte regardless of where the first
/// difference is.
///
/// # Arguments
///
/// * `expected` - The configured verification token
/// * `presented` - The token carried by the request, if any
///
/// # Errors
///
/// Returns `ApiError::AuthRejected` if the token is missing or differs, or
/// if no token is configured.
pub fn verify_token(expected: &str, presented: Option<&str>) -> Result<(), ApiError> {
    let Some(presented) = presented else {
        return Err(ApiError::AuthRejected);
    };
    if expected.is_empty() || !constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
        return Err(ApiError::AuthRejected);
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
