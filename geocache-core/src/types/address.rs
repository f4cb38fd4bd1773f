//! Address input validation.

use crate::constants::MISSING_ADDRESS_MESSAGE;
use crate::error::{GeocacheError, Result};

/// Checks that an address is present and not blank.
///
/// The address is returned exactly as given. Case and whitespace are
/// significant, so `" Main St"` and `"Main St"` are different cache keys.
pub fn validate_address(address: Option<&str>) -> Result<&str> {
    match address {
        Some(a) if !a.trim().is_empty() => Ok(a),
        _ => Err(GeocacheError::Validation(MISSING_ADDRESS_MESSAGE.into())),
    }
}
