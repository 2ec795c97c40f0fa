//! Global constants for the application.

pub const DEFAULT_LOG_FILE: &str = "./formkit.log"; // Default log destination.
pub const DEFAULT_LOG_LEVEL: &str = "info"; // Default log level.

pub const LOG_FILE_VAR: &str = "FORMKIT_LOG_FILE";
pub const LOG_LEVEL_VAR: &str = "FORMKIT_LOG_LEVEL";

/// Minimum number of characters in a username
pub const MIN_USERNAME_LENGTH: usize = 4;
/// Minimum number of characters in a password
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Symbols accepted by the password rule
pub const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '-', '_', '(', ')'];

/// Inclusive age bounds
pub const MIN_AGE: f64 = 10.0;
pub const MAX_AGE: f64 = 120.0;

/// Number of decimals kept by the unit converter
pub const CONVERSION_DECIMALS: i32 = 4;
