//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Platform administrator
pub const ROLE_ADMIN: &str = "ADMIN";

/// Bar staff member, always attached to a bar
pub const ROLE_STAFF: &str = "STAFF";

/// Customer booking tables and paying for them
pub const ROLE_CUSTOMER: &str = "CUSTOMER";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum category name length
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Number of digits in a one-time password
pub const OTP_LENGTH: usize = 6;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
