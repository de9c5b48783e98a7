// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Citizen role - submits hazard reports and tracks their own history
pub const ROLE_CITIZEN: &str = "citizen";

/// Mayor role - views and resolves reports whose address matches their region
pub const ROLE_MAYOR: &str = "mayor";

/// Region stored when a registration does not name one
pub const DEFAULT_REGION: &str = "General";

// =============================================================================
// FALLBACK VALUES
// =============================================================================

/// Hazard label used when the detector finds nothing or fails
pub const UNKNOWN_HAZARD: &str = "Unknown Hazard";

/// Address stored when reverse geocoding fails
pub const FALLBACK_ADDRESS: &str = "GPS Location Found (Address Unavailable)";

/// City stored when reverse geocoding fails
pub const FALLBACK_CITY: &str = "General";

/// City used when a geocoding result carries no city component
pub const UNKNOWN_CITY: &str = "Unknown";

// =============================================================================
// STORAGE
// =============================================================================

/// Prefix of stored image paths; they resolve as URLs under the static route
pub const UPLOAD_URL_PREFIX: &str = "static/uploads";

/// Prefix added to the original filename for the annotated rendering
pub const ANNOTATED_PREFIX: &str = "detected_";

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

/// Cookie carrying a one-shot flash message for the HTML pages
pub const FLASH_COOKIE: &str = "flash";
