// Env values used in google services.
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const GOOGLE_SCOPES: &str = "GOOGLE_SCOPES";

// Default OAuth2 scope for Google Cloud services
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Token endpoint, also the `aud` of the assertion.
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of the signed assertion in seconds.
pub const ASSERTION_LIFETIME: i64 = 3600;
