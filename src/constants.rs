// Console configuration
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";

// Backend configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOT_UTC_OFFSET: &str = "+05:30";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// Paths that never carry a bearer token
pub const PUBLIC_PATHS: &[&str] = &[
    "/api/auth/login",
    "/api/users/register",
    "/api/users/login",
    "/api/users/social-signin",
    "/api/auth/google",
    "/api/otp/generate",
    "/api/otp/validate",
];

// Session configuration
pub const PREFERENCES_DB_FILE: &str = "preferences.db";
pub const SESSION_KEY: &str = "auth_session";
pub const SESSION_EXPIRY_HOURS: i64 = 24;

// Lot operating hours
pub const EARLY_MORNING_HOUR: u8 = 6;
pub const SUGGESTED_DURATION_HOURS: i64 = 2;

// Pricing
pub const LATE_GRACE_MINUTES: i64 = 10;

// Validation limits
pub const MAX_TRANSACTION_ITEMS: usize = 1000;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_ID_LENGTH: usize = 64;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_VEHICLE_NUMBER_LENGTH: usize = 20;
pub const MAX_QR_CODE_LENGTH: usize = 512;

// Error messages
pub const ERR_NOT_LOGGED_IN: &str = "User not logged in";
pub const ERR_EMPTY_RESPONSE: &str = "Empty response from server";
