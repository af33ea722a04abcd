//! Marketplace API endpoint paths.

/// Exchange credentials for an access token and user.
pub const LOGIN: &str = "/api/login";

/// Create a new account.
pub const REGISTER: &str = "/api/register";

/// Invalidate the server-side session.
pub const LOGOUT: &str = "/api/logout";

/// Fetch the current user.
pub const ME: &str = "/api/me";

/// Issue a new access token from the ambient long-lived credential.
pub const REFRESH_TOKEN: &str = "/api/refresh-token";

/// Update profile fields.
pub const PROFILE: &str = "/api/user/profile";

/// Fetch the full profile.
pub const PROFILE_COMPLETE: &str = "/api/user/profile/complete";

/// Create a listing (updates target `/api/listings/{id}`).
pub const LISTINGS: &str = "/api/listings";

/// Endpoints whose authorization failures must send the user to the login
/// surface rather than fail silently.
const STRICT_AUTH_PATHS: &[&str] = &[PROFILE, LISTINGS];

/// Returns true if the path targets a strict-auth endpoint.
///
/// Matching is by path prefix, so profile reads (`/api/user/profile/complete`)
/// and listing updates (`/api/listings/{id}`) are covered alongside the base
/// paths. Callers can override the classification per call.
pub fn is_strict_path(path: &str) -> bool {
    STRICT_AUTH_PATHS.iter().any(|p| path.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_endpoints_are_strict() {
        assert!(is_strict_path(PROFILE));
        assert!(is_strict_path(PROFILE_COMPLETE));
    }

    #[test]
    fn listing_paths_are_strict() {
        assert!(is_strict_path("/api/listings"));
        assert!(is_strict_path("/api/listings/42"));
    }

    #[test]
    fn session_endpoints_are_not_strict() {
        assert!(!is_strict_path(LOGIN));
        assert!(!is_strict_path(ME));
        assert!(!is_strict_path(REFRESH_TOKEN));
    }
}
