//! Tests for moderator role matching and error conversion.

use bailiff_error::{PlatformError, PlatformErrorKind};
use bailiff_social::{DiscordError, DiscordErrorKind, is_mod_role, normalize_roles};

#[test]
fn test_configured_roles_match_any_case() {
    let roles = normalize_roles(vec!["Moderator".to_string(), " Admin ".to_string()]);
    assert_eq!(roles, vec!["moderator", "admin"]);

    assert!(is_mod_role("MODERATOR", &roles));
    assert!(is_mod_role("admin", &roles));
    assert!(!is_mod_role("admins", &roles));
    assert!(!is_mod_role("member", &roles));
}

#[test]
fn test_invalid_token_becomes_api_error() {
    let err: PlatformError = DiscordError::new(DiscordErrorKind::InvalidToken).into();
    assert_eq!(
        err.kind(),
        &PlatformErrorKind::Api("Invalid or missing bot token".to_string())
    );
}
