//! Moderator role matching.

/// Lowercase and trim configured role names, dropping empty ones.
pub fn normalize_roles<I, S>(roles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    roles
        .into_iter()
        .map(|r| r.as_ref().trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Whether `role_name` is one of the (normalized) moderator roles.
///
/// Comparison ignores case.
///
/// ```
/// use bailiff_social::{is_mod_role, normalize_roles};
///
/// let roles = normalize_roles(["Moderator", "admin"]);
/// assert!(is_mod_role("moderator", &roles));
/// assert!(is_mod_role("ADMIN", &roles));
/// assert!(!is_mod_role("member", &roles));
/// ```
pub fn is_mod_role(role_name: &str, mod_roles: &[String]) -> bool {
    let name = role_name.to_lowercase();
    mod_roles.iter().any(|r| *r == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_blanks() {
        assert_eq!(normalize_roles([" Mods ", "", "  "]), vec!["mods".to_string()]);
    }

    #[test]
    fn test_no_roles_matches_nothing() {
        assert!(!is_mod_role("moderator", &[]));
    }
}
