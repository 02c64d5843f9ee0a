use anyhow::{bail, Result};

/// Base-profile entry meaning "start from an empty state"; never usable as a profile name
pub const NO_BASE_PROFILE: &str = "None";

/// Validate a profile name
///
/// # Arguments
/// * `name` - The profile name to validate
/// * `existing_profiles` - List of existing profile names
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err` with descriptive message if invalid
///
/// # Rules
/// - Must not be empty
/// - Only ASCII letters, digits, hyphens, and underscores
/// - Cannot be the base-profile sentinel `None`
/// - Must be unique (case-insensitive, snapshot files share one directory)
pub fn validate_profile_name(name: &str, existing_profiles: &[String]) -> Result<()> {
    if name.is_empty() {
        bail!("Profile name cannot be empty");
    }

    if !name.chars().all(is_profile_name_char) {
        bail!("Profile name can only contain letters, numbers, hyphens, and underscores");
    }

    if name == NO_BASE_PROFILE {
        bail!("'{}' is a reserved name and cannot be used", name);
    }

    if existing_profiles.iter().any(|p| p.eq_ignore_ascii_case(name)) {
        bail!("A profile with the name '{}' already exists", name);
    }

    Ok(())
}

/// Characters accepted in a profile name (`[A-Za-z0-9_-]`)
fn is_profile_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
