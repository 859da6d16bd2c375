//! Decoded profile reader.
//!
//! Loads the JSON form of [`Profile`] from disk or from a string.

use super::schema::Profile;
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a decoded profile from a JSON file
///
/// **Public** - main entry point for the CLI commands
///
/// # Errors
/// * `ParseError::IoError` - File cannot be opened
/// * `ParseError::JsonError` - Content is not a valid profile document
/// * `ParseError::InvalidFormat` - Profile declares no sample types
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<Profile, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let file = File::open(input_path)?;
    let profile: Profile = serde_json::from_reader(BufReader::new(file))?;

    check_profile(&profile)?;

    debug!(
        "Profile loaded: {} sample types, {} samples",
        profile.sample_types.len(),
        profile.samples.len()
    );

    Ok(profile)
}

/// Parse a decoded profile from a JSON string
///
/// **Public** - useful for tests and for embedding profiles inline
pub fn parse_profile(json: &str) -> Result<Profile, ParseError> {
    let profile: Profile = serde_json::from_str(json)?;
    check_profile(&profile)?;
    Ok(profile)
}

/// Reject documents that cannot possibly be a profile.
///
/// Sample type matching is the index's job; this only catches
/// structurally empty input.
fn check_profile(profile: &Profile) -> Result<(), ParseError> {
    if profile.sample_types.is_empty() {
        return Err(ParseError::InvalidFormat(
            "profile declares no sample types".to_string(),
        ));
    }
    Ok(())
}
