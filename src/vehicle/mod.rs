use std::fmt;

#[cfg(test)]
mod tests;

/// Maximum accepted vehicle ID length
pub const MAX_VEHICLE_ID_LEN: usize = 64;

/// Validated vehicle identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vehicle ID parsing errors
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// Empty vehicle ID
    Empty,
    /// Exceeds MAX_VEHICLE_ID_LEN
    TooLong(usize),
    /// Character outside the accepted set
    InvalidCharacter(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "vehicle ID cannot be empty"),
            ParseError::TooLong(len) => write!(
                f,
                "vehicle ID too long: {} characters (max {})",
                len, MAX_VEHICLE_ID_LEN
            ),
            ParseError::InvalidCharacter(c) => {
                write!(f, "vehicle ID contains invalid character '{}'", c)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse and validate a raw vehicle identifier
///
/// Validation rules:
/// - Non-empty, at most 64 characters
/// - Letters, digits, dot, dash, underscore: [A-Za-z0-9._-]
///
/// # Examples
///
/// ```
/// use fleetstate::vehicle::parse_vehicle_id;
///
/// let id = parse_vehicle_id("v1").unwrap();
/// assert_eq!(id.as_str(), "v1");
///
/// assert!(parse_vehicle_id("").is_err());
/// assert!(parse_vehicle_id("v 1").is_err());
/// ```
pub fn parse_vehicle_id(raw: &str) -> Result<VehicleId, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }

    if raw.len() > MAX_VEHICLE_ID_LEN {
        return Err(ParseError::TooLong(raw.len()));
    }

    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(ParseError::InvalidCharacter(c));
    }

    Ok(VehicleId(raw.to_string()))
}
