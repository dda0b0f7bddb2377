use super::*;

#[test]
fn test_parse_vehicle_id_valid() {
    let id = parse_vehicle_id("v1").unwrap();
    assert_eq!(id.as_str(), "v1");

    let id = parse_vehicle_id("fleet-07.trailer_2").unwrap();
    assert_eq!(id.as_str(), "fleet-07.trailer_2");
}

#[test]
fn test_parse_vehicle_id_empty() {
    let result = parse_vehicle_id("");
    assert!(matches!(result, Err(ParseError::Empty)));
}

#[test]
fn test_parse_vehicle_id_too_long() {
    let long_id = "a".repeat(MAX_VEHICLE_ID_LEN + 1);
    let result = parse_vehicle_id(&long_id);
    assert!(matches!(result, Err(ParseError::TooLong(65))));
}

#[test]
fn test_parse_vehicle_id_max_length_accepted() {
    let id = "a".repeat(MAX_VEHICLE_ID_LEN);
    assert!(parse_vehicle_id(&id).is_ok());
}

#[test]
fn test_parse_vehicle_id_whitespace_rejected() {
    let result = parse_vehicle_id("v 1");
    assert!(matches!(result, Err(ParseError::InvalidCharacter(' '))));

    let result = parse_vehicle_id(" v1");
    assert!(matches!(result, Err(ParseError::InvalidCharacter(' '))));
}

#[test]
fn test_parse_vehicle_id_invalid_characters() {
    for raw in ["v/1", "v:1", "v#1", "v?ts=1", "véhicule"] {
        let result = parse_vehicle_id(raw);
        assert!(
            matches!(result, Err(ParseError::InvalidCharacter(_))),
            "expected rejection for {:?}",
            raw
        );
    }
}

#[test]
fn test_parse_error_display() {
    assert_eq!(
        ParseError::Empty.to_string(),
        "vehicle ID cannot be empty"
    );
    assert_eq!(
        ParseError::InvalidCharacter('!').to_string(),
        "vehicle ID contains invalid character '!'"
    );
}
