// Request/response DTOs for the third-party location proxies

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const TOPICS: [&str; 3] = ["Historia", "Geografía", "Economía"];

fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    if TOPICS.contains(&topic) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_topic");
        err.message = Some(format!("\"{}\" is not a valid choice.", topic).into());
        Err(err)
    }
}

/// Coordinates to reverse-geocode; both fields are required
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolved place name
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub city_name: String,
    pub formatted_address: String,
}

/// Input for the short-description generator
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateDescriptionRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub city_name: String,
    #[validate(custom = "validate_topic")]
    pub topic: String,
}

/// Generated description, capped at 40 characters
#[derive(Debug, Serialize)]
pub struct GenerateDescriptionResponse {
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_known_topics_are_accepted() {
        for topic in ["Historia", "Geografía", "Economía"] {
            let request = GenerateDescriptionRequest {
                city_name: "Madrid".to_string(),
                topic: topic.to_string(),
            };
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn test_unknown_topic_is_rejected() {
        let request = GenerateDescriptionRequest {
            city_name: "Madrid".to_string(),
            topic: "Deportes".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_location_request_requires_both_coordinates() {
        assert!(serde_json::from_str::<LocationRequest>(r#"{"latitude": 40.4}"#).is_err());
        assert!(
            serde_json::from_str::<LocationRequest>(r#"{"latitude": 40.4, "longitude": -3.7}"#)
                .is_ok()
        );
    }
}
