// HTTP handlers proxying the geocoding and text-generation cloud APIs
//
// Pure pass-through with response shaping: single attempt, no retry; upstream
// failures surface directly to the caller.

use axum::{extract::State, Json};
use serde_json::json;
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::locations::error::LocationError;
use crate::locations::models::{
    GenerateDescriptionRequest, GenerateDescriptionResponse, LocationRequest, LocationResponse,
};
use crate::AppState;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Handler for POST /api/locations/get-city-name
/// Reverse-geocodes coordinates into a locality name
pub async fn get_city_name_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<LocationRequest>,
) -> Result<Json<LocationResponse>, LocationError> {
    let api_key = std::env::var("GOOGLE_GEOCODING_API_KEY")
        .map_err(|_| LocationError::MissingApiKey("Google Geocoding"))?;

    let response = state
        .http
        .get(GEOCODE_URL)
        .query(&[
            ("latlng", format!("{},{}", request.latitude, request.longitude)),
            ("key", api_key),
            ("language", "es".to_string()),
        ])
        .send()
        .await
        .map_err(|e| LocationError::GeocodingUpstream(e.to_string()))?;

    let data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| LocationError::GeocodingUpstream(e.to_string()))?;

    let results = data["results"].as_array().filter(|r| !r.is_empty());
    let result = match (data["status"] == "OK", results) {
        (true, Some(results)) => &results[0],
        _ => return Err(LocationError::NoResult),
    };
    let formatted_address = result["formatted_address"].as_str().unwrap_or("").to_string();

    // Prefer the locality component, fall back to the administrative area,
    // then the formatted address
    let mut city_name = formatted_address.clone();
    if let Some(components) = result["address_components"].as_array() {
        for component in components {
            let types: Vec<&str> = component["types"]
                .as_array()
                .map(|t| t.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();

            if types.contains(&"locality") {
                if let Some(name) = component["long_name"].as_str() {
                    city_name = name.to_string();
                }
                break;
            } else if types.contains(&"administrative_area_level_2")
                && city_name == formatted_address
            {
                if let Some(name) = component["long_name"].as_str() {
                    city_name = name.to_string();
                }
            }
        }
    }

    Ok(Json(LocationResponse {
        city_name,
        formatted_address,
    }))
}

/// Handler for POST /api/locations/generate-description
/// Asks the text-generation API for a short phrase about a place
pub async fn generate_description_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<GenerateDescriptionRequest>,
) -> Result<Json<GenerateDescriptionResponse>, LocationError> {
    request
        .validate()
        .map_err(|e| LocationError::ValidationError(e.to_string()))?;

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| LocationError::MissingApiKey("OpenAI"))?;

    let prompt = format!(
        "Escribe una frase corta (máximo 40 caracteres) sobre {} relacionada con {}. \
         La frase debe ser informativa y concisa.",
        request.city_name, request.topic
    );

    let body = json!({
        "model": "gpt-4o-mini",
        "messages": [
            {
                "role": "system",
                "content": "Eres un asistente que genera descripciones breves y precisas sobre lugares.",
            },
            { "role": "user", "content": prompt },
        ],
        "max_tokens": 50,
        "temperature": 0.7,
    });

    let response = state
        .http
        .post(OPENAI_URL)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await
        .map_err(|e| LocationError::GenerationUpstream(e.to_string()))?;

    let status = response.status();
    let data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| LocationError::GenerationUpstream(e.to_string()))?;

    if !status.is_success() {
        return Err(LocationError::GenerationUpstream(upstream_hint(
            status.as_u16(),
            &data,
        )));
    }

    let description = data["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            LocationError::GenerationUpstream("unexpected completion payload".to_string())
        })?
        .trim()
        .to_string();

    Ok(Json(GenerateDescriptionResponse {
        description: truncate_description(&description),
    }))
}

/// Cap the generated phrase at 40 characters
fn truncate_description(description: &str) -> String {
    if description.chars().count() > 40 {
        let head: String = description.chars().take(37).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

/// Translate the common upstream failure modes into actionable messages
fn upstream_hint(status: u16, data: &serde_json::Value) -> String {
    match status {
        429 => "Tu cuenta de OpenAI ha excedido la cuota disponible o tiene problemas de \
                facturación. Verifica tu plan y método de pago."
            .to_string(),
        401 => "La API key de OpenAI no es válida o ha sido revocada. Verifica la clave \
                configurada en el entorno."
            .to_string(),
        _ => data["error"]["message"]
            .as_str()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Upstream error (status {})", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_descriptions_pass_through_unchanged() {
        assert_eq!(truncate_description("Capital de España"), "Capital de España");
    }

    #[test]
    fn test_long_descriptions_are_truncated_to_40_chars() {
        let long = "Una ciudad con una historia extraordinariamente rica y variada";
        let truncated = truncate_description(long);

        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        // Multi-byte characters must not be split
        let long = "áéíóúñ".repeat(10);
        let truncated = truncate_description(&long);

        assert_eq!(truncated.chars().count(), 40);
    }

    #[test]
    fn test_upstream_hint_mentions_quota_on_429() {
        let hint = upstream_hint(429, &json!({}));
        assert!(hint.contains("cuota"));
    }

    #[test]
    fn test_upstream_hint_falls_back_to_error_message() {
        let hint = upstream_hint(500, &json!({"error": {"message": "boom"}}));
        assert_eq!(hint, "boom");
    }
}
