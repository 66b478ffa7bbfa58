//! Nominatim HTTP adapter for area names.

use serde::Deserialize;
use tracing::debug;

use crate::geo::Coordinate;
use crate::traits::AreaNamer;

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub base_url: String,
    /// Nominatim zoom level; 16 resolves to neighbourhood granularity.
    pub zoom: u8,
    pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            zoom: 16,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: GeocodeConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: GeocodeConfig) -> Result<Self, reqwest::Error> {
        // Nominatim's usage policy requires an identifying user agent.
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent("itinerary-planner")
            .build()?;

        Ok(Self { config, client })
    }
}

impl AreaNamer for NominatimClient {
    fn area_name(&self, coordinate: Coordinate) -> Option<String> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={:.6}&lon={:.6}&zoom={}",
            self.config.base_url, coordinate.lat, coordinate.lng, self.config.zoom
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<ReverseResponse>());

        match response {
            Ok(body) => body.area_label(),
            Err(err) => {
                debug!("Reverse geocode failed ({}); provisional name stands", err);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    name: Option<String>,
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    neighbourhood: Option<String>,
    quarter: Option<String>,
    suburb: Option<String>,
    city_district: Option<String>,
}

impl ReverseResponse {
    /// Finest-grained named area in the response, if any.
    fn area_label(self) -> Option<String> {
        if let Some(address) = self.address {
            let candidates = [
                address.neighbourhood,
                address.quarter,
                address.suburb,
                address.city_district,
            ];
            for candidate in candidates {
                if let Some(label) = candidate {
                    if !label.is_empty() {
                        return Some(label);
                    }
                }
            }
        }
        self.name.filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_label_prefers_neighbourhood() {
        let response = ReverseResponse {
            name: Some("Some Shop".to_string()),
            address: Some(ReverseAddress {
                neighbourhood: Some("Le Marais".to_string()),
                quarter: Some("4th Arrondissement".to_string()),
                suburb: None,
                city_district: None,
            }),
        };
        assert_eq!(response.area_label().as_deref(), Some("Le Marais"));
    }

    #[test]
    fn test_area_label_falls_back_through_levels() {
        let response = ReverseResponse {
            name: Some("Some Shop".to_string()),
            address: Some(ReverseAddress {
                neighbourhood: None,
                quarter: None,
                suburb: Some("Montmartre".to_string()),
                city_district: None,
            }),
        };
        assert_eq!(response.area_label().as_deref(), Some("Montmartre"));
    }

    #[test]
    fn test_area_label_empty_response_is_none() {
        let response = ReverseResponse {
            name: None,
            address: None,
        };
        assert_eq!(response.area_label(), None);
    }
}
