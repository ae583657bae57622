use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Query string of `GET /api/trains/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainSearchQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
}

impl TrainSearchQuery {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
        }
    }

    /// Both ends of the route, trimmed. Either one missing or blank is a validation error.
    pub fn route(&self) -> CoreResult<(String, String)> {
        let source = self.source.as_deref().map(str::trim).unwrap_or_default();
        let destination = self.destination.as_deref().map(str::trim).unwrap_or_default();

        if source.is_empty() || destination.is_empty() {
            return Err(CoreError::ValidationError(
                "Both source and destination are required".to_string(),
            ));
        }
        Ok((source.to_string(), destination.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_deserialization() {
        let json = r#"{ "source": " Colombo ", "destination": "Kandy" }"#;
        let query: TrainSearchQuery = serde_json::from_str(json).expect("Failed to deserialize");
        let (source, destination) = query.route().unwrap();
        assert_eq!(source, "Colombo");
        assert_eq!(destination, "Kandy");
    }

    #[test]
    fn test_blank_destination_rejected() {
        let query = TrainSearchQuery::new("Colombo", "  ");
        assert!(matches!(query.route(), Err(CoreError::ValidationError(_))));
        assert!(TrainSearchQuery::default().route().is_err());
    }
}
