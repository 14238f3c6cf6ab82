use serde::{Deserialize, Serialize};

use super::bounds::{parse_int_bound, parse_list, parse_number_bound};
use super::domain::{FilterSet, VehicleQuery};

/// Longest free text forwarded to the classifier and stored in history, in chars
pub const MAX_QUERY_CHARS: usize = 2000;

/// Request to run a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filters: FilterSet,
}

impl SearchRequest {
    pub fn into_query(self) -> VehicleQuery {
        VehicleQuery::new(clamp_text(&self.text), self.filters)
    }
}

/// Trim and cut text to at most [`MAX_QUERY_CHARS`] characters
pub fn clamp_text(raw: &str) -> &str {
    let text = raw.trim();
    match text.char_indices().nth(MAX_QUERY_CHARS) {
        Some((end, _)) => text[..end].trim_end(),
        None => text,
    }
}

/// Flat results page parameters
///
/// Lists are comma-joined and bounds are literal numbers as text. Every key
/// is optional; anything that does not parse is treated as unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsParams {
    pub q: Option<String>,
    #[serde(rename = "bodyTypes")]
    pub body_types: Option<String>,
    pub makes: Option<String>,
    pub colors: Option<String>,
    #[serde(rename = "minYear")]
    pub min_year: Option<String>,
    #[serde(rename = "maxYear")]
    pub max_year: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    #[serde(rename = "maxMileage")]
    pub max_mileage: Option<String>,
}

impl ResultsParams {
    pub fn to_filters(&self) -> FilterSet {
        let list = |raw: &Option<String>| {
            raw.as_deref().map(|s| parse_list(s).collect()).unwrap_or_default()
        };

        FilterSet {
            body_types: list(&self.body_types),
            makes: list(&self.makes),
            colors: list(&self.colors),
            min_year: self.min_year.as_deref().and_then(parse_int_bound),
            max_year: self.max_year.as_deref().and_then(parse_int_bound),
            min_price: self.min_price.as_deref().and_then(parse_number_bound),
            max_price: self.max_price.as_deref().and_then(parse_number_bound),
            max_mileage: self.max_mileage.as_deref().and_then(parse_number_bound),
        }
    }

    pub fn into_query(self) -> VehicleQuery {
        let filters = self.to_filters();
        VehicleQuery::new(clamp_text(self.q.as_deref().unwrap_or_default()), filters)
    }
}

/// Request body of the query validation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateQueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_params_to_filters() {
        let params = ResultsParams {
            body_types: Some("SUV,Truck".to_string()),
            min_year: Some("2022".to_string()),
            max_price: Some("40000".to_string()),
            max_mileage: Some("not-a-number".to_string()),
            ..Default::default()
        };

        let filters = params.to_filters();
        assert_eq!(filters.body_types.len(), 2);
        assert!(filters.body_types.contains("Truck"));
        assert_eq!(filters.min_year, Some(2022));
        assert_eq!(filters.max_price, Some(40000.0));
        assert_eq!(filters.max_mileage, None);
        assert!(filters.makes.is_empty());
    }

    #[test]
    fn test_empty_params_are_identity() {
        let query = ResultsParams::default().into_query();
        assert!(query.text.is_empty());
        assert!(query.filters.is_identity());
    }

    #[test]
    fn test_search_request_trims_text() {
        let req = SearchRequest {
            text: "  hybrid SUV \n".to_string(),
            filters: FilterSet::default(),
        };
        assert_eq!(req.into_query().text, "hybrid SUV");
    }

    #[test]
    fn test_long_text_is_clamped() {
        let req = SearchRequest {
            text: format!("reliable SUV {}", "x".repeat(MAX_QUERY_CHARS)),
            filters: FilterSet::default(),
        };

        let query = req.into_query();
        assert_eq!(query.text.chars().count(), MAX_QUERY_CHARS);
        assert!(query.text.starts_with("reliable SUV x"));
    }

    #[test]
    fn test_clamp_respects_char_boundaries() {
        let text = "é".repeat(MAX_QUERY_CHARS + 5);
        assert_eq!(clamp_text(&text).chars().count(), MAX_QUERY_CHARS);
        assert_eq!(clamp_text("  coupe  "), "coupe");
    }
}
