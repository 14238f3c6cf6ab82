use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::bounds::{lenient_int, lenient_number, lenient_set};

/// Vehicle listing supplied by the inventory source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleListing {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    #[serde(rename = "bodyType")]
    pub body_type: String,
    pub color: String,
    pub location: String,
    pub image: String,
}

/// Structured search constraints
///
/// Every field is optional. Empty sets and absent bounds never exclude a
/// listing, so `FilterSet::default()` is the "no filters" identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(rename = "bodyTypes", default, deserialize_with = "lenient_set")]
    pub body_types: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient_set")]
    pub makes: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient_set")]
    pub colors: BTreeSet<String>,
    #[serde(rename = "minYear", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(rename = "maxYear", default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(rename = "minPrice", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(rename = "maxMileage", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_mileage: Option<f64>,
}

impl FilterSet {
    /// True when no constraint is active
    pub fn is_identity(&self) -> bool {
        self.body_types.is_empty()
            && self.makes.is_empty()
            && self.colors.is_empty()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.max_mileage.is_none()
    }

    /// Flat key-value form used by the results query interface
    ///
    /// Lists are comma-joined, so a value that itself contains a comma (a make
    /// such as `"Mercedes-Benz, AMG"`) is split into separate values when the
    /// params are read back through `ResultsParams`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let lists = [
            ("bodyTypes", &self.body_types),
            ("makes", &self.makes),
            ("colors", &self.colors),
        ];
        for (key, set) in lists {
            if !set.is_empty() {
                params.push((key, set.iter().cloned().collect::<Vec<_>>().join(",")));
            }
        }

        if let Some(v) = self.min_year {
            params.push(("minYear", v.to_string()));
        }
        if let Some(v) = self.max_year {
            params.push(("maxYear", v.to_string()));
        }
        if let Some(v) = self.min_price {
            params.push(("minPrice", v.to_string()));
        }
        if let Some(v) = self.max_price {
            params.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = self.max_mileage {
            params.push(("maxMileage", v.to_string()));
        }

        params
    }
}

/// A single search submission: free text plus structured filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filters: FilterSet,
}

impl VehicleQuery {
    pub fn new(text: impl Into<String>, filters: FilterSet) -> Self {
        Self {
            text: text.into(),
            filters,
        }
    }

    /// Path of the results page for this query, e.g. `/results?q=suv&maxPrice=35000`
    pub fn results_path(&self) -> String {
        let mut pairs = Vec::new();
        if !self.text.is_empty() {
            pairs.push(format!("q={}", urlencoding::encode(&self.text)));
        }
        for (key, value) in self.filters.to_params() {
            pairs.push(format!("{}={}", key, urlencoding::encode(&value)));
        }

        if pairs.is_empty() {
            "/results".to_string()
        } else {
            format!("/results?{}", pairs.join("&"))
        }
    }
}

/// Outcome of the classifier gate for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "isInDomain")]
    pub is_in_domain: bool,
}

impl ClassificationResult {
    pub fn allow() -> Self {
        Self { is_in_domain: true }
    }

    pub fn reject() -> Self {
        Self { is_in_domain: false }
    }
}

/// Answer resolved from a classification backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    InDomain,
    OutOfDomain,
    /// The backend answered, but with neither accepted token
    Indeterminate(String),
}

/// Search history entry written for signed-in users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub query: String,
    pub filters: FilterSet,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl HistoryRecord {
    pub fn new(user_id: impl Into<String>, query: &VehicleQuery) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id: user_id.into(),
            query: query.text.clone(),
            filters: query.filters.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_set_is_identity() {
        assert!(FilterSet::default().is_identity());

        let filters = FilterSet {
            max_mileage: Some(20000.0),
            ..Default::default()
        };
        assert!(!filters.is_identity());
    }

    #[test]
    fn test_filter_set_accepts_numeric_strings() {
        let filters: FilterSet = serde_json::from_str(
            r#"{"bodyTypes":["SUV"],"minYear":"2021","maxPrice":"35000","maxMileage":"lots"}"#,
        )
        .unwrap();

        assert!(filters.body_types.contains("SUV"));
        assert_eq!(filters.min_year, Some(2021));
        assert_eq!(filters.max_price, Some(35000.0));
        assert_eq!(filters.max_mileage, None);
    }

    #[test]
    fn test_malformed_bounds_are_absent() {
        let filters: FilterSet = serde_json::from_str(
            r#"{"minYear":"","maxYear":true,"minPrice":[1],"maxPrice":null}"#,
        )
        .unwrap();

        assert!(filters.is_identity());
    }

    #[test]
    fn test_null_or_misshapen_lists_are_empty() {
        let filters: FilterSet = serde_json::from_str(
            r#"{"bodyTypes":null,"makes":42,"colors":{"a":1},"maxPrice":40000}"#,
        )
        .unwrap();

        assert!(filters.body_types.is_empty());
        assert!(filters.makes.is_empty());
        assert!(filters.colors.is_empty());
        assert_eq!(filters.max_price, Some(40000.0));
    }

    #[test]
    fn test_lists_accept_comma_strings() {
        let filters: FilterSet = serde_json::from_str(
            r#"{"bodyTypes":"SUV, Truck","makes":["Honda",7," ","Kia"]}"#,
        )
        .unwrap();

        assert_eq!(filters.body_types.len(), 2);
        assert!(filters.body_types.contains("Truck"));
        assert_eq!(filters.makes.len(), 2);
        assert!(filters.makes.contains("Kia"));
    }

    #[test]
    fn test_comma_in_list_value_splits_on_round_trip() {
        let filters = FilterSet {
            makes: ["Mercedes-Benz, AMG".to_string()].into_iter().collect(),
            ..Default::default()
        };

        let params = crate::models::ResultsParams {
            makes: filters.to_params().into_iter().find(|(k, _)| *k == "makes").map(|(_, v)| v),
            ..Default::default()
        };
        assert_eq!(params.to_filters().makes.len(), 2);
    }

    #[test]
    fn test_results_path() {
        let query = VehicleQuery::new(
            "reliable SUV",
            FilterSet {
                body_types: ["SUV".to_string()].into_iter().collect(),
                max_price: Some(35000.0),
                ..Default::default()
            },
        );

        assert_eq!(
            query.results_path(),
            "/results?q=reliable%20SUV&bodyTypes=SUV&maxPrice=35000"
        );
        assert_eq!(VehicleQuery::default().results_path(), "/results");
    }

    #[test]
    fn test_history_record_copies_query() {
        let query = VehicleQuery::new("family sedan", FilterSet::default());
        let record = HistoryRecord::new("user-1", &query);

        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.query, "family sedan");
        assert!(record.filters.is_identity());
    }
}
