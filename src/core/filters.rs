use crate::models::{FilterSet, VehicleListing};

/// Check if a listing satisfies every active constraint
///
/// Fields combine with AND, values inside a set combine with OR. Empty sets
/// and absent bounds never exclude.
#[inline]
pub fn matches_filters(listing: &VehicleListing, filters: &FilterSet) -> bool {
    if !filters.body_types.is_empty() && !filters.body_types.contains(&listing.body_type) {
        return false;
    }

    if !filters.makes.is_empty() && !filters.makes.contains(&listing.make) {
        return false;
    }

    if !filters.colors.is_empty() && !filters.colors.contains(&listing.color) {
        return false;
    }

    // Year range
    if filters.min_year.is_some_and(|min| listing.year < min) {
        return false;
    }
    if filters.max_year.is_some_and(|max| listing.year > max) {
        return false;
    }

    // Price range
    if filters.min_price.is_some_and(|min| listing.price < min) {
        return false;
    }
    if filters.max_price.is_some_and(|max| listing.price > max) {
        return false;
    }

    if filters.max_mileage.is_some_and(|max| listing.mileage > max) {
        return false;
    }

    true
}

/// Stable filter over the candidate set; input order is preserved
pub fn evaluate(candidates: Vec<VehicleListing>, filters: &FilterSet) -> Vec<VehicleListing> {
    if filters.is_identity() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|listing| matches_filters(listing, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_listing(id: &str, body_type: &str, price: f64) -> VehicleListing {
        VehicleListing {
            id: id.to_string(),
            make: "Toyota".to_string(),
            model: "Test".to_string(),
            year: 2022,
            price,
            mileage: 20000.0,
            fuel_type: "Gasoline".to_string(),
            body_type: body_type.to_string(),
            color: "Silver".to_string(),
            location: "Austin, TX".to_string(),
            image: "https://example.com/car.jpg".to_string(),
        }
    }

    fn set(items: &[&str]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identity_keeps_everything() {
        let candidates = vec![
            create_listing("1", "SUV", 30000.0),
            create_listing("2", "Sedan", 25000.0),
        ];

        let result = evaluate(candidates.clone(), &FilterSet::default());
        assert_eq!(result, candidates);
    }

    #[test]
    fn test_body_type_set_is_or() {
        let filters = FilterSet {
            body_types: set(&["SUV", "Truck"]),
            ..Default::default()
        };

        assert!(matches_filters(&create_listing("1", "SUV", 1.0), &filters));
        assert!(matches_filters(&create_listing("2", "Truck", 1.0), &filters));
        assert!(!matches_filters(&create_listing("3", "Sedan", 1.0), &filters));
    }

    #[test]
    fn test_body_type_match_is_exact() {
        let filters = FilterSet {
            body_types: set(&["suv"]),
            ..Default::default()
        };

        assert!(!matches_filters(&create_listing("1", "SUV", 1.0), &filters));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let listing = create_listing("1", "SUV", 35000.0);
        let filters = FilterSet {
            min_year: Some(2022),
            max_year: Some(2022),
            min_price: Some(35000.0),
            max_price: Some(35000.0),
            max_mileage: Some(20000.0),
            ..Default::default()
        };

        assert!(matches_filters(&listing, &filters));
    }

    #[test]
    fn test_mileage_bound() {
        let filters = FilterSet {
            max_mileage: Some(19999.0),
            ..Default::default()
        };

        assert!(!matches_filters(&create_listing("1", "SUV", 1.0), &filters));
    }

    #[test]
    fn test_all_fields_must_hold() {
        let filters = FilterSet {
            body_types: set(&["SUV"]),
            max_price: Some(40000.0),
            ..Default::default()
        };

        let candidates = vec![
            create_listing("1", "SUV", 32500.0),
            create_listing("2", "Sedan", 28900.0),
            create_listing("3", "SUV", 45000.0),
            create_listing("4", "SUV", 29500.0),
        ];

        let ids: Vec<String> = evaluate(candidates, &filters).into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_empty_candidates() {
        let filters = FilterSet {
            colors: set(&["Red"]),
            ..Default::default()
        };

        assert!(evaluate(Vec::new(), &filters).is_empty());
    }
}
