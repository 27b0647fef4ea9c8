//! Catalogue filtering
//!
//! Pure functions over an already fetched costume list. The filtered result
//! is always a subsequence of the input: entries are kept or dropped, never
//! reordered or invented.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::Costume;

/// User-entered filter criteria. Empty criteria let everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free text matched against name and description
    pub search: String,
    /// Seller city; `None` means any city
    pub city: Option<String>,
    /// Size label; blank means any size
    pub size: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl FilterCriteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Set both bounds from raw text fields
    pub fn with_price_text(mut self, min: &str, max: &str) -> Self {
        self.min_price = parse_price_bound(min);
        self.max_price = parse_price_bound(max);
        self
    }

    /// Reset city, size and price; the search text stays
    pub fn clear_filters(&mut self) {
        self.city = None;
        self.size.clear();
        self.min_price = None;
        self.max_price = None;
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.city.is_none()
            && self.size.trim().is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Whether one costume passes every active criterion
    pub fn matches(&self, costume: &Costume) -> bool {
        self.matches_search(costume)
            && self.matches_city(costume)
            && self.matches_size(costume)
            && self.matches_price(costume)
    }

    fn matches_search(&self, costume: &Costume) -> bool {
        let query = self.search.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        costume.name.to_lowercase().contains(&query)
            || costume
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }

    // Exact and case-sensitive: the selectable values come from the data itself.
    fn matches_city(&self, costume: &Costume) -> bool {
        match &self.city {
            None => true,
            Some(city) => costume.seller_city() == Some(city.as_str()),
        }
    }

    fn matches_size(&self, costume: &Costume) -> bool {
        let wanted = self.size.trim();
        if wanted.is_empty() {
            return true;
        }
        costume
            .size
            .as_deref()
            .is_some_and(|size| size.trim().to_lowercase() == wanted.to_lowercase())
    }

    fn matches_price(&self, costume: &Costume) -> bool {
        if self.min_price.is_none() && self.max_price.is_none() {
            return true;
        }
        let min = self.min_price.unwrap_or(Decimal::ZERO);
        costume.price >= min && self.max_price.map_or(true, |max| costume.price <= max)
    }
}

/// Parse a price bound typed by the user; blank or non-numeric text means
/// "no bound"
pub fn parse_price_bound(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_str(&raw.replace(',', ".")))
        .ok()
}

/// Costumes passing `criteria`, in their original order
pub fn filter(costumes: &[Costume], criteria: &FilterCriteria) -> Vec<Costume> {
    costumes
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect()
}

/// Distinct non-empty seller cities, sorted
pub fn distinct_cities(costumes: &[Costume]) -> Vec<String> {
    costumes
        .iter()
        .filter_map(Costume::seller_city)
        .filter(|city| !city.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SellerRef;

    fn costume(id: u64, name: &str, price: i64) -> Costume {
        Costume {
            id,
            name: name.to_string(),
            description: None,
            price: Decimal::from(price),
            image_url: None,
            size: None,
            seller: None,
            is_available: true,
        }
    }

    fn in_city(mut c: Costume, city: &str) -> Costume {
        c.seller = Some(SellerRef {
            id: Some(1),
            name: Some("Shop".to_string()),
            city: Some(city.to_string()),
        });
        c
    }

    fn sized(mut c: Costume, size: &str) -> Costume {
        c.size = Some(size.to_string());
        c
    }

    fn ids(list: &[Costume]) -> Vec<u64> {
        list.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_criteria_returns_input_unchanged() {
        let list = vec![costume(3, "Zorro", 30), costume(1, "Witch", 10), costume(2, "Pirate", 20)];
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter(&list, &criteria), list);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let list = vec![costume(1, "Witch", 10), costume(2, "Pirate", 20)];
        let result = filter(&list, &FilterCriteria::default().with_search("witch"));
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_search_matches_description() {
        let mut pirate = costume(2, "Captain", 20);
        pirate.description = Some("Full PIRATE outfit with hat".to_string());
        let list = vec![costume(1, "Witch", 10), pirate];
        let result = filter(&list, &FilterCriteria::default().with_search("pirate"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_whitespace_search_is_a_no_op() {
        let list = vec![costume(1, "Witch", 10), costume(2, "Pirate", 20)];
        let result = filter(&list, &FilterCriteria::default().with_search("   "));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_city_is_exact_and_case_sensitive() {
        let list = vec![
            in_city(costume(1, "Witch", 10), "Paris"),
            in_city(costume(2, "Pirate", 20), "paris"),
            costume(3, "Ghost", 5),
        ];
        let result = filter(&list, &FilterCriteria::default().with_city("Paris"));
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_size_is_case_insensitive_and_requires_a_size() {
        let list = vec![
            sized(costume(1, "Witch", 10), "M"),
            sized(costume(2, "Pirate", 20), "XL"),
            costume(3, "Ghost", 5),
        ];
        let result = filter(&list, &FilterCriteria::default().with_size("m"));
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_price_range() {
        let list = vec![costume(1, "A", 5), costume(2, "B", 15), costume(3, "C", 25)];
        let result = filter(&list, &FilterCriteria::default().with_price_text("10", "20"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_price_min_only_is_unbounded_above() {
        let list = vec![costume(1, "A", 5), costume(2, "B", 15)];
        let result = filter(&list, &FilterCriteria::default().with_price_text("10", ""));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let list = vec![costume(1, "A", 10), costume(2, "B", 20)];
        let result = filter(&list, &FilterCriteria::default().with_price_text("10", "20"));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_non_numeric_bound_is_ignored() {
        let list = vec![costume(1, "A", 5), costume(2, "B", 15)];
        let result = filter(&list, &FilterCriteria::default().with_price_text("cheap", "10"));
        assert_eq!(ids(&result), vec![1]);

        let result = filter(&list, &FilterCriteria::default().with_price_text("abc", "xyz"));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_parse_price_bound() {
        assert_eq!(parse_price_bound(" 12.5 "), Some(Decimal::new(125, 1)));
        assert_eq!(parse_price_bound("12,5"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_price_bound(""), None);
        assert_eq!(parse_price_bound("ten"), None);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let list = vec![
            sized(in_city(costume(1, "Red Witch", 12), "Lyon"), "M"),
            sized(in_city(costume(2, "Green Witch", 30), "Lyon"), "M"),
            sized(in_city(costume(3, "Blue Witch", 12), "Nice"), "M"),
            sized(in_city(costume(4, "Pirate", 12), "Lyon"), "M"),
        ];
        let criteria = FilterCriteria::default()
            .with_search("witch")
            .with_city("Lyon")
            .with_size("m")
            .with_price_text("", "20");
        assert_eq!(ids(&filter(&list, &criteria)), vec![1]);
    }

    #[test]
    fn test_clear_filters_keeps_search() {
        let mut criteria = FilterCriteria::default()
            .with_search("witch")
            .with_city("Lyon")
            .with_size("M")
            .with_price_text("1", "2");
        criteria.clear_filters();
        assert_eq!(criteria.search, "witch");
        assert!(criteria.city.is_none());
        assert!(criteria.size.is_empty());
        assert!(criteria.min_price.is_none() && criteria.max_price.is_none());
    }

    #[test]
    fn test_distinct_cities_sorted_without_blanks() {
        let list = vec![
            in_city(costume(1, "A", 1), "Nice"),
            in_city(costume(2, "B", 1), "Lyon"),
            in_city(costume(3, "C", 1), "Nice"),
            in_city(costume(4, "D", 1), ""),
            costume(5, "E", 1),
        ];
        assert_eq!(distinct_cities(&list), vec!["Lyon", "Nice"]);
    }
}
