//! Purchasable items and the fixed catalog.

use serde::{Deserialize, Serialize};

use crate::util::Price;

/// A purchasable item: a name and a price.
///
/// Items come either from the [`Catalog`] or, at purchase time, straight from
/// request data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: Price,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The list of items offered by the gateway.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// without synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<Item>);

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    /// Looks up an item by exact name.
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.0.iter().find(|item| item.name == name)
    }

    /// Returns `true` if an item with the same name and price is listed.
    pub fn contains(&self, item: &Item) -> bool {
        self.find(&item.name)
            .is_some_and(|listed| listed.price == item.price)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self(vec![
            Item::new("Laptop", Price::from(1000)),
            Item::new("Smartphone", Price::from(500)),
            Item::new("Subscription", Price::from(100)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        let names: Vec<_> = catalog.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Laptop", "Smartphone", "Subscription"]);
        assert_eq!(
            catalog.find("Subscription").map(|i| i.price),
            Some(Price::from(100))
        );
        assert!(catalog.find("subscription").is_none());
    }

    #[test]
    fn test_contains_requires_matching_price() {
        let catalog = Catalog::default();
        assert!(catalog.contains(&Item::new("Laptop", Price::parse("1000.00").unwrap())));
        assert!(!catalog.contains(&Item::new("Laptop", Price::parse("1").unwrap())));
        assert!(!catalog.contains(&Item::new("Tablet", Price::from(1000))));
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = serde_json::to_value(Catalog::default()).unwrap();
        assert_eq!(json[0]["name"], "Laptop");
        assert_eq!(json[0]["price"], 1000.0);
        let parsed: Catalog =
            serde_json::from_str(r#"[{"name":"Pen","price":"1.50"}]"#).unwrap();
        assert_eq!(parsed.items()[0].price.to_string(), "1.50");
    }
}
