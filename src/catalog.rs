// Service Catalog - static list of offerings shown on the second wizard step

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable identifier of a catalog entry (e.g. `web-dev`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: ServiceId,
    pub display_name: String,
    /// Icon reference understood by the presentation layer
    pub icon: String,
}

impl ServiceOption {
    pub fn new(id: &str, display_name: &str, icon: &str) -> Self {
        Self {
            id: ServiceId::new(id),
            display_name: display_name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Ordered, immutable sequence of service offerings.
///
/// Display order is the insertion order; it is also the order used when
/// selected ids are turned back into names for the outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    options: Vec<ServiceOption>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::new(vec![
            ServiceOption::new("web-dev", "Web Development", "globe"),
            ServiceOption::new("app-dev", "Mobile App Development", "smartphone"),
            ServiceOption::new("ui-ux", "UI/UX Design", "palette"),
            ServiceOption::new("ecommerce", "E-commerce Solutions", "shopping-cart"),
            ServiceOption::new("digital-marketing", "Digital Marketing", "megaphone"),
            ServiceOption::new("seo", "SEO Optimization", "search"),
            ServiceOption::new("cloud", "Cloud Solutions", "cloud"),
            ServiceOption::new("ai-ml", "AI & Machine Learning", "cpu"),
        ])
    }
}

impl ServiceCatalog {
    /// Build a catalog; later duplicates of an id are dropped so ids stay unique.
    pub fn new(options: Vec<ServiceOption>) -> Self {
        let mut seen = BTreeSet::new();
        let options = options
            .into_iter()
            .filter(|option| seen.insert(option.id.clone()))
            .collect();
        Self { options }
    }

    pub fn options(&self) -> &[ServiceOption] {
        &self.options
    }

    pub fn get(&self, id: &ServiceId) -> Option<&ServiceOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    pub fn contains(&self, id: &ServiceId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Display names of the selected ids, in catalog order.
    pub fn names_for(&self, selected: &BTreeSet<ServiceId>) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| selected.contains(&option.id))
            .map(|option| option.display_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_unique_ids() {
        let catalog = ServiceCatalog::default();
        let ids: BTreeSet<_> = catalog.options().iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.contains(&ServiceId::from("web-dev")));
    }

    #[test]
    fn test_names_follow_catalog_order_not_selection_order() {
        let catalog = ServiceCatalog::default();
        let mut selected = BTreeSet::new();
        selected.insert(ServiceId::from("seo"));
        selected.insert(ServiceId::from("app-dev"));
        selected.insert(ServiceId::from("web-dev"));

        assert_eq!(
            catalog.names_for(&selected),
            vec!["Web Development", "Mobile App Development", "SEO Optimization"]
        );
    }

    #[test]
    fn test_unknown_ids_are_skipped_when_naming() {
        let catalog = ServiceCatalog::default();
        let mut selected = BTreeSet::new();
        selected.insert(ServiceId::from("blockchain"));
        assert!(catalog.names_for(&selected).is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first_entry() {
        let catalog = ServiceCatalog::new(vec![
            ServiceOption::new("a", "First", "x"),
            ServiceOption::new("a", "Second", "y"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&ServiceId::from("a")).unwrap().display_name, "First");
    }
}
