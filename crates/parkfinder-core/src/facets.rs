//! Filter facets: activity categories (optionally nested under a parent
//! group) and age groups.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetGroup {
    Categories,
    AgeGroups,
}

impl FacetGroup {
    pub const ALL: [FacetGroup; 2] = [FacetGroup::Categories, FacetGroup::AgeGroups];
}

impl std::fmt::Display for FacetGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacetGroup::Categories => write!(f, "categories"),
            FacetGroup::AgeGroups => write!(f, "age_groups"),
        }
    }
}

impl std::str::FromStr for FacetGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categories" => Ok(FacetGroup::Categories),
            "age_groups" => Ok(FacetGroup::AgeGroups),
            other => Err(format!(
                "unknown facet group \"{other}\"; expected categories or age_groups"
            )),
        }
    }
}

/// Tri-state of a checkbox that stands for a set of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckState {
    Unselected,
    Selected,
    Indeterminate,
}

impl CheckState {
    /// All children selected → `Selected`, some → `Indeterminate`,
    /// none (or no children) → `Unselected`.
    #[must_use]
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            CheckState::Selected
        } else if selected > 0 {
            CheckState::Indeterminate
        } else {
            CheckState::Unselected
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub name: String,
    /// Parent group shown as a collapsible toggle, e.g. "Aquatics".
    pub group: Option<String>,
}

/// The facet values a session can offer, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCatalog {
    categories: Vec<CategoryFacet>,
    age_groups: Vec<String>,
}

impl FacetCatalog {
    #[must_use]
    pub fn new(categories: Vec<CategoryFacet>, age_groups: Vec<String>) -> Self {
        Self {
            categories,
            age_groups,
        }
    }

    /// Facet values of `group` in display order.
    #[must_use]
    pub fn values(&self, group: FacetGroup) -> Vec<&str> {
        match group {
            FacetGroup::Categories => self.categories.iter().map(|c| c.name.as_str()).collect(),
            FacetGroup::AgeGroups => self.age_groups.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, group: FacetGroup, value: &str) -> bool {
        match group {
            FacetGroup::Categories => self.categories.iter().any(|c| c.name == value),
            FacetGroup::AgeGroups => self.age_groups.iter().any(|a| a == value),
        }
    }

    /// Distinct parent category groups in first-seen order.
    #[must_use]
    pub fn category_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for g in self.categories.iter().filter_map(|c| c.group.as_deref()) {
            if !groups.contains(&g) {
                groups.push(g);
            }
        }
        groups
    }

    /// Categories nested under the parent `group`.
    #[must_use]
    pub fn children_of(&self, group: &str) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.group.as_deref() == Some(group))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Parent group of `category`, if it has one.
    #[must_use]
    pub fn group_of(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .and_then(|c| c.group.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FacetCatalog {
        FacetCatalog::new(
            vec![
                CategoryFacet {
                    name: "Swimming".into(),
                    group: Some("Aquatics".into()),
                },
                CategoryFacet {
                    name: "Diving".into(),
                    group: Some("Aquatics".into()),
                },
                CategoryFacet {
                    name: "Chess".into(),
                    group: None,
                },
                CategoryFacet {
                    name: "Soccer".into(),
                    group: Some("Sports".into()),
                },
            ],
            vec!["Youth".into(), "Adult".into()],
        )
    }

    #[test]
    fn check_state_from_counts() {
        assert_eq!(CheckState::from_counts(0, 3), CheckState::Unselected);
        assert_eq!(CheckState::from_counts(2, 3), CheckState::Indeterminate);
        assert_eq!(CheckState::from_counts(3, 3), CheckState::Selected);
        assert_eq!(CheckState::from_counts(0, 0), CheckState::Unselected);
    }

    #[test]
    fn category_groups_are_distinct_in_order() {
        assert_eq!(catalog().category_groups(), ["Aquatics", "Sports"]);
    }

    #[test]
    fn children_of_group() {
        assert_eq!(catalog().children_of("Aquatics"), ["Swimming", "Diving"]);
        assert!(catalog().children_of("Nope").is_empty());
    }

    #[test]
    fn group_of_category() {
        let c = catalog();
        assert_eq!(c.group_of("Diving"), Some("Aquatics"));
        assert_eq!(c.group_of("Chess"), None);
    }

    #[test]
    fn facet_group_round_trips_through_str() {
        for g in FacetGroup::ALL {
            assert_eq!(g.to_string().parse::<FacetGroup>().unwrap(), g);
        }
        assert!("colors".parse::<FacetGroup>().is_err());
    }
}
