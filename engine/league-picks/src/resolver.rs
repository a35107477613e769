//! Element id to display value resolution

use crate::models::{Bootstrap, Position, ResolvedPick};
use std::collections::HashMap;

/// Lookup tables from element id to name, team code and position label
#[derive(Debug, Clone, Default)]
pub struct ElementResolver {
    names: HashMap<u32, String>,
    teams: HashMap<u32, String>,
    positions: HashMap<u32, String>,
}

impl ElementResolver {
    /// Build the lookup tables from reference data
    pub fn from_bootstrap(bootstrap: &Bootstrap) -> Self {
        let team_codes: HashMap<u32, &str> =
            bootstrap.teams.iter().map(|t| (t.id, t.short_name.as_str())).collect();

        let mut resolver = Self::default();
        for element in &bootstrap.elements {
            let name = format!("{} {}", element.first_name, element.second_name).trim().to_string();
            let team = team_codes.get(&element.team).copied().unwrap_or_default().to_string();
            let position = Position::from_element_type(element.element_type)
                .map(|p| p.label())
                .unwrap_or_default()
                .to_string();

            resolver.names.insert(element.id, name);
            resolver.teams.insert(element.id, team);
            resolver.positions.insert(element.id, position);
        }

        resolver
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the element appears in the reference data
    pub fn contains(&self, element_id: u32) -> bool {
        self.names.contains_key(&element_id)
    }

    /// Player name, or `Element <id>` for unknown ids
    pub fn name(&self, element_id: u32) -> String {
        self.names.get(&element_id).cloned().unwrap_or_else(|| format!("Element {}", element_id))
    }

    /// Team short code, empty for unknown ids
    pub fn team(&self, element_id: u32) -> String {
        self.teams.get(&element_id).cloned().unwrap_or_default()
    }

    /// Position label, empty for unknown ids or element types
    pub fn position(&self, element_id: u32) -> String {
        self.positions.get(&element_id).cloned().unwrap_or_default()
    }

    pub fn resolve(&self, element_id: u32) -> ResolvedPick {
        ResolvedPick {
            player: self.name(element_id),
            team: self.team(element_id),
            position: self.position(element_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, Team};

    fn element(id: u32, first: &str, second: &str, element_type: u8, team: u32) -> Element {
        Element {
            id,
            first_name: first.to_string(),
            second_name: second.to_string(),
            element_type,
            team,
        }
    }

    fn bootstrap() -> Bootstrap {
        Bootstrap {
            elements: vec![
                element(10, "Alice", "Smith", 3, 1),
                element(11, "", "Rodri", 2, 2),
                element(12, "Bob", "Jones", 9, 99),
            ],
            teams: vec![
                Team { id: 1, short_name: "ARS".to_string() },
                Team { id: 2, short_name: "MCI".to_string() },
            ],
            events: vec![],
        }
    }

    #[test]
    fn test_resolves_known_element() {
        let resolver = ElementResolver::from_bootstrap(&bootstrap());
        assert_eq!(resolver.len(), 3);
        assert_eq!(
            resolver.resolve(10),
            ResolvedPick {
                player: "Alice Smith".to_string(),
                team: "ARS".to_string(),
                position: "MID".to_string(),
            }
        );
    }

    #[test]
    fn test_name_is_trimmed() {
        let resolver = ElementResolver::from_bootstrap(&bootstrap());
        assert_eq!(resolver.name(11), "Rodri");
        assert_eq!(resolver.position(11), "DEF");
    }

    #[test]
    fn test_unknown_type_and_team_map_to_empty() {
        let resolver = ElementResolver::from_bootstrap(&bootstrap());
        assert_eq!(resolver.name(12), "Bob Jones");
        assert_eq!(resolver.team(12), "");
        assert_eq!(resolver.position(12), "");
    }

    #[test]
    fn test_unknown_element_falls_back_to_placeholder() {
        let resolver = ElementResolver::from_bootstrap(&bootstrap());
        let pick = resolver.resolve(404);
        assert_eq!(pick.player, "Element 404");
        assert_eq!(pick.team, "");
        assert_eq!(pick.position, "");
        assert!(!resolver.contains(404));
        assert!(resolver.contains(10));
    }
}
