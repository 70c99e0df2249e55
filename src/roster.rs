//! Crew roster as reported by the astronaut-location API.
//!
//! The roster is a flat list of people tagged with the craft they are
//! aboard. Rendering and hit-testing work per craft, so the list is grouped
//! with the order of first appearance preserved.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub craft: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CrewRoster {
    pub number: u32,
    pub people: Vec<CrewMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CraftCrew {
    pub craft: String,
    pub crew: Vec<String>,
}

impl CrewRoster {
    pub fn craft_groups(&self) -> Vec<CraftCrew> {
        let mut groups: Vec<CraftCrew> = Vec::new();
        for person in &self.people {
            match groups.iter_mut().find(|g| g.craft == person.craft) {
                Some(group) => group.crew.push(person.name.clone()),
                None => groups.push(CraftCrew {
                    craft: person.craft.clone(),
                    crew: vec![person.name.clone()],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, craft: &str) -> CrewMember {
        CrewMember { name: name.to_string(), craft: craft.to_string() }
    }

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let roster = CrewRoster {
            number: 5,
            people: vec![
                member("Jasmin Moghbeli", "ISS"),
                member("Jing Haiping", "Tiangong"),
                member("Andreas Mogensen", "ISS"),
                member("Gui Haichao", "Tiangong"),
                member("Satoshi Furukawa", "ISS"),
            ],
        };

        let groups = roster.craft_groups();
        let crafts: Vec<&str> = groups.iter().map(|g| g.craft.as_str()).collect();
        assert_eq!(crafts, vec!["ISS", "Tiangong"]);
        assert_eq!(groups[0].crew, vec!["Jasmin Moghbeli", "Andreas Mogensen", "Satoshi Furukawa"]);
        assert_eq!(groups[1].crew, vec!["Jing Haiping", "Gui Haichao"]);
    }

    #[test]
    fn test_grouping_neither_drops_nor_duplicates() {
        let roster = CrewRoster {
            number: 4,
            people: vec![
                member("A", "Tiangong"),
                member("B", "ISS"),
                member("C", "Tiangong"),
                member("D", "Soyuz MS-24"),
            ],
        };

        let groups = roster.craft_groups();
        let mut names: Vec<String> = groups.iter().flat_map(|g| g.crew.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(groups[0].craft, "Tiangong");
        assert_eq!(groups[2].craft, "Soyuz MS-24");
    }

    #[test]
    fn test_empty_roster_has_no_groups() {
        let roster = CrewRoster { number: 0, people: Vec::new() };
        assert!(roster.craft_groups().is_empty());
    }

    #[test]
    fn test_api_payload_deserialization() {
        let json = r#"{
            "message": "success",
            "number": 2,
            "people": [
                {"craft": "ISS", "name": "Oleg Kononenko"},
                {"craft": "ISS", "name": "Nikolai Chub"}
            ]
        }"#;
        let roster: CrewRoster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.number, 2);
        assert_eq!(roster.people[1], member("Nikolai Chub", "ISS"));
    }
}
