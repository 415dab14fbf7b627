//! Unique table identifier assignment.
//!
//! A compiled query may reference the same table several times (self-joins
//! included). Every occurrence asks for a preferred identifier — its
//! explicit alias, or its bare table name — and the allocator resolves
//! collisions case-insensitively: explicit aliases outrank table-name
//! defaults, and colliding defaults are numbered in traversal order.

use std::collections::HashSet;

use indexmap::IndexMap;

/// One table occurrence's naming preference, in traversal order: the base
/// request first, then joins in linearized join-tree order.
#[derive(Debug, Clone)]
pub struct AliasPreference {
    /// The explicit alias if the user set one, else the bare table name.
    pub name: String,
    /// Whether `name` was user-chosen.
    pub explicit: bool,
}

impl AliasPreference {
    pub fn explicit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            explicit: true,
        }
    }

    pub fn table_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            explicit: false,
        }
    }
}

/// The allocator's output: pairwise case-insensitively distinct
/// identifiers, stable for a fixed input.
#[derive(Debug, Clone)]
pub struct AliasAllocation {
    /// Assigned identifier per input preference, in traversal order.
    pub assigned: Vec<String>,
    /// Requested explicit alias -> assigned identifier. Exact-case keys;
    /// when two occurrences request the same alias, the earlier-traversed
    /// one keeps the entry.
    pub renames: IndexMap<String, String>,
}

/// Assign a unique identifier to every occurrence.
///
/// A preferred identifier is granted unchanged unless it collides
/// (case-insensitively) with another preference. Within a colliding
/// group, the first-traversed explicit alias keeps the unsuffixed form;
/// every other member — all of them, when the group has no explicit
/// member at all — is renamed with the smallest integer suffix that
/// collides with nothing else, in traversal order.
pub fn assign(preferences: &[AliasPreference]) -> AliasAllocation {
    // Group by lowercased preferred name, preserving traversal order.
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (i, pref) in preferences.iter().enumerate() {
        groups.entry(pref.name.to_lowercase()).or_default().push(i);
    }

    // Every preferred name is reserved up front, so a suffixed form never
    // shadows a name that appears later in traversal order.
    let mut used: HashSet<String> = groups.keys().cloned().collect();

    let mut assigned = vec![String::new(); preferences.len()];
    for members in groups.values() {
        let winner = if members.len() == 1 {
            Some(members[0])
        } else {
            members.iter().copied().find(|&i| preferences[i].explicit)
        };

        for &i in members {
            if Some(i) == winner {
                assigned[i] = preferences[i].name.clone();
                continue;
            }
            let mut n = 1usize;
            assigned[i] = loop {
                let candidate = format!("{}{}", preferences[i].name, n);
                if used.insert(candidate.to_lowercase()) {
                    break candidate;
                }
                n += 1;
            };
        }
    }

    let mut renames = IndexMap::new();
    for (i, pref) in preferences.iter().enumerate() {
        if pref.explicit {
            renames
                .entry(pref.name.clone())
                .or_insert_with(|| assigned[i].clone());
        }
    }

    AliasAllocation { assigned, renames }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(allocation: &AliasAllocation) -> Vec<&str> {
        allocation.assigned.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_distinct_defaults_kept() {
        let allocation = assign(&[
            AliasPreference::table_name("countries"),
            AliasPreference::table_name("countryProfiles"),
            AliasPreference::table_name("continents"),
        ]);
        assert_eq!(
            names(&allocation),
            ["countries", "countryProfiles", "continents"]
        );
        assert!(allocation.renames.is_empty());
    }

    #[test]
    fn test_colliding_defaults_all_suffixed() {
        let allocation = assign(&[
            AliasPreference::table_name("persons"),
            AliasPreference::table_name("persons"),
            AliasPreference::table_name("persons"),
        ]);
        assert_eq!(names(&allocation), ["persons1", "persons2", "persons3"]);
    }

    #[test]
    fn test_explicit_beats_earlier_default() {
        // The default-named occurrence comes first in traversal order, yet
        // the explicit alias keeps the unsuffixed form.
        let allocation = assign(&[
            AliasPreference::table_name("countries"),
            AliasPreference::table_name("countryProfiles"),
            AliasPreference::explicit("COUNTRIES"),
        ]);
        assert_eq!(
            names(&allocation),
            ["countries1", "countryProfiles", "COUNTRIES"]
        );
        assert_eq!(allocation.renames.get("COUNTRIES").unwrap(), "COUNTRIES");
    }

    #[test]
    fn test_explicit_collides_with_later_default() {
        let allocation = assign(&[
            AliasPreference::explicit("CONTINENTS"),
            AliasPreference::table_name("countryProfiles"),
            AliasPreference::table_name("continents"),
        ]);
        assert_eq!(
            names(&allocation),
            ["CONTINENTS", "countryProfiles", "continents1"]
        );
    }

    #[test]
    fn test_explicit_vs_explicit_first_traversed_wins() {
        let allocation = assign(&[
            AliasPreference::explicit("c"),
            AliasPreference::explicit("C"),
        ]);
        assert_eq!(names(&allocation), ["c", "C1"]);
        assert_eq!(allocation.renames.get("c").unwrap(), "c");
        assert_eq!(allocation.renames.get("C").unwrap(), "C1");
    }

    #[test]
    fn test_suffix_skips_reserved_names() {
        // "persons1" is already somebody's preferred name: the suffixing
        // of the colliding "persons" pair must step over it.
        let allocation = assign(&[
            AliasPreference::table_name("persons"),
            AliasPreference::table_name("persons"),
            AliasPreference::table_name("persons1"),
        ]);
        assert_eq!(names(&allocation), ["persons2", "persons3", "persons1"]);
    }

    #[test]
    fn test_assigned_identifiers_are_case_insensitively_distinct() {
        let allocation = assign(&[
            AliasPreference::explicit("A"),
            AliasPreference::table_name("a"),
            AliasPreference::table_name("A1"),
            AliasPreference::table_name("a"),
        ]);
        let mut seen = std::collections::HashSet::new();
        for name in &allocation.assigned {
            assert!(seen.insert(name.to_lowercase()), "duplicate: {}", name);
        }
    }
}
