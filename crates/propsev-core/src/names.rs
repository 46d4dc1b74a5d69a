// Name resolution: maps feed spellings onto canonical registry names.

use crate::registry::Registry;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// Known feed spellings and the roster spelling they stand for.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    // initials
    ("AJ Dillon", "A.J. Dillon"),
    ("AJ Brown", "A.J. Brown"),
    ("DJ Moore", "D.J. Moore"),
    ("DJ Chark", "D.J. Chark"),
    ("D.K. Metcalf", "DK Metcalf"),
    ("JK Dobbins", "J.K. Dobbins"),
    ("TJ Hockenson", "T.J. Hockenson"),
    ("CJ Stroud", "C.J. Stroud"),
    ("KJ Osborn", "K.J. Osborn"),
    // generational suffixes
    ("Kenneth Walker", "Kenneth Walker III"),
    ("Michael Pittman", "Michael Pittman Jr."),
    ("Travis Etienne", "Travis Etienne Jr."),
    ("Brian Robinson", "Brian Robinson Jr."),
    ("Odell Beckham", "Odell Beckham Jr."),
    ("Marvin Harrison", "Marvin Harrison Jr."),
    ("Jeff Wilson", "Jeff Wilson Jr."),
    ("Pierre Strong", "Pierre Strong Jr."),
    ("Patrick Mahomes", "Patrick Mahomes II"),
    ("Deebo Samuel Sr.", "Deebo Samuel"),
    ("Melvin Gordon III", "Melvin Gordon"),
    // punctuation
    ("Amon-Ra St Brown", "Amon-Ra St. Brown"),
    ("Equanimeous St Brown", "Equanimeous St. Brown"),
    // nicknames and misspellings
    ("Gabe Davis", "Gabriel Davis"),
    ("Josh Palmer", "Joshua Palmer"),
    ("Chig Okonkwo", "Chigoziem Okonkwo"),
    ("Hollywood Brown", "Marquise Brown"),
    ("Mitch Trubisky", "Mitchell Trubisky"),
    ("Robbie Anderson", "Robbie Chosen"),
    ("Cedrick Wilson", "Cedrick Wilson Jr."),
    ("Darrell Henderson", "Darrell Henderson Jr."),
];

/// Players who still appear in feeds but are not worth reporting.
const DEFAULT_SKIP: &[&str] = &["Dalvin Cook", "Leonard Fournette", "Kareem Hunt", "Julio Jones"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Outcome of resolving a raw feed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical registry name.
    Player(String),
    /// Known-irrelevant name; drop silently.
    Skip,
    /// Not in the registry even after aliasing.
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum NameTableError {
    #[error("alias `{alias}` has an empty or self-referential target")]
    InvalidTarget { alias: String },
}

/// Shared alias table plus skip-list, built once at startup and used by
/// every source adapter.
#[derive(Debug, Clone)]
pub struct NameResolver {
    aliases: HashMap<String, String>,
    skip: HashSet<String>,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            skip: DEFAULT_SKIP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NameResolver {
    /// Resolver with no aliases and an empty skip-list.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
            skip: HashSet::new(),
        }
    }

    /// Add or replace aliases. Keys and targets are whitespace-normalized.
    pub fn extend_aliases<I, K, V>(&mut self, aliases: I) -> Result<(), NameTableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (alias, target) in aliases {
            let alias = normalize_name(alias.as_ref());
            let target = normalize_name(target.as_ref());
            if target.is_empty() || target == alias {
                return Err(NameTableError::InvalidTarget { alias });
            }
            self.aliases.insert(alias, target);
        }
        Ok(())
    }

    pub fn extend_skip<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip
            .extend(names.into_iter().map(|n| normalize_name(n.as_ref())));
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skip.len()
    }

    /// Aliases whose key is already a roster name, sorted. `resolve` never
    /// applies these, since the roster spelling wins.
    pub fn shadowed_aliases(&self, registry: &Registry) -> Vec<&str> {
        let mut shadowed: Vec<&str> = self
            .aliases
            .keys()
            .map(String::as_str)
            .filter(|a| registry.contains(a))
            .collect();
        shadowed.sort_unstable();
        shadowed
    }

    /// Alias substitution (unless the name is already a roster name), then
    /// skip-list, then registry existence.
    pub fn resolve(&self, raw_name: &str, registry: &Registry) -> Resolution {
        let normalized = normalize_name(raw_name);
        let name = if registry.contains(&normalized) {
            normalized
        } else {
            self.aliases.get(&normalized).cloned().unwrap_or(normalized)
        };

        if self.skip.contains(&name) {
            return Resolution::Skip;
        }
        if registry.contains(&name) {
            Resolution::Player(name)
        } else {
            Resolution::Unknown
        }
    }
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
