use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// County keys
// ---------------------------------------------------------------------------

/// Normalized comparison key for a county name.
///
/// Trims, collapses runs of whitespace to one space and lowercases, so
/// `" Homa  bay"` and `"Homa Bay"` compare equal.
pub fn county_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

const KENYA_COUNTIES: [&str; 47] = [
    "Mombasa", "Kwale", "Kilifi", "Tana River", "Lamu", "Taita Taveta",
    "Garissa", "Wajir", "Mandera", "Marsabit", "Isiolo", "Meru", "Tharaka Nithi",
    "Embu", "Kitui", "Machakos", "Makueni", "Nyandarua", "Nyeri", "Kirinyaga",
    "Murang'a", "Kiambu", "Turkana", "West Pokot", "Samburu", "Trans Nzoia",
    "Uasin Gishu", "Elgeyo Marakwet", "Nandi", "Baringo", "Laikipia", "Nakuru",
    "Narok", "Kajiado", "Kericho", "Bomet", "Kakamega", "Vihiga", "Bungoma",
    "Busia", "Siaya", "Kisumu", "Homa Bay", "Migori", "Kisii", "Nyamira", "Nairobi",
];

// ---------------------------------------------------------------------------
// CountyRegistry
// ---------------------------------------------------------------------------

/// Immutable reference list of every county the programme covers.
///
/// Built once at start-up and handed to the engine by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyRegistry {
    /// county_key → canonical spelling.
    counties: BTreeMap<String, String>,
}

impl CountyRegistry {
    /// Build a registry from a list of names. Blank names are skipped and
    /// duplicates (by [`county_key`]) keep their first spelling.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counties = BTreeMap::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            counties
                .entry(county_key(name))
                .or_insert_with(|| name.to_string());
        }
        CountyRegistry { counties }
    }

    /// The 47 counties of Kenya.
    pub fn kenya() -> Self {
        Self::new(KENYA_COUNTIES)
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    /// Case- and whitespace-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.counties.contains_key(&county_key(name))
    }

    /// Registry spelling of `name`, if it is a known county.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.counties.get(&county_key(name)).map(String::as_str)
    }

    /// `(key, canonical name)` pairs ordered by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.counties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical names ordered by key (alphabetical, case-insensitive).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.counties.values().map(String::as_str)
    }
}

impl Default for CountyRegistry {
    fn default() -> Self {
        Self::kenya()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kenya_has_47_distinct_counties() {
        let reg = CountyRegistry::kenya();
        assert_eq!(reg.len(), 47);
        assert!(reg.contains("Nairobi"));
        assert!(reg.contains("murang'a"));
    }

    #[test]
    fn lookup_ignores_case_and_spacing() {
        let reg = CountyRegistry::kenya();
        assert_eq!(reg.canonical("  homa   BAY "), Some("Homa Bay"));
        assert_eq!(reg.canonical("Atlantis"), None);
    }

    #[test]
    fn duplicates_keep_first_spelling() {
        let reg = CountyRegistry::new(["Nairobi", "NAIROBI", " ", "Kisumu"]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.canonical("nairobi"), Some("Nairobi"));
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["Kisumu", "Nairobi"]);
    }
}
