use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Chemical species identifier, stored upper-cased (`"ZN"`, `"MG"`, `"AL"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Species(String);

impl Species {
    /// Creates a species identifier, normalising case and whitespace.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the normalised symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Species {
    fn from(value: String) -> Self {
        Species::new(value)
    }
}

impl From<&str> for Species {
    fn from(value: &str) -> Self {
        Species::new(value)
    }
}

impl From<Species> for String {
    fn from(value: Species) -> Self {
        value.0
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phase identifier as named by the thermodynamic database (`"FCC_A1"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PhaseName(String);

impl PhaseName {
    /// Creates a phase identifier, normalising case and whitespace.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the normalised name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name is blank (the oracle reports unused vertices this way).
    pub fn is_blank(&self) -> bool {
        self.0.is_empty() || self.0 == "NAN"
    }
}

impl From<String> for PhaseName {
    fn from(value: String) -> Self {
        PhaseName::new(value)
    }
}

impl From<&str> for PhaseName {
    fn from(value: &str) -> Self {
        PhaseName::new(value)
    }
}

impl From<PhaseName> for String {
    fn from(value: PhaseName) -> Self {
        value.0
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mole (or weight) fractions keyed by species.
///
/// Only solute species are normally listed; the host element takes the
/// balance implicitly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition(BTreeMap<Species, f64>);

impl Composition {
    /// Creates an empty composition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fraction recorded for `species`, if any.
    pub fn get(&self, species: &Species) -> Option<f64> {
        self.0.get(species).copied()
    }

    /// Sets the fraction recorded for `species`.
    pub fn set(&mut self, species: Species, fraction: f64) {
        self.0.insert(species, fraction);
    }

    /// Builder-style variant of [`Composition::set`].
    pub fn with(mut self, species: impl Into<Species>, fraction: f64) -> Self {
        self.set(species.into(), fraction);
        self
    }

    /// Iterates over `(species, fraction)` pairs in species order.
    pub fn iter(&self) -> impl Iterator<Item = (&Species, f64)> + '_ {
        self.0.iter().map(|(species, fraction)| (species, *fraction))
    }

    /// Number of listed species.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no species are listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Species, f64)> for Composition {
    fn from_iter<I: IntoIterator<Item = (Species, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
