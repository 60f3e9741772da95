//! Facet filtering over a working set of characters.
//!
//! Facets are configuration, not code: each [`FacetDefinition`] names a key,
//! a label and an [`Extractor`] whose variant fixes the facet's cardinality.
//! One generic implementation of option derivation and matching consumes the
//! list, so adding a facet means adding a definition.
//!
//! Rules shared by every facet:
//! - A facet with an empty selection imposes no constraint.
//! - Unavailable values (absent or `"n/a"`) never match a non-empty selection
//!   and are never offered as options.
//! - Facets combine with logical AND.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{Character, is_available};
use crate::{Error, Result};

pub const GENDER: &str = "gender";
pub const EYE_COLOR: &str = "eye-color";
pub const SPECIES: &str = "species";
pub const FILM: &str = "film";

/// How many values a facet yields per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

/// Pulls a facet's value(s) out of a character.
#[derive(Clone, Copy)]
pub enum Extractor {
    Single(fn(&Character) -> Option<&str>),
    Multi(fn(&Character) -> Vec<&str>),
}

impl Extractor {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Extractor::Single(_) => Cardinality::Single,
            Extractor::Multi(_) => Cardinality::Multi,
        }
    }

    /// Available values of this facet for one character.
    fn values<'a>(&self, character: &'a Character) -> Vec<&'a str> {
        match self {
            Extractor::Single(get) => get(character)
                .into_iter()
                .filter(|value| is_available(*value))
                .collect(),
            Extractor::Multi(get) => get(character)
                .into_iter()
                .filter(|value| is_available(*value))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Extractor::{:?}", self.cardinality())
    }
}

/// One filterable dimension.
#[derive(Debug, Clone)]
pub struct FacetDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub extractor: Extractor,
}

impl FacetDefinition {
    pub fn single(
        key: &'static str,
        label: &'static str,
        get: fn(&Character) -> Option<&str>,
    ) -> Self {
        Self {
            key,
            label,
            extractor: Extractor::Single(get),
        }
    }

    pub fn multi(key: &'static str, label: &'static str, get: fn(&Character) -> Vec<&str>) -> Self {
        Self {
            key,
            label,
            extractor: Extractor::Multi(get),
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        self.extractor.cardinality()
    }

    /// Whether a character satisfies `selected` on this facet.
    fn accepts(&self, character: &Character, selected: &BTreeSet<String>) -> bool {
        if selected.is_empty() {
            return true;
        }
        self.extractor
            .values(character)
            .into_iter()
            .any(|value| selected.contains(value))
    }
}

/// The facets the overview offers out of the box.
pub fn default_facets() -> Vec<FacetDefinition> {
    vec![
        FacetDefinition::single(GENDER, "Gender", |c| c.gender.as_deref()),
        FacetDefinition::single(EYE_COLOR, "Eye Color", |c| c.eye_color.as_deref()),
        FacetDefinition::single(SPECIES, "Species", |c| c.species_name()),
        FacetDefinition::multi(FILM, "Film", |c| c.film_titles()),
    ]
}

/// Currently chosen option values per facet key.
///
/// An empty set means the facet is inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    values: BTreeMap<String, BTreeSet<String>>,
}

impl Selection {
    /// An all-empty selection covering every facet of `engine`.
    pub fn for_engine(engine: &FilterEngine) -> Self {
        let values = engine
            .facets()
            .iter()
            .map(|facet| (facet.key.to_string(), BTreeSet::new()))
            .collect();
        Self { values }
    }

    /// Replace the selection for `key`.
    pub fn set<I, T>(&mut self, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| Error::UnknownFacet(key.to_string()))?;
        *slot = values.into_iter().map(Into::into).collect();
        Ok(())
    }

    /// Add or remove a single value for `key`. Returns true if now selected.
    pub fn toggle(&mut self, key: &str, value: &str) -> Result<bool> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| Error::UnknownFacet(key.to_string()))?;
        if slot.remove(value) {
            Ok(false)
        } else {
            slot.insert(value.to_string());
            Ok(true)
        }
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.values.get(key)
    }

    /// Selected values for `key` in sorted order (empty if inactive or unknown).
    pub fn values_for(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// True when no facet constrains the working set.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeSet::is_empty)
    }

    pub fn clear(&mut self) {
        for slot in self.values.values_mut() {
            slot.clear();
        }
    }
}

/// Evaluates facet selections against characters.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    facets: Vec<FacetDefinition>,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(default_facets())
    }
}

impl FilterEngine {
    pub fn new(facets: Vec<FacetDefinition>) -> Self {
        Self { facets }
    }

    pub fn facets(&self) -> &[FacetDefinition] {
        &self.facets
    }

    pub fn facet(&self, key: &str) -> Result<&FacetDefinition> {
        self.facets
            .iter()
            .find(|facet| facet.key == key)
            .ok_or_else(|| Error::UnknownFacet(key.to_string()))
    }

    /// Distinct available values of `key` across `working_set`, in first-observed order.
    pub fn options_for<'a, I>(&self, key: &str, working_set: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a Character>,
    {
        let facet = self.facet(key)?;
        Ok(collect_options(facet, working_set))
    }

    /// True if `character` passes every active facet of `selection`.
    pub fn matches(&self, character: &Character, selection: &Selection) -> bool {
        self.facets.iter().all(|facet| match selection.get(facet.key) {
            Some(selected) => facet.accepts(character, selected),
            None => true,
        })
    }

    /// The order-preserving subsequence of `working_set` that passes `selection`.
    pub fn apply<'a, I>(&self, selection: &Selection, working_set: I) -> Vec<&'a Character>
    where
        I: IntoIterator<Item = &'a Character>,
    {
        working_set
            .into_iter()
            .filter(|character| self.matches(character, selection))
            .collect()
    }
}

fn collect_options<'a, I>(facet: &FacetDefinition, working_set: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Character>,
{
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for character in working_set {
        for value in facet.extractor.values(character) {
            if seen.insert(value) {
                options.push(value.to_string());
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luke() -> Character {
        Character::new("1", "Luke Skywalker")
            .with_gender("male")
            .with_eye_color("blue")
            .with_species("Human")
            .with_films(["A New Hope"])
    }

    fn leia() -> Character {
        Character::new("2", "Leia Organa")
            .with_gender("female")
            .with_eye_color("blue")
            .with_films(["A New Hope", "Return of the Jedi"])
    }

    fn r2d2() -> Character {
        Character::new("3", "R2-D2")
            .with_gender("n/a")
            .with_eye_color("red")
            .with_species("Droid")
            .with_films(["A New Hope", "Return of the Jedi"])
    }

    fn cast() -> Vec<Character> {
        vec![luke(), leia(), r2d2()]
    }

    fn ids(characters: &[&Character]) -> Vec<String> {
        characters.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_film_selection_matches_multi_valued_facet() {
        let engine = FilterEngine::default();
        let characters = vec![luke(), leia()];
        let mut selection = Selection::for_engine(&engine);
        selection.set(FILM, ["Return of the Jedi"]).unwrap();

        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["2"]);
    }

    #[test]
    fn test_empty_selection_returns_working_set() {
        let engine = FilterEngine::default();
        let characters = cast();
        let selection = Selection::for_engine(&engine);

        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(EYE_COLOR, ["blue"]).unwrap();
        selection.set(GENDER, ["female"]).unwrap();

        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["2"]);
    }

    #[test]
    fn test_values_within_facet_combine_with_or() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(EYE_COLOR, ["red", "blue"]).unwrap();

        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_missing_field_never_matches_active_facet() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(SPECIES, ["Human", "Droid"]).unwrap();

        // Leia has no species reference
        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["1", "3"]);
    }

    #[test]
    fn test_sentinel_value_never_matches() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(GENDER, ["n/a"]).unwrap();

        assert!(engine.apply(&selection, &characters).is_empty());
    }

    #[test]
    fn test_missing_field_passes_inactive_facet() {
        let engine = FilterEngine::default();
        let bare = Character::new("9", "Nobody");
        let selection = Selection::for_engine(&engine);

        assert!(engine.matches(&bare, &selection));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(FILM, ["Return of the Jedi"]).unwrap();

        let first = ids(&engine.apply(&selection, &characters));
        let second = ids(&engine.apply(&selection, &characters));
        assert_eq!(first, second);
    }

    #[test]
    fn test_widening_selection_keeps_matches() {
        let engine = FilterEngine::default();
        let characters = cast();
        let mut selection = Selection::for_engine(&engine);
        selection.set(EYE_COLOR, ["red"]).unwrap();
        let narrow = ids(&engine.apply(&selection, &characters));

        selection.set(EYE_COLOR, ["red", "blue"]).unwrap();
        let wide = ids(&engine.apply(&selection, &characters));

        assert!(narrow.iter().all(|id| wide.contains(id)));
    }

    #[test]
    fn test_options_first_observed_and_deduplicated() {
        let engine = FilterEngine::default();
        let characters = cast();

        assert_eq!(
            engine.options_for(EYE_COLOR, &characters).unwrap(),
            vec!["blue", "red"]
        );
        assert_eq!(
            engine.options_for(FILM, &characters).unwrap(),
            vec!["A New Hope", "Return of the Jedi"]
        );
    }

    #[test]
    fn test_options_drop_unavailable_values() {
        let engine = FilterEngine::default();
        let characters = cast();

        assert_eq!(engine.options_for(GENDER, &characters).unwrap(), vec!["male", "female"]);
        assert_eq!(
            engine.options_for(SPECIES, &characters).unwrap(),
            vec!["Human", "Droid"]
        );
    }

    #[test]
    fn test_options_for_unknown_facet_is_error() {
        let engine = FilterEngine::default();
        let err = engine.options_for("hair-color", &cast()).unwrap_err();
        assert!(matches!(err, Error::UnknownFacet(key) if key == "hair-color"));
    }

    #[test]
    fn test_selection_rejects_unknown_facet() {
        let engine = FilterEngine::default();
        let mut selection = Selection::for_engine(&engine);
        assert!(selection.set("hair-color", ["blond"]).is_err());
        assert!(selection.toggle("hair-color", "blond").is_err());
    }

    #[test]
    fn test_selection_toggle() {
        let engine = FilterEngine::default();
        let mut selection = Selection::for_engine(&engine);

        assert!(selection.toggle(GENDER, "male").unwrap());
        assert_eq!(selection.values_for(GENDER), vec!["male"]);
        assert!(!selection.toggle(GENDER, "male").unwrap());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_clear() {
        let engine = FilterEngine::default();
        let mut selection = Selection::for_engine(&engine);
        selection.set(GENDER, ["male"]).unwrap();
        selection.set(FILM, ["A New Hope"]).unwrap();

        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.get(FILM).is_some());
    }

    #[test]
    fn test_custom_facet_is_a_data_change() {
        let mut facets = default_facets();
        facets.push(FacetDefinition::single("homeworld", "Homeworld", |c| {
            c.homeworld_name()
        }));
        let engine = FilterEngine::new(facets);
        let characters = vec![luke().with_homeworld("Tatooine"), leia().with_homeworld("Alderaan")];

        let mut selection = Selection::for_engine(&engine);
        selection.set("homeworld", ["Alderaan"]).unwrap();

        assert_eq!(ids(&engine.apply(&selection, &characters)), vec!["2"]);
        assert_eq!(
            engine.options_for("homeworld", &characters).unwrap(),
            vec!["Tatooine", "Alderaan"]
        );
    }

    #[test]
    fn test_default_facet_cardinality() {
        let engine = FilterEngine::default();
        assert_eq!(engine.facet(GENDER).unwrap().cardinality(), Cardinality::Single);
        assert_eq!(engine.facet(FILM).unwrap().cardinality(), Cardinality::Multi);
    }
}
