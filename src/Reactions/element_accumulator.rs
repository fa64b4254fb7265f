use crate::Reactions::errors::ReactionError;
use crate::Reactions::formula_tokenizer::{ElementMode, is_element_start, read_element, read_number};
use approx::abs_diff_eq;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// upper limit of the parentheses nesting depth
pub const MAX_PAREN_DEPTH: usize = 256;

/// phase marks removed from species names before counting elements
const PHASE_MARKS: [&str; 4] = ["(s)", "(S)", "(g)", "(G)"];

/// Removes phase marks from a species name: "CO2(g)" -> "CO2", "Calcite(s)" -> "Calcite"
pub fn strip_phase_marks(species: &str) -> String {
    let mut stripped = species.to_string();
    for mark in PHASE_MARKS {
        stripped = stripped.replace(mark, "");
    }
    stripped
}

/// one element and its stoichiometric coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    pub element: String,
    pub coefficient: f64,
}

impl ElementEntry {
    pub fn new(element: &str, coefficient: f64) -> Self {
        Self {
            element: element.to_string(),
            coefficient,
        }
    }
    /// true if the coefficient is zero within tolerance
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        abs_diff_eq!(self.coefficient, 0.0, epsilon = tolerance)
    }
}

/// Merges entries with the same element name by summing their coefficients.
/// Order of first appearance is kept and zero sums are not removed.
pub fn combine_elements(elements: Vec<ElementEntry>) -> Vec<ElementEntry> {
    let mut combined: Vec<ElementEntry> = Vec::with_capacity(elements.len());
    let mut position: HashMap<String, usize> = HashMap::new();
    for entry in elements {
        match position.get(&entry.element) {
            Some(&i) => combined[i].coefficient += entry.coefficient,
            None => {
                position.insert(entry.element.clone(), combined.len());
                combined.push(entry);
            }
        }
    }
    combined
}

/// Working state of element accumulation for one reaction.
///
/// Collects (element, coefficient) pairs of all species added with `add_species`.
/// `paren_count` tracks the nesting of parentheses inside the species being scanned.
#[derive(Debug, Clone)]
pub struct ElementAccumulator {
    elements: Vec<ElementEntry>,
    paren_count: i32,
    mode: ElementMode,
    max_depth: usize,
}

impl ElementAccumulator {
    pub fn new(mode: ElementMode) -> Self {
        Self {
            elements: Vec::new(),
            paren_count: 0,
            mode,
            max_depth: 32,
        }
    }

    /// nesting deeper than `MAX_PAREN_DEPTH` is never allowed
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_PAREN_DEPTH);
        self
    }

    pub fn reset(&mut self) {
        self.elements.clear();
        self.paren_count = 0;
    }

    pub fn elements(&self) -> &[ElementEntry] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// merges duplicates in place, see `combine_elements`
    pub fn combine(&mut self) {
        let elements = std::mem::take(&mut self.elements);
        self.elements = combine_elements(elements);
    }

    pub fn into_elements(self) -> Vec<ElementEntry> {
        self.elements
    }

    /// Appends the elements of `species` multiplied by `coef`.
    ///
    /// Phase marks ("(s)", "(g)") are ignored. Scanning stops at the end of the formula
    /// or at the first `+`/`-` (the charge). On error nothing is appended.
    pub fn add_species(&mut self, species: &str, coef: f64) -> Result<(), ReactionError> {
        let start = self.elements.len();
        self.paren_count = 0;
        let species = strip_phase_marks(species);
        let species = species.as_str();
        let result = self.scan_species(species, coef);
        if result.is_err() {
            self.elements.truncate(start);
            self.paren_count = 0;
        } else {
            debug!(
                "elements of {} (x{}): {:?}",
                species,
                coef,
                &self.elements[start..]
            );
        }
        result
    }

    fn scan_species(&mut self, species: &str, coef: f64) -> Result<(), ReactionError> {
        if species == "e-" {
            self.elements.push(ElementEntry::new("e", coef));
            return Ok(());
        }
        if species.is_empty() {
            return Err(ReactionError::EmptyElement(species.to_string()));
        }
        self.scan_group(species, 0, coef)?;
        if self.paren_count != 0 {
            return Err(ReactionError::UnbalancedParentheses(species.to_string()));
        }
        Ok(())
    }

    // scans until the end of the current group, returns the position after it
    fn scan_group(
        &mut self,
        species: &str,
        mut pos: usize,
        coef: f64,
    ) -> Result<usize, ReactionError> {
        let bytes = species.as_bytes();
        // (index of first weighted entry, weight) for every colon in this group
        let mut colon_weights: Vec<(usize, f64)> = Vec::new();
        while pos < bytes.len() {
            let c = bytes[pos];
            if c == b'+' || c == b'-' {
                break;
            }
            if c == b')' {
                self.paren_count -= 1;
                if self.paren_count < 0 {
                    return Err(ReactionError::TooManyRightParentheses(species.to_string()));
                }
                self.apply_weights(&colon_weights);
                return Ok(pos + 1);
            }
            if is_element_start(species, pos) {
                let (element, consumed) = read_element(species, pos, self.mode)?;
                pos += consumed;
                let (subscript, consumed) = read_number(species, pos)?;
                pos += consumed;
                self.elements
                    .push(ElementEntry::new(&element, subscript * coef));
                continue;
            }
            if c == b'(' {
                let count = self.elements.len();
                if bytes.get(pos + 1) == Some(&b')') {
                    warn!("Empty parentheses in {}", species);
                }
                self.paren_count += 1;
                if self.paren_count as usize > self.max_depth {
                    return Err(ReactionError::NestingTooDeep {
                        species: species.to_string(),
                        depth: self.max_depth,
                    });
                }
                pos = self.scan_group(species, pos + 1, coef)?;
                let (multiplier, consumed) = read_number(species, pos)?;
                pos += consumed;
                for entry in self.elements[count..].iter_mut() {
                    entry.coefficient *= multiplier;
                }
                continue;
            }
            if c == b':' {
                let (weight, consumed) = read_number(species, pos + 1)?;
                pos += 1 + consumed;
                colon_weights.push((self.elements.len(), weight));
                continue;
            }
            let character = species[pos..].chars().next().unwrap_or('?');
            return Err(ReactionError::UnexpectedCharacter {
                species: species.to_string(),
                character,
            });
        }
        self.apply_weights(&colon_weights);
        Ok(pos)
    }

    fn apply_weights(&mut self, weights: &[(usize, f64)]) {
        for &(from, weight) in weights {
            for entry in self.elements[from..].iter_mut() {
                entry.coefficient *= weight;
            }
        }
    }
}

/// Combined element composition of a single species multiplied by `coef`.
///
/// ```
/// use ReactBalance::Reactions::element_accumulator::elements_in_species;
/// let elements = elements_in_species("Ca(OH)2", 1.0).unwrap();
/// assert_eq!(elements.len(), 3);
/// ```
pub fn elements_in_species(species: &str, coef: f64) -> Result<Vec<ElementEntry>, ReactionError> {
    let mut accumulator = ElementAccumulator::new(ElementMode::Primary);
    accumulator.add_species(species, coef)?;
    accumulator.combine();
    Ok(accumulator.into_elements())
}

/// Same as `elements_in_species` but oxidation-state tags are kept in the element names
pub fn secondary_elements_in_species(
    species: &str,
    coef: f64,
) -> Result<Vec<ElementEntry>, ReactionError> {
    let mut accumulator = ElementAccumulator::new(ElementMode::Secondary);
    accumulator.add_species(species, coef)?;
    accumulator.combine();
    Ok(accumulator.into_elements())
}
