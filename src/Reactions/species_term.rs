//! Terms of a reaction equation: stoichiometric coefficient, species name and charge.
//!
//! A side of an equation is split into terms on "+" preceded by whitespace, so the charge
//! signs inside species ("Ca+2", "H+") never split a term:
//! "2H+ + CO3-2" -> ["2H+", "CO3-2"]
use crate::Reactions::charge_parser::parse_charge;
use crate::Reactions::errors::ReactionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static TERM_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\+").expect("term separator pattern is valid"));

/// one parsed term: coefficient as written (1.0 if absent), canonical name, charge
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTerm {
    pub coefficient: f64,
    pub name: String,
    pub charge: f64,
}

/// Splits one side of an equation into terms with all whitespace removed.
pub fn split_terms(side: &str) -> Result<Vec<String>, ReactionError> {
    let mut terms = Vec::new();
    for piece in TERM_SEPARATOR.split(side) {
        let term: String = piece.chars().filter(|c| !c.is_whitespace()).collect();
        if term.is_empty() {
            return Err(ReactionError::EmptyTerm(side.trim().to_string()));
        }
        terms.push(term);
    }
    Ok(terms)
}

fn starts_species(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_alphabetic() || c == '(' || c == '[')
}

/// Splits the leading coefficient from a term.
/// Returns the coefficient and the byte length of the coefficient text.
pub fn read_coefficient(term: &str) -> Result<(f64, usize), ReactionError> {
    let mut chars = term.chars();
    let first = chars.next();
    let second = chars.next();
    let (sign, start) = match first {
        Some('+') => (1.0, 1),
        Some('-') => (-1.0, 1),
        _ => (1.0, 0),
    };
    // bare sign in front of a species: +-1
    if start == 1 && starts_species(second) {
        return Ok((sign, 1));
    }
    let body = &term[start..];
    let end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    if end == 0 {
        if start == 1 {
            return Err(ReactionError::IllegalConstruct(term.to_string()));
        }
        return Ok((1.0, 0));
    }
    let text = &body[..end];
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((sign * value, start + end)),
        _ => Err(ReactionError::NonNumericCoefficient(term[..start + end].to_string())),
    }
}

/// Position of the first "+" or "-" outside parentheses and brackets: start of the charge
pub fn charge_position(species: &str) -> Option<usize> {
    let mut depth: i32 = 0;
    for (i, c) in species.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '+' | '-' if depth <= 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Parses one whitespace-free term, e.g. "2H+", "0.5O2", "Fe++", "e-".
pub fn parse_term(term: &str) -> Result<SpeciesTerm, ReactionError> {
    if term.is_empty() {
        return Err(ReactionError::EmptyTerm(term.to_string()));
    }
    let (coefficient, consumed) = read_coefficient(term)?;
    let species = &term[consumed..];
    if !starts_species(species.chars().next()) {
        return Err(ReactionError::IllegalConstruct(term.to_string()));
    }
    let (base, annotation) = match charge_position(species) {
        Some(p) => species.split_at(p),
        None => (species, ""),
    };
    let charge = parse_charge(annotation)?;
    Ok(SpeciesTerm {
        coefficient,
        name: format!("{}{}", base, charge.text),
        charge: charge.value,
    })
}

/// a species known to the parser session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub charge: f64,
}

/// Name-keyed list of species met during one parser session.
/// A species is created on first reference and the same record is returned afterwards.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: Vec<Species>,
    index: HashMap<String, usize>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, name: &str, charge: f64) -> &Species {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.species.push(Species {
                    name: name.to_string(),
                    charge,
                });
                let i = self.species.len() - 1;
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &self.species[i]
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.index.get(name).map(|&i| &self.species[i])
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// species in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn clear(&mut self) {
        self.species.clear();
        self.index.clear();
    }
}
