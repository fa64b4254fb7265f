//! Parsing of reaction equations into species tokens.
//!
//! The equation is broken up into its species, each with a name, a charge and a
//! stoichiometric coefficient. The target species is always the first token and has
//! coefficient -1.0:
//! - association reaction (`association = true`): the target is the first species on
//!   the right hand side, "Fe+3 + e- = Fe+2" -> [Fe+2 -1, Fe+3 1, e- 1];
//! - dissociation of a mineral (`association = false`): the target is the first species
//!   on the left hand side, "CaCO3 = Ca+2 + CO3-2" -> [CaCO3 -1, Ca+2 1, CO3-2 1].
use crate::Reactions::balance_checker::check_eqn;
use crate::Reactions::element_accumulator::{ElementAccumulator, ElementEntry};
use crate::Reactions::errors::ReactionError;
use crate::Reactions::formula_tokenizer::ElementMode;
use crate::Reactions::species_term::{SpeciesRegistry, SpeciesTerm, parse_term, split_terms};
use crate::settings::ParserSettings;
use approx::abs_diff_eq;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// one species of a reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionToken {
    pub name: String,
    pub charge: f64,
    pub coefficient: f64,
}

/// parsed reaction equation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub equation: String,
    pub association: bool,
    /// target species first, coefficient -1.0
    pub tokens: Vec<ReactionToken>,
    /// number of species written on the left hand side
    pub lhs_count: usize,
    /// element composition of the target species
    pub target_elements: Vec<ElementEntry>,
}

/// reaction that passed the balance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedReaction {
    pub reaction: Reaction,
    /// combined elements of the whole reaction, all zero within tolerance
    pub elements: Vec<ElementEntry>,
}

// term as it is written in an equation: "2H2O", "OH-", "-OH-"
fn format_term(written: f64, name: &str) -> String {
    if abs_diff_eq!(written, 1.0, epsilon = 1e-12) {
        name.to_string()
    } else if abs_diff_eq!(written, -1.0, epsilon = 1e-12) {
        format!("-{}", name)
    } else {
        format!("{}{}", written, name)
    }
}

impl Reaction {
    pub fn target(&self) -> Option<&ReactionToken> {
        self.tokens.first()
    }

    pub fn species_names(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get_token(&self, name: &str) -> Option<&ReactionToken> {
        self.tokens.iter().find(|t| t.name == name)
    }

    /// true if the token with this index was written on the left hand side
    pub fn is_lhs(&self, index: usize) -> bool {
        if self.association {
            (1..=self.lhs_count).contains(&index)
        } else {
            index < self.lhs_count
        }
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("species"),
            Cell::new("charge"),
            Cell::new("coefficient"),
        ]));
        for token in &self.tokens {
            table.add_row(Row::new(vec![
                Cell::new(&token.name),
                Cell::new(&token.charge.to_string()),
                Cell::new(&token.coefficient.to_string()),
            ]));
        }
        println!("{}", self);
        table.printstd();
    }
}

impl fmt::Display for Reaction {
    /// normalized equation; parsing it again with the same flag gives the same tokens
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lhs: Vec<String> = Vec::new();
        let mut rhs: Vec<String> = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            let on_lhs = self.is_lhs(i);
            // association keeps lhs coefficients as written, mineral keeps rhs ones
            let written = if on_lhs == self.association {
                token.coefficient
            } else {
                -token.coefficient
            };
            let term = format_term(written, &token.name);
            if on_lhs {
                lhs.push(term);
            } else {
                rhs.push(term);
            }
        }
        write!(f, "{} = {}", lhs.join(" + "), rhs.join(" + "))
    }
}

/// Reaction equation parser.
///
/// Owns the species registry of its session; the element lists and parentheses
/// counters are created anew for every equation.
///
/// ```
/// use ReactBalance::Reactions::reaction_parser::EquationParser;
/// let mut parser = EquationParser::new();
/// let balanced = parser.parse_and_check("CaCO3 = Ca+2 + CO3-2", false).unwrap();
/// assert_eq!(balanced.reaction.tokens[0].name, "CaCO3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquationParser {
    pub settings: ParserSettings,
    pub mode: ElementMode,
    registry: SpeciesRegistry,
}

impl EquationParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ParserSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ElementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    fn accumulator(&self) -> ElementAccumulator {
        ElementAccumulator::new(self.mode).with_max_depth(self.settings.max_paren_depth)
    }

    /// Breaks the equation up into species tokens, target species first.
    ///
    /// Also computes the element composition of the target species. Species of the
    /// reaction are added to the registry; nothing is kept if the equation is malformed.
    pub fn parse(&mut self, equation: &str, association: bool) -> Result<Reaction, ReactionError> {
        let reaction = self.parse_reaction(equation, association)?;
        self.register(&reaction);
        Ok(reaction)
    }

    fn register(&mut self, reaction: &Reaction) {
        for token in &reaction.tokens {
            self.registry.get_or_create(&token.name, token.charge);
        }
    }

    fn parse_reaction(&self, equation: &str, association: bool) -> Result<Reaction, ReactionError> {
        let Some((lhs, rhs)) = equation.split_once('=') else {
            return Err(ReactionError::MissingEquals(equation.to_string()));
        };
        if lhs.trim().is_empty() {
            return Err(ReactionError::EmptySide {
                side: "left",
                equation: equation.to_string(),
            });
        }
        if rhs.trim().is_empty() {
            return Err(ReactionError::EmptySide {
                side: "right",
                equation: equation.to_string(),
            });
        }
        let lhs_terms = split_terms(lhs)?
            .iter()
            .map(|t| parse_term(t))
            .collect::<Result<Vec<SpeciesTerm>, ReactionError>>()?;
        let lhs_count = lhs_terms.len();
        let rhs_terms = split_terms(rhs)?
            .iter()
            .map(|t| parse_term(t))
            .collect::<Result<Vec<SpeciesTerm>, ReactionError>>()?;

        // association: lhs as written, rhs negated, first of rhs goes to the front
        // mineral: lhs negated, rhs as written, first of lhs stays in front
        let mut ordered: Vec<(SpeciesTerm, f64)> = Vec::with_capacity(lhs_terms.len() + rhs_terms.len());
        if association {
            let mut rhs_iter = rhs_terms.into_iter();
            if let Some(target) = rhs_iter.next() {
                ordered.push((target, -1.0));
            }
            ordered.extend(lhs_terms.into_iter().map(|t| (t, 1.0)));
            ordered.extend(rhs_iter.map(|t| (t, -1.0)));
        } else {
            ordered.extend(lhs_terms.into_iter().map(|t| (t, -1.0)));
            ordered.extend(rhs_terms.into_iter().map(|t| (t, 1.0)));
        }

        let (target, side_sign) = &ordered[0];
        let mut accumulator = self.accumulator();
        accumulator.add_species(&target.name, target.coefficient * side_sign)?;
        accumulator.combine();
        let target_elements: Vec<ElementEntry> = accumulator
            .into_elements()
            .into_iter()
            .map(|e| ElementEntry::new(&e.element, -e.coefficient))
            .collect();

        let tokens: Vec<ReactionToken> = ordered
            .into_iter()
            .map(|(term, side_sign)| ReactionToken {
                name: term.name,
                charge: term.charge,
                coefficient: term.coefficient * side_sign,
            })
            .collect();
        info!(
            "parsed equation '{}' into {} species, target {}",
            equation,
            tokens.len(),
            tokens[0].name
        );
        Ok(Reaction {
            equation: equation.to_string(),
            association,
            tokens,
            lhs_count,
            target_elements,
        })
    }

    /// Checks charge and mass balance of a parsed reaction,
    /// returns the combined element list
    pub fn check(&self, reaction: &Reaction) -> Result<Vec<ElementEntry>, ReactionError> {
        check_eqn(
            &reaction.tokens,
            reaction.association,
            &self.settings,
            self.mode,
        )
    }

    /// Parses and checks the equation; the registry is updated only for balanced ones
    pub fn parse_and_check(
        &mut self,
        equation: &str,
        association: bool,
    ) -> Result<BalancedReaction, ReactionError> {
        let reaction = self.parse_reaction(equation, association)?;
        let elements = self.check(&reaction)?;
        self.register(&reaction);
        Ok(BalancedReaction { reaction, elements })
    }

    /// Parses and checks every equation; one failure does not stop the others
    pub fn check_all(
        &mut self,
        equations: &[&str],
        association: bool,
    ) -> Vec<Result<BalancedReaction, ReactionError>> {
        let results: Vec<Result<BalancedReaction, ReactionError>> = equations
            .iter()
            .map(|equation| self.parse_and_check(equation, association))
            .collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!("{} of {} equations failed", failed, equations.len());
        } else {
            info!("all {} equations are balanced", equations.len());
        }
        results
    }
}
