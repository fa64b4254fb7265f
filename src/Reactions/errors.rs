//! Error types of the reaction parser.
//!
//! Every failure of parsing or balance checking is a `ReactionError`. Balance failures
//! carry a `BalanceReport` with all the imbalances found by one check, not only the first one.
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// broad class of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// malformed equation, coefficient, charge or element
    Syntax,
    /// parentheses mismatch
    Structural,
    /// charge or mass imbalance
    Semantic,
    /// number does not convert or overflows
    Numeric,
    /// bad settings file
    Settings,
}

/// one imbalance found by the balance checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Imbalance {
    /// sum of coefficient*charge over all species, right - left
    Charge { residual: f64 },
    /// sum of coefficient*count for one element, right - left
    Mass { element: String, residual: f64 },
}

impl Imbalance {
    pub fn residual(&self) -> f64 {
        match self {
            Imbalance::Charge { residual } => *residual,
            Imbalance::Mass { residual, .. } => *residual,
        }
    }
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imbalance::Charge { residual } => write!(
                f,
                "Equation is not charge balanced, right - left = {:7.4} moles charge",
                residual
            ),
            Imbalance::Mass { element, residual } => write!(
                f,
                "Equation does not balance for element, {}: right - left = {:7.4} moles",
                element, residual
            ),
        }
    }
}

/// all imbalances of one equation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceReport {
    pub imbalances: Vec<Imbalance>,
}

impl BalanceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, imbalance: Imbalance) {
        self.imbalances.push(imbalance);
    }

    pub fn is_empty(&self) -> bool {
        self.imbalances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imbalances.len()
    }

    /// charge residual if the equation is not charge balanced
    pub fn charge_residual(&self) -> Option<f64> {
        self.imbalances.iter().find_map(|imbalance| match imbalance {
            Imbalance::Charge { residual } => Some(*residual),
            _ => None,
        })
    }

    /// residual of a given element if the element does not balance
    pub fn mass_residual(&self, element: &str) -> Option<f64> {
        self.imbalances.iter().find_map(|imbalance| match imbalance {
            Imbalance::Mass {
                element: name,
                residual,
            } if name == element => Some(*residual),
            _ => None,
        })
    }

    /// names of all elements that do not balance
    pub fn unbalanced_elements(&self) -> Vec<&str> {
        self.imbalances
            .iter()
            .filter_map(|imbalance| match imbalance {
                Imbalance::Mass { element, .. } => Some(element.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("imbalance"), Cell::new("right - left")]));
        for imbalance in &self.imbalances {
            let what = match imbalance {
                Imbalance::Charge { .. } => "charge".to_string(),
                Imbalance::Mass { element, .. } => element.clone(),
            };
            table.add_row(Row::new(vec![
                Cell::new(&what),
                Cell::new(&format!("{:.4}", imbalance.residual())),
            ]));
        }
        table.printstd();
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.imbalances.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// error types of the reaction parser and balance checker
#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("Equation has no '=' separating reactants and products: {0}")]
    MissingEquals(String),
    #[error("Equation has an empty {side} side: {equation}")]
    EmptySide { side: &'static str, equation: String },
    #[error("Empty term in equation: {0}")]
    EmptyTerm(String),
    #[error("Illegal equation construct detected: {0}")]
    IllegalConstruct(String),
    #[error("Error converting coefficient, {0}")]
    NonNumericCoefficient(String),
    #[error("Character string for charge does not start with + or -, {0}")]
    ChargeSign(String),
    #[error("Error in character string for charge, {0}")]
    ChargeString(String),
    #[error("Error converting number, {0}")]
    NumericConversion(String),
    #[error("Empty string in element name. Expected an element name, {0}")]
    EmptyElement(String),
    #[error("Did not find ending bracket (]) for element name, {0}")]
    UnterminatedBracket(String),
    #[error("Parsing error in species {species}, unexpected character, {character}")]
    UnexpectedCharacter { species: String, character: char },
    #[error("Too many right parentheses, {0}")]
    TooManyRightParentheses(String),
    #[error("Unbalanced parentheses, {0}")]
    UnbalancedParentheses(String),
    #[error("Parentheses nested deeper than {depth} levels, {species}")]
    NestingTooDeep { species: String, depth: usize },
    #[error("Coefficient of first species on rhs is not equal to 1.0, found {0}")]
    FirstCoefficientAssociation(f64),
    #[error("Coefficient of mineral (first on lhs) is not equal to 1.0, found {0}")]
    FirstCoefficientMineral(f64),
    #[error("Equation has no species")]
    NoSpecies,
    #[error("{0}")]
    Unbalanced(BalanceReport),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Settings file error: {0}")]
    SettingsIo(#[from] std::io::Error),
    #[error("Settings format error: {0}")]
    SettingsFormat(#[from] serde_json::Error),
}

impl ReactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReactionError::MissingEquals(_)
            | ReactionError::EmptySide { .. }
            | ReactionError::EmptyTerm(_)
            | ReactionError::IllegalConstruct(_)
            | ReactionError::ChargeSign(_)
            | ReactionError::ChargeString(_)
            | ReactionError::EmptyElement(_)
            | ReactionError::UnterminatedBracket(_)
            | ReactionError::UnexpectedCharacter { .. }
            | ReactionError::NoSpecies => ErrorKind::Syntax,
            ReactionError::TooManyRightParentheses(_)
            | ReactionError::UnbalancedParentheses(_)
            | ReactionError::NestingTooDeep { .. } => ErrorKind::Structural,
            ReactionError::FirstCoefficientAssociation(_)
            | ReactionError::FirstCoefficientMineral(_)
            | ReactionError::Unbalanced(_) => ErrorKind::Semantic,
            ReactionError::NonNumericCoefficient(_) | ReactionError::NumericConversion(_) => {
                ErrorKind::Numeric
            }
            ReactionError::InvalidSettings(_)
            | ReactionError::SettingsIo(_)
            | ReactionError::SettingsFormat(_) => ErrorKind::Settings,
        }
    }

    /// the balance report if this is a balance failure
    pub fn report(&self) -> Option<&BalanceReport> {
        match self {
            ReactionError::Unbalanced(report) => Some(report),
            _ => None,
        }
    }
}
