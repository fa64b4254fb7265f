use crate::Reactions::element_accumulator::{ElementAccumulator, ElementEntry};
use crate::Reactions::errors::{BalanceReport, Imbalance, ReactionError};
use crate::Reactions::formula_tokenizer::ElementMode;
use crate::Reactions::reaction_parser::ReactionToken;
use crate::settings::ParserSettings;
use approx::abs_diff_eq;
use log::{debug, error};

/// name of the electron pseudo-element
pub const ELECTRON: &str = "e";

/// Checks that the reaction is balanced in charge and in every element.
///
/// The coefficient of the first species must be -1.0. Charge and elements are summed over
/// all species; all imbalances are collected into one `BalanceReport`.
/// On success returns the combined element list, zero entries included.
pub fn check_eqn(
    tokens: &[ReactionToken],
    association: bool,
    settings: &ParserSettings,
    mode: ElementMode,
) -> Result<Vec<ElementEntry>, ReactionError> {
    let tolerance = settings.tolerance;
    let Some(first) = tokens.first() else {
        return Err(ReactionError::NoSpecies);
    };
    if !abs_diff_eq!(first.coefficient, -1.0, epsilon = tolerance) {
        let err = if association {
            ReactionError::FirstCoefficientAssociation(first.coefficient)
        } else {
            ReactionError::FirstCoefficientMineral(first.coefficient)
        };
        error!("{}", err);
        return Err(err);
    }

    let mut accumulator = ElementAccumulator::new(mode).with_max_depth(settings.max_paren_depth);
    accumulator.reset();
    let mut sumcharge = 0.0;
    for token in tokens {
        sumcharge += token.coefficient * token.charge;
        accumulator.add_species(&token.name, token.coefficient)?;
    }
    accumulator.combine();
    let elements = accumulator.into_elements();

    let mut report = BalanceReport::new();
    if !abs_diff_eq!(sumcharge, 0.0, epsilon = tolerance) {
        report.push(Imbalance::Charge {
            residual: sumcharge,
        });
    }
    for entry in &elements {
        if entry.element == ELECTRON && !settings.check_electron_balance {
            continue;
        }
        if !entry.is_balanced(tolerance) {
            report.push(Imbalance::Mass {
                element: entry.element.clone(),
                residual: entry.coefficient,
            });
        }
    }

    if report.is_empty() {
        debug!("equation balanced: {:?}", elements);
        Ok(elements)
    } else {
        for imbalance in &report.imbalances {
            error!("{}", imbalance);
        }
        Err(ReactionError::Unbalanced(report))
    }
}
