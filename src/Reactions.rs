/// eng
/// The module takes as input a reaction equation written as a String, e.g. "CaCO3 = Ca+2 + CO3-2",
/// and produces the following data:
/// 1) a vector of species of the reaction with their charges and stoichiometric coefficients,
/// the defining (target) species always goes first with coefficient -1
/// 2) the element composition of the target species
/// 3) the verdict of the charge and mass balance check with all imbalances found
/// ----------------------------------------------------------------
/// ru
/// Модуль берет на вход уравнение реакции, заданное в виде String, например "CaCO3 = Ca+2 + CO3-2",
/// и выдает следующие данные:
/// 1) вектор веществ реакции с их зарядами и стехиометрическими коэффициентами,
/// определяющее (целевое) вещество всегда первое и имеет коэффициент -1
/// 2) элементный состав целевого вещества
/// 3) результат проверки баланса зарядов и масс со всеми найденными нарушениями
/// ----------------------------------------------------------------
/// # Examples
/// ```
/// use ReactBalance::Reactions::reaction_parser::EquationParser;
/// let mut parser = EquationParser::new();
/// // association reaction: target species is the first on the right hand side
/// let balanced = parser.parse_and_check("Fe+3 + e- = Fe+2", true).unwrap();
/// println!("{:?}", balanced.reaction.tokens);
/// // dissolution of a mineral: target species is the first on the left hand side
/// let err = parser.parse_and_check("CaCO3 = Ca+2 + CO3-3", false).unwrap_err();
/// println!("{}", err);
/// ```
pub mod reaction_parser;
/// charge and mass balance of a parsed reaction
pub mod balance_checker;
/// Formula scanning: element names with bracketed isotope tags, numeric subscripts
pub mod formula_tokenizer;
/// Module to calculate the element composition of chemical formulae with parentheses and hydrate
/// water, e.g. "K4Fe(CN)6" or "CaSO4:2H2O"
///
///  # Examples
/// ```
/// use ReactBalance::Reactions::element_accumulator::elements_in_species;
/// let elements = elements_in_species("K4Fe(CN)6", 1.0).unwrap();
/// println!("Element counts: {:?}", elements);
/// ```
pub mod element_accumulator;
pub mod charge_parser;
/// splitting of equation sides into terms; registry of species met by a parser
pub mod species_term;
pub mod errors;
mod reaction_parser_tests;
