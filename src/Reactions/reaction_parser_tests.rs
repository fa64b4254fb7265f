/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Reactions::element_accumulator::ElementEntry;
    use crate::Reactions::errors::{ErrorKind, ReactionError};
    use crate::Reactions::formula_tokenizer::ElementMode;
    use crate::Reactions::reaction_parser::{EquationParser, ReactionToken};
    use crate::settings::ParserSettings;
    use approx::assert_relative_eq;

    fn token(name: &str, charge: f64, coefficient: f64) -> ReactionToken {
        ReactionToken {
            name: name.to_string(),
            charge,
            coefficient,
        }
    }

    #[test]
    fn test_calcite_dissolution() {
        let mut parser = EquationParser::new();
        let balanced = parser.parse_and_check("CaCO3 = Ca+2 + CO3-2", false).unwrap();
        let reaction = &balanced.reaction;
        assert_eq!(
            reaction.tokens,
            vec![
                token("CaCO3", 0.0, -1.0),
                token("Ca+2", 2.0, 1.0),
                token("CO3-2", -2.0, 1.0)
            ]
        );
        assert_eq!(
            reaction.target_elements,
            vec![
                ElementEntry::new("Ca", 1.0),
                ElementEntry::new("C", 1.0),
                ElementEntry::new("O", 3.0)
            ]
        );
        assert_eq!(balanced.elements.len(), 3);
        assert!(balanced.elements.iter().all(|e| e.is_balanced(1e-9)));
    }

    #[test]
    fn test_iron_redox_association() {
        let mut parser = EquationParser::new();
        let balanced = parser.parse_and_check("Fe+3 + e- = Fe+2", true).unwrap();
        assert_eq!(
            balanced.reaction.tokens,
            vec![
                token("Fe+2", 2.0, -1.0),
                token("Fe+3", 3.0, 1.0),
                token("e-", -1.0, 1.0)
            ]
        );
        assert_eq!(
            balanced.reaction.target_elements,
            vec![ElementEntry::new("Fe", 1.0)]
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let mut parser = EquationParser::new();
        // target species is malformed: parse itself fails
        let err = parser
            .parse("Ca(OH)2(CO3 = Ca+2 + 2OH- + CO3-2", false)
            .unwrap_err();
        assert!(matches!(err, ReactionError::UnbalancedParentheses(_)));
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(parser.registry().is_empty());

        // malformed species that is not the target: the check fails
        let reaction = parser
            .parse("Ca(OH)2(CO3 = Ca+2 + 2OH- + CO3-2", true)
            .unwrap();
        let err = parser.check(&reaction).unwrap_err();
        assert!(matches!(err, ReactionError::UnbalancedParentheses(_)));
    }

    #[test]
    fn test_wrong_charge() {
        let mut parser = EquationParser::new();
        let err = parser
            .parse_and_check("CaCO3 = Ca+2 + CO3-3", false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Semantic);
        let report = err.report().unwrap();
        assert_relative_eq!(report.charge_residual().unwrap(), -1.0);
        assert!(report.unbalanced_elements().is_empty());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_altered_subscript_names_element() {
        let mut parser = EquationParser::new();
        let err = parser
            .parse_and_check("CaCO3 = Ca+2 + CO4-2", false)
            .unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.unbalanced_elements(), vec!["O"]);
        assert_relative_eq!(report.mass_residual("O").unwrap(), 1.0);
        assert!(report.charge_residual().is_none());

        let err = parser
            .parse_and_check("2H+ + CO3-2 = H3CO3", true)
            .unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.unbalanced_elements(), vec!["H"]);
        assert_relative_eq!(report.mass_residual("H").unwrap(), -1.0);
    }

    #[test]
    fn test_coefficients_and_hydrates() {
        let mut parser = EquationParser::new();
        let balanced = parser
            .parse_and_check("CaSO4:2H2O = Ca+2 + SO4-2 + 2 H2O", false)
            .unwrap();
        assert_eq!(balanced.reaction.tokens[3], token("H2O", 0.0, 2.0));

        let err = parser
            .parse_and_check("2H2O = O2 + 4H+ + 4e-", false)
            .unwrap_err();
        // target coefficient is -2, not -1
        assert!(matches!(
            err,
            ReactionError::FirstCoefficientMineral(c) if c == -2.0
        ));

        let balanced = parser
            .parse_and_check("H2O = 0.5O2 + 2H+ + 2e-", false)
            .unwrap();
        assert_relative_eq!(balanced.reaction.tokens[1].coefficient, 0.5);
        assert_eq!(balanced.reaction.tokens[3].name, "e-");
    }

    #[test]
    fn test_association_with_groups() {
        let mut parser = EquationParser::new();
        let balanced = parser
            .parse_and_check("Al+3 + 4H2O = Al(OH)4- + 4H+", true)
            .unwrap();
        let reaction = &balanced.reaction;
        assert_eq!(reaction.target().unwrap(), &token("Al(OH)4-", -1.0, -1.0));
        assert_eq!(reaction.get_token("H2O").unwrap().coefficient, 4.0);
        assert_eq!(reaction.get_token("H+").unwrap().coefficient, -4.0);
        assert_eq!(
            reaction.target_elements,
            vec![
                ElementEntry::new("Al", 1.0),
                ElementEntry::new("O", 4.0),
                ElementEntry::new("H", 4.0)
            ]
        );

        let balanced = parser
            .parse_and_check("Fe+2 + 6CN- = Fe(CN)6-4", true)
            .unwrap();
        assert_eq!(balanced.reaction.species_names(), vec!["Fe(CN)6-4", "Fe+2", "CN-"]);
    }

    #[test]
    fn test_charge_normalization_in_names() {
        let mut parser = EquationParser::new();
        let reaction = parser.parse("Fe++ + e- = Fe+", true).unwrap();
        assert_eq!(reaction.species_names(), vec!["Fe+", "Fe+2", "e-"]);
        assert_eq!(reaction.tokens[1].charge, 2.0);
        assert!(parser.check(&reaction).is_ok());
    }

    #[test]
    fn test_idempotent_reparse() {
        let equations = [
            ("CaCO3 = Ca+2 + CO3-2", false),
            ("Fe+3 + e- = Fe+2", true),
            ("2H+ + CO3-2 = H2CO3", true),
            ("CaSO4:2H2O = Ca+2 + SO4-2 + 2H2O", false),
            ("H2O = 0.5O2 + 2H+ + 2e-", false),
            ("Al+3 + 4H2O = Al(OH)4- + 4H+", true),
            ("-OH- = OH-", true),
            ("-H2O + 2H2O = H2O", true),
            ("CaCO3 = Ca+2 + -2H+ + CO3-2 + 2H+", false),
            ("CO2(g) = CO2", false),
        ];
        let mut parser = EquationParser::new();
        for (equation, association) in equations {
            let first = parser.parse(equation, association).unwrap();
            let normalized = first.to_string();
            let second = parser.parse(&normalized, association).unwrap();
            assert_eq!(first.tokens, second.tokens, "equation {}", equation);
            assert_eq!(second.to_string(), normalized);
        }
    }

    #[test]
    fn test_display_keeps_sides() {
        let mut parser = EquationParser::new();
        let reaction = parser.parse("-OH- = OH-", true).unwrap();
        assert_eq!(reaction.lhs_count, 1);
        assert_eq!(reaction.to_string(), "-OH- = OH-");
        let reaction = parser.parse("-H2O + 2H2O = H2O", true).unwrap();
        assert_eq!(reaction.to_string(), "-H2O + 2H2O = H2O");
        let again = parser.parse(&reaction.to_string(), true).unwrap();
        let coefficients: Vec<f64> = again.tokens.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![-1.0, -1.0, 2.0]);
        let reaction = parser.parse("CaCO3 + -0.5H2O = Ca+2 + CO3-2", false).unwrap();
        assert_eq!(reaction.to_string(), "CaCO3 + -0.5H2O = Ca+2 + CO3-2");
    }

    #[test]
    fn test_phase_marks() {
        let mut parser = EquationParser::new();
        let balanced = parser.parse_and_check("CO2(g) = CO2", false).unwrap();
        assert_eq!(balanced.reaction.species_names(), vec!["CO2(g)", "CO2"]);
        assert_eq!(
            balanced.reaction.target_elements,
            vec![ElementEntry::new("C", 1.0), ElementEntry::new("O", 2.0)]
        );
        let balanced = parser
            .parse_and_check("CaCO3(s) + H+ = Ca+2 + HCO3-", false)
            .unwrap();
        assert_eq!(balanced.reaction.tokens[0], token("CaCO3(s)", 0.0, -1.0));
        assert!(parser.parse_and_check("H2O(G) = H2O", false).is_ok());
    }

    #[test]
    fn test_unbalanced_equation_is_not_registered() {
        let mut parser = EquationParser::new();
        assert!(parser.parse_and_check("CaCO3 = Ca+2 + CO3-3", false).is_err());
        assert!(parser.registry().is_empty());
        parser.parse_and_check("CaCO3 = Ca+2 + CO3-2", false).unwrap();
        assert_eq!(parser.registry().len(), 3);
        // plain parse does not check the balance
        parser.parse("CaCO3 = Ca+2 + CO3-3", false).unwrap();
        assert_eq!(parser.registry().len(), 4);
    }

    #[test]
    fn test_display() {
        let mut parser = EquationParser::new();
        let reaction = parser.parse("Ca++ + CO3-- = CaCO3", true).unwrap();
        assert_eq!(reaction.to_string(), "Ca+2 + CO3-2 = CaCO3");
        let reaction = parser.parse("CaCO3 = Ca+2 + CO3-2", false).unwrap();
        assert_eq!(reaction.to_string(), "CaCO3 = Ca+2 + CO3-2");
    }

    #[test]
    fn test_syntax_errors() {
        let mut parser = EquationParser::new();
        assert!(matches!(
            parser.parse("CaCO3 Ca+2 + CO3-2", false),
            Err(ReactionError::MissingEquals(_))
        ));
        assert!(matches!(
            parser.parse(" = Ca+2", false),
            Err(ReactionError::EmptySide { side: "left", .. })
        ));
        assert!(matches!(
            parser.parse("CaCO3 =  ", false),
            Err(ReactionError::EmptySide { side: "right", .. })
        ));
        assert!(matches!(
            parser.parse("CaCO3 = Ca+2x + CO3-2", false),
            Err(ReactionError::ChargeString(_))
        ));
        assert!(matches!(
            parser.parse("1.2.3CaCO3 = Ca+2 + CO3-2", false),
            Err(ReactionError::NonNumericCoefficient(_))
        ));
        assert!(matches!(
            parser.parse("CaCO3 = Ca+2 + + CO3-2", false),
            Err(ReactionError::EmptyTerm(_))
        ));
        assert!(matches!(
            parser.parse("CaCO3 = Ca+2 + 2", false),
            Err(ReactionError::IllegalConstruct(_))
        ));
        assert!(matches!(
            parser.parse_and_check("CaOH)2 = Ca+2 + 2OH-", false),
            Err(ReactionError::TooManyRightParentheses(_))
        ));
        assert!(parser.registry().is_empty());
    }

    #[test]
    fn test_unterminated_bracket_is_strict() {
        let mut parser = EquationParser::new();
        let err = parser.parse("[13C]O2 + H2O = H2[13CO3", true).unwrap_err();
        assert!(matches!(err, ReactionError::UnterminatedBracket(_)));
        let balanced = parser
            .parse_and_check("[13C]O2 + H2O = H2[13C]O3", true)
            .unwrap();
        assert_eq!(balanced.reaction.target_elements[1], ElementEntry::new("[13C]", 1.0));
    }

    #[test]
    fn test_registry_is_shared_within_session() {
        let mut parser = EquationParser::new();
        parser.parse("CaCO3 = Ca+2 + CO3-2", false).unwrap();
        parser.parse("CaSO4 = Ca+2 + SO4-2", false).unwrap();
        let names: Vec<&str> = parser.registry().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CaCO3", "Ca+2", "CO3-2", "CaSO4", "SO4-2"]);
        // a new parser starts with an empty registry
        assert!(EquationParser::new().registry().is_empty());
    }

    #[test]
    fn test_check_all_isolates_equations() {
        let mut parser = EquationParser::new();
        let results = parser.check_all(
            &[
                "CaCO3 = Ca+2 + CO3-2",
                "Ca(OH)2(CO3 = Ca+2",
                "CaCO3 = Ca+2 + CO3-3",
                "MgCO3 = Mg+2 + CO3-2",
            ],
            false,
        );
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ReactionError::UnbalancedParentheses(_))));
        assert!(matches!(results[2], Err(ReactionError::Unbalanced(_))));
        // no element of previous equations leaks into the next one
        let elements = &results[3].as_ref().unwrap().elements;
        let names: Vec<&str> = elements.iter().map(|e| e.element.as_str()).collect();
        assert_eq!(names, vec!["Mg", "C", "O"]);
    }

    #[test]
    fn test_secondary_mode() {
        let mut parser = EquationParser::new().with_mode(ElementMode::Secondary);
        let balanced = parser
            .parse_and_check("Fe(+3)+3 + e- = Fe(+3)+2", true)
            .unwrap();
        assert_eq!(
            balanced.reaction.target_elements,
            vec![ElementEntry::new("Fe(3)", 1.0)]
        );
    }

    #[test]
    fn test_settings_are_used() {
        let settings = ParserSettings {
            max_paren_depth: 1,
            ..ParserSettings::default()
        };
        let mut parser = EquationParser::with_settings(settings);
        assert!(matches!(
            parser.parse("Al(Si(OH)4)3 = Al+3", false),
            Err(ReactionError::NestingTooDeep { depth: 1, .. })
        ));

        let settings = ParserSettings {
            check_electron_balance: true,
            ..ParserSettings::default()
        };
        let mut parser = EquationParser::with_settings(settings);
        let err = parser.parse_and_check("Fe+3 + e- = Fe+2", true).unwrap_err();
        assert_eq!(err.report().unwrap().unbalanced_elements(), vec!["e"]);
    }

    #[test]
    fn test_serialization() {
        let mut parser = EquationParser::new();
        let balanced = parser.parse_and_check("CaCO3 = Ca+2 + CO3-2", false).unwrap();
        let json = serde_json::to_string(&balanced).unwrap();
        assert!(json.contains("\"name\":\"Ca+2\""));
        let back: crate::Reactions::reaction_parser::BalancedReaction =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back, balanced);
    }
}
