use crate::Reactions::errors::ReactionError;
use crate::Reactions::reaction_parser::{BalancedReaction, EquationParser};
use crate::settings::ParserSettings;
use serde_json::json;
use std::io::{self, Write};

pub fn run_interactive_menu(settings: ParserSettings) {
    let mut parser = EquationParser::with_settings(settings);
    let mut association = true;
    loop {
        show_main_menu(association);
        let Some(choice) = get_user_input() else {
            break;
        };
        match choice.trim() {
            "1" => {
                print!("\x1b[36mEquation: \x1b[0m");
                let _ = io::stdout().flush();
                if let Some(equation) = get_user_input() {
                    report(&parser.parse_and_check(equation.trim(), association), false);
                }
            }
            "2" => {
                association = !association;
                println!("association reaction: {}", association);
            }
            "3" => {
                for species in parser.registry().iter() {
                    println!("{:<20} {:>6}", species.name, species.charge);
                }
            }
            "4" => println!("{:#?}", parser.settings),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - header
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompts
Reset (\x1b[0m)
*/
fn show_main_menu(association: bool) {
    println!("\x1b[34m\n ReactBalance: parser and balance checker of reaction equations \n\x1b[0m");
    println!("\x1b[33m1. Check equation\x1b[0m");
    println!(
        "\x1b[33m2. Toggle association reaction (now: {})\x1b[0m",
        association
    );
    println!("\x1b[33m3. List species met so far\x1b[0m");
    println!("\x1b[33m4. Show settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

// None at end of input
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

/// Checks every equation and prints the results. Returns true if all of them balance.
pub fn run_batch(
    equations: &[String],
    association: bool,
    as_json: bool,
    settings: ParserSettings,
) -> bool {
    let mut parser = EquationParser::with_settings(settings);
    let equations: Vec<&str> = equations.iter().map(|e| e.as_str()).collect();
    let results = parser.check_all(&equations, association);
    if as_json {
        let values: Vec<serde_json::Value> = equations
            .iter()
            .zip(results.iter())
            .map(|(equation, result)| result_to_json(equation, result))
            .collect();
        match serde_json::to_string_pretty(&values) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to serialize results: {}", e),
        }
    } else {
        for result in &results {
            report(result, true);
        }
    }
    results.iter().all(|r| r.is_ok())
}

fn result_to_json(
    equation: &str,
    result: &Result<BalancedReaction, ReactionError>,
) -> serde_json::Value {
    match result {
        Ok(balanced) => json!({
            "equation": equation,
            "balanced": true,
            "reaction": balanced.reaction,
            "elements": balanced.elements,
        }),
        Err(e) => json!({
            "equation": equation,
            "balanced": false,
            "error": e.to_string(),
            "imbalances": e.report().map(|r| r.imbalances.clone()).unwrap_or_default(),
        }),
    }
}

fn report(result: &Result<BalancedReaction, ReactionError>, quiet: bool) {
    match result {
        Ok(balanced) => {
            if quiet {
                println!("OK: {}", balanced.reaction);
            } else {
                balanced.reaction.pretty_print();
                println!("\x1b[32mequation is balanced\x1b[0m");
            }
        }
        Err(ReactionError::Unbalanced(balance)) => {
            println!("\x1b[31mequation is not balanced\x1b[0m");
            balance.pretty_print();
        }
        Err(e) => println!("\x1b[31mError: {}\x1b[0m", e),
    }
}
