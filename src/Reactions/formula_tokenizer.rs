//! Low level readers of chemical formulae: element symbols and numeric subscripts.
//! All readers take an immutable formula and a byte position and return the parsed value
//! together with the number of bytes consumed.
use crate::Reactions::errors::ReactionError;

/// How element symbols are read.
///
/// In `Secondary` mode an oxidation-state tag right after the symbol is part of the
/// element name: `Fe(+3)` is the element `Fe(3)`, `S(-2)` is `S(-2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementMode {
    #[default]
    Primary,
    Secondary,
}

/// true if an element symbol starts at `pos`: a capital letter, an opening bracket
/// or the electron `e-`
pub fn is_element_start(formula: &str, pos: usize) -> bool {
    let bytes = formula.as_bytes();
    match bytes.get(pos) {
        Some(c) if c.is_ascii_uppercase() || *c == b'[' => true,
        Some(b'e') => bytes.get(pos + 1) == Some(&b'-'),
        _ => false,
    }
}

/// Reads an element name starting at `pos`.
///
/// An element name is a capital letter, or a bracketed tag like `[13C]`, followed by any
/// number of lower case letters or underscores. `e` directly followed by `-` is the electron.
pub fn read_element(
    formula: &str,
    pos: usize,
    mode: ElementMode,
) -> Result<(String, usize), ReactionError> {
    let bytes = formula.as_bytes();
    let Some(&first) = bytes.get(pos) else {
        return Err(ReactionError::EmptyElement(formula.to_string()));
    };
    if first == b'e' && bytes.get(pos + 1) == Some(&b'-') {
        return Ok(("e".to_string(), 1));
    }
    let mut i;
    if first == b'[' {
        match formula[pos + 1..].find(']') {
            Some(offset) => i = pos + 1 + offset + 1,
            None => return Err(ReactionError::UnterminatedBracket(formula.to_string())),
        }
    } else if first.is_ascii_uppercase() {
        i = pos + 1;
    } else {
        let character = formula[pos..].chars().next().unwrap_or('?');
        return Err(ReactionError::UnexpectedCharacter {
            species: formula.to_string(),
            character,
        });
    }
    while i < bytes.len() && (bytes[i].is_ascii_lowercase() || bytes[i] == b'_') {
        i += 1;
    }
    let mut element = formula[pos..i].to_string();

    if mode == ElementMode::Secondary {
        if let Some((tag, consumed)) = read_valence_tag(formula, i) {
            element.push_str(&tag);
            i += consumed;
        }
    }
    Ok((element, i - pos))
}

// "(+3)" -> "(3)", "(-2)" -> "(-2)"; None if the parenthesis holds anything but a number
fn read_valence_tag(formula: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = formula.as_bytes();
    if bytes.get(pos) != Some(&b'(') {
        return None;
    }
    let mut tag = String::from("(");
    let mut has_digit = false;
    let mut i = pos + 1;
    while let Some(&c) = bytes.get(i) {
        match c {
            b'0'..=b'9' => {
                has_digit = true;
                tag.push(c as char);
            }
            b'-' | b'.' => tag.push(c as char),
            b'+' => {}
            _ => break,
        }
        i += 1;
    }
    if has_digit && bytes.get(i) == Some(&b')') {
        tag.push(')');
        Some((tag, i + 1 - pos))
    } else {
        None
    }
}

/// Reads a leading numeric field (digits and at most one decimal point).
/// If there is no numeric field the number is 1.0 and nothing is consumed.
pub fn read_number(formula: &str, pos: usize) -> Result<(f64, usize), ReactionError> {
    let bytes = formula.as_bytes();
    let mut i = pos;
    let mut decimal = false;
    while let Some(&c) = bytes.get(i) {
        if c == b'.' {
            if decimal {
                break;
            }
            decimal = true;
        } else if !c.is_ascii_digit() {
            break;
        }
        i += 1;
    }
    if i == pos {
        return Ok((1.0, 0));
    }
    let token = &formula[pos..i];
    match token.parse::<f64>() {
        Ok(num) if num.is_finite() => Ok((num, i - pos)),
        _ => Err(ReactionError::NumericConversion(token.to_string())),
    }
}
