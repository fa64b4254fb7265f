//! Charge annotations of species.
//!
//! A charge can be written in two forms: (1) a string of "+" or "-", (2) "+" or "-"
//! followed by a number. Integer charges are reduced to form (2) when the magnitude is
//! greater than one, and to a single sign when it is one: "++" -> "+2", "+1" -> "+".
use crate::Reactions::errors::ReactionError;

/// numeric charge and its canonical text
#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    pub value: f64,
    pub text: String,
}

/// Parses a charge annotation such as "", "+", "--", "+2", "-3.0", "+0.5".
pub fn parse_charge(charge: &str) -> Result<Charge, ReactionError> {
    let bytes = charge.as_bytes();
    let Some(&sign) = bytes.first() else {
        return Ok(Charge {
            value: 0.0,
            text: String::new(),
        });
    };
    if sign != b'+' && sign != b'-' {
        return Err(ReactionError::ChargeSign(charge.to_string()));
    }
    // string of identical signs
    if bytes.iter().all(|&c| c == sign) {
        let magnitude = bytes.len() as i64;
        let z = if sign == b'-' { -magnitude } else { magnitude };
        return Ok(Charge {
            value: z as f64,
            text: charge_to_string(z),
        });
    }
    // sign followed by a number
    let body = &charge[1..];
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(digits_end);
    if integer.is_empty() {
        return Err(ReactionError::ChargeString(charge.to_string()));
    }
    if !rest.is_empty() {
        let Some(fraction) = rest.strip_prefix('.') else {
            return Err(ReactionError::ChargeString(charge.to_string()));
        };
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReactionError::ChargeString(charge.to_string()));
        }
        if fraction.chars().any(|c| c != '0') {
            let value: f64 = charge
                .parse()
                .map_err(|_| ReactionError::NumericConversion(charge.to_string()))?;
            return Ok(Charge {
                value,
                text: charge.to_string(),
            });
        }
    }
    let magnitude: i64 = integer
        .parse()
        .ok()
        .filter(|m: &i64| *m <= i32::MAX as i64)
        .ok_or_else(|| ReactionError::NumericConversion(charge.to_string()))?;
    let z = if sign == b'-' { -magnitude } else { magnitude };
    Ok(Charge {
        value: z as f64,
        text: charge_to_string(z),
    })
}

/// Canonical text of an integer charge: "" for 0, "+"/"-" for +-1, "+2", "-3", ...
pub fn charge_to_string(z: i64) -> String {
    match z {
        0 => String::new(),
        1 => "+".to_string(),
        -1 => "-".to_string(),
        _ => format!("{:+}", z),
    }
}

/// Canonical text of a numeric charge; fractional charges keep their decimal form
pub fn format_charge(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        charge_to_string(value as i64)
    } else {
        format!("{:+}", value)
    }
}
