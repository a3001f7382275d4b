//! Colombian address-string parser (component D, §4.1).
//!
//! Recognises `<street-type> <street-name> [#] <number-prefix> [-| ] [<number-suffix>]`,
//! with arbitrary whitespace between tokens. Unrecognised street-type tokens are
//! passed through upper-cased rather than rejected; only a missing required
//! token fails the parse. Never panics — failure is a value (`None`).

use nom::branch::alt;
use nom::character::complete::{alpha1, char, digit1, multispace0, satisfy};
use nom::combinator::{opt, recognize};
use nom::sequence::pair;
use nom::IResult;

use crate::models::ParsedAddress;

/// Closed mapping from recognised input forms to their canonical
/// two/three-letter abbreviation (§4.1 table). Longer forms are tried
/// before their substrings so `"CARRERA"` doesn't get chopped by `"CA"`.
const STREET_TYPES: &[(&str, &str)] = &[
    ("CALLE", "CL"),
    ("CARRERA", "KR"),
    ("AVENIDA", "AV"),
    ("DIAGONAL", "DG"),
    ("TRANSVERSAL", "TV"),
    ("CIRCULAR", "CIR"),
    ("AUTOPISTA", "AUT"),
    ("VIA", "VIA"),
    ("CA", "CL"),
    ("CL", "CL"),
    ("CR", "KR"),
    ("KR", "KR"),
    ("AV", "AV"),
    ("DG", "DG"),
    ("TV", "TV"),
    ("CIR", "CIR"),
    ("AUT", "AUT"),
];

fn street_type_token(input: &str) -> IResult<&str, &str> {
    alpha1(input)
}

fn normalize_street_type(token: &str) -> String {
    let upper = token.to_uppercase();
    for (form, canonical) in STREET_TYPES {
        if *form == upper {
            return canonical.to_string();
        }
    }
    upper
}

/// Digits optionally followed by a single letter, e.g. `"43"` or `"68B"`.
fn digits_with_optional_letter(input: &str) -> IResult<&str, String> {
    let (rest, (digits, letter)) = pair(digit1, opt(satisfy(|c| c.is_ascii_alphabetic())))(input)?;
    let mut out = digits.to_string();
    if let Some(l) = letter {
        out.push(l.to_ascii_uppercase());
    }
    Ok((rest, out))
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn parse_inner(input: &str) -> IResult<&str, ParsedAddress> {
    let (rest, _) = ws(input)?;
    let (rest, street_type_raw) = street_type_token(rest)?;
    let (rest, _) = ws(rest)?;
    let (rest, street_name) = digits_with_optional_letter(rest)?;
    let (rest, _) = ws(rest)?;
    let (rest, _) = opt(char('#'))(rest)?;
    let (rest, _) = ws(rest)?;
    let (rest, number_prefix) = digits_with_optional_letter(rest)?;
    let (rest, _) = ws(rest)?;
    let (rest, _) = opt(alt((recognize(char('-')), recognize(char(' ')))))(rest)?;
    let (rest, _) = ws(rest)?;
    let (rest, number_suffix) = opt(digit1)(rest)?;

    Ok((
        rest,
        ParsedAddress {
            street_type: normalize_street_type(street_type_raw),
            street_name: street_name.to_uppercase(),
            number_prefix: number_prefix.to_uppercase(),
            number_suffix: number_suffix.map(|s| s.to_uppercase()),
            raw: input.to_string(),
        },
    ))
}

/// Parses a free-form Colombian address string. Returns `None` on empty
/// input or when the required token sequence isn't present; never panics.
pub fn parse(address: &str) -> Option<ParsedAddress> {
    if address.is_empty() {
        return None;
    }
    parse_inner(address).ok().map(|(_, parsed)| parsed)
}

/// Extracts the leading integer of a number string, stopping at the
/// first non-digit (§4.1). Used by the searcher/matcher (E/F) when
/// querying the store. Returns `0` when no leading digits are present —
/// the caller treats an unparseable target as `0` (§7, recovered
/// internally) rather than propagating an error.
pub fn leading_integer(number: &str) -> i64 {
    number
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Extracts and concatenates every digit run in a number string (§4.1).
/// `"57-49"` → `5749`, `"13 247"` → `13247`. Used by the interpolator (G)
/// for numeric ordering, since Colombian house numbers like `57-49`
/// encode a cross-street and a house number that together determine
/// position along the block.
pub fn concatenated_digits(number: &str) -> i64 {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(0)
    }
}
