//! Numeric literal classification.
//!
//! A literal records every representation that holds its value exactly, so
//! `1e3` is an int, a uint and a float at once while `1.5` is only a float.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde::Serialize;
use tracing::trace;

use super::literal;

#[derive(Parser)]
#[grammar = "pest/number.pest"]
struct NumberGrammar;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumberValue {
    pub int: Option<i64>,
    pub uint: Option<u64>,
    pub float: Option<f64>,
    /// `(real, imaginary)`
    pub complex: Option<(f64, f64)>,
}

impl NumberValue {
    fn from_float(f: f64) -> Self {
        Self {
            int: exact_i64(f),
            uint: exact_u64(f),
            float: Some(f),
            complex: None,
        }
    }

    fn from_complex(re: f64, im: f64) -> Self {
        let mut value = if im == 0.0 {
            Self::from_float(re)
        } else {
            Self::default()
        };
        value.complex = Some((re, im));
        value
    }

    pub fn is_int(&self) -> bool {
        self.int.is_some()
    }

    pub fn is_uint(&self) -> bool {
        self.uint.is_some()
    }

    pub fn is_float(&self) -> bool {
        self.float.is_some()
    }

    pub fn is_complex(&self) -> bool {
        self.complex.is_some()
    }
}

/// Value of a plain number token such as `42`, `0x1F`, `1.5e3` or `2i`.
pub fn parse_number(text: &str) -> Result<NumberValue, String> {
    let literal = scan(text)?;
    trace!("number {:?} -> {:?}", text, literal);
    if literal.imaginary {
        return Ok(NumberValue::from_complex(0.0, literal.signed_float()));
    }
    match literal.magnitude {
        Magnitude::Int(m) => {
            let (int, uint) = if literal.negative {
                let int = i64::try_from(-i128::from(m)).ok();
                (int, (m == 0).then_some(0))
            } else {
                (i64::try_from(m).ok(), Some(m))
            };
            let float = int.map(|i| i as f64).or(uint.map(|u| u as f64));
            if float.is_none() {
                return Err(format!("integer overflow: {text:?}"));
            }
            Ok(NumberValue {
                int,
                uint,
                float,
                complex: None,
            })
        }
        Magnitude::Float(_) => Ok(NumberValue::from_float(literal.signed_float())),
    }
}

/// Value of a complex token such as `1+2i`.
pub fn parse_complex(text: &str) -> Result<NumberValue, String> {
    let illegal = || format!("illegal number syntax: {text:?}");
    let split = text
        .char_indices()
        .rev()
        .find(|&(i, c)| {
            i > 0
                && (c == '+' || c == '-')
                && !matches!(text.as_bytes()[i - 1], b'e' | b'E' | b'p' | b'P')
        })
        .map(|(i, _)| i)
        .ok_or_else(illegal)?;
    let real = scan(&text[..split]).map_err(|_| illegal())?;
    let imag = scan(&text[split..]).map_err(|_| illegal())?;
    if real.imaginary || !imag.imaginary {
        return Err(illegal());
    }
    Ok(NumberValue::from_complex(
        real.signed_float(),
        imag.signed_float(),
    ))
}

/// Value of a character constant such as `'a'`.
pub fn parse_char_constant(text: &str) -> Result<NumberValue, String> {
    let c = literal::unquote_char_constant(text)?;
    let code = u32::from(c);
    Ok(NumberValue {
        int: Some(i64::from(code)),
        uint: Some(u64::from(code)),
        float: Some(f64::from(code)),
        complex: None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Magnitude {
    Int(u64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Literal {
    negative: bool,
    magnitude: Magnitude,
    imaginary: bool,
}

impl Literal {
    fn signed_float(&self) -> f64 {
        let f = match self.magnitude {
            Magnitude::Int(m) => m as f64,
            Magnitude::Float(f) => f,
        };
        if self.negative { -f } else { f }
    }
}

fn scan(text: &str) -> Result<Literal, String> {
    let illegal = || format!("illegal number syntax: {text:?}");
    let number = NumberGrammar::parse(Rule::number, text)
        .map_err(|_| illegal())?
        .next()
        .ok_or_else(illegal)?;

    let mut negative = false;
    let mut imaginary = false;
    let mut magnitude = None;
    for pair in number.into_inner() {
        match pair.as_rule() {
            Rule::sign => negative = pair.as_str() == "-",
            Rule::imaginary => imaginary = true,
            Rule::hex_int => magnitude = Some(radix_int(pair, 16, text)?),
            Rule::octal_int | Rule::legacy_octal_int => magnitude = Some(radix_int(pair, 8, text)?),
            Rule::binary_int => magnitude = Some(radix_int(pair, 2, text)?),
            Rule::decimal_int | Rule::padded_int => {
                let digits = pair.as_str().replace('_', "");
                let m = digits
                    .parse::<u64>()
                    .map_err(|_| format!("integer overflow: {text:?}"))?;
                magnitude = Some(Magnitude::Int(m));
            }
            Rule::decimal_float => {
                let f = pair
                    .as_str()
                    .replace('_', "")
                    .parse::<f64>()
                    .map_err(|_| illegal())?;
                magnitude = Some(Magnitude::Float(finite(f, text)?));
            }
            Rule::hex_float => magnitude = Some(Magnitude::Float(finite(hex_float(pair)?, text)?)),
            _ => {}
        }
    }
    Ok(Literal {
        negative,
        magnitude: magnitude.ok_or_else(illegal)?,
        imaginary,
    })
}

fn radix_int(pair: Pair<'_, Rule>, radix: u32, text: &str) -> Result<Magnitude, String> {
    let digits = pair
        .into_inner()
        .find(|p| matches!(p.as_rule(), Rule::hex_digits | Rule::oct_digits | Rule::bin_digits))
        .map(|p| p.as_str().replace('_', ""))
        .ok_or_else(|| format!("illegal number syntax: {text:?}"))?;
    u64::from_str_radix(&digits, radix)
        .map(Magnitude::Int)
        .map_err(|_| format!("integer overflow: {text:?}"))
}

fn hex_float(pair: Pair<'_, Rule>) -> Result<f64, String> {
    let mut mantissa = 0.0f64;
    let mut exponent = 0i32;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::hex_mantissa => {
                let mut fraction_digits = 0i32;
                let mut in_fraction = false;
                for c in part.as_str().chars() {
                    match c {
                        '.' => in_fraction = true,
                        '_' => {}
                        c => {
                            let digit = c.to_digit(16).unwrap_or(0);
                            mantissa = mantissa * 16.0 + f64::from(digit);
                            if in_fraction {
                                fraction_digits += 1;
                            }
                        }
                    }
                }
                exponent -= 4 * fraction_digits;
            }
            Rule::hex_exponent => {
                let digits = part.as_str()[1..].replace('_', "");
                let value = digits
                    .parse::<i32>()
                    .map_err(|_| format!("illegal number syntax: {:?}", part.as_str()))?;
                exponent += value;
            }
            _ => {}
        }
    }
    Ok(mantissa * 2f64.powi(exponent))
}

fn finite(f: f64, text: &str) -> Result<f64, String> {
    if f.is_finite() {
        Ok(f)
    } else {
        Err(format!("illegal number syntax: {text:?}"))
    }
}

fn exact_i64(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f))
        .then(|| f as i64)
}

fn exact_u64(f: f64) -> Option<u64> {
    (f.fract() == 0.0 && (0.0..18_446_744_073_709_551_616.0).contains(&f)).then(|| f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_int() {
        let n = parse_number("42").unwrap();
        assert_eq!(n.int, Some(42));
        assert_eq!(n.uint, Some(42));
        assert_eq!(n.float, Some(42.0));
        assert!(!n.is_complex());
    }

    #[test]
    fn test_negative_int_is_not_uint() {
        let n = parse_number("-7").unwrap();
        assert_eq!(n.int, Some(-7));
        assert_eq!(n.uint, None);
        assert_eq!(n.float, Some(-7.0));

        let zero = parse_number("-0").unwrap();
        assert_eq!(zero.int, Some(0));
        assert_eq!(zero.uint, Some(0));
    }

    #[test]
    fn test_prefixed_ints() {
        assert_eq!(parse_number("0x1F").unwrap().int, Some(31));
        assert_eq!(parse_number("0o17").unwrap().int, Some(15));
        assert_eq!(parse_number("017").unwrap().int, Some(15));
        assert_eq!(parse_number("0b101").unwrap().int, Some(5));
        assert_eq!(parse_number("1_000_000").unwrap().int, Some(1_000_000));
    }

    #[test]
    fn test_uint_beyond_int_range() {
        let n = parse_number("18446744073709551615").unwrap();
        assert_eq!(n.int, None);
        assert_eq!(n.uint, Some(u64::MAX));
        assert!(n.is_float());
    }

    #[test]
    fn test_floats() {
        let n = parse_number("1.5").unwrap();
        assert_eq!(n.float, Some(1.5));
        assert_eq!(n.int, None);

        let n = parse_number("1e3").unwrap();
        assert_eq!(n.float, Some(1000.0));
        assert_eq!(n.int, Some(1000));
        assert_eq!(n.uint, Some(1000));

        assert_eq!(parse_number(".5").unwrap().float, Some(0.5));
        assert_eq!(parse_number("-2.5").unwrap().float, Some(-2.5));
        assert_eq!(parse_number("0x1p-2").unwrap().float, Some(0.25));
        assert_eq!(parse_number("0x1.8p1").unwrap().float, Some(3.0));
    }

    #[test]
    fn test_imaginary() {
        let n = parse_number("2i").unwrap();
        assert_eq!(n.complex, Some((0.0, 2.0)));
        assert!(!n.is_float());

        let n = parse_number("0i").unwrap();
        assert_eq!(n.complex, Some((0.0, 0.0)));
        assert_eq!(n.int, Some(0));

        assert_eq!(parse_number("017i").unwrap().complex, Some((0.0, 17.0)));
        assert_eq!(parse_number("089i").unwrap().complex, Some((0.0, 89.0)));
        assert_eq!(parse_number("017").unwrap().int, Some(15));
        assert_eq!(parse_number("0x10i").unwrap().complex, Some((0.0, 16.0)));
    }

    #[test]
    fn test_complex() {
        let n = parse_complex("1+2i").unwrap();
        assert_eq!(n.complex, Some((1.0, 2.0)));
        assert!(!n.is_int());

        let n = parse_complex("1.5e+2-3i").unwrap();
        assert_eq!(n.complex, Some((150.0, -3.0)));

        let n = parse_complex("3+0i").unwrap();
        assert_eq!(n.int, Some(3));
        assert!(n.is_complex());

        assert!(parse_complex("1+2").is_err());
    }

    #[test]
    fn test_char_constant() {
        let n = parse_char_constant("'a'").unwrap();
        assert_eq!(n.int, Some(97));
        assert_eq!(n.uint, Some(97));
        assert_eq!(n.float, Some(97.0));
        assert!(parse_char_constant("'ab'").is_err());
    }

    #[test]
    fn test_illegal_numbers() {
        assert!(parse_number("-").is_err());
        assert!(parse_number("08").is_err());
        assert!(parse_number("1__0").is_err());
        assert!(parse_number("0x").is_err());
        assert!(parse_number("1e400").is_err());
        assert_eq!(
            parse_number("99999999999999999999").unwrap_err(),
            "integer overflow: \"99999999999999999999\""
        );
    }
}
