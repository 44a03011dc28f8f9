//! The one and only color parser.
//!
//! Earlier iterations of this engine validated colors ad hoc in several
//! places, each with a slightly different list of accepted names. This
//! module consolidates the accepted grammar into a single validated value
//! type used by the config and the renderer alike:
//!
//! - hex: `#rgb` and `#rrggbb`
//! - functions: `rgb(r, g, b)`, `rgba(r, g, b, a)`, `hsl(h, s%, l%)`,
//!   `hsla(h, s%, l%, a)` — rgb channels are integers 0–255, hue 0–360,
//!   saturation/lightness percentages 0–100, alpha 0–1
//! - a fixed set of named colors (see [`NAMED_COLORS`])
//!
//! The accepted set is frozen: don't add names or relax ranges here without
//! updating every consumer's expectations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Names accepted by the parser — the union of the lists the engine
/// historically accepted, deduplicated once and for all.
pub const NAMED_COLORS: [&str; 22] = [
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "brown",
    "gray", "grey", "cyan", "magenta", "navy", "teal", "olive", "maroon", "lime", "aqua",
    "silver", "fuchsia",
];

#[derive(Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("unrecognized color: {0:?}")]
    Unrecognized(String),
    #[error("malformed {function}() color: {input:?}")]
    MalformedFunction { function: &'static str, input: String },
    #[error("color component out of range in {0:?}")]
    OutOfRange(String),
}

/// A validated color string.
///
/// Stores the input as written (trimmed); [`fmt::Display`] emits it verbatim
/// so config values survive into the SVG untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Unrecognized(input.to_string()));
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok(Color(trimmed.to_string()))
            } else {
                Err(ColorError::Unrecognized(input.to_string()))
            };
        }
        let lower = trimmed.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgba") {
            validate_rgb_function("rgba", trimmed, &args, true)?;
        } else if let Some(args) = function_args(&lower, "rgb") {
            validate_rgb_function("rgb", trimmed, &args, false)?;
        } else if let Some(args) = function_args(&lower, "hsla") {
            validate_hsl_function("hsla", trimmed, &args, true)?;
        } else if let Some(args) = function_args(&lower, "hsl") {
            validate_hsl_function("hsl", trimmed, &args, false)?;
        } else if !NAMED_COLORS.contains(&lower.as_str()) {
            return Err(ColorError::Unrecognized(input.to_string()));
        }
        Ok(Color(trimmed.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.0
    }
}

/// Split `name(a, b, c)` into its comma-separated arguments, or `None` when
/// the input isn't a call of exactly that function.
fn function_args(lower: &str, name: &str) -> Option<Vec<String>> {
    let rest = lower.strip_prefix(name)?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(|a| a.trim().to_string()).collect())
}

fn validate_rgb_function(
    function: &'static str,
    input: &str,
    args: &[String],
    with_alpha: bool,
) -> Result<(), ColorError> {
    let expected = if with_alpha { 4 } else { 3 };
    if args.len() != expected {
        return Err(ColorError::MalformedFunction {
            function,
            input: input.to_string(),
        });
    }
    for channel in &args[..3] {
        let value: u32 = channel.parse().map_err(|_| ColorError::MalformedFunction {
            function,
            input: input.to_string(),
        })?;
        if value > 255 {
            return Err(ColorError::OutOfRange(input.to_string()));
        }
    }
    if with_alpha {
        validate_alpha(function, input, &args[3])?;
    }
    Ok(())
}

fn validate_hsl_function(
    function: &'static str,
    input: &str,
    args: &[String],
    with_alpha: bool,
) -> Result<(), ColorError> {
    let expected = if with_alpha { 4 } else { 3 };
    if args.len() != expected {
        return Err(ColorError::MalformedFunction {
            function,
            input: input.to_string(),
        });
    }
    let hue: f64 = args[0].parse().map_err(|_| ColorError::MalformedFunction {
        function,
        input: input.to_string(),
    })?;
    if !(0.0..=360.0).contains(&hue) {
        return Err(ColorError::OutOfRange(input.to_string()));
    }
    for percent in &args[1..3] {
        let digits = percent
            .strip_suffix('%')
            .ok_or_else(|| ColorError::MalformedFunction {
                function,
                input: input.to_string(),
            })?;
        let value: f64 = digits.parse().map_err(|_| ColorError::MalformedFunction {
            function,
            input: input.to_string(),
        })?;
        if !(0.0..=100.0).contains(&value) {
            return Err(ColorError::OutOfRange(input.to_string()));
        }
    }
    if with_alpha {
        validate_alpha(function, input, &args[3])?;
    }
    Ok(())
}

fn validate_alpha(function: &'static str, input: &str, arg: &str) -> Result<(), ColorError> {
    let alpha: f64 = arg.parse().map_err(|_| ColorError::MalformedFunction {
        function,
        input: input.to_string(),
    })?;
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str) -> Color {
        input
            .parse()
            .unwrap_or_else(|e| panic!("{input:?} should parse: {e}"))
    }

    fn rejected(input: &str) {
        assert!(
            input.parse::<Color>().is_err(),
            "{input:?} should be rejected"
        );
    }

    // =========================================================================
    // hex forms
    // =========================================================================

    #[test]
    fn hex_three_and_six_digits() {
        assert_eq!(ok("#fff").as_str(), "#fff");
        assert_eq!(ok("#1A2b3C").as_str(), "#1A2b3C");
    }

    #[test]
    fn hex_wrong_lengths_rejected() {
        rejected("#ff");
        rejected("#ffff");
        rejected("#fffff");
        rejected("#fffffff");
    }

    #[test]
    fn hex_non_digits_rejected() {
        rejected("#ggg");
        rejected("#12345z");
    }

    // =========================================================================
    // function forms
    // =========================================================================

    #[test]
    fn rgb_and_rgba_accepted() {
        ok("rgb(0, 0, 0)");
        ok("rgb(255,128,64)");
        ok("rgba(10, 20, 30, 0.5)");
        ok("rgba(10, 20, 30, 1)");
        ok("RGB(1, 2, 3)");
    }

    #[test]
    fn rgb_bad_arity_or_range_rejected() {
        rejected("rgb(1, 2)");
        rejected("rgb(1, 2, 3, 4)");
        rejected("rgb(256, 0, 0)");
        rejected("rgb(-1, 0, 0)");
        rejected("rgba(0, 0, 0, 1.5)");
        rejected("rgb(a, b, c)");
    }

    #[test]
    fn hsl_and_hsla_accepted() {
        ok("hsl(120, 50%, 40%)");
        ok("hsl(0, 0%, 100%)");
        ok("hsla(200, 75%, 25%, 0.8)");
    }

    #[test]
    fn hsl_missing_percent_or_range_rejected() {
        rejected("hsl(120, 50, 40)");
        rejected("hsl(400, 50%, 40%)");
        rejected("hsl(120, 150%, 40%)");
        rejected("hsla(120, 50%, 40%, 2)");
    }

    // =========================================================================
    // named colors
    // =========================================================================

    #[test]
    fn named_colors_accepted_case_insensitively() {
        ok("black");
        ok("White");
        ok("NAVY");
        ok("fuchsia");
    }

    #[test]
    fn unknown_names_rejected() {
        rejected("blurple");
        rejected("dark-slate-gray");
        rejected("");
        rejected("   ");
    }

    // =========================================================================
    // round-tripping
    // =========================================================================

    #[test]
    fn display_preserves_input_verbatim() {
        assert_eq!(ok(" rgba(1, 2, 3, 0.5) ").to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(ok("#ABC").to_string(), "#ABC");
    }

    #[test]
    fn serde_round_trip_through_string() {
        let color: Color = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(color.as_str(), "teal");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"teal\"");
        assert!(serde_json::from_str::<Color>("\"not-a-color\"").is_err());
    }
}
