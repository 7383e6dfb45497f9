//! Series parser for free-text numeric entries
//!
//! Turns text such as `"10, 20, x, 30"` into a [`Series`]. Tokens are separated
//! by commas and/or whitespace, runs of separators collapse, and `x`, `-`, `na`
//! or an empty token mark a missing session.

use chumsky::prelude::*;
use tracing::{span, trace, warn, Level};

use super::{GraphError, Result, Series};

/// Separator characters: comma plus ASCII whitespace
const SEPARATORS: &str = ", \t\n\r\u{b}\u{c}";

/// Tokens that mark a missing session (compared lowercase)
pub const MISSING_MARKERS: [&str; 4] = ["", "x", "-", "na"];

/// A user-visible problem found while reading input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Which input produced the problem, e.g. `Baseline / Measure 1`
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Chumsky-based tokenizer for series text
pub struct SeriesParser;

impl SeriesParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole entry; any malformed token rejects the entire input
    pub fn parse(&self, input: &str) -> Result<Series> {
        let parse_span = span!(Level::DEBUG, "parse_series", input_len = input.len());
        let _enter = parse_span.enter();

        let trimmed = input.trim();
        if trimmed.is_empty() {
            trace!("Empty entry");
            return Ok(Vec::new());
        }

        let tokens = Self::tokens_parser()
            .parse(trimmed)
            .into_result()
            .map_err(|_| GraphError::invalid_token(trimmed))?;

        let series = tokens
            .iter()
            .map(|token| Self::classify(token))
            .collect::<Result<Series>>()?;

        trace!(
            len = series.len(),
            missing = series.iter().filter(|v| v.is_none()).count(),
            "Parsed series"
        );
        Ok(series)
    }

    /// Map one token to a value or the missing marker
    fn classify(token: &str) -> Result<Option<f64>> {
        let lowered = token.trim().to_lowercase();
        if MISSING_MARKERS.contains(&lowered.as_str()) {
            return Ok(None);
        }
        match lowered.parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(GraphError::invalid_token(token)),
        }
    }

    fn separator<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
        one_of(SEPARATORS).repeated().at_least(1).ignored()
    }

    /// A token may be empty, which happens at a leading or trailing comma
    fn token<'src>() -> impl Parser<'src, &'src str, String> + Clone {
        none_of(SEPARATORS).repeated().collect::<String>()
    }

    fn tokens_parser<'src>() -> impl Parser<'src, &'src str, Vec<String>> + Clone {
        Self::token()
            .separated_by(Self::separator())
            .collect::<Vec<_>>()
            .then_ignore(end())
    }
}

impl Default for SeriesParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a series entry, rejecting the whole entry on the first bad token
///
/// A blank or whitespace-only entry is an empty series, not one missing
/// session, so it adds no length to its phase.
///
/// # Example
/// ```
/// use scdgraph::parse_series;
///
/// let series = parse_series("10, 20, x, 30").unwrap();
/// assert_eq!(series, vec![Some(10.0), Some(20.0), None, Some(30.0)]);
/// assert!(parse_series("   ").unwrap().is_empty());
/// ```
pub fn parse_series(input: &str) -> Result<Series> {
    SeriesParser::new().parse(input)
}

/// Parse a series entry, degrading to an empty series on rejection
///
/// The returned diagnostic names both the field and the offending token.
pub fn parse_series_lenient(field: &str, input: &str) -> (Series, Option<Diagnostic>) {
    match parse_series(input) {
        Ok(series) => (series, None),
        Err(err) => {
            warn!(field, error = %err, "Rejected series entry");
            (
                Vec::new(),
                Some(Diagnostic {
                    field: field.to_string(),
                    message: err.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_separators_and_missing() {
        assert_eq!(
            parse_series("10, 20, x, 30").unwrap(),
            vec![Some(10.0), Some(20.0), None, Some(30.0)]
        );
        assert_eq!(
            parse_series("1 2\t3\n4").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(
            parse_series("1,, 2 ,  ,3").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_missing_markers_case_insensitive() {
        assert_eq!(
            parse_series("X - NA na Na 5").unwrap(),
            vec![None, None, None, None, None, Some(5.0)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_series("").unwrap(), Vec::<Option<f64>>::new());
        assert_eq!(parse_series("   \n ").unwrap(), Vec::<Option<f64>>::new());
    }

    #[test]
    fn test_edge_commas_produce_missing() {
        assert_eq!(parse_series(",5").unwrap(), vec![None, Some(5.0)]);
        assert_eq!(parse_series("5,").unwrap(), vec![Some(5.0), None]);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            parse_series("-3 +4 .5 1e2 2.").unwrap(),
            vec![Some(-3.0), Some(4.0), Some(0.5), Some(100.0), Some(2.0)]
        );
        assert_eq!(parse_series("nan 1").unwrap(), vec![None, Some(1.0)]);
    }

    #[test]
    fn test_invalid_token_rejects_entire_input() {
        let err = parse_series("5 abc 7").unwrap_err();
        match err {
            GraphError::InvalidSeriesToken { token } => assert_eq!(token, "abc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infinity_rejected() {
        assert!(parse_series("1 inf").is_err());
        assert!(parse_series("-Infinity").is_err());
    }

    #[test]
    fn test_lenient_degrades_to_empty() {
        let (series, diagnostic) = parse_series_lenient("Baseline / Measure 1", "1 2 oops");
        assert!(series.is_empty());
        let diagnostic = diagnostic.unwrap();
        assert_eq!(diagnostic.field, "Baseline / Measure 1");
        assert!(diagnostic.message.contains("'oops'"));
        assert!(diagnostic.to_string().starts_with("Baseline / Measure 1: "));
    }

    #[test]
    fn test_lenient_passes_valid_input() {
        let (series, diagnostic) = parse_series_lenient("m", "1 x 3");
        assert_eq!(series, vec![Some(1.0), None, Some(3.0)]);
        assert!(diagnostic.is_none());
    }
}
