use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid bound format for '{0}'. Expected 'MIN,MAX' (e.g., '0.01,0.25').")]
    InvalidBoundFormat(String),

    #[error("Invalid number '{value}' in bound '{input}'.")]
    InvalidNumber { value: String, input: String },

    #[error("Component '{component}' cannot be empty in bound '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },
}

/// Parses a `MIN,MAX` pair. Ordering of the two ends is checked later, when the bound is built.
pub fn parse_bound_pair(input: &str) -> Result<(f64, f64), ParseError> {
    let (min, max) = input
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidBoundFormat(input.to_string()))?;
    if max.contains(',') {
        return Err(ParseError::InvalidBoundFormat(input.to_string()));
    }

    let parse = |component: &'static str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseError::EmptyComponent {
                component,
                input: input.to_string(),
            });
        }
        value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            value: value.to_string(),
            input: input.to_string(),
        })
    };

    Ok((parse("min", min)?, parse("max", max)?))
}
