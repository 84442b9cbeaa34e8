//! Prompt-trace wire codec.
//!
//! The Narrative service stores the prompts a story was written from as a
//! single string: the tokens joined by `#`, with a leading and a trailing
//! `#`. Three prompts encode as `#sunrise#ocean#lantern#`; no prompts encode
//! as `##`.

use thiserror::Error;

/// Delimiter bracketing and separating prompt tokens.
pub const DELIMITER: char = '#';

/// Errors raised when a prompt cannot be represented in a trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Empty tokens are indistinguishable from the bracketing delimiters.
    #[error("prompt {index} is empty")]
    EmptyToken {
        /// Position of the offending prompt.
        index: usize,
    },

    /// The token would split into several prompts on decode.
    #[error("prompt {token:?} contains the trace delimiter '{DELIMITER}'")]
    DelimiterInToken {
        /// The offending prompt.
        token: String,
    },
}

/// Checks that every prompt can round-trip through a trace.
///
/// # Errors
///
/// Returns the first `TraceError` found, in sequence order.
pub fn validate<S: AsRef<str>>(prompts: &[S]) -> Result<(), TraceError> {
    for (index, prompt) in prompts.iter().enumerate() {
        let prompt = prompt.as_ref();
        if prompt.is_empty() {
            return Err(TraceError::EmptyToken { index });
        }
        if prompt.contains(DELIMITER) {
            return Err(TraceError::DelimiterInToken {
                token: prompt.to_owned(),
            });
        }
    }
    Ok(())
}

/// Encodes prompts into the wire format.
///
/// # Errors
///
/// Returns a `TraceError` if any prompt is empty or contains the delimiter.
pub fn encode<S: AsRef<str>>(prompts: &[S]) -> Result<String, TraceError> {
    validate(prompts)?;
    let mut trace = String::from(DELIMITER);
    for prompt in prompts {
        trace.push_str(prompt.as_ref());
        trace.push(DELIMITER);
    }
    if prompts.is_empty() {
        trace.push(DELIMITER);
    }
    Ok(trace)
}

/// Decodes a trace back into its prompts.
///
/// Splits on the delimiter and drops the empty tokens produced by the
/// leading and trailing delimiters. `##` and the empty string both decode
/// to no prompts. Traces missing a bracket are tolerated.
#[must_use]
pub fn decode(trace: &str) -> Vec<String> {
    let inner = trace.strip_prefix(DELIMITER).unwrap_or(trace);
    let inner = inner.strip_suffix(DELIMITER).unwrap_or(inner);
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split(DELIMITER).map(str::to_owned).collect()
}
