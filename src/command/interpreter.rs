//! Verdicts for cache utility commands
//!
//! Cache utilities report through diagnostic messages, not exit codes:
//! destroy, printStats and listAllCaches exit with 1 when they worked, and a
//! 0 can mean nothing happened. A command therefore passes only when one of
//! the expected messages shows up in its captured output. The exit code is
//! only checked against the allowed set.

use crate::command::runner::CommandOutput;
use crate::error::{CheckerError, CheckerResult};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Which captured stream to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
    Both,
}

/// A message to look for, either a plain substring or a regex
#[derive(Debug, Clone)]
pub enum MessagePattern {
    Literal(String),
    Regex(Regex),
}

const REGEX_META: &[char] = &['(', '*', '[', '+', '?', '^', '$', '|'];

impl MessagePattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn regex(pattern: &str) -> CheckerResult<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| CheckerError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Regex when the text carries regex metacharacters, literal otherwise
    pub fn parse(text: &str) -> CheckerResult<Self> {
        if text.contains(REGEX_META) {
            Self::regex(text)
        } else {
            Ok(Self::literal(text))
        }
    }

    /// Parse a list of patterns
    pub fn parse_all<S: AsRef<str>>(texts: &[S]) -> CheckerResult<Vec<Self>> {
        texts.iter().map(|t| Self::parse(t.as_ref())).collect()
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(text) => line.contains(text.as_str()),
            Self::Regex(re) => re.is_match(line),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Regex(re) => re.as_str(),
        }
    }
}

impl fmt::Display for MessagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit codes a command is allowed to finish with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedOutcome {
    allowed_exit_codes: Vec<i32>,
}

impl ExpectedOutcome {
    /// Any of the given exit codes is acceptable
    pub fn exit_values(codes: &[i32]) -> Self {
        Self {
            allowed_exit_codes: codes.to_vec(),
        }
    }

    /// Only exit code 0
    pub fn clean_run() -> Self {
        Self::exit_values(&[0])
    }

    pub fn allows(&self, code: Option<i32>) -> bool {
        code.is_some_and(|c| self.allowed_exit_codes.contains(&c))
    }
}

/// Why a command did not pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Exit code outside the allowed set, or killed by a signal (`None`)
    UnexpectedExitCode(Option<i32>),
    /// None of the expected messages was printed
    NoExpectedMessage,
}

/// Result of interpreting a finished command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandVerdict {
    Success {
        /// First pattern that matched, if any were required
        pattern: Option<String>,
        /// Lines matching any pattern
        matches: usize,
    },
    Failure(FailureReason),
}

impl CommandVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for CommandVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                pattern: Some(p),
                matches,
            } => write!(f, "success ({} line(s) matched '{}')", matches, p),
            Self::Success { pattern: None, .. } => write!(f, "success"),
            Self::Failure(FailureReason::UnexpectedExitCode(Some(code))) => {
                write!(f, "failure (unexpected exit code {})", code)
            }
            Self::Failure(FailureReason::UnexpectedExitCode(None)) => {
                write!(f, "failure (terminated by signal)")
            }
            Self::Failure(FailureReason::NoExpectedMessage) => {
                write!(f, "failure (no expected message found)")
            }
        }
    }
}

/// Count lines matching any of the patterns
pub fn count_matches(text: &str, patterns: &[MessagePattern]) -> usize {
    text.lines()
        .filter(|line| patterns.iter().any(|p| p.is_match(line)))
        .count()
}

/// Decide whether a command did what it was asked to.
///
/// With no patterns, an allowed exit code alone is success.
pub fn interpret(
    output: &CommandOutput,
    expected: &ExpectedOutcome,
    patterns: &[MessagePattern],
    stream: Stream,
) -> CommandVerdict {
    if !expected.allows(output.exit_code) {
        return CommandVerdict::Failure(FailureReason::UnexpectedExitCode(output.exit_code));
    }

    if patterns.is_empty() {
        return CommandVerdict::Success {
            pattern: None,
            matches: 0,
        };
    }

    let text = match stream {
        Stream::Stdout => output.stdout.clone(),
        Stream::Stderr => output.stderr.clone(),
        Stream::Both => output.combined(),
    };

    let matches = count_matches(&text, patterns);
    if matches == 0 {
        return CommandVerdict::Failure(FailureReason::NoExpectedMessage);
    }

    let pattern = patterns
        .iter()
        .find(|p| text.lines().any(|line| p.is_match(line)))
        .map(|p| p.as_str().to_string());

    CommandVerdict::Success { pattern, matches }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destroy_patterns(name: &str) -> Vec<MessagePattern> {
        vec![
            MessagePattern::literal(format!("shared cache \"{}\" has been destroyed", name)),
            MessagePattern::literal(format!("cache \"{}\" is destroyed", name)),
        ]
    }

    #[test]
    fn exit_code_one_with_message_is_success() {
        let output = CommandOutput::new(1, "", "JVMSHRC806I Compressed references persistent shared cache \"mycache\" is destroyed\n");
        let verdict = interpret(
            &output,
            &ExpectedOutcome::exit_values(&[0, 1]),
            &destroy_patterns("mycache"),
            Stream::Stderr,
        );
        assert!(verdict.is_success());
        assert_eq!(
            verdict,
            CommandVerdict::Success {
                pattern: Some("cache \"mycache\" is destroyed".to_string()),
                matches: 1
            }
        );
    }

    #[test]
    fn exit_code_zero_without_message_is_failure() {
        let output = CommandOutput::new(0, "", "nothing to see\n");
        let verdict = interpret(
            &output,
            &ExpectedOutcome::exit_values(&[0, 1]),
            &destroy_patterns("mycache"),
            Stream::Stderr,
        );
        assert_eq!(verdict, CommandVerdict::Failure(FailureReason::NoExpectedMessage));
    }

    #[test]
    fn exit_code_outside_allowed_set_fails() {
        let output = CommandOutput::new(2, "", "cache \"mycache\" is destroyed\n");
        let verdict = interpret(
            &output,
            &ExpectedOutcome::exit_values(&[0, 1]),
            &destroy_patterns("mycache"),
            Stream::Stderr,
        );
        assert_eq!(
            verdict,
            CommandVerdict::Failure(FailureReason::UnexpectedExitCode(Some(2)))
        );

        let killed = CommandOutput {
            exit_code: None,
            ..CommandOutput::default()
        };
        assert!(!interpret(&killed, &ExpectedOutcome::clean_run(), &[], Stream::Both).is_success());
    }

    #[test]
    fn message_on_wrong_stream_does_not_count() {
        let output = CommandOutput::new(1, "cache \"mycache\" is destroyed\n", "");
        let verdict = interpret(
            &output,
            &ExpectedOutcome::exit_values(&[0, 1]),
            &destroy_patterns("mycache"),
            Stream::Stderr,
        );
        assert!(!verdict.is_success());
    }

    #[test]
    fn regex_patterns() {
        let patterns = MessagePattern::parse_all(&[
            "No shared class caches available",
            "shared cache (.*) has been destroyed",
        ])
        .unwrap();
        assert!(matches!(patterns[0], MessagePattern::Literal(_)));
        assert!(matches!(patterns[1], MessagePattern::Regex(_)));

        let text = "shared cache \"a\" has been destroyed\nshared cache \"b\" has been destroyed\nother\n";
        assert_eq!(count_matches(text, &patterns), 2);
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = MessagePattern::parse("broken (pattern").unwrap_err();
        assert!(matches!(err, CheckerError::InvalidPattern { .. }));
    }

    #[test]
    fn no_patterns_means_clean_run() {
        let output = CommandOutput::new(0, "openjdk version", "");
        assert!(interpret(&output, &ExpectedOutcome::clean_run(), &[], Stream::Both).is_success());
        let output = CommandOutput::new(1, "", "");
        assert!(!interpret(&output, &ExpectedOutcome::clean_run(), &[], Stream::Both).is_success());
    }
}
