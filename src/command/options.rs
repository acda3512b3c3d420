//! Cache utility operations and their `-Xshareclasses` options
//!
//! Option templates may reference `${cacheName}`, `${cacheDir}` and
//! `${cacheOperation}`; the resolved string is split on spaces into
//! separate launcher arguments.

use crate::command::interpreter::{ExpectedOutcome, MessagePattern};
use crate::command::runner::ForegroundCommand;
use crate::error::CheckerResult;
use crate::store::Persistence;
use std::path::Path;

pub const CACHE_NAME_VAR: &str = "${cacheName}";
pub const CACHE_DIR_VAR: &str = "${cacheDir}";
pub const CACHE_OPERATION_VAR: &str = "${cacheOperation}";

/// Messages the runtime prints when `destroyAll` found nothing or destroyed something
pub const DESTROY_ALL_MESSAGES: &[&str] = &[
    "No shared class caches available",
    "Cache does not exist",
    "shared cache (.*) has been destroyed",
    "cache (.*) is destroyed",
];

/// Level tag printed on every listed cache row
pub const LISTED_CACHE_PATTERN: &str = r"\bJava\d+\b";

/// Substitute template variables and split into arguments
pub fn resolve_options(
    template: &str,
    cache_name: &str,
    cache_dir: &str,
    cache_operation: &str,
) -> Vec<String> {
    template
        .replace(CACHE_NAME_VAR, cache_name)
        .replace(CACHE_DIR_VAR, cache_dir)
        .replace(CACHE_OPERATION_VAR, cache_operation)
        .split(' ')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default template for a named cache, with or without an explicit directory
pub fn default_template(cache_dir: Option<&str>) -> &'static str {
    if cache_dir.is_some() {
        "-Xshareclasses:name=${cacheName},cacheDir=${cacheDir}${cacheOperation}"
    } else {
        "-Xshareclasses:name=${cacheName}${cacheOperation}"
    }
}

/// Make sure the `-Xshareclasses` argument of a template ends with `${cacheOperation}`
fn with_operation_slot(template: &str) -> String {
    if template.contains(CACHE_OPERATION_VAR) {
        return template.to_string();
    }
    template
        .split(' ')
        .map(|part| {
            if part.starts_with("-Xshareclasses") {
                format!("{}{}", part, CACHE_OPERATION_VAR)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the `cacheDir=` sub-option from a `-Xshareclasses` option
pub fn cache_dir_from_option(option: &str) -> Option<String> {
    let (_, suboptions) = option.split_once(':')?;
    suboptions
        .split(',')
        .find_map(|part| part.strip_prefix("cacheDir="))
        .filter(|dir| !dir.is_empty())
        .map(str::to_string)
}

/// A cache utility invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOperation {
    /// Destroy one named cache
    Destroy {
        name: String,
        persistence: Persistence,
    },
    /// Destroy every cache of one kind in a location
    DestroyAll { persistence: Persistence },
    /// Print statistics and look for caller-supplied messages
    PrintStats {
        name: String,
        expected: Vec<String>,
    },
    /// List all caches, optionally requiring one name to be listed
    ListAll { expected_name: Option<String> },
    /// Reset a cache and run `-version`
    Reset { name: String },
}

impl CacheOperation {
    /// Short name used in logs and errors
    pub fn label(&self) -> &'static str {
        match self {
            Self::Destroy { .. } => "destroy",
            Self::DestroyAll { .. } => "destroyAll",
            Self::PrintStats { .. } => "printStats",
            Self::ListAll { .. } => "listAllCaches",
            Self::Reset { .. } => "reset",
        }
    }

    fn cache_name(&self) -> &str {
        match self {
            Self::Destroy { name, .. } | Self::PrintStats { name, .. } | Self::Reset { name } => {
                name
            }
            Self::DestroyAll { .. } | Self::ListAll { .. } => "",
        }
    }

    /// The `${cacheOperation}` text appended to a template
    pub fn suboption(&self) -> String {
        match self {
            Self::Destroy { persistence, .. } | Self::DestroyAll { persistence } => {
                let kind = if persistence.is_persistent() {
                    ""
                } else {
                    ",nonpersistent"
                };
                format!(",{}{}", self.label(), kind)
            }
            Self::PrintStats { .. } | Self::ListAll { .. } | Self::Reset { .. } => {
                format!(",{}", self.label())
            }
        }
    }

    /// Exit codes this operation may finish with
    pub fn expected_outcome(&self) -> ExpectedOutcome {
        match self {
            Self::Reset { .. } => ExpectedOutcome::clean_run(),
            _ => ExpectedOutcome::exit_values(&[0, 1]),
        }
    }

    /// Messages proving the operation worked
    pub fn expected_messages(&self) -> CheckerResult<Vec<MessagePattern>> {
        match self {
            Self::Destroy { name, .. } => Ok(destroy_messages(name)),
            Self::DestroyAll { .. } => MessagePattern::parse_all(DESTROY_ALL_MESSAGES),
            Self::PrintStats { expected, .. } => MessagePattern::parse_all(expected),
            Self::ListAll {
                expected_name: Some(name),
            } => Ok(vec![MessagePattern::literal(name.clone())]),
            Self::ListAll {
                expected_name: None,
            }
            | Self::Reset { .. } => Ok(Vec::new()),
        }
    }

    /// Launcher arguments for this operation
    pub fn jvm_args(&self, cache_dir: Option<&str>, template: Option<&str>) -> Vec<String> {
        match self {
            Self::DestroyAll { .. } | Self::ListAll { .. } if template.is_none() => {
                let dir = cache_dir
                    .map(|d| format!("cacheDir={},", d))
                    .unwrap_or_default();
                let suboption = self.suboption();
                vec![format!(
                    "-Xshareclasses:{}{}",
                    dir,
                    suboption.trim_start_matches(',')
                )]
            }
            _ => {
                let template =
                    with_operation_slot(template.unwrap_or_else(|| default_template(cache_dir)));
                let mut operation = self.suboption();
                if !template.contains(':') {
                    operation = operation.replacen(',', ":", 1);
                }
                let mut args = resolve_options(
                    &template,
                    self.cache_name(),
                    cache_dir.unwrap_or_default(),
                    &operation,
                );
                if matches!(self, Self::Reset { .. }) {
                    args.push("-version".to_string());
                }
                args
            }
        }
    }

    /// Full launcher command for this operation
    pub fn command(
        &self,
        java: &Path,
        cache_dir: Option<&str>,
        template: Option<&str>,
    ) -> ForegroundCommand {
        ForegroundCommand::new(java).args(self.jvm_args(cache_dir, template))
    }
}

/// Messages the runtime prints when it destroyed a named cache
pub fn destroy_messages(name: &str) -> Vec<MessagePattern> {
    vec![
        MessagePattern::literal(format!("shared cache \"{}\" has been destroyed", name)),
        MessagePattern::literal(format!("cache \"{}\" is destroyed", name)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_template_variables() {
        let args = resolve_options(
            "-Xshareclasses:name=${cacheName},cacheDir=${cacheDir}${cacheOperation} -Xmx64m",
            "T1",
            "/tmp/sc",
            ",printStats",
        );
        assert_eq!(
            args,
            vec![
                "-Xshareclasses:name=T1,cacheDir=/tmp/sc,printStats".to_string(),
                "-Xmx64m".to_string()
            ]
        );
    }

    #[test]
    fn destroy_args() {
        let op = CacheOperation::Destroy {
            name: "T3".to_string(),
            persistence: Persistence::NonPersistent,
        };
        assert_eq!(
            op.jvm_args(Some("/tmp/sc"), None),
            vec!["-Xshareclasses:name=T3,cacheDir=/tmp/sc,destroy,nonpersistent".to_string()]
        );

        let op = CacheOperation::Destroy {
            name: "T1".to_string(),
            persistence: Persistence::Persistent,
        };
        assert_eq!(
            op.jvm_args(None, None),
            vec!["-Xshareclasses:name=T1,destroy".to_string()]
        );
    }

    #[test]
    fn destroy_all_args() {
        let op = CacheOperation::DestroyAll {
            persistence: Persistence::NonPersistent,
        };
        assert_eq!(
            op.jvm_args(Some("/r"), None),
            vec!["-Xshareclasses:cacheDir=/r,destroyAll,nonpersistent".to_string()]
        );
        assert_eq!(
            CacheOperation::DestroyAll {
                persistence: Persistence::Persistent
            }
            .jvm_args(None, None),
            vec!["-Xshareclasses:destroyAll".to_string()]
        );
    }

    #[test]
    fn list_with_bare_template_uses_colon() {
        let op = CacheOperation::ListAll {
            expected_name: None,
        };
        assert_eq!(
            op.jvm_args(None, Some("-Xshareclasses")),
            vec!["-Xshareclasses:listAllCaches".to_string()]
        );
    }

    #[test]
    fn reset_requires_clean_exit_and_runs_version() {
        let op = CacheOperation::Reset {
            name: "T2".to_string(),
        };
        let args = op.jvm_args(None, None);
        assert_eq!(args.last().map(String::as_str), Some("-version"));
        assert_eq!(op.expected_outcome(), ExpectedOutcome::clean_run());
        assert!(op.expected_messages().unwrap().is_empty());
    }

    #[test]
    fn destroy_all_messages_parse() {
        let op = CacheOperation::DestroyAll {
            persistence: Persistence::Persistent,
        };
        assert_eq!(op.expected_messages().unwrap().len(), 4);
    }

    #[test]
    fn cache_dir_extraction() {
        assert_eq!(
            cache_dir_from_option("-Xshareclasses:groupAccess,cacheDir=/res,name=X"),
            Some("/res".to_string())
        );
        assert_eq!(cache_dir_from_option("-Xshareclasses:name=X"), None);
        assert_eq!(cache_dir_from_option("-Xshareclasses"), None);
    }
}
