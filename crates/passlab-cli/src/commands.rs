//! REPL command parsing.

use std::path::PathBuf;

use thiserror::Error;

/// A pass chosen by name or by its 1-based position in the offered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassRef {
    Name(String),
    Index(usize),
}

impl PassRef {
    fn parse(text: &str) -> Self {
        match text.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(text.to_string()),
        }
    }
}

/// Commands understood by the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Show the offered passes.
    Passes,
    /// Explain why each pass is or is not offered.
    Why,
    Add(PassRef),
    Pop,
    Clear,
    Condense,
    Uncondense,
    Load(PathBuf),
    /// Read a new program from the following lines.
    Input,
    ClearInput,
    Show,
    Source,
    Query,
    Quit,
}

/// Metadata describing a command for the help screen.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub usage: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

pub const COMMANDS: &[CommandMetadata] = &[
    CommandMetadata {
        usage: "help",
        description: "Show this help",
        keywords: &["help", "h", "?"],
    },
    CommandMetadata {
        usage: "passes",
        description: "List the passes that can be added",
        keywords: &["passes", "ls"],
    },
    CommandMetadata {
        usage: "why",
        description: "Show what every pass would do to the current program",
        keywords: &["why"],
    },
    CommandMetadata {
        usage: "add <name|number>",
        description: "Append a pass to the pipeline",
        keywords: &["add", "a"],
    },
    CommandMetadata {
        usage: "pop",
        description: "Remove the last pass",
        keywords: &["pop"],
    },
    CommandMetadata {
        usage: "clear",
        description: "Remove every pass",
        keywords: &["clear"],
    },
    CommandMetadata {
        usage: "condense",
        description: "Only offer passes that change the program",
        keywords: &["condense"],
    },
    CommandMetadata {
        usage: "uncondense",
        description: "Offer every pass",
        keywords: &["uncondense"],
    },
    CommandMetadata {
        usage: "load <path>",
        description: "Load a program from a file and clear the pipeline",
        keywords: &["load"],
    },
    CommandMetadata {
        usage: "input",
        description: "Type a new program, ending with a line containing only '.'",
        keywords: &["input"],
    },
    CommandMetadata {
        usage: "clear-input",
        description: "Remove the program",
        keywords: &["clear-input"],
    },
    CommandMetadata {
        usage: "show",
        description: "Print the transformed program or the error",
        keywords: &["show"],
    },
    CommandMetadata {
        usage: "source",
        description: "Print the input program",
        keywords: &["source"],
    },
    CommandMetadata {
        usage: "query",
        description: "Print the pipeline as a command line",
        keywords: &["query"],
    },
    CommandMetadata {
        usage: "quit",
        description: "Leave the session",
        keywords: &["quit", "exit", "q"],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = parts.collect();

        let command = match head.to_lowercase().as_str() {
            "help" | "h" | "?" => Self::Help,
            "passes" | "ls" => Self::Passes,
            "why" => Self::Why,
            "add" | "a" => match rest.as_slice() {
                [pass] => Self::Add(PassRef::parse(pass)),
                _ => return Err(CommandError::Usage("add <name|number>")),
            },
            "pop" => Self::Pop,
            "clear" => Self::Clear,
            "condense" => Self::Condense,
            "uncondense" => Self::Uncondense,
            "load" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("load <path>"));
                }
                Self::Load(PathBuf::from(rest.join(" ")))
            }
            "input" => Self::Input,
            "clear-input" => Self::ClearInput,
            "show" => Self::Show,
            "source" => Self::Source,
            "query" => Self::Query,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Commands with a keyword starting with `prefix`.
pub fn suggestions(prefix: &str) -> Vec<&'static CommandMetadata> {
    let prefix = prefix.to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    COMMANDS
        .iter()
        .filter(|meta| meta.keywords.iter().any(|kw| kw.starts_with(prefix.as_str())))
        .collect()
}

/// Help screen listing every command.
pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|c| c.usage.len()).max().unwrap_or(0);
    let mut out = String::from("Commands:\n");
    for meta in COMMANDS {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            meta.usage,
            meta.description,
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands_and_aliases() {
        assert_eq!(Command::parse("help"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("  ?  "), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("EXIT"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse("clear-input"), Ok(Some(Command::ClearInput)));
        assert_eq!(Command::parse(""), Ok(None));
    }

    #[test]
    fn add_accepts_names_and_numbers() {
        assert_eq!(
            Command::parse("add cse"),
            Ok(Some(Command::Add(PassRef::Name("cse".to_string()))))
        );
        assert_eq!(
            Command::parse("a 3"),
            Ok(Some(Command::Add(PassRef::Index(3))))
        );
        assert_eq!(
            Command::parse("add"),
            Err(CommandError::Usage("add <name|number>"))
        );
    }

    #[test]
    fn load_keeps_spaces_in_paths() {
        assert_eq!(
            Command::parse("load my dir/prog.ir"),
            Ok(Some(Command::Load(PathBuf::from("my dir/prog.ir"))))
        );
        assert!(Command::parse("load").is_err());
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn suggests_by_keyword_prefix() {
        let usages: Vec<_> = suggestions("con").iter().map(|m| m.usage).collect();
        assert_eq!(usages, vec!["condense"]);
        let usages: Vec<_> = suggestions("cl").iter().map(|m| m.usage).collect();
        assert_eq!(usages, vec!["clear", "clear-input"]);
        assert!(suggestions("zz").is_empty());
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for meta in COMMANDS {
            assert!(help.contains(meta.usage));
        }
    }
}
