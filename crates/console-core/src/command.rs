//! Submitted-line classification.
//!
//! Converts one submitted line into a [`ParsedCommand`]. Parsing is pure; the
//! controller executes the result against the display surface and notice sink.
//! Unknown input is not an error: it classifies as [`ParsedCommand::Echo`].

/// A submitted line split into its command name and argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Split on single spaces. Runs of spaces yield empty tokens between them,
    /// trailing empty tokens are dropped. A blank line yields an empty name.
    pub fn tokenize(line: &str) -> Self {
        let mut tokens: Vec<String> = line.split(' ').map(str::to_string).collect();
        while tokens.last().is_some_and(String::is_empty) {
            tokens.pop();
        }
        let mut iter = tokens.into_iter();
        let name = iter.next().unwrap_or_default();
        Self {
            name,
            args: iter.collect(),
        }
    }

    // Unicode case-insensitive: `ſtart` and `START` both name `start`.
    fn is(&self, keyword: &str) -> bool {
        fold_case(&self.name).eq(fold_case(keyword))
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Clear,
    Start { args: Vec<String> },
    Echo(String),
}

impl ParsedCommand {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedCommand::Clear => "clear",
            ParsedCommand::Start { .. } => "start",
            ParsedCommand::Echo(_) => "echo",
        }
    }
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(line: &str) -> ParsedCommand {
        let invocation = Invocation::tokenize(line);
        if invocation.is("clear") {
            ParsedCommand::Clear
        } else if invocation.is("start") {
            ParsedCommand::Start {
                args: invocation.args,
            }
        } else {
            ParsedCommand::Echo(line.to_string())
        }
    }
}

/// Messages shown by `start`: one per argument, each a longer prefix of the
/// space-joined arguments. Non-final prefixes keep their trailing space.
pub fn start_notices(args: &[String]) -> Vec<String> {
    let mut message = String::new();
    let mut out = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        message.push_str(arg);
        if i + 1 != args.len() {
            message.push(' ');
        }
        out.push(message.clone());
    }
    out
}
