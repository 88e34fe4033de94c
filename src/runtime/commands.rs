//! Line commands accepted by the shell.

use std::str::FromStr;

use thiserror::Error;

/// Which library entry `play` refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// 1-based position in the `list` output.
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    List,
    /// Show the current play queue.
    Queue,
    Play(Selector),
    Toggle,
    Pause,
    Stop,
    Next,
    Prev,
    /// Absolute seek, in seconds.
    Seek(f64),
    /// Skip forward; `None` uses the configured step.
    Forward(Option<f64>),
    /// Skip backward; `None` uses the configured step.
    Rewind(Option<f64>),
    Volume(f32),
    VolumeUp,
    VolumeDown,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
}

fn number<T: FromStr>(arg: &str) -> Result<T, ParseCommandError> {
    arg.parse()
        .map_err(|_| ParseCommandError::InvalidNumber(arg.to_string()))
}

fn optional_number(arg: &str) -> Result<Option<f64>, ParseCommandError> {
    if arg.is_empty() {
        Ok(None)
    } else {
        number(arg).map(Some)
    }
}

impl FromStr for ControlCmd {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        if word.is_empty() {
            return Err(ParseCommandError::Empty);
        }

        let cmd = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => ControlCmd::List,
            "queue" | "qu" => ControlCmd::Queue,
            "play" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument("play"));
                }
                match rest.parse::<usize>() {
                    Ok(n) => ControlCmd::Play(Selector::Index(n)),
                    Err(_) => ControlCmd::Play(Selector::Id(rest.to_string())),
                }
            }
            "toggle" | "p" => ControlCmd::Toggle,
            "pause" => ControlCmd::Pause,
            "stop" => ControlCmd::Stop,
            "next" | "n" => ControlCmd::Next,
            "prev" | "b" => ControlCmd::Prev,
            "seek" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument("seek"));
                }
                ControlCmd::Seek(number(rest)?)
            }
            "ff" => ControlCmd::Forward(optional_number(rest)?),
            "rw" => ControlCmd::Rewind(optional_number(rest)?),
            "vol+" => ControlCmd::VolumeUp,
            "vol-" => ControlCmd::VolumeDown,
            "vol" | "volume" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument("vol"));
                }
                ControlCmd::Volume(number(rest)?)
            }
            "status" | "s" => ControlCmd::Status,
            "help" | "?" => ControlCmd::Help,
            "quit" | "q" | "exit" => ControlCmd::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}
