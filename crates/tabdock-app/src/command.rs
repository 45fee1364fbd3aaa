// Line-oriented command language read by the driver.

use std::fmt;
use std::str::FromStr;

use tabdock_core::{PanelId, TabRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open { id: u64, title: String },
    Folder { id: u64, title: String },
    Close(TabRef),
    Activate(TabRef),
    Title(TabRef, String),
    Dirty(TabRef, bool),
    AddPanel,
    RemovePanel(PanelId),
    Focus(PanelId),
    Reorder { panel: PanelId, from: usize, to: usize },
    Move { from: PanelId, to: PanelId, tab: TabRef, index: Option<usize> },
    Split { from: PanelId, tab: TabRef, target: PanelId },
    Resize { left: PanelId, right: PanelId, dx: f32, container_px: f32 },
    /// Press on a tab, drag the pointer to (x, y) and release.
    Drag { tab: TabRef, x: f32, y: f32 },
    Sidebar(bool),
    Expand(u64),
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseCommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str, argument: &'static str },
    InvalidArgument { argument: &'static str, value: String },
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCommandError::Empty => write!(f, "empty command"),
            ParseCommandError::Unknown(name) => write!(f, "unknown command '{name}'"),
            ParseCommandError::MissingArgument { command, argument } => {
                write!(f, "{command}: missing <{argument}>")
            }
            ParseCommandError::InvalidArgument { argument, value } => {
                write!(f, "invalid <{argument}>: '{value}'")
            }
        }
    }
}

impl std::error::Error for ParseCommandError {}

/// Cursor over the whitespace-separated words of one command line.
struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn word(&mut self, argument: &'static str) -> Result<&'a str, ParseCommandError> {
        self.words.next().ok_or(ParseCommandError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn parse<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseCommandError> {
        let word = self.word(argument)?;
        word.parse().map_err(|_| ParseCommandError::InvalidArgument {
            argument,
            value: word.to_string(),
        })
    }

    fn optional<T: FromStr>(&mut self, argument: &'static str) -> Result<Option<T>, ParseCommandError> {
        match self.words.next() {
            Some(word) => word.parse().map(Some).map_err(|_| ParseCommandError::InvalidArgument {
                argument,
                value: word.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn panel(&mut self, argument: &'static str) -> Result<PanelId, ParseCommandError> {
        self.word(argument).map(PanelId::new)
    }

    fn flag(&mut self, argument: &'static str) -> Result<bool, ParseCommandError> {
        let word = self.word(argument)?;
        match word {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(ParseCommandError::InvalidArgument {
                argument,
                value: word.to_string(),
            }),
        }
    }

    /// The rest of the line, joined by single spaces.
    fn rest(&mut self, argument: &'static str) -> Result<String, ParseCommandError> {
        let rest: Vec<&str> = self.words.by_ref().collect();
        if rest.is_empty() {
            return Err(ParseCommandError::MissingArgument {
                command: self.command,
                argument,
            });
        }
        Ok(rest.join(" "))
    }
}

pub(crate) const COMMANDS: &[&str] = &[
    "open", "folder", "close", "activate", "title", "dirty", "add-panel", "remove-panel", "focus", "reorder",
    "move", "split", "resize", "drag", "sidebar", "expand", "show", "quit",
];

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseCommandError::Empty)?;
        let command = COMMANDS
            .iter()
            .copied()
            .find(|c| *c == name)
            .ok_or_else(|| ParseCommandError::Unknown(name.to_string()))?;
        let mut args = Args { command, words };

        let cmd = match command {
            "open" => Command::Open {
                id: args.parse("id")?,
                title: args.rest("title")?,
            },
            "folder" => Command::Folder {
                id: args.parse("id")?,
                title: args.rest("title")?,
            },
            "close" => Command::Close(args.parse("tab")?),
            "activate" => Command::Activate(args.parse("tab")?),
            "title" => Command::Title(args.parse("tab")?, args.rest("title")?),
            "dirty" => Command::Dirty(args.parse("tab")?, args.flag("dirty")?),
            "add-panel" => Command::AddPanel,
            "remove-panel" => Command::RemovePanel(args.panel("panel")?),
            "focus" => Command::Focus(args.panel("panel")?),
            "reorder" => Command::Reorder {
                panel: args.panel("panel")?,
                from: args.parse("from")?,
                to: args.parse("to")?,
            },
            "move" => Command::Move {
                from: args.panel("from")?,
                to: args.panel("to")?,
                tab: args.parse("tab")?,
                index: args.optional("index")?,
            },
            "split" => Command::Split {
                from: args.panel("from")?,
                tab: args.parse("tab")?,
                target: args.panel("target")?,
            },
            "resize" => Command::Resize {
                left: args.panel("left")?,
                right: args.panel("right")?,
                dx: args.parse("dx")?,
                container_px: args.parse("container-px")?,
            },
            "drag" => Command::Drag {
                tab: args.parse("tab")?,
                x: args.parse("x")?,
                y: args.parse("y")?,
            },
            "sidebar" => Command::Sidebar(args.flag("open")?),
            "expand" => Command::Expand(args.parse("folder-id")?),
            "show" => Command::Show,
            "quit" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(name.to_string())),
        };
        Ok(cmd)
    }
}
