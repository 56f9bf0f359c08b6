//! Line-oriented editing shell.
//!
//! One command per line, words separated by whitespace:
//!
//! ```text
//! open photos/dusk.jpg
//! blur            # uses defaults.blur_intensity
//! rotate 90
//! undo
//! saveas dusk-edited.png
//! ```
//!
//! Commands are parsed into a [`Command`], executed against the shell's
//! [`ImageStore`], and answered with a status line (see
//! [`output::format_status`]). Errors are reported the same way and never end
//! the session; only `quit` or end of input does.

use crate::config::{DefaultsConfig, EditorConfig};
use crate::display::{Display, PreviewRenderer};
use crate::history::HistoryError;
use crate::imaging::{Codec, Operation, ParseOperationError, RustCodec};
use crate::output;
use crate::store::{ImageStore, LoadError, OperationError, SaveError};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Where `preview` writes when no path is given.
pub const DEFAULT_PREVIEW_FILE: &str = "preview.png";

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),
    #[error("{command}: missing argument")]
    MissingArgument { command: String },
    #[error("{command}: {reason}")]
    BadArgument { command: String, reason: String },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("Preview failed: {0}")]
    Preview(#[from] image::ImageError),
}

impl From<ParseOperationError> for ShellError {
    fn from(err: ParseOperationError) -> Self {
        match err {
            ParseOperationError::Empty => Self::UnknownCommand(String::new()),
            ParseOperationError::Unknown(name) => Self::UnknownCommand(name),
            ParseOperationError::MissingArgument { operation, .. } => Self::MissingArgument {
                command: operation,
            },
            ParseOperationError::BadArgument { operation, reason } => Self::BadArgument {
                command: operation,
                reason,
            },
        }
    }
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    Apply(Operation),
    Undo,
    Redo,
    Reset,
    Info,
    History,
    Preview(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    ///
    /// Path arguments take the rest of the line, so they may contain spaces.
    pub fn parse(line: &str, defaults: &DefaultsConfig) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let name = word.to_ascii_lowercase();
        let path_arg = || {
            if rest.is_empty() {
                Err(ShellError::MissingArgument {
                    command: name.clone(),
                })
            } else {
                Ok(PathBuf::from(rest))
            }
        };
        let no_args = |command: Self| {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(ShellError::BadArgument {
                    command: name.clone(),
                    reason: format!("takes no arguments, got {rest:?}"),
                })
            }
        };

        let command = match name.as_str() {
            "open" | "load" => Self::Open(path_arg()?),
            "save" => no_args(Self::Save)?,
            "saveas" | "save-as" => Self::SaveAs(path_arg()?),
            "undo" => no_args(Self::Undo)?,
            "redo" => no_args(Self::Redo)?,
            "reset" => no_args(Self::Reset)?,
            "info" => no_args(Self::Info)?,
            "history" => no_args(Self::History)?,
            "preview" => Self::Preview((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "help" | "?" => no_args(Self::Help)?,
            "quit" | "exit" | "q" => no_args(Self::Quit)?,
            "blur" if rest.is_empty() => Self::Apply(Operation::Blur {
                intensity: defaults.blur_intensity,
            }),
            _ => Self::Apply(line.parse::<Operation>()?),
        };
        Ok(Some(command))
    }
}

/// What a successfully executed command has to say.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// One-line message, shown as a status line.
    Status(String),
    /// Multi-line listing, shown verbatim.
    Lines(Vec<String>),
    Quit,
}

pub fn help_lines() -> Vec<String> {
    [
        "open <path>              Load an image (clears history)",
        "save                     Overwrite the loaded file",
        "saveas <path>            Save to a new file (format from extension)",
        "grayscale                Convert to grayscale",
        "blur [intensity]         Gaussian blur, 1-50",
        "edges                    Edge detection",
        "brightness <delta>       Adjust brightness, -100 to 100",
        "contrast <factor>        Adjust contrast, 0.5 to 3.0",
        "rotate <90|180|270>      Rotate clockwise",
        "flip <horizontal|vertical>",
        "resize <width> <height>  Resize to exact dimensions",
        "undo / redo              Step through history",
        "reset                    Back to the image as loaded (cannot be undone)",
        "info                     Show image details",
        "history                  Show undo/redo depths",
        "preview [path]           Write a viewport-sized PNG preview",
        "quit                     Leave the shell",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Interactive session over one store.
pub struct Shell<C: Codec = RustCodec> {
    store: ImageStore<C>,
    config: EditorConfig,
    display: Option<Box<dyn Display>>,
    prompt: Option<String>,
}

impl<C: Codec> Shell<C> {
    pub fn new(store: ImageStore<C>, config: EditorConfig) -> Self {
        Self {
            store,
            config,
            display: None,
            prompt: None,
        }
    }

    /// Show the current image on `display` after every change.
    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Print `prompt` before reading each line.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_string());
        self
    }

    pub fn store(&self) -> &ImageStore<C> {
        &self.store
    }

    /// Parse and execute one line. `Ok(None)` for blank lines.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<Reply>, ShellError> {
        match Command::parse(line, &self.config.defaults)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, ShellError> {
        debug!(?command, "shell command");
        let message = match command {
            Command::Open(path) => {
                self.store.load(&path)?;
                self.refresh();
                format!("Opened: {}", file_name(&path))
            }
            Command::Save => {
                self.store.save_to_source()?;
                "Image saved".to_string()
            }
            Command::SaveAs(path) => {
                self.store.save_as(&path)?;
                format!("Saved: {}", file_name(&path))
            }
            Command::Apply(op) => {
                self.store.apply_operation(&op)?;
                self.refresh();
                output::operation_message(&op)
            }
            Command::Undo => {
                self.store.undo()?;
                self.refresh();
                "Undone".to_string()
            }
            Command::Redo => {
                self.store.redo()?;
                self.refresh();
                "Redone".to_string()
            }
            Command::Reset => {
                self.store.reset_to_original()?;
                self.refresh();
                "Reset to original".to_string()
            }
            Command::Info => return Ok(Reply::Lines(output::format_info(&self.store.info()))),
            Command::History => {
                return Ok(Reply::Lines(output::format_history(
                    self.store.undo_depth(),
                    self.store.redo_depth(),
                    self.store.max_history(),
                )));
            }
            Command::Preview(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_PREVIEW_FILE));
                let current = self
                    .store
                    .current_image()
                    .ok_or(OperationError::NoImageLoaded)?;
                let [width, height] = self.config.display.viewport;
                let (w, h) = PreviewRenderer::new(&path, (width, height)).write_to(&current, &path)?;
                format!(
                    "Preview written: {} ({})",
                    path.display(),
                    output::format_dimensions(w, h)
                )
            }
            Command::Help => return Ok(Reply::Lines(help_lines())),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Status(message))
    }

    /// Read commands from `input` until `quit` or end of input, writing
    /// replies to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut raw = Vec::new();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(output, "{prompt}")?;
                output.flush()?;
            }
            raw.clear();
            if input.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            // Undecodable bytes become U+FFFD; the line is then rejected like any other typo.
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            let reply = match self.handle_line(line) {
                Ok(Some(reply)) => reply,
                Ok(None) => continue,
                Err(e) => Reply::Status(e.to_string()),
            };
            match reply {
                Reply::Status(message) => {
                    writeln!(output, "{}", output::format_status(&message, &self.store.info()))?;
                }
                Reply::Lines(lines) => {
                    for line in lines {
                        writeln!(output, "{line}")?;
                    }
                }
                Reply::Quit => break,
            }
        }
        Ok(())
    }

    fn refresh(&mut self) {
        if let Some(display) = self.display.as_mut() {
            if let Some(current) = self.store.current_image() {
                display.render(&current);
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
