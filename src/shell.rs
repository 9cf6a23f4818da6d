//! Line-oriented editor shell.
//!
//! Each input line maps to one session action, the way a menu entry or
//! toolbar button would. Errors are reported and the shell keeps going.

use std::path::PathBuf;

use imagedit_core::AppResult;
use imagedit_service::EditorSession;

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Open an image file.
    Open(PathBuf),
    /// Next image in the directory.
    Next,
    /// Previous image in the directory.
    Previous,
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// Rotate the view counter-clockwise.
    RotateLeft,
    /// Rotate the view clockwise.
    RotateRight,
    /// List plugins by group.
    Plugins,
    /// Apply a plugin by display name.
    Apply(String),
    /// Save the current image.
    Save(PathBuf),
    /// Show the status line.
    Status,
    /// Show the command list.
    Help,
    /// Leave the shell.
    Quit,
}

/// What the shell does after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading, optionally printing a message first.
    Continue(Option<String>),
    /// Stop.
    Quit,
}

pub const HELP: &str = "\
Commands:
  open <path>        open an image
  next | n           next image in the directory
  prev | p           previous image in the directory
  zoom-in | +        zoom in
  zoom-out | -       zoom out
  rotate-left        rotate the view 90° counter-clockwise
  rotate-right       rotate the view 90° clockwise
  plugins            list plugins by group
  apply <name>       run a plugin on the current image
  save <path>        save the current image (format from extension)
  status             show the current image
  help               this text
  quit | exit        leave";

impl ShellCommand {
    /// Parses a line. `Ok(None)` for blank input.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "open" | "o" => Self::Open(required_path(rest, "open")?),
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "zoom-in" | "+" => Self::ZoomIn,
            "zoom-out" | "-" => Self::ZoomOut,
            "rotate-left" => Self::RotateLeft,
            "rotate-right" => Self::RotateRight,
            "plugins" => Self::Plugins,
            "apply" | "a" => {
                if rest.is_empty() {
                    return Err("usage: apply <plugin name>".to_string());
                }
                Self::Apply(rest.to_string())
            }
            "save" | "save-as" => Self::Save(required_path(rest, "save")?),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };

        Ok(Some(command))
    }
}

fn required_path(rest: &str, command: &str) -> Result<PathBuf, String> {
    if rest.is_empty() {
        Err(format!("usage: {command} <path>"))
    } else {
        Ok(PathBuf::from(rest))
    }
}

/// The interactive editor.
#[derive(Debug)]
pub struct Shell {
    session: EditorSession,
    /// Plugin groups in menu order.
    groups: Vec<String>,
}

impl Shell {
    /// Wraps a session; `groups` orders the plugin listing.
    pub fn new(session: EditorSession, groups: Vec<String>) -> Self {
        Self { session, groups }
    }

    /// Handles one input line.
    pub fn handle(&mut self, line: &str) -> Outcome {
        match ShellCommand::parse(line) {
            Ok(None) => Outcome::Continue(None),
            Ok(Some(ShellCommand::Quit)) => Outcome::Quit,
            Ok(Some(command)) => match self.run(command) {
                Ok(message) => Outcome::Continue(message),
                Err(e) => Outcome::Continue(Some(format!("Error: {e}"))),
            },
            Err(e) => Outcome::Continue(Some(e)),
        }
    }

    fn run(&mut self, command: ShellCommand) -> AppResult<Option<String>> {
        let message = match command {
            ShellCommand::Open(path) => {
                self.session.open(&path)?;
                self.status()
            }
            ShellCommand::Next => {
                if self.session.next()? {
                    self.status()
                } else {
                    "No next image".to_string()
                }
            }
            ShellCommand::Previous => {
                if self.session.previous()? {
                    self.status()
                } else {
                    "No previous image".to_string()
                }
            }
            ShellCommand::ZoomIn => {
                self.session.zoom_in();
                self.view()
            }
            ShellCommand::ZoomOut => {
                self.session.zoom_out();
                self.view()
            }
            ShellCommand::RotateLeft => {
                self.session.rotate_left();
                self.view()
            }
            ShellCommand::RotateRight => {
                self.session.rotate_right();
                self.view()
            }
            ShellCommand::Plugins => self.plugin_menu(),
            ShellCommand::Apply(name) => {
                self.session.apply_plugin(&name)?;
                self.status()
            }
            ShellCommand::Save(path) => {
                self.session.save_as(&path)?;
                format!("Saved to {}", path.display())
            }
            ShellCommand::Status => self.status(),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(None),
        };
        Ok(Some(message))
    }

    fn status(&self) -> String {
        let nav = self.session.navigation();
        let mut line = self.session.status_line();
        if nav.has_previous || nav.has_next {
            line.push_str(&format!(
                "  [{}|{}]",
                if nav.has_previous { "prev" } else { "    " },
                if nav.has_next { "next" } else { "    " }
            ));
        }
        line
    }

    fn view(&self) -> String {
        let Some(image) = self.session.current() else {
            return "No image loaded".to_string();
        };
        let view = self.session.view();
        let (w, h) = view.display_size(image.width(), image.height());
        format!(
            "Zoom {:.0}%, rotation {}°, shown at {}x{}",
            view.scale * 100.0,
            view.rotation,
            w,
            h
        )
    }

    fn plugin_menu(&self) -> String {
        let registry = self.session.registry();
        if registry.is_empty() {
            return "No plugins loaded".to_string();
        }

        let mut lines = Vec::new();
        for group in &self.groups {
            let names = registry.names_in_group(group);
            let listed = if names.is_empty() {
                "(none)".to_string()
            } else {
                names.join(", ")
            };
            lines.push(format!("{group}: {listed}"));
        }
        lines.join("\n")
    }
}
