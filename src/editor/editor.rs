use color_eyre::{eyre::WrapErr, Report};
use std::{
    fs::{self, File},
    io::{self, BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use super::{Command, CommandError};
use crate::{
    rope::{Rope, RopeError},
    util::Config,
};

/// A rope plus the file it was loaded from, driven by script commands.
pub struct Editor {
    pub(crate) rope: Rope,
    pub(crate) filename: Option<PathBuf>,
    pub(crate) dirty: bool,
    pub(crate) stop: bool,

    config: Config,
}

impl Editor {
    pub fn new(config: Config) -> Result<Self, RopeError> {
        Ok(Self {
            rope: Rope::with_leaf_size(config.leaf_size)?,
            filename: None,
            dirty: false,
            stop: false,
            config,
        })
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_stopped(&self) -> bool {
        self.stop
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), CommandError> {
        let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;

        let mut rope = Rope::with_leaf_size(self.config.leaf_size)?;
        rope.insert(0, &text)?;
        info!(
            path = %path.display(),
            chars = rope.len(),
            height = rope.height(),
            "loaded file"
        );

        self.rope = rope;
        self.filename = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    pub fn save_file(&mut self, path: &Path) -> Result<(), CommandError> {
        let file = File::create(path).map_err(|source| io_error(path, source))?;

        let mut writer = BufWriter::new(file);
        for chunk in self.rope.chunks() {
            writer
                .write_all(chunk.as_bytes())
                .map_err(|source| io_error(path, source))?;
        }
        writer.flush().map_err(|source| io_error(path, source))?;
        info!(
            path = %path.display(),
            chars = self.rope.len(),
            "wrote file"
        );

        self.filename = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// Runs one script line, returning any text it prints.
    pub fn execute(&mut self, line: &str) -> Result<Option<String>, CommandError> {
        let Some(command) = Command::parse(line)? else {
            return Ok(None);
        };
        debug!(?command, "execute");

        let output = match command {
            Command::Insert { offset, text } => {
                self.rope.insert(offset, &text)?;
                self.dirty = true;
                None
            }
            Command::Append(text) => {
                self.rope.push_str(&text);
                self.dirty = true;
                None
            }
            Command::Delete { offset, count } => {
                self.rope.delete(offset, count)?;
                self.dirty = true;
                None
            }
            Command::Print => Some(self.rope.to_string()),
            Command::Slice { start, end } => Some(self.rope.slice(start, end)?),
            Command::CharAt(offset) => Some(self.rope.char_at(offset)?.to_string()),
            Command::Length => Some(self.rope.len().to_string()),
            Command::Edit(path) => {
                self.load_file(&path)?;
                None
            }
            Command::Write(path) => {
                let path = path
                    .or_else(|| self.filename.clone())
                    .ok_or(CommandError::NoFilename)?;
                self.save_file(&path)?;
                None
            }
            Command::Quit => {
                self.stop = true;
                None
            }
        };

        Ok(output)
    }

    /// Executes every line of `input`, writing printed output to `out`.
    ///
    /// Failing commands are logged and skipped unless the editor is strict.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), Report> {
        for (index, line) in input.lines().enumerate() {
            let line = line.wrap_err("failed to read command")?;
            let number = index + 1;

            match self.execute(&line) {
                Ok(Some(output)) => writeln!(out, "{}", output)?,
                Ok(None) => {}
                Err(e) if self.config.strict => {
                    return Err(e).wrap_err_with(|| {
                        format!("command on line {} failed: {}", number, line)
                    });
                }
                Err(e) => warn!(line = number, error = %e, "skipping failed command"),
            }

            if self.stop {
                break;
            }
        }

        out.flush()?;
        Ok(())
    }
}

fn io_error(path: &Path, source: io::Error) -> CommandError {
    CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}
