use std::collections::HashMap;
use std::ffi::OsStr;
use std::process::{Command, Output};

use crate::error::CorpusError;

/// A shell command line with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    template: String,
}

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute placeholders. Names missing from `values` render as empty
    /// strings; `{{` and `}}` produce literal braces.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, CorpusError> {
        let mut out = String::with_capacity(self.template.len());
        let mut chars = self.template.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for next in chars.by_ref() {
                        if next == '}' {
                            closed = true;
                            break;
                        }
                        name.push(next);
                    }
                    if !closed {
                        return Err(CorpusError::invalid_input(format!(
                            "unterminated placeholder in command template '{}'",
                            self.template
                        )));
                    }
                    if let Some(value) = values.get(name.trim()) {
                        out.push_str(value);
                    }
                }
                _ => out.push(ch),
            }
        }
        Ok(out)
    }
}

/// Run a rendered command line through `sh -c` and wait for it.
pub fn run_shell(command_line: &str) -> Result<(), CorpusError> {
    tracing::debug!(command = command_line, "running shell command");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .status()
        .map_err(|err| CorpusError::process("sh", err))?;
    if status.success() {
        Ok(())
    } else {
        Err(CorpusError::process(
            "sh",
            format!("`{command_line}` exited with {status}"),
        ))
    }
}

/// Run a program with explicit arguments, capturing its output.
pub fn run_program<I, S>(program: &str, args: I) -> Result<Output, CorpusError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| CorpusError::process(program, err))?;
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(CorpusError::process(
        program,
        format!("exited with {}: {}", output.status, stderr.trim()),
    ))
}

/// Quote an argument for display in a copy-pasteable command line.
pub fn display_arg(arg: &OsStr) -> String {
    let text = arg.to_string_lossy();
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_alphanumeric() || "-_./:=+,".contains(ch));
    if plain {
        text.into_owned()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}
