use std::io::{self, BufRead, Write};

use crate::ops::controller::TextPrompt;

/// Line prompt for `tl edit <ID>` without text. The question goes to
/// `output` (stderr in the binary) so stdout stays scriptable.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn new() -> Self {
        StdinPrompt {
            input: io::stdin().lock(),
            output: io::stderr(),
        }
    }
}

impl Default for StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        StdinPrompt { input, output }
    }
}

impl<R: BufRead, W: Write> TextPrompt for StdinPrompt<R, W> {
    /// EOF or a read error cancels; an empty line is returned as-is and
    /// rejected by the controller.
    fn prompt(&mut self, message: &str, initial: &str) -> Option<String> {
        let _ = writeln!(self.output, "{}: {}", message, initial);
        let _ = write!(self.output, "> ");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}
