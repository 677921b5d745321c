/// Lines captured from one pipeline stage.
///
/// Append-only while the producing stage runs; afterwards it is moved to the next
/// stage, which reads the lines in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellBuffer {
    lines: Vec<String>,
}

impl ShellBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl<'a> IntoIterator for &'a ShellBuffer {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ShellBuffer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}
