use std::path::PathBuf;

/// Where structured JSON log lines should go, in addition to the human-readable stderr output
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum JsonLogBehaviour {
    /// Plain text logs on stderr only
    #[default]
    None,
    /// JSON logs on stderr instead of plain text
    Stderr,
    /// Plain text on stderr and JSON lines appended to the given file
    File(PathBuf),
}
