use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlanceError {
    #[error("line {line_number}: status line before any repository marker: {line}")]
    Sequencing { line_number: usize, line: String },
    #[error("line {line_number}: malformed file status line: {line}")]
    MalformedFileStatusLine { line_number: usize, line: String },
    #[error("line {line_number}: duplicate repository: {name}")]
    DuplicateRepository { name: String, line_number: usize },
}

impl GlanceError {
    pub fn line_number(&self) -> usize {
        match self {
            GlanceError::Sequencing { line_number, .. }
            | GlanceError::MalformedFileStatusLine { line_number, .. }
            | GlanceError::DuplicateRepository { line_number, .. } => *line_number,
        }
    }
}

pub type Result<T> = std::result::Result<T, GlanceError>;
