pub type GlyphcardResult<T> = Result<T, GlyphcardError>;

#[derive(thiserror::Error, Debug)]
pub enum GlyphcardError {
    #[error("config error: {0}")]
    Config(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphcardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GlyphcardError::config("x")
                .to_string()
                .contains("config error:")
        );
        assert!(
            GlyphcardError::layout("x")
                .to_string()
                .contains("layout error:")
        );
        assert!(
            GlyphcardError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            GlyphcardError::backend("x")
                .to_string()
                .contains("backend error:")
        );
    }

    #[test]
    fn io_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GlyphcardError::from(base);
        assert!(err.to_string().contains("boom"));
    }
}
