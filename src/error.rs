use ppi_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Processing error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_png_decode() {
        let error = PipelineError::PngDecode("410nm.png: invalid signature".to_string());
        assert_eq!(
            error.to_string(),
            "PNG decode error: 410nm.png: invalid signature"
        );
    }

    #[test]
    fn test_pipeline_error_png_encode() {
        let error = PipelineError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_pipeline_error_config() {
        let error = PipelineError::Config("unknown field `metod`".to_string());
        assert_eq!(error.to_string(), "Config error: unknown field `metod`");
    }

    #[test]
    fn test_pipeline_error_from_core_error() {
        let core = CoreError::InputNotFound("no *nm.png files in data".to_string());
        let error: PipelineError = core.into();
        match &error {
            PipelineError::Core(CoreError::InputNotFound(_)) => {}
            _ => panic!("Expected Core variant"),
        }
        assert_eq!(
            error.to_string(),
            "Processing error: input not found: no *nm.png files in data"
        );
    }

    #[test]
    fn test_pipeline_error_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: PipelineError = io.into();
        assert!(matches!(error, PipelineError::Io(_)));
    }
}
