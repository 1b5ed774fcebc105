/*!
 * Tests for error types and conversions
 */

use yadt::errors::{AppError, ConversionError, DocumentError, ProviderError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 456,
        message: "Quota exceeded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("456"));
    assert!(display.contains("Quota exceeded"));
}

#[test]
fn test_providerError_connectionError_shouldDisplayCorrectly() {
    let error = ProviderError::ConnectionError("Host unreachable".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Connection error"));
    assert!(display.contains("Host unreachable"));
}

#[test]
fn test_providerError_countMismatch_shouldDisplayBothCounts() {
    let error = ProviderError::CountMismatch { expected: 45, actual: 44 };
    let display = format!("{}", error);
    assert!(display.contains("45"));
    assert!(display.contains("44"));
}

#[test]
fn test_conversionError_toolMissing_shouldNameTool() {
    let error = ConversionError::ToolMissing("soffice".to_string());
    assert!(format!("{}", error).contains("soffice"));
}

#[test]
fn test_appError_fromProviderError_shouldWrap() {
    let error: AppError = ProviderError::ParseError("bad json".to_string()).into();
    assert!(matches!(error, AppError::Provider(ProviderError::ParseError(_))));
    assert!(format!("{}", error).contains("bad json"));
}

#[test]
fn test_appError_fromConversionError_shouldWrap() {
    let error: AppError = ConversionError::Timeout(120).into();
    assert!(matches!(error, AppError::Conversion(ConversionError::Timeout(120))));
}

#[test]
fn test_appError_fromDocumentError_shouldWrap() {
    let error: AppError = DocumentError::MissingPart("ppt/presentation.xml".to_string()).into();
    assert!(matches!(error, AppError::Document(DocumentError::MissingPart(_))));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pptx");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_documentError_fromSerdeJson_shouldBecomeNotebookError() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: DocumentError = json_error.into();
    assert!(matches!(error, DocumentError::Notebook(_)));
}

#[test]
fn test_appError_emptyInput_shouldSayNothingToTranslate() {
    let error = AppError::EmptyInput("deck.pptx".to_string());
    assert_eq!(format!("{}", error), "Nothing to translate in deck.pptx");
}
