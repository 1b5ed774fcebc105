/*!
 * Tests for legacy deck conversion
 */

use yadt::app_config::ConversionConfig;
use yadt::converter::{find_converted, LegacyConverter};
use yadt::errors::ConversionError;
use crate::common;

fn converter(command: &str, timeout_secs: u64) -> LegacyConverter {
    LegacyConverter::new(&ConversionConfig {
        command: command.to_string(),
        timeout_secs,
    })
}

#[test]
fn test_convert_withMissingTool_shouldBeToolMissing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let ppt = common::create_test_file(temp_dir.path(), "cours.ppt", b"legacy").unwrap();

    let result = tokio_test::block_on(converter("yadt-no-such-office-tool", 5).convert(&ppt));

    match result {
        Err(ConversionError::ToolMissing(tool)) => assert_eq!(tool, "yadt-no-such-office-tool"),
        other => panic!("expected ToolMissing, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_convert_withFailingTool_shouldReportStatusAndStderr() {
    let tools = common::create_temp_dir().unwrap();
    let work = common::create_temp_dir().unwrap();
    let tool = common::fake_office(tools.path(), "echo 'source file could not be loaded' >&2\nexit 3");
    let ppt = common::create_test_file(work.path(), "cours.ppt", b"legacy").unwrap();

    let result = converter(&tool.to_string_lossy(), 5).convert(&ppt).await;

    match result {
        Err(ConversionError::Failed { stderr, .. }) => assert_eq!(stderr, "source file could not be loaded"),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_convert_withSlowTool_shouldTimeOut() {
    let tools = common::create_temp_dir().unwrap();
    let work = common::create_temp_dir().unwrap();
    let tool = common::fake_office(tools.path(), "sleep 5");
    let ppt = common::create_test_file(work.path(), "cours.ppt", b"legacy").unwrap();

    let result = converter(&tool.to_string_lossy(), 1).convert(&ppt).await;

    assert!(matches!(result, Err(ConversionError::Timeout(1))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_convert_shouldReturnDeckWrittenToOutdir() {
    let tools = common::create_temp_dir().unwrap();
    let work = common::create_temp_dir().unwrap();
    // Arguments: --headless --convert-to pptx --outdir <dir> <file>
    let tool = common::fake_office(tools.path(), "touch \"$5/$(basename \"$6\" .ppt).pptx\"");
    let ppt = common::create_test_file(work.path(), "cours.ppt", b"legacy").unwrap();

    let converted = converter(&tool.to_string_lossy(), 5).convert(&ppt).await.unwrap();

    assert_eq!(converted, work.path().join("cours.pptx"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_convert_withToolProducingNothing_shouldBeOutputMissing() {
    let tools = common::create_temp_dir().unwrap();
    let work = common::create_temp_dir().unwrap();
    let tool = common::fake_office(tools.path(), "exit 0");
    let ppt = common::create_test_file(work.path(), "cours.ppt", b"legacy").unwrap();

    let result = converter(&tool.to_string_lossy(), 5).convert(&ppt).await;

    assert!(matches!(result, Err(ConversionError::OutputMissing(_))));
}

#[test]
fn test_findConverted_shouldPreferExactName() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "cours-annexe.pptx", b"x").unwrap();
    common::create_test_file(temp_dir.path(), "cours.pptx", b"x").unwrap();

    let found = find_converted(temp_dir.path(), "cours").unwrap();

    assert_eq!(found, temp_dir.path().join("cours.pptx"));
}

#[test]
fn test_findConverted_shouldIgnoreOtherStems() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "autre.pptx", b"x").unwrap();

    assert!(matches!(
        find_converted(temp_dir.path(), "cours"),
        Err(ConversionError::OutputMissing(_))
    ));
}
