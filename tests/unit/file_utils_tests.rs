/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use yadt::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", b"test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_output_file_name_shouldAppendSuffixAndExtension() -> Result<()> {
    assert_eq!(FileManager::output_file_name("cours/Chapitre 1.pptx", FileType::Presentation)?, "Chapitre 1_EN.pptx");
    assert_eq!(FileManager::output_file_name("ancien.ppt", FileType::LegacyPresentation)?, "ancien_EN.pptx");
    assert_eq!(FileManager::output_file_name("tp.ipynb", FileType::Notebook)?, "tp_EN.ipynb");
    assert!(FileManager::output_file_name("notes.txt", FileType::Unknown).is_err());
    Ok(())
}

#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() -> Result<()> {
    let output_path = FileManager::generate_output_path("/tmp/input/deck.pptx", "/tmp/output", FileType::Presentation)?;
    assert_eq!(output_path, Path::new("/tmp/output/deck_EN.pptx"));
    Ok(())
}

#[test]
fn test_detect_file_type_byExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let deck = common::create_test_file(temp_dir.path(), "a.PPTX", b"anything")?;
    let legacy = common::create_test_file(temp_dir.path(), "b.ppt", b"anything")?;
    let notebook = common::create_test_file(temp_dir.path(), "c.ipynb", b"{}")?;

    assert_eq!(FileManager::detect_file_type(&deck)?, FileType::Presentation);
    assert_eq!(FileManager::detect_file_type(&legacy)?, FileType::LegacyPresentation);
    assert_eq!(FileManager::detect_file_type(&notebook)?, FileType::Notebook);
    Ok(())
}

#[test]
fn test_detect_file_type_byContent_withoutExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let deck = common::create_test_file(temp_dir.path(), "upload1", &common::PptxBuilder::new().build())?;
    let notebook = common::create_test_file(temp_dir.path(), "upload2", common::notebook_json(vec![]).as_bytes())?;
    let legacy = common::create_test_file(temp_dir.path(), "upload3", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0])?;
    let text = common::create_test_file(temp_dir.path(), "upload4", b"just some text")?;

    assert_eq!(FileManager::detect_file_type(&deck)?, FileType::Presentation);
    assert_eq!(FileManager::detect_file_type(&notebook)?, FileType::Notebook);
    assert_eq!(FileManager::detect_file_type(&legacy)?, FileType::LegacyPresentation);
    assert_eq!(FileManager::detect_file_type(&text)?, FileType::Unknown);
    Ok(())
}

#[test]
fn test_detect_file_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("does/not/exist.pptx").is_err());
}

#[test]
fn test_find_files_shouldSkipTranslatedOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("chapitre");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "a.pptx", b"x")?;
    common::create_test_file(temp_dir.path(), "a_EN.pptx", b"x")?;
    common::create_test_file(&nested, "b.ipynb", b"x")?;
    common::create_test_file(&nested, "c.txt", b"x")?;

    let files = FileManager::find_files(temp_dir.path(), &["pptx", "ppt", "ipynb"])?;
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();

    assert_eq!(names.len(), 2);
    assert!(names.contains(&"a.pptx".to_string()));
    assert!(names.contains(&"b.ipynb".to_string()));
    Ok(())
}

#[test]
fn test_copy_file_shouldCreateTargetDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "source.ipynb", b"{}")?;
    let target = temp_dir.path().join("out").join("copy.ipynb");

    FileManager::copy_file(&source, &target)?;

    assert!(FileManager::file_exists(&target));
    assert!(FileManager::copy_file(temp_dir.path().join("missing"), &target).is_err());
    Ok(())
}
