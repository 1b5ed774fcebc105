/*!
 * Tests for language utility functions
 */

use yadt::language_utils::{get_language_name, to_deepl_source_code, validate_language_code, LanguageCodeType};

#[test]
fn test_validate_language_code_withValidCodes_shouldReturnType() {
    assert_eq!(validate_language_code("fr").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code(" FR ").unwrap(), LanguageCodeType::Part1);
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("french").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_to_deepl_source_code_withFrenchVariants_shouldReturnFR() {
    assert_eq!(to_deepl_source_code("fr").unwrap(), "FR");
    assert_eq!(to_deepl_source_code("fra").unwrap(), "FR");
    assert_eq!(to_deepl_source_code("fre").unwrap(), "FR");
    assert_eq!(to_deepl_source_code("de").unwrap(), "DE");
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
