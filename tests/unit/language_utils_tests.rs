/*!
 * Tests for language utilities
 */

use mdtranslate::language_utils::{get_language_name, normalize_to_part2t, validate_language_code};

/// Test normalization of two- and three-letter codes
#[test]
fn test_normalize_to_part2t_withMixedCodes_shouldReturnPart2T() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t(" FR ").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("nld").unwrap(), "nld");
}

/// Test names used in the system prompt
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("dut").unwrap(), "Dutch");
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
}

/// Test rejection of unknown codes
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "x", "zz", "english", "a1b"] {
        assert!(validate_language_code(code).is_err(), "{code:?} should be invalid");
    }
}
