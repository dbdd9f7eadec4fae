use guide_layout::*;
use std::str::FromStr;

#[test]
fn test_language_labels() {
    assert_eq!(Language::French.label(), "Français");
    assert_eq!(Language::Darija.label(), "Darija (Maroc)");
    assert_eq!(Language::ClassicalArabic.label(), "Arabe Classique");
    assert!(!Language::French.is_rtl());
    assert!(Language::Darija.is_rtl());
    assert!(Language::ClassicalArabic.is_rtl());
}

#[test]
fn test_language_from_str() {
    assert_eq!(Language::from_str("fr").unwrap(), Language::French);
    assert_eq!(Language::from_str("Darija").unwrap(), Language::Darija);
    assert_eq!(Language::from_str("ar").unwrap(), Language::ClassicalArabic);
    assert!(matches!(
        Language::from_str("klingon"),
        Err(GuideError::Config(_))
    ));
}

#[test]
fn test_footer_labels() {
    assert_eq!(Language::French.footer_label(3), "Page 3");
    assert_eq!(Language::Darija.footer_label(2), "صفحة 2");
}

#[tokio::test]
async fn test_save_and_load_config() {
    use tempfile::NamedTempFile;

    let mut config = GuideConfig::default();
    config.app_name = "Neuro-Sortie Test".to_string();
    config.geometry.line_height_mm = 5.5;
    config.font_sizes.body = 10.0;

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    config.save(path).await.unwrap();
    let loaded = GuideConfig::load(path).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "app_name": "Clinique" }"#)
        .await
        .unwrap();

    let loaded = GuideConfig::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.app_name, "Clinique");
    assert_eq!(loaded.geometry, PageGeometry::default());
}

#[tokio::test]
async fn test_load_rejects_malformed_json() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "{ not json").await.unwrap();

    let result = GuideConfig::load(temp_file.path()).await;
    assert!(matches!(result, Err(GuideError::Config(_))));
}
