use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::provider::{MultiLanguageTranslations, Translations};

/// Pretty JSON with two-space indentation, ready to paste into a locale file
pub fn format_translations(translations: &Translations) -> Result<String> {
    Ok(serde_json::to_string_pretty(translations)?)
}

/// Human-readable rendering of a bundle: one JSON block per language
pub fn format_bundle(bundle: &MultiLanguageTranslations) -> Result<String> {
    let mut out = String::new();
    for (language, translations) in bundle.iter() {
        out.push_str(&format!("== {} ==\n", language.display_name()));
        out.push_str(&format_translations(translations)?);
        out.push_str("\n\n");
    }
    Ok(out)
}

pub fn write_translations<P: AsRef<Path>>(path: P, translations: &Translations) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, format_translations(translations)? + "\n")?;
    info!("Wrote {} keys to {}", translations.len(), path.display());
    Ok(())
}

/// Write `<dir>/<stem>.<language>.json` for every language, returning the paths
pub fn write_bundle<P: AsRef<Path>>(
    dir: P,
    stem: &str,
    bundle: &MultiLanguageTranslations,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (language, translations) in bundle.iter() {
        let path = dir.join(format!("{}.{}.json", stem, language.as_str()));
        write_translations(&path, translations)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Translations {
        let mut translations = Translations::new();
        translations.insert("SURVEY.TITLE".to_string(), "How was it?".to_string());
        translations
    }

    #[test]
    fn test_format_translations_uses_two_space_indent() {
        assert_eq!(
            format_translations(&sample()).unwrap(),
            "{\n  \"SURVEY.TITLE\": \"How was it?\"\n}"
        );
        assert_eq!(format_translations(&Translations::new()).unwrap(), "{}");
    }

    #[test]
    fn test_format_bundle_lists_languages_in_order() {
        let bundle = MultiLanguageTranslations {
            english: sample(),
            ..Default::default()
        };
        let text = format_bundle(&bundle).unwrap();
        let spanish = text.find("== Spanish ==").unwrap();
        let english = text.find("== English ==").unwrap();
        let portuguese = text.find("== Portuguese ==").unwrap();
        assert!(spanish < english && english < portuguese);
        assert!(text.contains("\"SURVEY.TITLE\": \"How was it?\""));
    }

    #[test]
    fn test_write_bundle_creates_one_file_per_language() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = MultiLanguageTranslations {
            french: sample(),
            ..Default::default()
        };

        let written = write_bundle(dir.path().join("locales"), "survey", &bundle).unwrap();
        assert_eq!(written.len(), 4);

        let french = std::fs::read_to_string(dir.path().join("locales/survey.french.json")).unwrap();
        let parsed: Translations = serde_json::from_str(&french).unwrap();
        assert_eq!(parsed, sample());

        let spanish = std::fs::read_to_string(dir.path().join("locales/survey.spanish.json")).unwrap();
        assert_eq!(spanish.trim(), "{}");
    }
}
