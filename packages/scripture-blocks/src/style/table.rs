//! Built-in style table for USFM/USX paragraph and character styles.

use super::registry::{StyleInfo, StyleRegistry, StyleRole};

/// Style tag used for chapter-announcement blocks.
pub const CHAPTER_STYLE: &str = "c";

/// Style tag used for the assembled main-title block.
pub const MAIN_TITLE_STYLE: &str = "mt";

/// Create a style registry configured for standard USFM styles.
///
/// Tags that are not listed here are treated as publishable verse-text
/// paragraphs (or inline runs).
#[must_use]
pub fn create_default_style_registry() -> StyleRegistry {
    let mut registry = StyleRegistry::new();

    // Identification and headers
    registry.register_all(["h", "h1", "h2", "h3"], StyleInfo::new(StyleRole::PageHeader));
    registry.register_all(
        ["toc1", "toc2", "toc3", "toca1", "toca2", "toca3"],
        StyleInfo::new(StyleRole::BookName),
    );

    // Main titles: mt/mt1 is the primary part, the rest are secondary
    registry.register_all(["mt", "mt1"], StyleInfo::new(StyleRole::PrimaryMainTitle));
    registry.register_all(
        ["mt2", "mt3", "mt4", "mte", "mte1", "mte2"],
        StyleInfo::new(StyleRole::MainTitle),
    );

    // Introductions
    registry.register_all(
        [
            "imt", "imt1", "imt2", "imt3", "imt4", "imte", "imte1", "imte2", "is", "is1", "is2",
            "ip", "ipi", "im", "imi", "ipq", "imq", "ipr", "iq", "iq1", "iq2", "iq3", "ib", "ili",
            "ili1", "ili2", "iot", "io", "io1", "io2", "io3", "io4", "iex", "ie",
        ],
        StyleInfo::new(StyleRole::Introduction),
    );

    // Headings
    registry.register_all(
        [
            "s", "s1", "s2", "s3", "s4", "ms", "ms1", "ms2", "ms3", "mr", "sr", "sp", "qa",
        ],
        StyleInfo::new(StyleRole::SectionHead),
    );
    registry.register("r", StyleInfo::new(StyleRole::ParallelPassageReference));

    // Chapter labels and published chapter characters
    registry.register_all(["cl", "cp"], StyleInfo::new(StyleRole::ChapterLabel));

    // Not part of the published text:
    //   - rem: editorial remark
    //   - restore: restoration note
    //   - pro: pronunciation hint
    //   - pubinfo: publication information
    //   - sts: status
    //   - ide/usfm: encoding and version markers
    registry.register_all(
        ["rem", "restore", "pro", "pubinfo", "sts", "ide", "usfm"],
        StyleInfo::new(StyleRole::Paragraph)
            .non_publishable()
            .without_verse_text(),
    );

    // Numbering runs (alternate/published verse and chapter numbers) are
    // published but are not verse text
    registry.register_all(
        ["va", "vp", "ca"],
        StyleInfo::new(StyleRole::Paragraph).without_verse_text(),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_style_registry() {
        let registry = create_default_style_registry();

        assert_eq!(registry.info("h").role, StyleRole::PageHeader);
        assert_eq!(registry.info("mt1").role, StyleRole::PrimaryMainTitle);
        assert_eq!(registry.info("mt2").role, StyleRole::MainTitle);
        assert_eq!(registry.info("ip").role, StyleRole::Introduction);
        assert_eq!(registry.info("s1").role, StyleRole::SectionHead);
        assert_eq!(registry.info("r").role, StyleRole::ParallelPassageReference);
        assert_eq!(registry.info("cl").role, StyleRole::ChapterLabel);
    }

    #[test]
    fn test_non_publishable_styles() {
        let registry = create_default_style_registry();
        for tag in ["rem", "restore", "pro", "pubinfo"] {
            assert!(!registry.classify(tag).is_publishable, "{tag}");
        }
        assert!(registry.classify("p").is_publishable);
    }

    #[test]
    fn test_non_verse_text_styles() {
        let registry = create_default_style_registry();
        for tag in ["h", "toc1", "toc2", "toc3", "mt1", "mt2", "s1", "vp"] {
            let class = registry.classify(tag);
            assert!(class.is_publishable, "{tag}");
            assert!(!class.is_verse_text, "{tag}");
        }
        for tag in ["p", "q1", "m", "pi", "d", "wj", "nd"] {
            assert!(registry.classify(tag).is_verse_text, "{tag}");
        }
    }
}
