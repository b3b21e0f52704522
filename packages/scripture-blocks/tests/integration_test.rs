//! End-to-end tests for the block parser.
//!
//! Covers the walker's observable behavior on small hand-built books and on
//! a fixture excerpt of Mark 1.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use scripture_blocks::{
    parse_book, Block, BookParser, InlineNode as N, MarkupNode, ParsedBook, ParserConfig,
};

/// Route library logs to the test output. Safe to call from every test.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("scripture_blocks=debug")
        .with_test_writer()
        .try_init();
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Parse a chapter made of the given paragraphs.
fn parse_chapter(paragraphs: Vec<MarkupNode>) -> ParsedBook {
    init_tracing();
    let mut nodes = vec![MarkupNode::chapter(1)];
    nodes.extend(paragraphs);
    parse_book("MAT", &nodes).unwrap()
}

fn content_texts(book: &ParsedBook) -> Vec<String> {
    book.content_blocks().map(Block::text).collect()
}

fn characters(book: &ParsedBook) -> Vec<Option<String>> {
    book.content_blocks().map(|b| b.character_id.clone()).collect()
}

// =============================================================================
// Verse references
// =============================================================================

#[test]
fn test_bridge_sets_initial_verses() {
    for token in ["12-14", "12 - 14", "12\u{2013}14", "12\u{2014}14"] {
        let book = parse_chapter(vec![MarkupNode::paragraph(
            "p",
            vec![N::verse(token), N::text("They went on together.")],
        )]);
        let block = &book.blocks[1];
        assert_eq!(block.initial_start_verse, 12, "token {token:?}");
        assert_eq!(block.initial_end_verse, 14, "token {token:?}");
        assert!(block.starts_at_verse_start);
        assert!(block
            .text_with_verse_numbers()
            .starts_with("{12-14}\u{00A0}They"));
    }
}

#[test]
fn test_dash_after_bridge_is_discarded() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("1-3"), N::text("The first three.")]),
        MarkupNode::paragraph(
            "p",
            vec![N::verse("-"), N::verse("4"), N::text("The fourth.")],
        ),
    ]);
    let block = &book.blocks[2];
    assert_eq!(block.initial_start_verse, 4);
    assert_eq!(block.initial_end_verse, 0);
    assert!(block.starts_at_verse_start);
    assert_eq!(block.text_with_verse_numbers(), "{4}\u{00A0}The fourth.");
}

#[test]
fn test_dash_joins_following_verse_into_bridge() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("5"),
            N::text("Five. "),
            N::verse("-"),
            N::text("More. "),
            N::verse("7"),
            N::text("Seven."),
        ],
    )]);
    assert_eq!(
        book.blocks[1].text_with_verse_numbers(),
        "{5-7}\u{00A0}Five. More. Seven."
    );
    assert_eq!(book.blocks[1].initial_start_verse, 5);
    assert_eq!(book.blocks[1].initial_end_verse, 7);
}

#[test]
fn test_dash_bridge_after_split_opens_at_later_marker() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("5"),
            N::text("Five. "),
            N::run("wj", vec![N::text("Go.")]),
            N::verse("-"),
            N::text("More. "),
            N::verse("7"),
            N::text("Seven."),
        ],
    )]);
    let rendered: Vec<String> = book
        .content_blocks()
        .map(Block::text_with_verse_numbers)
        .collect();
    assert_eq!(
        rendered,
        vec![
            "{5}\u{00A0}Five. ",
            "Go.",
            "More. {5-7}\u{00A0}Seven."
        ]
    );
}

#[test]
fn test_dash_before_lower_verse_is_noise() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("5"),
            N::text("Five. "),
            N::verse("-"),
            N::verse("5"),
            N::text("Five again."),
        ],
    )]);
    assert_eq!(
        book.blocks[1].text_with_verse_numbers(),
        "{5}\u{00A0}Five. {5}\u{00A0}Five again."
    );
    assert!(book.warnings.is_empty());
}

#[test]
fn test_impossible_bridge_is_dropped_with_warning() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("2"),
            N::text("Two. "),
            N::verse("3-2"),
            N::text("Still two. "),
            N::verse("3"),
            N::text("Three."),
        ],
    )]);
    assert_eq!(
        book.blocks[1].text_with_verse_numbers(),
        "{2}\u{00A0}Two. Still two. {3}\u{00A0}Three."
    );
    assert_eq!(book.warnings.len(), 1);
    assert!(book.warnings[0].contains("'3-2'"));
}

#[test]
fn test_malformed_verse_keeps_previous_state() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("6"), N::text("Six.")]),
        MarkupNode::paragraph("p", vec![N::verse("vi"), N::text("Still six.")]),
    ]);
    assert_eq!(book.blocks[2].initial_start_verse, 6);
    assert!(!book.blocks[2].starts_at_verse_start);
    assert_eq!(book.warnings.len(), 1);
}

#[test]
fn test_verse_marker_ending_paragraph_opens_next_one() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph(
            "p",
            vec![N::verse("4"), N::text("He said: "), N::verse("5")],
        ),
        MarkupNode::paragraph("q1", vec![N::text("Blessed is the man.")]),
    ]);
    let rendered: Vec<String> = book
        .content_blocks()
        .map(Block::text_with_verse_numbers)
        .collect();
    assert_eq!(
        rendered,
        vec!["{4}\u{00A0}He said:", "{5}\u{00A0}Blessed is the man."]
    );

    let opening = &book.blocks[2];
    assert_eq!(opening.initial_start_verse, 5);
    assert!(opening.starts_at_verse_start);
    assert!(opening.is_paragraph_start);
}

#[test]
fn test_verse_marker_carried_across_stanza_break() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("A psalm. "), N::verse("2")]),
        MarkupNode::paragraph("b", vec![]),
        MarkupNode::paragraph("q1", vec![N::text("The Lord is my shepherd.")]),
    ]);
    assert_eq!(
        book.blocks[2].text_with_verse_numbers(),
        "{2}\u{00A0}The Lord is my shepherd."
    );
    assert!(book.blocks[2].starts_at_verse_start);
}

#[test]
fn test_verse_marker_before_heading_is_elided() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("4"), N::text("Text. "), N::verse("5")]),
        MarkupNode::paragraph("s1", vec![N::text("A Heading")]),
        MarkupNode::paragraph("p", vec![N::text("More text.")]),
    ]);
    assert_eq!(content_texts(&book), vec!["Text.", "A Heading", "More text."]);
    assert_eq!(book.blocks[3].text_with_verse_numbers(), "More text.");
    assert_eq!(book.blocks[3].initial_start_verse, 5);
    assert!(!book.blocks[3].starts_at_verse_start);
}

// =============================================================================
// Notes, figures and whitespace
// =============================================================================

#[test]
fn test_notes_leave_single_spaces() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("1"),
            N::text("In the "),
            N::Note,
            N::text("beginning"),
            N::Note,
            N::text(" God "),
            N::Figure,
            N::text(" created"),
            N::Note,
            N::text("."),
        ],
    )]);
    assert_eq!(content_texts(&book), vec!["In the beginning God created."]);
}

#[test]
fn test_whitespace_collapse_is_idempotent() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::text("  And \n they   went\t"),
            N::Note,
            N::text("  out,   "),
            N::run("add", vec![N::text(" rejoicing ")]),
            N::text("  greatly.  "),
        ],
    )]);
    let first = book.blocks[1].text();
    assert_eq!(first, "And they went out, rejoicing greatly.");

    let again = parse_chapter(vec![MarkupNode::paragraph("p", vec![N::text(first.clone())])]);
    assert_eq!(again.blocks[1].text(), first);
}

#[test]
fn test_paragraph_with_only_verse_and_note_yields_no_block() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("Something happened.")]),
        MarkupNode::paragraph("p", vec![N::verse("2"), N::Note]),
    ]);
    assert_eq!(book.content_blocks().count(), 1);
    assert_eq!(book.blocks.len(), 2);
}

#[test]
fn test_marker_only_paragraph_does_not_merge() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("One.")]),
        MarkupNode::paragraph("b", vec![]),
        MarkupNode::paragraph("p", vec![N::text("Still one.")]),
    ]);
    assert_eq!(content_texts(&book), vec!["One.", "Still one."]);
    assert!(book.blocks[2].is_paragraph_start);
}

#[test]
fn test_cjk_brackets_around_elided_verse() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("3"),
            N::text("話。\u{3010}"),
            N::verse("4"),
            N::text("\u{3011}"),
            N::verse("5"),
            N::text("然後"),
        ],
    )]);
    assert_eq!(
        book.blocks[1].text_with_verse_numbers(),
        "{3}\u{00A0}話。{5}\u{00A0}然後"
    );
}

// =============================================================================
// Forced characters
// =============================================================================

fn words_of_jesus(inside: &str, after: &str) -> ParsedBook {
    parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("19"),
            N::text("He said to them, "),
            N::run("wj", vec![N::text(inside)]),
            N::text(after),
        ],
    )])
}

#[test]
fn test_inline_run_splits_into_three_blocks() {
    for (inside, after) in [
        ("Follow me. ", "And they followed."),
        ("Follow me.", " And they followed."),
        ("Follow me. ", " And they followed."),
        ("Follow me", ". And they followed."),
    ] {
        let book = words_of_jesus(inside, after);
        assert_eq!(
            content_texts(&book),
            vec!["He said to them, ", "Follow me. ", "And they followed."],
            "run {inside:?} followed by {after:?}"
        );
        assert_eq!(
            characters(&book),
            vec![None, Some("Jesus".to_string()), None]
        );

        let blocks: Vec<&Block> = book.content_blocks().collect();
        assert!(blocks[0].is_paragraph_start);
        assert!(!blocks[1].is_paragraph_start);
        assert!(!blocks[2].is_paragraph_start);
        assert_eq!(blocks[1].style_tag, "wj");
        assert_eq!(blocks[2].style_tag, "p");
        assert_eq!(blocks[1].initial_start_verse, 19);
        assert!(!blocks[1].starts_at_verse_start);
    }
}

#[test]
fn test_run_at_paragraph_end_keeps_closing_punctuation() {
    let book = words_of_jesus("\u{201C}Peace be with you", ".\u{201D} ");
    assert_eq!(
        content_texts(&book),
        vec!["He said to them, ", "\u{201C}Peace be with you.\u{201D}"]
    );
}

#[test]
fn test_opening_punctuation_after_run_starts_next_block() {
    for after in ["(He meant it.)", "\u{201C}Lord,\u{201D} they said.", "\u{00BF}Who?"] {
        let book = words_of_jesus("Follow me. ", after);
        assert_eq!(
            content_texts(&book),
            vec!["He said to them, ", "Follow me. ", after],
            "text after run {after:?}"
        );
    }
}

#[test]
fn test_run_starting_a_verse_takes_the_marker() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![
            N::verse("2"),
            N::text("Jesus answered. "),
            N::verse("3"),
            N::run("wj", vec![N::text("It is written.")]),
        ],
    )]);
    let blocks: Vec<&Block> = book.content_blocks().collect();
    assert_eq!(blocks[0].text_with_verse_numbers(), "{2}\u{00A0}Jesus answered. ");
    assert_eq!(blocks[1].text_with_verse_numbers(), "{3}\u{00A0}It is written.");
    assert!(blocks[1].starts_at_verse_start);
    assert_eq!(blocks[1].initial_start_verse, 3);
}

#[test]
fn test_descriptive_title_is_narrator_outside_psalms() {
    let nodes = vec![
        MarkupNode::chapter(3),
        MarkupNode::paragraph("d", vec![N::text("A prayer of Habakkuk.")]),
    ];
    let habakkuk = parse_book("HAB", &nodes).unwrap();
    assert_eq!(
        habakkuk.blocks[1].character_id.as_deref(),
        Some("narrator-HAB")
    );

    let psalms = parse_book("PSA", &nodes).unwrap();
    assert_eq!(psalms.blocks[1].character_id, None);
}

#[test]
fn test_custom_character_table() {
    let config = ParserConfig::from_yaml_str(
        "characters:\n  - style: qt\n    character: scripture\n",
    )
    .unwrap();
    let nodes = vec![
        MarkupNode::chapter(1),
        MarkupNode::paragraph(
            "p",
            vec![N::text("He said, "), N::run("wj", vec![N::text("Come.")])],
        ),
    ];
    let book = BookParser::new(&config).parse("MAT", &nodes).unwrap();
    assert_eq!(content_texts(&book), vec!["He said, Come."]);
}

// =============================================================================
// Quotation milestones
// =============================================================================

fn enoch(start: MarkupNode, end_id: Option<&str>) -> ParsedBook {
    let MarkupNode::Paragraph(start_paragraph) = start else {
        unreachable!()
    };
    let mut children = vec![N::verse("14"), N::text("Enoch prophesied, saying, ")];
    children.extend(start_paragraph.children);
    children.extend([
        N::text("\u{201C}Behold, the Lord comes.\u{201D}"),
        N::milestone_end(end_id),
        N::text(" And so it was."),
    ]);
    parse_chapter(vec![MarkupNode::paragraph("p", children)])
}

fn start_marker(id: Option<&str>, speaker: Option<&str>) -> MarkupNode {
    MarkupNode::paragraph("p", vec![N::milestone_start(id, speaker)])
}

#[test]
fn test_milestone_with_speaker() {
    let book = enoch(start_marker(Some("123"), Some("Enoch")), Some("123"));
    assert_eq!(
        content_texts(&book),
        vec![
            "Enoch prophesied, saying, ",
            "\u{201C}Behold, the Lord comes.\u{201D} ",
            "And so it was."
        ]
    );
    assert_eq!(
        characters(&book),
        vec![None, Some("Enoch".to_string()), None]
    );
    assert!(book.warnings.is_empty());
}

#[test]
fn test_milestone_without_speaker_is_unresolved() {
    let book = enoch(start_marker(Some("123"), None), Some("123"));
    assert_eq!(book.content_blocks().count(), 3);
    assert_eq!(characters(&book), vec![None, None, None]);
}

#[test]
fn test_milestone_without_ids_pairs_by_nesting() {
    let book = enoch(start_marker(None, Some("Enoch")), None);
    assert_eq!(
        characters(&book),
        vec![None, Some("Enoch".to_string()), None]
    );
}

#[test]
fn test_mismatched_milestone_is_ignored() {
    let book = enoch(start_marker(Some("123"), Some("Enoch")), Some("456"));
    assert_eq!(
        content_texts(&book),
        vec!["Enoch prophesied, saying, \u{201C}Behold, the Lord comes.\u{201D} And so it was."]
    );
    assert_eq!(characters(&book), vec![None]);
    assert_eq!(book.warnings.len(), 2);
}

// =============================================================================
// Titles, headers and chapters
// =============================================================================

#[test]
fn test_main_title_parts_are_joined() {
    init_tracing();
    let nodes = vec![
        MarkupNode::paragraph("mt2", vec![N::text("The Gospel According to")]),
        MarkupNode::paragraph("mt1", vec![N::text("Mark")]),
        MarkupNode::chapter(1),
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("The beginning.")]),
    ];
    let book = parse_book("MRK", &nodes).unwrap();
    assert_eq!(book.main_title.as_deref(), Some("Mark"));
    assert_eq!(book.blocks[0].text(), "The Gospel According to Mark");
    assert_eq!(book.blocks[0].style_tag, "mt");
    assert_eq!(book.blocks[0].character_id.as_deref(), Some("BC-MRK"));
    assert!(book.blocks[1].is_chapter_announcement());
}

#[test]
fn test_title_parts_interrupted_by_intro() {
    let nodes = vec![
        MarkupNode::paragraph("mt2", vec![N::text("The Gospel According to")]),
        MarkupNode::paragraph("mt1", vec![N::text("Mark")]),
        MarkupNode::paragraph("is1", vec![N::text("Introduction")]),
        MarkupNode::chapter(1),
    ];
    let book = parse_book("MRK", &nodes).unwrap();
    let texts: Vec<String> = book.blocks.iter().map(Block::text).collect();
    assert_eq!(texts, vec!["The Gospel According to Mark", "Introduction", "1"]);
    assert_eq!(book.main_title.as_deref(), Some("Mark"));
}

#[test]
fn test_chapter_announcements() {
    let book = parse_chapter(vec![
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("One.")]),
        MarkupNode::chapter(2),
        MarkupNode::paragraph("p", vec![N::verse("1"), N::text("Two.")]),
    ]);
    let chapters: Vec<&Block> = book
        .blocks
        .iter()
        .filter(|b| b.is_chapter_announcement())
        .collect();
    assert_eq!(chapters.len(), 2);
    for block in chapters {
        assert!(block.is_paragraph_start);
        assert_eq!(block.initial_start_verse, 0);
        assert_eq!(block.character_id.as_deref(), Some("BC-MAT"));
        assert_eq!(block.style_tag, "c");
    }
    assert_eq!(book.chapter_blocks(2).count(), 2);
}

// =============================================================================
// Fixture
// =============================================================================

#[test]
fn test_mark_excerpt_fixture() {
    init_tracing();
    let nodes: Vec<MarkupNode> =
        serde_json::from_str(&load_fixture("mark_excerpt.json")).expect("valid fixture");
    let book = parse_book("MRK", &nodes).unwrap();

    assert_eq!(book.page_header.as_deref(), Some("Mark"));
    assert_eq!(book.main_title.as_deref(), Some("Mark"));
    assert!(book.warnings.is_empty());

    let rendered: Vec<(String, Option<String>, String)> = book
        .blocks
        .iter()
        .map(|b| {
            (
                b.style_tag.clone(),
                b.character_id.clone(),
                b.text_with_verse_numbers(),
            )
        })
        .collect();
    let expected = vec![
        ("mt", Some("BC-MRK"), "The Gospel According to Mark"),
        ("ip", Some("intro-MRK"), "Mark begins with Isaiah."),
        ("c", Some("BC-MRK"), "1"),
        ("s1", Some("extra-MRK"), "John the Baptist Prepares the Way"),
        (
            "p",
            None,
            "{1}\u{00A0}The beginning of the good news about Jesus the Messiah, the Son of God, \
             {2}\u{00A0}as it is written in Isaiah the prophet:",
        ),
        (
            "qt",
            Some("scripture"),
            "\u{201C}I will send my messenger ahead of you,",
        ),
        ("qt", Some("scripture"), "who will prepare your way\u{201D}\u{2014}"),
        (
            "p",
            None,
            "{14}\u{00A0}After John was put in prison, Jesus went into Galilee. \
             {15}\u{00A0}He said, ",
        ),
        ("wj", Some("Jesus"), "\u{201C}The time has come!\u{201D}"),
    ];
    let expected: Vec<(String, Option<String>, String)> = expected
        .into_iter()
        .map(|(style, character, text)| {
            (
                style.to_string(),
                character.map(str::to_string),
                text.to_string(),
            )
        })
        .collect();
    assert_eq!(rendered, expected);

    let paragraph_starts: Vec<bool> = book.blocks.iter().map(|b| b.is_paragraph_start).collect();
    assert_eq!(
        paragraph_starts,
        vec![true, true, true, true, true, true, true, true, false]
    );
    assert_eq!(book.blocks[5].initial_start_verse, 2);
    assert!(!book.blocks[5].starts_at_verse_start);
}

#[test]
fn test_parsed_book_serializes() {
    let book = parse_chapter(vec![MarkupNode::paragraph(
        "p",
        vec![N::verse("1"), N::text("Text.")],
    )]);
    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["book_code"], "MAT");
    assert_eq!(json["blocks"][1]["elements"][0]["start_verse"], 1);
    assert_eq!(json["blocks"][1]["elements"][1]["content"], "Text.");
}
