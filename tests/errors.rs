//! Error behavior: every grammar violation is fatal, carries the
//! offending source position, and renders a usable code frame.

use adoc::adoc::testing;
use adoc::{parse_units, Error, InputUnit};

#[test]
fn unclosed_strong_cites_the_opener() {
    let err = testing::parse_err("== Intro\n\n**never closed\n");
    assert!(err.message().contains("unclosed STRONG"));
    assert!(err.message().contains("3:1"));
}

#[test]
fn unclosed_emphasis() {
    let err = testing::parse_err("== Intro\n\nan _unfinished thought\n");
    assert!(err.message().contains("unclosed EMPHASIS"));
}

#[test]
fn unclosed_quote_block() {
    let err = testing::parse_err("== Intro\n\n____\nwords without end\n");
    assert!(err.message().contains("unclosed BLOCK"));
}

#[test]
fn unknown_entity() {
    let err = testing::parse_err("== Intro\n\nan &unknown; entity\n");
    assert!(err.message().contains("unknown entity type `&unknown;`"));
}

#[test]
fn unknown_context_type() {
    let err = testing::parse_err("== Intro\n\n[sidebar]\ncontent\n");
    assert!(err.message().contains("unexpected context type `sidebar`"));
}

#[test]
fn duplicate_id_across_chapters() {
    let err = testing::parse_err("[#a]\n== One\n\nx\n\n[#a]\n== Two\n\ny\n");
    assert!(err.message().contains("duplicate id `a`"));
}

#[test]
fn skipped_heading_level() {
    let err = testing::parse_err("== Intro\n\n==== Too Deep\n\nx\n");
    assert!(err.message().contains("heading level mismatch"));
    assert!(err.message().contains("expected level 3 but found level 4"));
}

#[test]
fn reserved_dot_line() {
    let err = testing::parse_err("== Intro\n\n.A block title\n");
    assert!(err.message().contains("not implemented"));
}

#[test]
fn parse_error_carries_the_span() {
    let source = "== Intro\n\nan &unknown; entity\n";
    let err = testing::parse_err(source);
    let Error::Parse(parse_error) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse_error.line, 3);
    assert_eq!(parse_error.column_start, 4);

    let frame = parse_error.code_frame(source);
    assert!(frame.contains(">>   3 | an &unknown; entity"));
    assert!(frame.contains("^^^^^^^^^"));
}

#[test]
fn errors_name_the_offending_file() {
    let units = vec![
        InputUnit::named("== One\n\nFine\n", "01.adoc"),
        InputUnit::named("== Two\n\n**broken\n", "02.adoc"),
    ];
    let err = parse_units(units).unwrap_err();
    assert!(err.to_string().contains("02.adoc"));
}

#[test]
fn first_error_halts_the_parse() {
    // Both paragraphs are broken; only the first is reported
    let err = testing::parse_err("== Intro\n\n_first break\n\n**second break\n");
    assert!(err.message().contains("unclosed EMPHASIS"));
}
