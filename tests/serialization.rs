//! The JSON contract: conditional fields, document field ordering, and
//! serialization stability.

use adoc::adoc::testing;
use serde_json::json;

#[test]
fn full_document_json() {
    let document = testing::parse("== Chapter 1\n\nHello world\n");
    assert_eq!(
        document.to_json(false),
        json!({
            "epigraphs": [],
            "type": "DOCUMENT",
            "children": [{
                "type": "CHAPTER",
                "children": [
                    {
                        "type": "HEADING",
                        "meta": { "level": 2 },
                        "children": [{
                            "type": "HEADING_SEQUENCE_IDENTIFIER",
                            "value": "Chapter 1",
                            "meta": { "sequence": { "number": 1, "roman": "I" } },
                        }],
                    },
                    {
                        "type": "BLOCK",
                        "meta": { "subType": "plain" },
                        "children": [{
                            "type": "PARAGRAPH",
                            "children": [{ "type": "TEXT", "value": "Hello world" }],
                        }],
                    },
                ],
            }],
        })
    );
}

#[test]
fn epigraphs_serialize_ahead_of_base_fields() {
    let document = testing::parse(
        "[quote.epigraph, , John 1:4-5]\n____\nIn him was life\n____\n\n== One\n\nText\n",
    );
    let serialized = serde_json::to_string(&document.to_json(false)).unwrap();
    assert!(serialized.starts_with("{\"epigraphs\":[{"));

    let value = document.to_json(false);
    let epigraph = &value["epigraphs"][0];
    assert_eq!(epigraph["type"], "BLOCK");
    assert_eq!(epigraph["meta"]["subType"], "quote");
    assert_eq!(epigraph["context"]["type"], "epigraph");
    assert_eq!(epigraph["context"]["classList"], json!([]));
    assert_eq!(
        epigraph["context"]["quoteSource"][2]["literal"],
        "1:4-5"
    );
}

#[test]
fn id_table_appears_when_non_empty() {
    let document = testing::parse("[#intro]\n== One\n\nText\n");
    let value = document.to_json(false);
    assert_eq!(value["idChapterLocations"], json!({ "intro": 1 }));

    let without = testing::parse("== One\n\nText\n");
    assert!(without.to_json(false).get("idChapterLocations").is_none());
}

#[test]
fn span_tokens_appear_only_on_request() {
    let document = testing::parse("== One\n\nText\n");
    let bare = document.to_json(false);
    assert!(bare["children"][0].get("startToken").is_none());

    let with_tokens = document.to_json(true);
    let chapter = &with_tokens["children"][0];
    assert_eq!(chapter["startToken"]["kind"], "EQUALS");
    assert_eq!(chapter["startToken"]["line"], 1);
    assert_eq!(chapter["startToken"]["column"], json!({ "start": 1, "end": 3 }));
    assert!(chapter.get("endToken").is_some());
}

#[test]
fn xref_meta_serializes_camel_case() {
    let document = testing::parse("== One\n\nSee <<target-id, LINKABLE-BACK>>\n");
    let value = document.to_json(false);
    let xref = &value["children"][0]["children"][1]["children"][0]["children"][1];
    assert_eq!(xref["type"], "XREF");
    assert_eq!(
        xref["meta"]["xref"],
        json!({ "target": "target-id", "linkableBack": true })
    );
}

#[test]
fn serialization_is_idempotent() {
    let document = testing::parse("== One\n\nSome **bold** text\n");
    assert_eq!(document.to_json(true), document.to_json(true));
    assert_eq!(
        serde_json::to_string(&document.to_json(false)).unwrap(),
        serde_json::to_string(&document.to_json(false)).unwrap()
    );
}
