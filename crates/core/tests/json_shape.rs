use blockmark_core::{blocks_to_json, md_to_blocks};
use serde_json::{Value, json};

fn to_json(source: &str) -> Value {
    let text = blocks_to_json(&md_to_blocks(source)).expect("serialize blocks");
    serde_json::from_str(&text).expect("valid json")
}

#[test]
fn runs_carry_every_annotation() {
    assert_eq!(
        to_json("**Hi** [docs](https://d.test) `x`"),
        json!([{
            "type": "paragraph",
            "text": [
                {"text": "Hi", "bold": true, "italic": false, "strikethrough": false, "code": false, "color": "default"},
                {"text": " ", "bold": false, "italic": false, "strikethrough": false, "code": false, "color": "default"},
                {"text": "docs", "bold": false, "italic": false, "strikethrough": false, "code": false, "color": "default",
                 "link": {"url": "https://d.test"}},
                {"text": " ", "bold": false, "italic": false, "strikethrough": false, "code": false, "color": "default"},
                {"text": "x", "bold": false, "italic": false, "strikethrough": false, "code": true, "color": "red"}
            ]
        }])
    );
}

#[test]
fn empty_children_are_omitted() {
    let value = to_json("- item\n  - sub");
    assert_eq!(value[0]["type"], "bullet_item");
    assert_eq!(value[0]["children"][0]["type"], "bullet_item");
    assert!(value[0]["children"][0].get("children").is_none());
}

#[test]
fn toggle_children_always_present() {
    let value = to_json(":::toggle-heading Empty\n:::");
    assert_eq!(value[0]["type"], "toggle");
    assert_eq!(value[0]["children"], json!([]));
}

#[test]
fn container_shapes() {
    let value = to_json(
        ":::column-list\n:::column\n:::video https://v.test/a.mp4\n:::\n:::\n:::synced-block s1\n:::\n![Alt](https://i.test/p.png)",
    );
    assert_eq!(
        value,
        json!([
            {"type": "column_list", "columns": [[{"type": "video", "url": "https://v.test/a.mp4"}]]},
            {"type": "synced_block", "sync_from_id": "s1"},
            {"type": "image", "url": "https://i.test/p.png", "alt": "Alt"}
        ])
    );
}

#[test]
fn code_and_table_shapes() {
    let value = to_json("```\nraw\n```\n| a |");
    assert_eq!(value[0], json!({"type": "code", "content": "raw", "language": "plain text"}));
    assert_eq!(value[1]["type"], "table");
    assert_eq!(value[1]["width"], 1);
    assert_eq!(value[1]["has_header"], false);
    assert_eq!(value[1]["rows"][0][0][0]["text"], "a");
}
