//! JSON shape of the types the CLI serializes.

#![cfg(feature = "serde")]

use std::sync::Arc;

use untitledpdf_core::*;

#[test]
fn text_state_serializes_font_inline() {
    let state = TextState {
        font: Some(Arc::new(FontResource::new("F1", "BAAAAA+ArialMT"))),
        font_size: 11.0,
        ..TextState::default()
    };
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["font_size"], 11.0);
    assert_eq!(json["font"]["resource_name"], "F1");
    assert_eq!(json["font"]["base_name"], "ArialMT");
    assert_eq!(json["font"]["font_name"], "BAAAAA+ArialMT");

    let restored: TextState = serde_json::from_value(json).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn unset_text_state_has_null_font() {
    let json = serde_json::to_value(TextState::default()).unwrap();
    assert!(json["font"].is_null());
    assert_eq!(json["font_size"], -1.0);
    assert_eq!(json["font_scale"], 1.0);
}

#[test]
fn extraction_carries_early_termination() {
    let mut ex = TextEntryExtraction::default();
    ex.items.push(TextEntry::new(1.0, 2.0, 3.0, "a"));
    ex.terminate("unexpected ']' outside array");
    let json = serde_json::to_value(&ex).unwrap();
    assert_eq!(json["terminated_early"], true);
    assert_eq!(json["diagnostic"], "unexpected ']' outside array");
    assert_eq!(json["warnings"][0]["code"]["type"], "StreamTruncated");
    assert_eq!(json["items"][0]["text"], "a");
}

#[test]
fn font_description_enums_are_named() {
    let d = map_font("Courier", "Courier-BoldOblique");
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["family"], "Courier");
    assert_eq!(json["hint"], "Monospace");
    assert_eq!(json["slant"], "Oblique");
    assert_eq!(json["weight"], "Bold");
}
