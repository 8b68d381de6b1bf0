//! PDF fixtures shared by the CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use lopdf::{Dictionary, Object, Stream, dictionary};

pub fn cmd() -> Command {
    Command::cargo_bin("untitledpdf").unwrap()
}

/// Build a PDF with one page per content stream. Every page shares the font
/// resources `F1` (Helvetica) and `F2` (subset-tagged Times-BoldItalic).
pub fn pdf_with_pages(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let times = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => "ABCDEF+Times-BoldItalic",
    });
    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(helvetica),
            "F2" => Object::Reference(times),
        },
    };

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources.clone(),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn pdf_with_content(content: &[u8]) -> Vec<u8> {
    pdf_with_pages(&[content])
}

/// Write PDF bytes to a temporary file and return the handle.
pub fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

/// Run the binary and parse stdout as JSON.
pub fn run_json(args: &[&str]) -> serde_json::Value {
    let output = cmd().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
