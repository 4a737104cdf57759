use std::thread;
use textedit_core::Document;
use textedit_lsp::{
    ApplyOptions, LspPosition, LspRange, LspTextEdit, PositionEncoding, SharedDocument,
};

#[test]
fn test_readers_never_observe_half_applied_batch() {
    let before = "x".repeat(200);
    let after = "y".repeat(200);
    let shared = SharedDocument::new(Document::from_text(&before));

    // One single-character replacement per edit, so a torn batch would be visible.
    let edits = (0..200)
        .map(|i| {
            LspTextEdit::new(
                LspRange::new(LspPosition::new(0, i), LspPosition::new(0, i + 1)),
                "y",
            )
        })
        .collect::<Vec<_>>();

    let readers = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let (before, after) = (before.clone(), after.clone());
            thread::spawn(move || {
                for _ in 0..500 {
                    let text = shared.text();
                    assert!(text == before || text == after, "torn read: {text}");
                    let position = shared.offset_to_position(1000, PositionEncoding::Utf16);
                    assert_eq!(position, LspPosition::new(0, 200));
                }
            })
        })
        .collect::<Vec<_>>();

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            shared
                .apply_lsp_text_edits(&edits, &ApplyOptions::default())
                .unwrap()
        })
    };

    let report = writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(report.applied, 200);
    assert_eq!(shared.text(), after);
}

#[test]
fn test_concurrent_writers_are_serialized() {
    let shared = SharedDocument::new(Document::new());

    let writers = (0..8)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    // Both inserts target the pristine start of the document.
                    let edits = [
                        LspTextEdit::insert(LspPosition::new(0, 0), "("),
                        LspTextEdit::insert(LspPosition::new(0, 0), ")"),
                    ];
                    shared
                        .apply_lsp_text_edits(&edits, &ApplyOptions::default())
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(shared.text(), "()".repeat(200));
}
