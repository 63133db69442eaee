//! Integration tests: history through the editor facade (bc-editor).
//!
//! Drives the editor the way a host would (pointer, keys, palette, named
//! commands) and checks that history stays in step with the document.

use bc_core::{BlockId, ComponentKey, ComponentRegistry, Container, Document, parse_document};
use bc_editor::{Command, Editor, EditorConfig, Modifiers, PaletteEvent};
use pretty_assertions::assert_eq;

fn make_editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    let doc = parse_document(include_str!("fixtures/form.json")).unwrap();
    Editor::new(doc, ComponentRegistry::stock(), EditorConfig::default())
}

fn index_of(editor: &Editor, id: &str) -> usize {
    editor.document().position_of(BlockId::intern(id)).unwrap()
}

// ─── Inverse law ────────────────────────────────────────────────────────

#[test]
fn undo_all_returns_to_start_and_redo_all_returns_to_end() {
    let mut editor = make_editor();
    let d0 = editor.document().clone();

    // C1: drag the focused pair (email + submit) by pressing submit.
    let submit = index_of(&editor, "submit");
    editor.block_pointer_down(submit, 0.0, 0.0, Modifiers::NONE);
    editor.pointer_move(100.0, 17.0, Modifiers::NONE);
    editor.pointer_move(200.0, 37.0, Modifiers::NONE);
    editor.pointer_up();
    // C2, C3: z-order.
    editor.invoke(Command::PlaceTop);
    editor.invoke(Command::PlaceBottom);
    // C4: property panel edit.
    let title = editor.document().blocks()[0].clone();
    let mut edited = title.clone();
    edited.props.insert("text".into(), serde_json::json!("Welcome"));
    editor.invoke(Command::UpdateBlock {
        new: Box::new(edited),
        old: title.id,
    });
    // C5: container resize.
    let mut resized = editor.document().clone();
    resized.container = Container {
        width: 1024.0,
        height: 768.0,
    };
    editor.invoke(Command::UpdateContainer(Box::new(resized)));
    // C6: delete.
    editor.invoke(Command::Delete);

    let dn = editor.document().clone();
    assert_eq!(editor.commands().history_len(), 6);

    for _ in 0..6 {
        editor.invoke(Command::Undo);
    }
    assert_eq!(editor.document(), &d0);
    assert_eq!(editor.commands().cursor(), None);

    for _ in 0..6 {
        editor.invoke(Command::Redo);
    }
    assert_eq!(editor.document(), &dn);
    assert_eq!(editor.commands().cursor(), Some(5));
}

// ─── Redo branch pruning ────────────────────────────────────────────────

#[test]
fn new_command_after_undo_discards_redo_branch() {
    let mut editor = make_editor();

    editor.invoke(Command::PlaceTop); // C1
    editor.invoke(Command::Delete); // C2
    editor.invoke(Command::Undo);
    let after_c1 = editor.document().clone();

    editor.invoke(Command::PlaceBottom); // C3
    let after_c3 = editor.document().clone();

    editor.invoke(Command::Undo);
    assert_eq!(editor.document(), &after_c1);
    editor.invoke(Command::Redo);
    assert_eq!(editor.document(), &after_c3);
    // C2 is gone for good.
    editor.invoke(Command::Redo);
    assert_eq!(editor.document(), &after_c3);
    assert_eq!(editor.document().blocks().len(), 4);
}

// ─── Gestures ───────────────────────────────────────────────────────────

#[test]
fn click_without_move_records_nothing() {
    let mut editor = make_editor();
    let title = index_of(&editor, "title");
    editor.block_pointer_down(title, 40.0, 40.0, Modifiers::NONE);
    editor.pointer_up();

    assert_eq!(editor.commands().history_len(), 0);
    assert_eq!(editor.commands().cursor(), None);
    // Selection still changed.
    assert!(editor.document().blocks()[title].focus);
}

#[test]
fn whole_drag_is_one_undo_step() {
    let mut editor = make_editor();
    let email = index_of(&editor, "email");
    let start = editor.document().blocks()[email].position();

    editor.block_pointer_down(email, 0.0, 0.0, Modifiers::NONE);
    for i in 1..=10 {
        editor.pointer_move(i as f32 * 13.0, i as f32 * 11.0, Modifiers::NONE);
    }
    editor.pointer_up();
    assert_eq!(editor.commands().history_len(), 1);
    assert_ne!(editor.document().blocks()[email].position(), start);

    assert!(editor.key_down("z", Modifiers::CTRL));
    assert_eq!(editor.document().blocks()[email].position(), start);
}

#[test]
fn palette_drop_is_undoable() {
    let mut editor = make_editor();
    let before = editor.document().clone();

    editor.palette_drag_start(ComponentKey::intern("select"));
    editor.palette_event(PaletteEvent::Enter);
    editor.palette_event(PaletteEvent::Over);
    editor.palette_event(PaletteEvent::Drop { x: 400.0, y: 300.0 });
    editor.palette_drag_end();
    assert_eq!(editor.document().blocks().len(), 5);

    // Host measures the new block: it recenters under the drop point.
    assert!(editor.measure_block(4, 160.0, 32.0));
    let dropped = &editor.document().blocks()[4];
    assert_eq!(dropped.position(), (284.0, 320.0));
    assert!(!dropped.align_center);

    editor.invoke(Command::Undo);
    assert_eq!(editor.document(), &before);
}

#[test]
fn cancelled_palette_drag_still_records_one_step() {
    let mut editor = make_editor();
    editor.palette_drag_start(ComponentKey::intern("text"));
    editor.palette_event(PaletteEvent::Leave);
    editor.palette_drag_end();
    assert_eq!(editor.commands().history_len(), 1);
    assert_eq!(editor.document().blocks().len(), 4);
}

// ─── Import / export ────────────────────────────────────────────────────

#[test]
fn import_goes_through_history() {
    let mut editor = make_editor();
    let before = editor.document().clone();

    editor
        .import_json(r#"{ "container": { "width": 300, "height": 200 }, "blocks": [] }"#)
        .unwrap();
    assert_eq!(editor.document().container.width, 300.0);
    assert!(editor.document().blocks().is_empty());

    editor.invoke(Command::Undo);
    assert_eq!(editor.document(), &before);
}

#[test]
fn malformed_import_leaves_everything_alone() {
    let mut editor = make_editor();
    let before = editor.document().clone();
    assert!(editor.import_json("{ not json").is_err());
    assert_eq!(editor.document(), &before);
    assert_eq!(editor.commands().history_len(), 0);
}

#[test]
fn export_reflects_live_document() {
    let mut editor = make_editor();
    editor.invoke(Command::Delete);
    let exported = parse_document(&editor.export_json().unwrap()).unwrap();
    assert_eq!(&exported, editor.document());
    assert_eq!(exported.blocks().len(), 2);
}

// ─── Delete ─────────────────────────────────────────────────────────────

#[test]
fn delete_then_undo_restores_exact_sequence() {
    let mut editor = make_editor();
    // Push one unfocused block below zero first.
    let mut doc: Document = editor.document().clone();
    doc.blocks_mut()[2].z_index = -3;
    editor.invoke(Command::UpdateContainer(Box::new(doc)));
    let original = editor.document().blocks().to_vec();

    assert!(editor.key_down("Delete", Modifiers::NONE));
    let ids: Vec<&str> = editor
        .document()
        .blocks()
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(ids, vec!["title", "password"]);

    editor.invoke(Command::Undo);
    assert_eq!(editor.document().blocks(), original.as_slice());
}
