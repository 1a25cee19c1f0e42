//! Sessions driven through `update`, mirrored onto an in-memory host

mod common;

use brick::engine::EditOutcome;
use brick::error::EditError;
use brick::{update, BrickConfig, EditMsg, EditorHost, MemoryHost, Session, TextRange};
use common::{pos, test_session};

#[test]
fn test_delete_confirm_updates_host() {
    let mut session = test_session("a();\nb();\n", 2, 1);

    let outcome = update(&mut session, EditMsg::DeleteBlock).unwrap();
    assert!(matches!(outcome, EditOutcome::DeletionRequested(_)));
    let highlight = session.host().highlight().unwrap();
    assert_eq!(highlight.style, "pending-delete");
    assert_eq!(highlight.range, TextRange::new(pos(2, 0), pos(2, 4)));
    assert_eq!(session.host().get_text(), "a();\nb();\n");

    let outcome = update(&mut session, EditMsg::Confirm).unwrap();
    assert_eq!(outcome, EditOutcome::Applied { cursor: pos(2, 0) });
    assert_eq!(session.host().get_text(), "a();\n");
    assert_eq!(session.host().get_cursor_position(), pos(2, 0));
    assert!(session.host().highlight().is_none());
    assert!(session.state().pending().is_none());
}

#[test]
fn test_confirmed_deletion_is_one_undo_step() {
    let mut session = test_session("a();\nb();\n", 1, 2);
    update(&mut session, EditMsg::DeleteBlock).unwrap();
    update(&mut session, EditMsg::Confirm).unwrap();

    let mut host = session.into_host();
    assert!(host.undo());
    assert_eq!(host.get_text(), "a();\nb();\n");
    assert!(!host.can_undo());
}

#[test]
fn test_pending_deletion_keeps_its_highlight() {
    let mut session = test_session("a();\nb();\n", 2, 1);
    update(&mut session, EditMsg::DeleteBlock).unwrap();

    let err = update(&mut session, EditMsg::TypeChar('x')).unwrap_err();
    assert_eq!(err, EditError::ConcurrentDeletionPending);
    assert_eq!(session.host().highlight().unwrap().style, "pending-delete");
    assert_eq!(session.host().get_text(), "a();\nb();\n");

    assert_eq!(update(&mut session, EditMsg::Cancel).unwrap(), EditOutcome::Cancelled);
    assert!(session.host().highlight().is_none());
    assert!(update(&mut session, EditMsg::TypeChar('x')).is_ok());
}

#[test]
fn test_confirm_or_cancel_without_pending_deletion() {
    let mut session = test_session("a();\n", 1, 0);
    assert_eq!(
        update(&mut session, EditMsg::Confirm).unwrap_err(),
        EditError::NoPendingDeletion
    );
    assert_eq!(
        update(&mut session, EditMsg::Cancel).unwrap_err(),
        EditError::NoPendingDeletion
    );
}

#[test]
fn test_insert_block_by_template_name() {
    let mut session = test_session("a();\n", 1, 4);
    let outcome = update(&mut session, EditMsg::InsertBlock("while".to_string())).unwrap();

    assert_eq!(outcome, EditOutcome::Applied { cursor: pos(2, 0) });
    assert_eq!(
        session.host().get_text(),
        "a();\nwhile (i < 10) {\n    // do something\n}\n"
    );
    assert_eq!(session.host().get_cursor_position(), pos(2, 0));
}

#[test]
fn test_unknown_template_changes_nothing() {
    let mut session = test_session("a();\n", 1, 4);
    let revision = session.state().revision();

    let err = update(&mut session, EditMsg::InsertBlock("switch".to_string())).unwrap_err();
    assert_eq!(err, EditError::UnknownTemplate("switch".to_string()));
    assert_eq!(session.state().revision(), revision);
    assert!(!session.host().can_undo());
}

#[test]
fn test_rejected_backspace_flashes_cursor_line() {
    let mut session = test_session("if (a) {\n}\n", 1, 4);

    let err = update(&mut session, EditMsg::Backspace).unwrap_err();
    assert!(matches!(err, EditError::GuardRejected { .. }));

    let highlight = session.host().highlight().unwrap();
    assert_eq!(highlight.style, "rejected-edit");
    assert_eq!(highlight.range, TextRange::new(pos(1, 0), pos(1, 8)));
    assert_eq!(session.host().get_text(), "if (a) {\n}\n");
}

#[test]
fn test_backspace_after_line_separator_in_string() {
    // U+2028 breaks the line for the host, so `foo();` sits on line 3
    let mut session = test_session("var s = '\u{2028}';\nfoo();\n", 3, 6);

    let outcome = update(&mut session, EditMsg::Backspace).unwrap();
    let EditOutcome::DeletionRequested(pending) = outcome else {
        panic!("expected a deletion request, got {:?}", outcome);
    };
    assert_eq!(pending.target, TextRange::new(pos(3, 0), pos(3, 6)));
    assert_eq!(session.host().get_cursor_position(), pos(3, 6));
    assert_eq!(session.host().get_text(), "var s = '\u{2028}';\nfoo();\n");
}

#[test]
fn test_insert_after_statement_with_trailing_comment() {
    let text = "function f() {\n    a(); // about a\n    b();\n}\n";
    let mut session = test_session(text, 2, 19);

    update(&mut session, EditMsg::InsertBlock("while".to_string())).unwrap();
    assert_eq!(
        session.host().get_text(),
        "function f() {\n    a(); // about a\n    while (i < 10) {\n        // do something\n    }\n    b();\n}\n"
    );
}

#[test]
fn test_insert_keeps_crlf_line_endings() {
    let mut session = test_session("a();\r\nb();\r\n", 1, 4);

    update(&mut session, EditMsg::InsertBlock("while".to_string())).unwrap();
    assert_eq!(
        session.host().get_text(),
        "a();\r\nwhile (i < 10) {\r\n    // do something\r\n}\r\nb();\r\n"
    );
}

#[test]
fn test_typing_follows_host_cursor() {
    let mut session = test_session("if (a) {\n}\n", 1, 5);

    for ch in ['|', '|', 'b'] {
        update(&mut session, EditMsg::TypeChar(ch)).unwrap();
    }
    assert_eq!(session.host().get_text(), "if (a||b) {\n}\n");
    assert_eq!(session.host().get_cursor_position(), pos(1, 8));
    assert!(session.state().is_parsable());
    assert!(!session.state().region_state().is_constrained());
}

#[test]
fn test_rejected_edit_while_unparsable() {
    let mut session = test_session("if (a) {\n}\n", 1, 5);
    update(&mut session, EditMsg::TypeChar('|')).unwrap();
    assert!(session.state().region_state().is_constrained());

    session.host_mut().set_cursor_position(pos(2, 1));
    let err = update(&mut session, EditMsg::TypeChar('x')).unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(session.host().highlight().unwrap().range.start, pos(2, 0));
    assert_eq!(session.host().get_text(), "if (a|) {\n}\n");
}

#[test]
fn test_delete_selection_from_host() {
    let mut session = test_session("a();\nif (x) {\n    b();\n}\n", 1, 0);
    assert_eq!(
        update(&mut session, EditMsg::DeleteSelection).unwrap(),
        EditOutcome::Unchanged
    );

    session
        .host_mut()
        .set_selection(Some(TextRange::new(pos(2, 4), pos(3, 6))));
    let outcome = update(&mut session, EditMsg::DeleteSelection).unwrap();
    let EditOutcome::DeletionRequested(pending) = outcome else {
        panic!("expected a deletion request");
    };
    assert_eq!(pending.target, TextRange::new(pos(2, 0), pos(4, 1)));

    update(&mut session, EditMsg::Confirm).unwrap();
    assert_eq!(session.host().get_text(), "a();\n");
}

#[test]
fn test_sync_after_host_change() {
    let mut session = test_session("a();\n", 1, 0);
    session.host_mut().set_text("a(\n");

    assert_eq!(update(&mut session, EditMsg::Sync).unwrap(), EditOutcome::Synced);
    assert_eq!(session.state().buffer(), "a(\n");
    assert!(!session.state().is_parsable());
    assert_eq!(update(&mut session, EditMsg::Sync).unwrap(), EditOutcome::Unchanged);
}

#[test]
fn test_sync_drops_pending_deletion_and_its_highlight() {
    let mut session = test_session("a();\nb();\n", 2, 1);
    update(&mut session, EditMsg::DeleteBlock).unwrap();
    assert!(session.host().highlight().is_some());

    session.host_mut().set_text("a();\nb();\nc();\n");
    assert_eq!(update(&mut session, EditMsg::Sync).unwrap(), EditOutcome::Synced);
    assert!(session.state().pending().is_none());
    assert!(session.host().highlight().is_none());
    assert_eq!(
        update(&mut session, EditMsg::Confirm).unwrap_err(),
        EditError::NoPendingDeletion
    );
}

#[test]
fn test_session_from_config() {
    let config = BrickConfig {
        pending_delete_style: "warn".to_string(),
        ..Default::default()
    };
    let mut host = MemoryHost::new("a();\n");
    host.set_cursor_position(pos(1, 1));
    let mut session =
        Session::from_config(host, &config, brick::templates::TemplateCatalog::builtin()).unwrap();

    update(&mut session, EditMsg::DeleteBlock).unwrap();
    assert_eq!(session.host().highlight().unwrap().style, "warn");
}
