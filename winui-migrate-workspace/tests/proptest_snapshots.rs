//! Property tests for snapshot isolation.
//!
//! Any sequence of content edits must leave every earlier snapshot exactly as
//! it was, and must never change the document id set or its order.

use proptest::prelude::*;
use winui_migrate_workspace::ProjectSnapshot;

fn base(docs: usize) -> ProjectSnapshot {
    ProjectSnapshot::new(
        "/p/App.csproj".into(),
        "<Project />",
        (0..docs)
            .map(|i| (format!("/p/D{i}.cs").into(), format!("// doc {i}")))
            .collect(),
    )
}

fn contents(s: &ProjectSnapshot) -> Vec<String> {
    s.documents_of()
        .into_iter()
        .map(|id| s.resolve_document(id).unwrap().text.to_string())
        .collect()
}

proptest! {
    #[test]
    fn earlier_snapshots_never_change(
        docs in 1usize..6,
        edits in prop::collection::vec((0usize..6, "[a-z ]{0,12}"), 0..20),
    ) {
        let root = base(docs);
        let ids = root.documents_of();

        let mut history = vec![(root.clone(), contents(&root))];
        let mut current = root;
        for (slot, text) in edits {
            let id = ids[slot % ids.len()];
            current = current.with_document_text(id, text).unwrap();
            history.push((current.clone(), contents(&current)));
        }

        for (snapshot, seen) in &history {
            prop_assert_eq!(&contents(snapshot), seen);
            prop_assert_eq!(snapshot.documents_of(), ids.clone());
        }
    }
}
