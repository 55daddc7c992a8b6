use docqa_chat::{FallbackResponder, normalize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(q in "\\PC{0,40}") {
        let once = normalize(&q);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn surrounding_whitespace_and_case_do_not_matter(
        pad_l in "[ \\t\\n]{0,3}",
        pad_r in "[ \\t\\n]{0,3}",
        upper in any::<bool>(),
    ) {
        let table = FallbackResponder::builtin().unwrap();
        let phrase = if upper { "GOOD MORNING" } else { "good morning" };
        let question = format!("{pad_l}{phrase}{pad_r}");
        prop_assert_eq!(table.lookup(&question), table.lookup("good morning"));
        prop_assert!(table.lookup(&question).is_some());
    }
}

#[test]
fn custom_table_replaces_builtin_replies() {
    let table = FallbackResponder::from_json(
        r#"{"entries":[{"phrase":"ping","reply":"pong"},{"phrase":"PING","reply":"pong!"}]}"#,
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup(" ping "), Some("pong!"));
    assert_eq!(table.lookup("hi"), None);
}
