mod common;

use std::sync::Arc;

use rowgraph::{
    AssociationIndex, ChildList, ChildSlot, EntityKind, EntityRef, entity,
    bench_utils::{Author, Award, Book, Chapter},
    model::downcast,
};

fn book(id: i64) -> EntityRef {
    entity(Book::new(id, format!("book{id}")))
}

#[test]
fn test_record_creates_then_reuses_list() {
    common::init_tracing();
    let mut index = AssociationIndex::new();
    let author = EntityKind::of::<Author>();
    let book_kind = EntityKind::of::<Book>();

    let (existed, first) = index.record(author, "1".into(), book_kind, book(1));
    assert!(!existed);
    let (existed, second) = index.record(author, "1".into(), book_kind, book(1));
    assert!(existed);
    assert!(first.same_list(&second));
    assert_eq!(first.len(), 2, "duplicates are kept until phase two");
    assert_eq!(index.list_count(), 1);
    assert_eq!(index.appended(), 2);
}

#[test]
fn test_lists_are_separate_per_parent_and_child_kind() {
    let mut index = AssociationIndex::with_capacity(4);
    assert!(index.is_empty());
    let author = EntityKind::of::<Author>();

    let (_, books_one) = index.record(author, "1".into(), EntityKind::of::<Book>(), book(1));
    let (_, books_two) = index.record(author, "2".into(), EntityKind::of::<Book>(), book(2));
    let (existed, awards_one) = index.record(
        author,
        "1".into(),
        EntityKind::of::<Award>(),
        entity(Award {
            id: 7,
            name: "prize".into(),
        }),
    );
    assert!(!existed);
    assert!(!books_one.same_list(&books_two));
    assert!(!books_one.same_list(&awards_one));
    assert_eq!(index.parent_count(author), 2);
    assert_eq!(index.parent_count(EntityKind::of::<Book>()), 0);
    assert_eq!(index.list_count(), 3);
    assert!(!index.is_empty());

    let found = index
        .children(author, "1", EntityKind::of::<Award>())
        .expect("awards list");
    assert!(found.same_list(&awards_one));
    assert!(
        index
            .children(author, "3", EntityKind::of::<Book>())
            .is_none()
    );
}

#[test]
fn test_child_list_typed_view_skips_other_kinds() {
    let chapter = entity(Chapter {
        id: 1,
        heading: "intro".into(),
    });
    let list = ChildList::from_entities(vec![book(3), chapter]);
    list.push(book(4));
    let books: Vec<Arc<Book>> = list.typed::<Book>();
    assert_eq!(books.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3, 4]);
    assert_eq!(list.len(), 3);
    assert!(downcast::<Chapter>(&list.snapshot()[1]).is_some());
}

#[test]
fn test_slot_binding_aliases_live_list() {
    let slot: ChildSlot<Book> = ChildSlot::new();
    assert!(!slot.is_bound());
    assert!(slot.get().is_none());
    assert!(slot.is_empty());

    let list = ChildList::new();
    slot.bind(list.clone());
    assert!(slot.is_bound());
    assert_eq!(slot.len(), 0);

    list.push(book(5));
    list.push(book(6));
    assert_eq!(slot.ids(), vec!["5", "6"]);

    let copy = slot.clone();
    list.push(book(7));
    assert_eq!(copy.len(), 3, "clones share the bound list");
}

#[test]
fn test_slot_serializes_unbound_as_null() {
    let slot: ChildSlot<Book> = ChildSlot::default();
    assert_eq!(serde_json::to_value(&slot).expect("json"), serde_json::Value::Null);

    slot.bind(ChildList::from_entities(vec![book(2)]));
    assert_eq!(
        serde_json::to_value(&slot).expect("json"),
        serde_json::json!([{ "id": 2, "title": "book2", "chapters": null }])
    );
    assert!(format!("{slot:?}").contains("book2"));
    assert_eq!(format!("{:?}", ChildSlot::<Book>::new()), "unbound");
}

#[test]
fn test_entity_kind_identity_and_display() {
    let author = EntityKind::of::<Author>();
    assert_eq!(author, EntityKind::of::<Author>());
    assert_ne!(author, EntityKind::of::<Book>());
    assert_eq!(author.to_string(), "Author");
    assert_eq!(author.short_name(), "Author");
    assert!(author.name().ends_with("bench_utils::Author"));
    assert_eq!(EntityKind::of_val(&*book(1)), EntityKind::of::<Book>());
}

#[test]
fn test_kind_of_shared_handle_names_the_entity_type() {
    let handle = book(1);
    let kind = EntityKind::of_val(&*handle);
    assert_eq!(kind, EntityKind::of::<Book>());
    assert_eq!(kind.short_name(), "Book");
    assert_ne!(kind, EntityKind::of_val(&*entity(Author::new(1, "a"))));
}
