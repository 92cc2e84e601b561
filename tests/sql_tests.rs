#![cfg(feature = "sqlite-backend")]

mod common;

use rowgraph::{
    EntityRef, GroupingConfig, GroupingError, RowMapper, SpecRef, SqlRow, SqlSelector, entity,
    bench_utils::{Author, Book, author_books},
};
use rusqlite::Connection;

const AUTHOR_BOOKS: &str = "SELECT a.id AS authorId, a.last_name AS lastName, \
     b.id AS bookId, b.title AS bookTitle \
     FROM author a LEFT JOIN book b ON b.author_id = a.id";

struct AuthorRowMapper;

impl RowMapper<SqlRow> for AuthorRowMapper {
    fn map(&self, row: &SqlRow) -> Result<Option<EntityRef>, GroupingError> {
        let id: i64 = row.get("authorId")?;
        let name: String = row.get("lastName")?;
        Ok(Some(entity(Author::new(id, name))))
    }
}

struct BookRowMapper;

impl RowMapper<SqlRow> for BookRowMapper {
    fn map(&self, row: &SqlRow) -> Result<Option<EntityRef>, GroupingError> {
        let Some(id) = row.get::<Option<i64>>("bookId")? else {
            return Ok(None);
        };
        let title: String = row.get("bookTitle")?;
        Ok(Some(entity(Book::new(id, title))))
    }

    fn group_specs(&self) -> Vec<SpecRef> {
        vec![author_books()]
    }
}

const MAPPERS: &[&dyn RowMapper<SqlRow>] = &[&AuthorRowMapper, &BookRowMapper];

fn library() -> Connection {
    common::init_tracing();
    let conn = Connection::open_in_memory().expect("open");
    conn.execute_batch(
        "CREATE TABLE author (id INTEGER PRIMARY KEY, last_name TEXT NOT NULL);
         CREATE TABLE book (
             id INTEGER PRIMARY KEY,
             author_id INTEGER NOT NULL REFERENCES author(id),
             title TEXT NOT NULL
         );
         INSERT INTO author (id, last_name) VALUES (1, 'Tolkien'), (2, 'Rowling'), (3, 'Orwell');
         INSERT INTO book (id, author_id, title) VALUES
             (1, 1, 'The Fellowship of the Ring'),
             (2, 1, 'The Two Towers'),
             (3, 1, 'The Return of the King'),
             (10, 2, 'Chamber of Secrets'),
             (4, 2, 'Philosopher''s Stone');",
    )
    .expect("schema");
    conn
}

#[test]
fn test_select_one_author_with_books() {
    let conn = library();
    let author = SqlSelector::new(&conn)
        .process_sql(&format!("{AUTHOR_BOOKS} WHERE a.id = :id"))
        .bind(":id", 1i64)
        .apply_row_mappers(MAPPERS)
        .expect("map")
        .select_one::<Author>()
        .expect("select")
        .expect("author");
    assert_eq!(author.name, "Tolkien");
    assert_eq!(author.books.ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_bare_bind_name_and_identifier_order() {
    let conn = library();
    let author = SqlSelector::new(&conn)
        .process_sql(&format!("{AUTHOR_BOOKS} WHERE a.id = :id ORDER BY b.id"))
        .bind("id", 2i64)
        .apply_row_mappers(MAPPERS)
        .expect("map")
        .select_one::<Author>()
        .expect("select")
        .expect("author");
    assert_eq!(author.books.ids(), vec!["10", "4"]);
}

#[test]
fn test_select_many_over_outer_join() {
    let conn = library();
    let authors = SqlSelector::new(&conn)
        .process_sql(&format!("{AUTHOR_BOOKS} ORDER BY a.id, b.id"))
        .apply_row_mappers(MAPPERS)
        .expect("map")
        .select_many::<Author>()
        .expect("select");
    let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Tolkien", "Rowling", "Orwell"]);
    assert_eq!(authors[0].books.len(), 3);
    assert_eq!(authors[1].books.len(), 2);
    assert!(!authors[2].books.is_bound());
}

#[test]
fn test_first_seen_order_through_selector_config() {
    let conn = library();
    let config = GroupingConfig::default().with_child_order(rowgraph::ChildOrder::FirstSeen);
    let author = SqlSelector::with_config(&conn, config)
        .process_sql(&format!("{AUTHOR_BOOKS} WHERE a.id = :id ORDER BY b.id DESC"))
        .bind("id", 1i64)
        .apply_row_mappers(MAPPERS)
        .expect("map")
        .select_one::<Author>()
        .expect("select")
        .expect("author");
    assert_eq!(author.books.ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_no_matching_rows() {
    let conn = library();
    let query = SqlSelector::new(&conn)
        .process_sql(&format!("{AUTHOR_BOOKS} WHERE a.id = :id"))
        .bind("id", 99i64);
    assert!(query.fetch_rows().expect("fetch").is_empty());

    let one = query
        .apply_row_mappers(MAPPERS)
        .expect("map")
        .select_one::<Author>()
        .expect("select");
    assert!(one.is_none());
}

#[test]
fn test_rebinding_replaces_value() {
    let conn = library();
    let rows = SqlSelector::new(&conn)
        .process_sql(&format!("{AUTHOR_BOOKS} WHERE a.id = :id"))
        .bind("id", 1i64)
        .bind(":id", 3i64)
        .fetch_rows()
        .expect("fetch");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String>("lastName").expect("name"), "Orwell");
    assert!(rows[0].is_null("bookId").expect("column"));
    assert_eq!(
        rows[0].columns(),
        &["authorId", "lastName", "bookId", "bookTitle"]
    );
}

#[test]
fn test_invalid_sql_is_query_error() {
    let conn = library();
    let err = SqlSelector::new(&conn)
        .process_sql("SELECT FROM nowhere")
        .fetch_rows()
        .unwrap_err();
    assert!(matches!(err, GroupingError::Query(_)));
}

#[test]
fn test_empty_bind_name_is_rejected() {
    let conn = library();
    let err = SqlSelector::new(&conn)
        .process_sql(AUTHOR_BOOKS)
        .bind("", 1i64)
        .fetch_rows()
        .unwrap_err();
    assert!(matches!(err, GroupingError::InvalidInput(_)));
}

#[test]
fn test_missing_column_surfaces_from_mapper() {
    let conn = library();
    let err = SqlSelector::new(&conn)
        .process_sql("SELECT id AS authorId FROM author")
        .apply_row_mappers(MAPPERS)
        .err()
        .expect("error");
    assert!(matches!(err, GroupingError::ColumnNotFound(ref column) if column == "lastName"));
}
