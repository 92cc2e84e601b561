use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::Serialize;

use crate::{
    children::ChildSlot,
    model::{DataModel, EntityRef, entity},
    relation::{Relation, SpecRef},
    snapshot::RowSnapshot,
};

#[derive(Debug, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub books: ChildSlot<Book>,
    pub awards: ChildSlot<Award>,
}

impl Author {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            books: ChildSlot::new(),
            awards: ChildSlot::new(),
        }
    }
}

impl DataModel for Author {
    fn unique_identifier(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub chapters: ChildSlot<Chapter>,
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            chapters: ChildSlot::new(),
        }
    }
}

impl DataModel for Book {
    fn unique_identifier(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct Chapter {
    pub id: i64,
    pub heading: String,
}

impl DataModel for Chapter {
    fn unique_identifier(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct Award {
    pub id: i64,
    pub name: String,
}

impl DataModel for Award {
    fn unique_identifier(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

fn books_of(author: &Author) -> &ChildSlot<Book> {
    &author.books
}

fn awards_of(author: &Author) -> &ChildSlot<Award> {
    &author.awards
}

fn chapters_of(book: &Book) -> &ChildSlot<Chapter> {
    &book.chapters
}

pub fn author_books() -> SpecRef {
    Relation::<Author, Book>::new(books_of).shared()
}

pub fn author_awards() -> SpecRef {
    Relation::<Author, Award>::new(awards_of).shared()
}

pub fn book_chapters() -> SpecRef {
    Relation::<Book, Chapter>::new(chapters_of).shared()
}

/// One row per `(author, book)` pair; `None` models an outer-join row with no
/// book. Every row gets fresh instances, as a row mapper would produce.
pub fn author_book_rows(pairs: &[(i64, Option<i64>)]) -> Vec<RowSnapshot> {
    pairs
        .iter()
        .map(|&(author, book)| {
            let mut entities: Vec<EntityRef> =
                vec![entity(Author::new(author, format!("author{author}")))];
            if let Some(book) = book {
                entities.push(entity(Book::new(book, format!("book{book}"))));
            }
            snapshot(entities)
        })
        .collect()
}

#[derive(Clone, Copy, Debug)]
pub enum JoinShape {
    /// One row per `(author, book)`.
    Flat,
    /// Every row repeated `copies` times, as a second unrelated join would.
    FanOut { copies: usize },
    /// One row per `(author, book, chapter)`.
    Nested { chapters: usize },
}

#[derive(Debug)]
pub struct JoinDataset {
    pub rows: Vec<RowSnapshot>,
    /// Author id with its book ids in generation order.
    pub catalog: Vec<(i64, Vec<i64>)>,
    pub shape: JoinShape,
}

impl JoinDataset {
    pub fn specs(&self) -> Vec<SpecRef> {
        match self.shape {
            JoinShape::Nested { .. } => vec![author_books(), book_chapters()],
            _ => vec![author_books()],
        }
    }

    pub fn authors(&self) -> usize {
        self.catalog.len()
    }

    pub fn books(&self) -> usize {
        self.catalog.iter().map(|(_, books)| books.len()).sum()
    }
}

/// Builds author/book join rows ordered by author. Authors drawing zero books
/// get a single outer-join row.
pub fn generate_rows(shape: JoinShape, authors: usize, max_books: usize, seed: u64) -> JoinDataset {
    assert!(authors > 0, "authors must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut catalog = Vec::with_capacity(authors);
    let mut next_book = 1i64;
    for author in 1..=authors as i64 {
        let count = rng.gen_range(0..=max_books);
        let books: Vec<i64> = (next_book..next_book + count as i64).collect();
        next_book += count as i64;
        catalog.push((author, books));
    }

    let mut rows = Vec::new();
    for (author, books) in &catalog {
        if books.is_empty() {
            rows.extend(author_book_rows(&[(*author, None)]));
            continue;
        }
        for &book in books {
            match shape {
                JoinShape::Flat => rows.extend(author_book_rows(&[(*author, Some(book))])),
                JoinShape::FanOut { copies } => {
                    for _ in 0..copies.max(1) {
                        rows.extend(author_book_rows(&[(*author, Some(book))]));
                    }
                }
                JoinShape::Nested { chapters } => {
                    for chapter in 0..chapters.max(1) as i64 {
                        let chapter_id = book * 100 + chapter;
                        rows.push(snapshot(vec![
                            entity(Author::new(*author, format!("author{author}"))),
                            entity(Book::new(book, format!("book{book}"))),
                            entity(Chapter {
                                id: chapter_id,
                                heading: format!("chapter{chapter_id}"),
                            }),
                        ]));
                    }
                }
            }
        }
    }
    JoinDataset {
        rows,
        catalog,
        shape,
    }
}

/// Deterministically reorders rows, simulating a query without ORDER BY.
pub fn shuffle_rows(rows: &mut [RowSnapshot], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);
}

fn snapshot(entities: Vec<EntityRef>) -> RowSnapshot {
    RowSnapshot::from_entities(entities).expect("fixture rows hold one entity per kind")
}
