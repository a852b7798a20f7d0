//! SQL construction for the `schools` table
//!
//! Dynamic statements are `sqlx::QueryBuilder`s: text is pushed, values
//! are bound with `push_bind`, so values never end up in the text.

use sqlx::{Postgres, QueryBuilder};

use crate::models::{ListQuery, SchoolChanges, SearchTerm};

/// Columns returned for a full school row, in `School` field order.
pub const SCHOOL_COLUMNS: &str =
    "id, school_name, address, city, state, contact, email, image, created_at, updated_at";

/// Columns a search term is matched against
const SEARCH_COLUMNS: [&str; 4] = ["school_name", "address", "city", "state"];

pub type SchoolQuery = QueryBuilder<'static, Postgres>;

/// Append the search predicate, if any. Nothing is pushed without a term.
fn push_search_filter(builder: &mut SchoolQuery, search: Option<&SearchTerm>) {
    let Some(term) = search else {
        return;
    };
    let pattern = term.like_pattern();

    builder.push(" WHERE (");
    let mut any = builder.separated(" OR ");
    for column in SEARCH_COLUMNS {
        any.push(format!("{column} ILIKE "));
        any.push_bind_unseparated(pattern.clone());
    }
    builder.push(")");
}

/// Row and count queries for one listing request
pub struct ListStatements {
    pub rows: SchoolQuery,
    pub count: SchoolQuery,
}

/// Build the paginated row query and its matching count query.
///
/// Both get their predicate from `push_search_filter`, so the total always
/// counts exactly the rows the page was cut from.
pub fn list_statements(query: &ListQuery) -> ListStatements {
    let search = query.search.as_ref();

    let mut rows = QueryBuilder::new(format!("SELECT {SCHOOL_COLUMNS} FROM schools"));
    push_search_filter(&mut rows, search);
    rows.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    rows.push_bind(i64::from(query.page.limit()));
    rows.push(" OFFSET ");
    rows.push_bind(query.page.offset() as i64);

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM schools");
    push_search_filter(&mut count, search);

    ListStatements { rows, count }
}

/// Build `UPDATE ... SET` for the fields present in `changes`.
///
/// Assignments follow the fixed column order, `updated_at = NOW()` is
/// always appended and the row id is bound last. Callers must reject an
/// empty change set first; see `SchoolPatch::into_changes`.
pub fn update_statement(id: i64, changes: &SchoolChanges) -> SchoolQuery {
    let mut builder = QueryBuilder::new("UPDATE schools SET ");

    let mut set = builder.separated(", ");
    let required = [
        ("school_name", &changes.school_name),
        ("address", &changes.address),
        ("city", &changes.city),
        ("state", &changes.state),
    ];
    for (column, value) in required {
        if let Some(v) = value {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(v.clone());
        }
    }

    let optional = [
        ("contact", &changes.contact),
        ("email", &changes.email),
        ("image", &changes.image),
    ];
    for (column, patch) in optional {
        if let Some(value) = patch.as_column() {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(value.cloned());
        }
    }
    set.push("updated_at = NOW()");

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {SCHOOL_COLUMNS}"));
    builder
}

/// Exact-name lookup, optionally ignoring one id (the row being renamed).
pub fn name_lookup(name: &str, excluding: Option<i64>) -> SchoolQuery {
    let mut builder = QueryBuilder::new("SELECT id FROM schools WHERE school_name = ");
    builder.push_bind(name.to_owned());
    if let Some(id) = excluding {
        builder.push(" AND id <> ");
        builder.push_bind(id);
    }
    builder.push(" LIMIT 1");
    builder
}

/// Insert a validated draft, returning the stored row.
pub fn insert_sql() -> String {
    format!(
        "INSERT INTO schools (school_name, address, city, state, contact, email, image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SCHOOL_COLUMNS}"
    )
}

/// Fetch one row by id.
pub fn select_by_id_sql() -> String {
    format!("SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1")
}

pub const DELETE_SQL: &str = "DELETE FROM schools WHERE id = $1";
