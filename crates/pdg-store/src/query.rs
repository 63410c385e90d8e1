//! Predicates, sort keys and their evaluation against typed records.

use pdg_schema::{Cell, Record};

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Param),
    /// SQL `LIKE` with `%` and `_` wildcards.
    Like(&'static str, String),
    NotLike(&'static str, String),
    IsNull(&'static str),
    /// Disjunction of conjunctions.
    AnyOf(Vec<Vec<Filter>>),
}

impl Filter {
    /// Column names referenced by this filter.
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            Filter::Eq(col, _)
            | Filter::Like(col, _)
            | Filter::NotLike(col, _)
            | Filter::IsNull(col) => vec![*col],
            Filter::AnyOf(groups) => groups
                .iter()
                .flatten()
                .flat_map(Filter::columns)
                .collect(),
        }
    }

    /// Evaluate against one record. Comparisons with null never match.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let cell = |col: &str| record.column(col).unwrap_or(Cell::Null);
        match self {
            Filter::Eq(col, param) => cell_eq(cell(*col), param),
            Filter::Like(col, pattern) => match cell(*col) {
                Cell::Text(text) => like_matches(pattern, text),
                _ => false,
            },
            Filter::NotLike(col, pattern) => match cell(*col) {
                Cell::Text(text) => !like_matches(pattern, text),
                _ => false,
            },
            Filter::IsNull(col) => cell(*col).is_null(),
            Filter::AnyOf(groups) => groups
                .iter()
                .any(|group| group.iter().all(|f| f.matches(record))),
        }
    }
}

fn cell_eq(cell: Cell<'_>, param: &Param) -> bool {
    match (cell, param) {
        (Cell::Text(a), Param::Text(b)) => a == b,
        (Cell::Int(a), Param::Int(b)) => a == *b,
        (Cell::Real(a), Param::Int(b)) => a == *b as f64,
        (Cell::Bool(a), Param::Bool(b)) => a == *b,
        (Cell::Bool(a), Param::Int(b)) => i64::from(a) == *b,
        _ => false,
    }
}

/// SQL `LIKE`: `%` matches any run, `_` one character, ASCII case-insensitive.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    // Greedy matcher with single-star backtracking.
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len()
            && (pattern[p] == '_' || pattern[p].eq_ignore_ascii_case(&text[t]))
        {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
}

/// Conjunction of filters plus an optional sort column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<&'static str>,
    pub descending: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Param>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    pub fn like(mut self, column: &'static str, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::Like(column, pattern.into()));
        self
    }

    pub fn not_like(mut self, column: &'static str, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::NotLike(column, pattern.into()));
        self
    }

    pub fn is_null(mut self, column: &'static str) -> Self {
        self.filters.push(Filter::IsNull(column));
        self
    }

    pub fn any_of(mut self, groups: Vec<Vec<Filter>>) -> Self {
        self.filters.push(Filter::AnyOf(groups));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_by = Some(column);
        self.descending = false;
        self
    }

    pub fn order_by_desc(mut self, column: &'static str) -> Self {
        self.order_by = Some(column);
        self.descending = true;
        self
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Every column this query touches, sort key included.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = self.filters.iter().flat_map(Filter::columns).collect();
        cols.extend(self.order_by);
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdg_schema::PdgItemRow;

    fn item(name: &str, item_type: &str) -> PdgItemRow {
        PdgItemRow {
            id: 1,
            name: name.to_string(),
            name_tex: None,
            item_type: item_type.to_string(),
        }
    }

    #[test]
    fn like_wildcards() {
        assert!(like_matches("S008%", "S008M"));
        assert!(like_matches("S008%", "S008"));
        assert!(!like_matches("S008%", "S009M"));
        assert!(like_matches("%bar%", "K*(892)bar0"));
        assert!(like_matches("BF_", "BFX"));
        assert!(!like_matches("BF_", "BFX1"));
        assert!(like_matches("bfx%", "BFX1"));
        assert!(like_matches("%", ""));
        assert!(!like_matches("a", ""));
    }

    #[test]
    fn null_never_matches_like() {
        let row = PdgItemRow {
            name_tex: None,
            ..item("pi+", "P")
        };
        assert!(!Filter::Like("name_tex", "%".into()).matches(&row));
        assert!(!Filter::NotLike("name_tex", "%bar%".into()).matches(&row));
        assert!(Filter::IsNull("name_tex").matches(&row));
    }

    #[test]
    fn any_of_is_disjunction_of_conjunctions() {
        let row = item("pi+", "P");
        let filter = Filter::AnyOf(vec![
            vec![
                Filter::Eq("name", "pi+".into()),
                Filter::Eq("item_type", "G".into()),
            ],
            vec![Filter::Eq("item_type", "P".into())],
        ]);
        assert!(filter.matches(&row));

        let filter = Filter::AnyOf(vec![vec![
            Filter::Eq("name", "pi+".into()),
            Filter::Eq("item_type", "G".into()),
        ]]);
        assert!(!filter.matches(&row));
    }

    #[test]
    fn query_collects_columns() {
        let query = Query::new()
            .eq("name", "pi+")
            .any_of(vec![vec![Filter::IsNull("name_tex")]])
            .order_by("id");
        assert_eq!(query.columns(), vec!["name", "name_tex", "id"]);
    }
}
