//! Typed query parameters for delegated store operations.
//!
//! Every handler builds exactly one of these structs per request, so the
//! query shape each endpoint issues is auditable and testable without a
//! live backend. Rendering to REST query pairs is a pure function.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq,
    In,
}

/// One column predicate. `Eq` carries a scalar, `In` carries an array.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::In,
            value: Value::Array(values),
        }
    }

    /// Render as a PostgREST query pair, e.g. `("user_id", "eq.abc")` or
    /// `("loop_id", "in.(a,b,c)")`.
    pub fn render(&self) -> (String, String) {
        match self.op {
            FilterOp::Eq => (self.column.clone(), format!("eq.{}", scalar(&self.value))),
            FilterOp::In => {
                let items: Vec<String> = match &self.value {
                    Value::Array(values) => values.iter().map(scalar).collect(),
                    other => vec![scalar(other)],
                };
                (self.column.clone(), format!("in.({})", items.join(",")))
            }
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub column: String,
    pub direction: SortDirection,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn render(&self) -> String {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        format!("{}.{}", self.column, dir)
    }
}

/// Filtered, ordered, paginated read.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl SelectQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(columns) = &self.columns {
            pairs.push(("select".to_string(), columns.clone()));
        }
        for filter in &self.filters {
            pairs.push(filter.render());
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.render()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

/// Single-row-or-more update: set `changes` on every row matching `filters`.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub table: String,
    pub filters: Vec<Filter>,
    pub changes: Map<String, Value>,
}

impl UpdateQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            changes: Map::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(column.into(), value.into());
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.filters.iter().map(Filter::render).collect()
    }
}

/// Idempotent insert: rows colliding on `on_conflict` are merged.
#[derive(Debug, Clone)]
pub struct UpsertQuery {
    pub table: String,
    pub on_conflict: Option<String>,
    pub row: Map<String, Value>,
}

impl UpsertQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            on_conflict: None,
            row: Map::new(),
        }
    }

    pub fn on_conflict(mut self, columns: impl Into<String>) -> Self {
        self.on_conflict = Some(columns.into());
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.row.insert(column.into(), value.into());
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        match &self.on_conflict {
            Some(columns) => vec![("on_conflict".to_string(), columns.clone())],
            None => Vec::new(),
        }
    }
}

/// Filtered delete. Deleting zero rows is not an error.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub table: String,
    pub filters: Vec<Filter>,
}

impl DeleteQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.filters.iter().map(Filter::render).collect()
    }
}
