use std::cmp::Ordering;

use serde_json::Value;

use super::Document;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl FilterOp {
    fn is_range(&self) -> bool {
        !matches!(self, FilterOp::Equal)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    fn matches(&self, document: &Document) -> bool {
        let Some(actual) = document.get(&self.field) else {
            return false;
        };
        // Range filters never cross types: a string bound only selects strings.
        if self.op.is_range() && type_rank(actual) != type_rank(&self.value) {
            return false;
        }
        let ord = compare_values(actual, &self.value);
        match self.op {
            FilterOp::Equal => ord == Ordering::Equal,
            FilterOp::LessThan => ord == Ordering::Less,
            FilterOp::LessThanOrEqual => ord != Ordering::Greater,
            FilterOp::GreaterThan => ord == Ordering::Greater,
            FilterOp::GreaterThanOrEqual => ord != Ordering::Less,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A single-collection query: conjunctive filters, at most one sort field and
/// an optional limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: &str) -> Self {
        Query {
            collection: collection.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The ordering actually applied. A range filter without an explicit
    /// order sorts ascending on the filtered field, as an ordered index would.
    pub fn effective_order(&self) -> Option<OrderBy> {
        self.order_by.clone().or_else(|| {
            self.filters.iter().find(|f| f.op.is_range()).map(|f| OrderBy {
                field: f.field.clone(),
                direction: Direction::Ascending,
            })
        })
    }

    pub fn matches(&self, document: &Document) -> bool {
        let has_order_field = match &self.order_by {
            Some(order) => document.contains_key(&order.field),
            None => true,
        };
        has_order_field && self.filters.iter().all(|f| f.matches(document))
    }

    /// Runs the query over `(id, document)` pairs. Ties on the sort field
    /// fall back to ascending id.
    pub fn evaluate<'a, I>(&self, documents: I) -> Vec<(String, Document)>
    where
        I: IntoIterator<Item = (&'a String, &'a Document)>,
    {
        let mut hits: Vec<(String, Document)> = documents
            .into_iter()
            .filter(|(_, doc)| self.matches(doc))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();

        match self.effective_order() {
            Some(order) => hits.sort_by(|(a_id, a), (b_id, b)| {
                let ord = match (a.get(&order.field), b.get(&order.field)) {
                    (Some(x), Some(y)) => compare_values(x, y),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                let ord = match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                ord.then_with(|| a_id.cmp(b_id))
            }),
            None => hits.sort_by(|(a_id, _), (b_id, _)| a_id.cmp(b_id)),
        }

        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: first by type (null, bool, number, string,
/// array, object), then by value. Strings compare by their UTF-8 bytes.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        }
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(x, y)| compare_values(x, y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => {
            let mut xs: Vec<_> = x.iter().collect();
            let mut ys: Vec<_> = y.iter().collect();
            xs.sort_by(|a, b| a.0.cmp(b.0));
            ys.sort_by(|a, b| a.0.cmp(b.0));
            xs.iter()
                .zip(ys.iter())
                .map(|((xk, xv), (yk, yv))| xk.cmp(yk).then_with(|| compare_values(xv, yv)))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or_else(|| xs.len().cmp(&ys.len()))
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
