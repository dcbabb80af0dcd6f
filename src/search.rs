//! Request bodies for the `POST {api}/{endpoint}/search` route.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    Or,
    And,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub field: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub operator: Operator,
    pub queries: Vec<Query>,
}

impl Query {
    pub fn new<V: Into<Value>>(field: &str, condition: &str, parameters: Vec<V>) -> Self {
        Query {
            field: field.to_string(),
            condition: Condition {
                name: condition.to_string(),
                parameters: parameters.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn is_equal_to<V: Into<Value>>(field: &str, value: V) -> Self {
        Query::new(field, "is_equal_to", vec![value])
    }
}

impl SearchQuery {
    pub fn new(operator: Operator) -> Self {
        SearchQuery {
            operator,
            queries: Vec::new(),
        }
    }

    pub fn with(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    /// OR together one `id is_equal_to` query per id.
    pub fn ids_equal_to(ids: &[i64]) -> Self {
        ids.iter().fold(SearchQuery::new(Operator::Or), |q, id| {
            q.with(Query::is_equal_to("id", *id))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
