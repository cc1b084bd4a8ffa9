use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A SQL query with named parameters.
///
/// Serialized verbatim as the body of a query request:
///
/// ```json
/// {
///     "query": "SELECT * FROM c WHERE c.name = @name",
///     "parameters": [{ "name": "@name", "value": "Julian" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Query text, parameters are referenced as `@name`.
    pub query: String,
    /// Parameters in the order they were added.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Placeholder name including the leading `@`.
    pub name: String,
    /// Value bound to the placeholder.
    pub value: Value,
}

impl Query {
    /// Create a query without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind a value to a placeholder.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}
