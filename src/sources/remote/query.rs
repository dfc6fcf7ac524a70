//! GraphQL request builder.
//!
//! Queries are assembled from typed parts instead of formatted strings:
//! field names and selection sets are `&'static str` known at compile time,
//! and every caller-supplied value travels as a named variable. Aliases and
//! variable names are generated here, so the mapping between a sub-query
//! and its variables is fixed by construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::ManifestReference;
use crate::sources::HubError;

/// A GraphQL request ready to be sent by a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Map<String, Value>,
}

/// Handle to a declared variable, used to bind it to a field argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef(String);

impl VariableRef {
    /// Variable name without the `$` sigil.
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct Variable {
    name: String,
    ty: &'static str,
    value: Value,
}

#[derive(Debug, Clone)]
enum Selection {
    Field(Field),
    Raw(&'static str),
}

/// One field of a selection set, with optional alias and variable-bound arguments.
#[derive(Debug, Clone)]
pub struct Field {
    alias: Option<String>,
    name: &'static str,
    args: Vec<(&'static str, VariableRef)>,
    selection: Vec<Selection>,
}

impl Field {
    /// Create a field.
    pub fn new(name: &'static str) -> Self {
        Field {
            alias: None,
            name,
            args: Vec::new(),
            selection: Vec::new(),
        }
    }

    /// Give the field an alias in the response.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Bind an argument to a declared variable.
    pub fn arg(mut self, name: &'static str, variable: &VariableRef) -> Self {
        self.args.push((name, variable.clone()));
        self
    }

    /// Add a nested field to the selection set.
    pub fn field(mut self, child: Field) -> Self {
        self.selection.push(Selection::Field(child));
        self
    }

    /// Add a static list of fields to the selection set.
    pub fn fields(mut self, fields: &'static str) -> Self {
        self.selection.push(Selection::Raw(fields));
        self
    }

    fn render(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        if let Some(alias) = &self.alias {
            out.push_str(alias);
            out.push_str(": ");
        }
        out.push_str(self.name);

        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|(name, var)| format!("{}: ${}", name, var.name()))
                .collect();
            out.push('(');
            out.push_str(&args.join(", "));
            out.push(')');
        }

        if !self.selection.is_empty() {
            out.push_str(" {\n");
            for selection in &self.selection {
                match selection {
                    Selection::Field(field) => field.render(out, depth + 1),
                    Selection::Raw(fields) => {
                        indent(out, depth + 1);
                        out.push_str(fields);
                        out.push('\n');
                    }
                }
            }
            indent(out, depth);
            out.push('}');
        }
        out.push('\n');
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Accumulates variables and top-level fields of one query operation.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    operation: &'static str,
    variables: Vec<Variable>,
    fields: Vec<Field>,
}

impl QueryBuilder {
    /// Start a query with the given operation name.
    pub fn new(operation: &'static str) -> Self {
        QueryBuilder {
            operation,
            variables: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare a variable of GraphQL type `ty` bound to `value`.
    ///
    /// Declaring the same name twice replaces the earlier binding.
    pub fn variable(
        &mut self,
        name: impl Into<String>,
        ty: &'static str,
        value: impl Into<Value>,
    ) -> VariableRef {
        let name = name.into();
        let value = value.into();

        if let Some(existing) = self.variables.iter_mut().find(|v| v.name == name) {
            existing.ty = ty;
            existing.value = value;
        } else {
            self.variables.push(Variable {
                name: name.clone(),
                ty,
                value,
            });
        }

        VariableRef(name)
    }

    /// Add a top-level field.
    pub fn field(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Render the request.
    pub fn build(&self) -> QueryRequest {
        let mut query = String::new();
        query.push_str("query ");
        query.push_str(self.operation);

        if !self.variables.is_empty() {
            let decls: Vec<String> = self
                .variables
                .iter()
                .map(|v| format!("${}: {}", v.name, v.ty))
                .collect();
            query.push('(');
            query.push_str(&decls.join(", "));
            query.push(')');
        }

        query.push_str(" {\n");
        for field in &self.fields {
            field.render(&mut query, 1);
        }
        query.push('}');

        let variables = self
            .variables
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect();

        QueryRequest {
            operation_name: self.operation.to_string(),
            query,
            variables,
        }
    }
}

/// Batched existence check: one aliased sub-query per manifest reference.
///
/// The builder half emits `partial<i>: <kind>(path: $partial<i>Path) {
/// revision(revision: $partial<i>Revision) { revision } }` for each
/// reference; the demultiplexer half reads the single response back by
/// the same aliases.
#[derive(Debug, Clone)]
pub struct BatchQuery {
    builder: QueryBuilder,
    aliases: Vec<(String, ManifestReference)>,
}

#[derive(Debug, Deserialize)]
struct PartialManifest {
    revision: Option<PartialRevision>,
}

#[derive(Debug, Deserialize)]
struct PartialRevision {
    revision: Option<String>,
}

impl BatchQuery {
    /// Start an empty batch.
    pub fn new(operation: &'static str) -> Self {
        BatchQuery {
            builder: QueryBuilder::new(operation),
            aliases: Vec::new(),
        }
    }

    /// Add one reference to the batch.
    pub fn push(&mut self, reference: &ManifestReference) -> Result<(), HubError> {
        let kind = reference.kind()?;
        let alias = format!("partial{}", self.aliases.len());

        let path = self.builder.variable(
            format!("{}Path", alias),
            "NodePath!",
            reference.path.as_str(),
        );
        let revision = self.builder.variable(
            format!("{}Revision", alias),
            "Version!",
            reference.revision.as_str(),
        );

        self.builder.field(
            Field::new(kind.query_name())
                .alias(alias.as_str())
                .arg("path", &path)
                .field(
                    Field::new("revision")
                        .arg("revision", &revision)
                        .fields("revision"),
                ),
        );
        self.aliases.push((alias, reference.clone()));

        Ok(())
    }

    /// Number of references in the batch.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Render the single request carrying every sub-query.
    pub fn request(&self) -> QueryRequest {
        self.builder.build()
    }

    /// Map the response data back onto the references, by alias.
    ///
    /// An alias that is missing or `null` in the response means the
    /// manifest (or that revision of it) does not exist.
    pub fn demux(&self, data: Value) -> Result<HashMap<ManifestReference, bool>, serde_json::Error> {
        let partials: HashMap<String, Option<PartialManifest>> = serde_json::from_value(data)?;

        let result = self
            .aliases
            .iter()
            .map(|(alias, reference)| {
                let exists = partials
                    .get(alias)
                    .and_then(Option::as_ref)
                    .and_then(|manifest| manifest.revision.as_ref())
                    .map_or(false, |rev| rev.revision.is_some());
                (reference.clone(), exists)
            })
            .collect();

        Ok(result)
    }
}
