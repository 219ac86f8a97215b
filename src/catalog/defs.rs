use std::fmt::Display;

use crate::core::{SQLError, TypeName};

/// A possibly schema-qualified table name. A missing schema resolves to the
/// catalog's default schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationName {
    pub schema: Option<String>,
    pub name: String,
}

impl RelationName {
    pub fn new(schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }
}

impl Display for RelationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: TypeName,
    pub not_null: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDefinition {
    pub rel: RelationName,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }
}

impl Display for TableDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Table \"{}\"", self.rel)?;
        for col in &self.columns {
            write!(f, "  {} {}", col.name, col.data_type)?;
            if col.not_null {
                write!(f, " NOT NULL")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDefinition {
    pub name: String,
    pub tables: Vec<TableDefinition>,
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: vec![],
        }
    }

    /// Find a table by name within this schema, along with its position.
    /// Only the table part of `rel` is compared; the schema has already been
    /// resolved by the caller.
    pub fn get_table(&self, rel: &RelationName) -> Result<(usize, &TableDefinition), SQLError> {
        self.tables
            .iter()
            .enumerate()
            .find(|(_, table)| table.rel.name == rel.name)
            .ok_or_else(|| SQLError::table_not_found(&rel.name))
    }

    pub fn get_table_mut(&mut self, rel: &RelationName) -> Result<&mut TableDefinition, SQLError> {
        self.tables
            .iter_mut()
            .find(|table| table.rel.name == rel.name)
            .ok_or_else(|| SQLError::table_not_found(&rel.name))
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.rel.name.clone()).collect()
    }
}

impl Display for SchemaDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schema \"{}\"", self.name)?;
        for table in &self.tables {
            write!(f, "{}", table)?;
        }
        Ok(())
    }
}
