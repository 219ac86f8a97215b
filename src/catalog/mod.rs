use std::fmt::Display;

use log::debug;

use self::defs::{RelationName, SchemaDefinition, TableDefinition};
use crate::{core::SQLError, sql::ddl::DDLStatement};

pub mod defs;
mod schema;
mod table;

/// Schema used for unqualified names unless configured otherwise.
pub const DEFAULT_SCHEMA: &str = "public";

/// In-memory model of a database schema, built by folding DDL statements
/// over it in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub default_schema: String,
    pub schemas: Vec<SchemaDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_default_schema(DEFAULT_SCHEMA)
    }

    /// A catalog seeded with a single empty schema that unqualified names
    /// resolve to.
    pub fn with_default_schema(schema_name: &str) -> Self {
        let mut catalog = Self::empty(schema_name);
        catalog.schemas.push(SchemaDefinition::new(schema_name));
        catalog
    }

    /// A catalog with no schemas at all. Unqualified names still resolve to
    /// `default_schema`, which has to be created before it can be used.
    pub fn empty(default_schema: &str) -> Self {
        Self {
            default_schema: default_schema.to_string(),
            schemas: vec![],
        }
    }

    /// Apply a single DDL statement.
    pub fn update(&mut self, stmt: &DDLStatement) -> Result<(), SQLError> {
        match stmt {
            DDLStatement::CreateTable(stmt) => self.create_table(stmt),
            DDLStatement::AlterTable(stmt) => self.alter_table(stmt),
            DDLStatement::DropTable(stmt) => self.drop_table(stmt),
            DDLStatement::CreateSchema(stmt) => self.create_schema(stmt),
            DDLStatement::DropSchema(stmt) => self.drop_schema(stmt),
            DDLStatement::RenameTable(stmt) => self.rename_table(stmt),
            DDLStatement::RenameColumn(stmt) => self.rename_column(stmt),
        }
    }

    /// Apply statements in order, stopping at the first failure. Statements
    /// applied before the failure stay applied.
    pub fn build<'a>(
        &mut self,
        stmts: impl IntoIterator<Item = &'a DDLStatement>,
    ) -> Result<(), SQLError> {
        for (i, stmt) in stmts.into_iter().enumerate() {
            debug!("Applying statement #{}: {:?}", i, stmt);
            self.update(stmt)?;
        }
        Ok(())
    }

    pub fn get_schema(&self, schema_name: &str) -> Result<&SchemaDefinition, SQLError> {
        self.schemas
            .iter()
            .find(|schema| schema.name == schema_name)
            .ok_or_else(|| SQLError::schema_not_found(schema_name))
    }

    pub fn get_schema_mut(&mut self, schema_name: &str) -> Result<&mut SchemaDefinition, SQLError> {
        self.schemas
            .iter_mut()
            .find(|schema| schema.name == schema_name)
            .ok_or_else(|| SQLError::schema_not_found(schema_name))
    }

    pub fn exists_schema(&self, schema_name: &str) -> bool {
        self.schemas.iter().any(|schema| schema.name == schema_name)
    }

    pub fn list_schemas(&self) -> Vec<String> {
        self.schemas
            .iter()
            .map(|schema| schema.name.clone())
            .collect()
    }

    pub fn list_tables(&self, schema_name: &str) -> Result<Vec<String>, SQLError> {
        Ok(self.get_schema(schema_name)?.list_tables())
    }

    /// Schema a relation lives in: its qualifier, or the default schema.
    pub fn schema_name_of<'a>(&'a self, rel: &'a RelationName) -> &'a str {
        match &rel.schema {
            Some(schema) if !schema.is_empty() => schema,
            _ => &self.default_schema,
        }
    }

    /// Find a table by qualified name.
    pub fn get_table(&self, rel: &RelationName) -> Result<&TableDefinition, SQLError> {
        let schema = self.get_schema(self.schema_name_of(rel))?;
        let (_, table) = schema.get_table(rel)?;
        Ok(table)
    }

    pub fn get_table_mut(&mut self, rel: &RelationName) -> Result<&mut TableDefinition, SQLError> {
        let schema_name = self.schema_name_of(rel).to_string();
        self.get_schema_mut(&schema_name)?.get_table_mut(rel)
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for schema in &self.schemas {
            write!(f, "{}", schema)?;
        }
        Ok(())
    }
}
