use log::debug;

use super::{defs::SchemaDefinition, Catalog};
use crate::{
    core::SQLError,
    sql::ddl::{CreateSchemaStmt, DropSchemaStmt},
};

impl Catalog {
    pub(super) fn create_schema(&mut self, stmt: &CreateSchemaStmt) -> Result<(), SQLError> {
        if self.exists_schema(&stmt.name) {
            if stmt.if_not_exists {
                debug!("Schema {} already exists, skipping", stmt.name);
                return Ok(());
            }
            return Err(SQLError::schema_exists(&stmt.name));
        }

        self.schemas.push(SchemaDefinition::new(stmt.name.clone()));

        Ok(())
    }

    pub(super) fn drop_schema(&mut self, stmt: &DropSchemaStmt) -> Result<(), SQLError> {
        for name in &stmt.names {
            match self.schemas.iter().position(|schema| &schema.name == name) {
                Some(idx) => {
                    self.schemas.remove(idx);
                }
                None if stmt.if_exists => {
                    debug!("Schema {} does not exist, skipping", name);
                }
                None => return Err(SQLError::schema_not_found(name)),
            }
        }

        Ok(())
    }
}
