use log::debug;

use super::{
    defs::{ColumnDefinition, RelationName, TableDefinition},
    Catalog,
};
use crate::{
    core::{ErrorKind, SQLError},
    sql::ddl::{
        AlterTableCmd, AlterTableStmt, AlterTableSubtype, ColumnDef, CreateTableStmt,
        DropTableStmt, RenameColumnStmt, RenameTableStmt,
    },
};

impl From<&ColumnDef> for ColumnDefinition {
    fn from(def: &ColumnDef) -> Self {
        Self {
            name: def.colname.clone(),
            data_type: def.type_name.clone(),
            not_null: def.is_not_null,
        }
    }
}

impl Catalog {
    pub(super) fn create_table(&mut self, stmt: &CreateTableStmt) -> Result<(), SQLError> {
        let schema_name = self.schema_name_of(&stmt.name).to_string();
        let schema = self.get_schema_mut(&schema_name)?;

        match schema.get_table(&stmt.name) {
            Ok(_) if stmt.if_not_exists => {
                debug!("Table {} already exists, skipping", stmt.name);
                return Ok(());
            }
            Ok(_) => return Err(SQLError::table_exists(&stmt.name.name)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let mut columns: Vec<ColumnDefinition> = Vec::with_capacity(stmt.cols.len());
        for col in &stmt.cols {
            if columns.iter().any(|c| c.name == col.colname) {
                return Err(SQLError::column_exists(&stmt.name.name, &col.colname));
            }
            columns.push(col.into());
        }

        schema.tables.push(TableDefinition {
            rel: RelationName::new(Some(schema_name), stmt.name.name.clone()),
            columns,
        });

        Ok(())
    }

    pub(super) fn drop_table(&mut self, stmt: &DropTableStmt) -> Result<(), SQLError> {
        for rel in &stmt.tables {
            let schema_name = self.schema_name_of(rel).to_string();
            let schema = match self.get_schema_mut(&schema_name) {
                Err(e) if e.is_not_found() && stmt.if_exists => {
                    debug!("Schema of {} does not exist, skipping", rel);
                    continue;
                }
                result => result?,
            };

            let idx = match schema.get_table(rel) {
                Ok((idx, _)) => idx,
                Err(e) if e.is_not_found() && stmt.if_exists => {
                    debug!("Table {} does not exist, skipping", rel);
                    continue;
                }
                Err(e) => return Err(e),
            };

            schema.tables.remove(idx);
        }

        Ok(())
    }

    pub(super) fn alter_table(&mut self, stmt: &AlterTableStmt) -> Result<(), SQLError> {
        // Only resolve the table if there is something we can apply to it.
        if !stmt.cmds.iter().any(|cmd| cmd.subtype.is_implemented()) {
            debug!("No supported commands in ALTER TABLE {}, skipping", stmt.table);
            return Ok(());
        }

        let table = self.get_table_mut(&stmt.table)?;

        for cmd in &stmt.cmds {
            // Column-targeting commands resolve their column once, up front.
            let idx = if cmd.subtype.targets_existing_column() {
                match locate_column(table, cmd)? {
                    Some(idx) => Some(idx),
                    None => continue,
                }
            } else {
                None
            };

            match (&cmd.subtype, idx) {
                (AlterTableSubtype::AddColumn, _) => {
                    let def = column_def(cmd)?;
                    if table.column_index(&def.colname).is_some() {
                        return Err(SQLError::column_exists(&table.rel.name, &def.colname));
                    }
                    table.columns.push(def.into());
                }

                (AlterTableSubtype::AlterColumnType, Some(idx)) => {
                    table.columns[idx].data_type = column_def(cmd)?.type_name.clone();
                }

                (AlterTableSubtype::DropColumn, Some(idx)) => {
                    table.columns.remove(idx);
                }

                (AlterTableSubtype::DropNotNull, Some(idx)) => {
                    table.columns[idx].not_null = false;
                }

                (AlterTableSubtype::SetNotNull, Some(idx)) => {
                    table.columns[idx].not_null = true;
                }

                (AlterTableSubtype::Unsupported(desc), _) => {
                    debug!("Ignoring unsupported ALTER TABLE command: {}", desc);
                }

                // Column commands always carry an index here.
                (_, None) => {}
            }
        }

        Ok(())
    }

    pub(super) fn rename_table(&mut self, stmt: &RenameTableStmt) -> Result<(), SQLError> {
        let schema_name = self.schema_name_of(&stmt.table).to_string();
        let schema = self.get_schema_mut(&schema_name)?;

        let (idx, _) = schema.get_table(&stmt.table)?;
        if schema.tables.iter().any(|table| table.rel.name == stmt.new_name) {
            return Err(SQLError::table_exists(&stmt.new_name));
        }

        schema.tables[idx].rel.name = stmt.new_name.clone();

        Ok(())
    }

    pub(super) fn rename_column(&mut self, stmt: &RenameColumnStmt) -> Result<(), SQLError> {
        let table = self.get_table_mut(&stmt.table)?;

        let idx = table
            .column_index(&stmt.col)
            .ok_or_else(|| SQLError::column_not_found(&table.rel.name, &stmt.col))?;
        if table.column_index(&stmt.new_name).is_some() {
            return Err(SQLError::column_exists(&table.rel.name, &stmt.new_name));
        }

        table.columns[idx].name = stmt.new_name.clone();

        Ok(())
    }
}

/// Index of the column a command targets. `None` means the column is absent
/// and the command says that is fine.
fn locate_column(table: &TableDefinition, cmd: &AlterTableCmd) -> Result<Option<usize>, SQLError> {
    let name = cmd.name.as_deref().ok_or_else(|| {
        SQLError::new(
            ErrorKind::CatalogError,
            "ALTER TABLE command is missing a column name",
        )
    })?;

    match table.column_index(name) {
        Some(idx) => Ok(Some(idx)),
        None if cmd.missing_ok => {
            debug!("Column {} of {} does not exist, skipping", name, table.rel);
            Ok(None)
        }
        None => Err(SQLError::column_not_found(&table.rel.name, name)),
    }
}

fn column_def(cmd: &AlterTableCmd) -> Result<&ColumnDef, SQLError> {
    cmd.def.as_ref().ok_or_else(|| {
        SQLError::new(
            ErrorKind::CatalogError,
            "ALTER TABLE command is missing a column definition",
        )
    })
}
