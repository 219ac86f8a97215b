use sqlparser::ast::{
    self, AlterColumnOperation, AlterTableOperation, ColumnOption, ObjectName, ObjectType,
    SchemaName, Statement, TableConstraint,
};

use super::{
    normalize_ident, AlterTableCmd, AlterTableStmt, ColumnDef, CreateSchemaStmt,
    CreateTableStmt, DDLStatement, DropSchemaStmt, DropTableStmt, RenameColumnStmt,
    RenameTableStmt,
};
use crate::{
    catalog::defs::RelationName,
    core::{ErrorKind, SQLError, TypeName},
    sql::parser::SQLStatement,
};

/// Lower a parsed statement into the DDL the catalog models.
///
/// Statements with no effect on the catalog (queries, DML, indexes, ...)
/// lower to `None`.
pub fn lower_statement(stmt: &SQLStatement) -> Result<Option<DDLStatement>, SQLError> {
    match stmt {
        SQLStatement::AlterTable { name, operations } => {
            lower_alter_table(name, operations).map(Some)
        }
        SQLStatement::Other(stmt) => lower_sqlparser_statement(stmt),
    }
}

fn lower_sqlparser_statement(stmt: &Statement) -> Result<Option<DDLStatement>, SQLError> {
    match stmt {
        Statement::CreateTable {
            if_not_exists,
            name,
            columns,
            constraints,
            ..
        } => {
            let mut cols = columns.iter().map(lower_column_def).collect::<Vec<_>>();

            // `PRIMARY KEY (a, b)` implies NOT NULL on every listed column.
            for constraint in constraints {
                if let TableConstraint::Unique {
                    columns,
                    is_primary: true,
                    ..
                } = constraint
                {
                    for key in columns.iter().map(normalize_ident) {
                        if let Some(col) = cols.iter_mut().find(|col| col.colname == key) {
                            col.is_not_null = true;
                        }
                    }
                }
            }

            Ok(Some(DDLStatement::CreateTable(CreateTableStmt {
                name: relation_name(name)?,
                cols,
                if_not_exists: *if_not_exists,
            })))
        }

        Statement::AlterTable { name, operation } => {
            lower_alter_table(name, std::slice::from_ref(operation)).map(Some)
        }

        Statement::Drop {
            object_type,
            if_exists,
            names,
            ..
        } => match object_type {
            ObjectType::Table => {
                let tables = names
                    .iter()
                    .map(relation_name)
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Some(DDLStatement::DropTable(DropTableStmt {
                    tables,
                    if_exists: *if_exists,
                })))
            }
            ObjectType::Schema => {
                let names = names
                    .iter()
                    .map(schema_name)
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Some(DDLStatement::DropSchema(DropSchemaStmt {
                    names,
                    if_exists: *if_exists,
                })))
            }
            _ => Ok(None),
        },

        Statement::CreateSchema {
            schema_name: name,
            if_not_exists,
        } => {
            let name = match name {
                SchemaName::Simple(name) | SchemaName::NamedAuthorization(name, _) => {
                    schema_name(name)?
                }
                SchemaName::UnnamedAuthorization(role) => normalize_ident(role),
            };

            Ok(Some(DDLStatement::CreateSchema(CreateSchemaStmt {
                name,
                if_not_exists: *if_not_exists,
            })))
        }

        _ => Ok(None),
    }
}

/// Split a possibly qualified table name. A leading catalog component is
/// accepted and ignored.
pub fn relation_name(name: &ObjectName) -> Result<RelationName, SQLError> {
    let parts = name.0.iter().map(normalize_ident).collect::<Vec<_>>();
    match parts.as_slice() {
        [table] => Ok(RelationName::new(None, table.clone())),
        [schema, table] | [_, schema, table] => {
            Ok(RelationName::new(Some(schema.clone()), table.clone()))
        }
        _ => Err(SQLError::new(
            ErrorKind::ParseError,
            format!("improper qualified name (too many dotted names): {}", name),
        )),
    }
}

fn schema_name(name: &ObjectName) -> Result<String, SQLError> {
    match name.0.as_slice() {
        [schema] | [_, schema] => Ok(normalize_ident(schema)),
        _ => Err(SQLError::new(
            ErrorKind::ParseError,
            format!("invalid schema name: {}", name),
        )),
    }
}

fn lower_alter_table(
    name: &ObjectName,
    operations: &[AlterTableOperation],
) -> Result<DDLStatement, SQLError> {
    let table = relation_name(name)?;

    match operations {
        [AlterTableOperation::RenameTable { table_name }] => {
            return Ok(DDLStatement::RenameTable(RenameTableStmt {
                table,
                new_name: relation_name(table_name)?.name,
            }))
        }
        [AlterTableOperation::RenameColumn {
            old_column_name,
            new_column_name,
        }] => {
            return Ok(DDLStatement::RenameColumn(RenameColumnStmt {
                table,
                col: normalize_ident(old_column_name),
                new_name: normalize_ident(new_column_name),
            }))
        }
        _ => {}
    }

    if operations.iter().any(|op| {
        matches!(
            op,
            AlterTableOperation::RenameTable { .. } | AlterTableOperation::RenameColumn { .. }
        )
    }) {
        return Err(SQLError::new(
            ErrorKind::ParseError,
            "RENAME cannot be combined with other ALTER TABLE commands",
        ));
    }

    Ok(DDLStatement::AlterTable(AlterTableStmt {
        table,
        cmds: operations.iter().map(lower_alter_table_cmd).collect(),
    }))
}

fn lower_column_def(col: &ast::ColumnDef) -> ColumnDef {
    let mut is_not_null = false;
    for opt in &col.options {
        match opt.option {
            ColumnOption::NotNull
            | ColumnOption::Unique {
                is_primary: true, ..
            } => is_not_null = true,
            ColumnOption::Null => is_not_null = false,
            _ => {}
        }
    }

    ColumnDef {
        colname: normalize_ident(&col.name),
        type_name: TypeName::from(&col.data_type),
        is_not_null,
    }
}

fn lower_alter_table_cmd(operation: &AlterTableOperation) -> AlterTableCmd {
    match operation {
        AlterTableOperation::AddColumn { column_def, .. } => {
            AlterTableCmd::add_column(lower_column_def(column_def))
        }
        AlterTableOperation::DropColumn {
            column_name,
            if_exists,
            ..
        } => AlterTableCmd::drop_column(normalize_ident(column_name), *if_exists),
        AlterTableOperation::AlterColumn { column_name, op } => {
            let column_name = normalize_ident(column_name);
            match op {
                AlterColumnOperation::SetNotNull => AlterTableCmd::set_not_null(column_name),
                AlterColumnOperation::DropNotNull => AlterTableCmd::drop_not_null(column_name),
                AlterColumnOperation::SetDataType { data_type, .. } => {
                    AlterTableCmd::alter_column_type(column_name, TypeName::from(data_type))
                }
                op => AlterTableCmd::unsupported(format!("ALTER COLUMN {} {}", column_name, op)),
            }
        }
        operation => AlterTableCmd::unsupported(operation.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::TypeName, sql::ddl::AlterTableSubtype, sql::parser::parse_sql};

    fn lower(sql: &str) -> Option<DDLStatement> {
        let stmts = parse_sql(sql).unwrap();
        assert_eq!(stmts.len(), 1);
        lower_statement(&stmts[0]).unwrap()
    }

    #[test]
    fn test_lower_create_table() {
        let stmt = lower(
            "CREATE TABLE IF NOT EXISTS app.Users (id int PRIMARY KEY, \"Name\" text NOT NULL, bio varchar(20))",
        )
        .unwrap();
        let create = stmt.as_create_table().unwrap();

        assert!(create.if_not_exists);
        assert_eq!(create.name, RelationName::new(Some("app".into()), "users"));
        assert_eq!(
            create.cols,
            vec![
                ColumnDef::new("id", TypeName::new("int"), true),
                ColumnDef::new("Name", TypeName::new("text"), true),
                ColumnDef::new("bio", TypeName::new("varchar"), false),
            ]
        );
    }

    #[test]
    fn test_lower_table_primary_key() {
        let stmt = lower("CREATE TABLE t (a int, b int, c int, PRIMARY KEY (a, c))").unwrap();
        let flags = stmt
            .as_create_table()
            .unwrap()
            .cols
            .iter()
            .map(|col| col.is_not_null)
            .collect::<Vec<_>>();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_lower_column_types() {
        let stmt = lower("CREATE TABLE t (a text[], b numeric(10, 2), c app.mood)").unwrap();
        let types = stmt
            .as_create_table()
            .unwrap()
            .cols
            .iter()
            .map(|col| col.type_name.clone())
            .collect::<Vec<_>>();

        assert_eq!(types[0], TypeName::new("text").array_of(1));
        assert_eq!(types[1].name, "numeric");
        assert_eq!(types[2].schema.as_deref(), Some("app"));
        assert_eq!(types[2].name, "mood");
    }

    #[test]
    fn test_lower_alter_table() {
        let stmt = lower("ALTER TABLE users ADD COLUMN email text NOT NULL").unwrap();
        let alter = stmt.as_alter_table().unwrap();
        assert_eq!(alter.table, RelationName::new(None, "users"));
        assert_eq!(
            alter.cmds,
            vec![AlterTableCmd::add_column(ColumnDef::new(
                "email",
                TypeName::new("text"),
                true
            ))]
        );

        let stmt = lower("ALTER TABLE users DROP COLUMN IF EXISTS email").unwrap();
        assert_eq!(
            stmt.as_alter_table().unwrap().cmds,
            vec![AlterTableCmd::drop_column("email", true)]
        );

        let stmt = lower("ALTER TABLE users ALTER COLUMN email SET NOT NULL").unwrap();
        assert_eq!(
            stmt.as_alter_table().unwrap().cmds[0].subtype,
            AlterTableSubtype::SetNotNull
        );

        let stmt = lower("ALTER TABLE users ALTER COLUMN email DROP NOT NULL").unwrap();
        assert_eq!(
            stmt.as_alter_table().unwrap().cmds[0].subtype,
            AlterTableSubtype::DropNotNull
        );

        let stmt = lower("ALTER TABLE users ALTER COLUMN id SET DATA TYPE bigint").unwrap();
        assert_eq!(
            stmt.as_alter_table().unwrap().cmds,
            vec![AlterTableCmd::alter_column_type("id", TypeName::new("bigint"))]
        );
    }

    #[test]
    fn test_lower_alter_table_commands() {
        let stmt = lower(
            "ALTER TABLE users ALTER COLUMN id SET NOT NULL, ADD CONSTRAINT u UNIQUE (id), DROP COLUMN IF EXISTS nope, ADD COLUMN email text",
        )
        .unwrap();
        let cmds = &stmt.as_alter_table().unwrap().cmds;

        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0], AlterTableCmd::set_not_null("id"));
        assert!(!cmds[1].subtype.is_implemented());
        assert_eq!(cmds[2], AlterTableCmd::drop_column("nope", true));
        assert_eq!(
            cmds[3],
            AlterTableCmd::add_column(ColumnDef::new("email", TypeName::new("text"), false))
        );
    }

    #[test]
    fn test_rename_is_not_combined() {
        let stmts = parse_sql("ALTER TABLE users ADD COLUMN email text, RENAME TO people").unwrap();
        let err = lower_statement(&stmts[0]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }

    #[test]
    fn test_lower_unsupported_alter() {
        let stmt = lower("ALTER TABLE users ALTER COLUMN id SET DEFAULT 1").unwrap();
        let cmd = &stmt.as_alter_table().unwrap().cmds[0];
        assert!(!cmd.subtype.is_implemented());
    }

    #[test]
    fn test_lower_rename() {
        let stmt = lower("ALTER TABLE users RENAME TO people").unwrap();
        assert_eq!(stmt.as_rename_table().unwrap().new_name, "people");

        let stmt = lower("ALTER TABLE users RENAME COLUMN name TO full_name").unwrap();
        let rename = stmt.as_rename_column().unwrap();
        assert_eq!(rename.col, "name");
        assert_eq!(rename.new_name, "full_name");
    }

    #[test]
    fn test_lower_drop() {
        let stmt = lower("DROP TABLE IF EXISTS a, s.b").unwrap();
        let drop = stmt.as_drop_table().unwrap();
        assert!(drop.if_exists);
        assert_eq!(
            drop.tables,
            vec![
                RelationName::new(None, "a"),
                RelationName::new(Some("s".into()), "b")
            ]
        );

        let stmt = lower("DROP SCHEMA s").unwrap();
        assert_eq!(stmt.as_drop_schema().unwrap().names, vec!["s".to_string()]);
    }

    #[test]
    fn test_lower_create_schema() {
        let stmt = lower("CREATE SCHEMA IF NOT EXISTS App").unwrap();
        let create = stmt.as_create_schema().unwrap();
        assert_eq!(create.name, "app");
        assert!(create.if_not_exists);
    }

    #[test]
    fn test_non_ddl_is_skipped() {
        assert_eq!(lower("SELECT 1"), None);
        assert_eq!(lower("INSERT INTO t VALUES (1)"), None);
    }

    #[test]
    fn test_too_many_dotted_names() {
        let stmts = parse_sql("CREATE TABLE a.b.c.d (id int)").unwrap();
        let err = lower_statement(&stmts[0]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }
}
