//! Owned representation of the DDL statements the catalog understands.
//!
//! Statements are lowered from the `sqlparser` AST by [`lower_statement`],
//! then applied to a [`Catalog`](crate::catalog::Catalog) one at a time.

mod lower;

use enum_as_inner::EnumAsInner;
use sqlparser::ast::Ident;

pub use self::lower::*;
use crate::{catalog::defs::RelationName, core::TypeName};

/// Fold an identifier the way PostgreSQL does: unquoted names are
/// case-insensitive and stored in lower case.
pub fn normalize_ident(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub colname: String,
    pub type_name: TypeName,
    pub is_not_null: bool,
}

impl ColumnDef {
    pub fn new(colname: impl Into<String>, type_name: TypeName, is_not_null: bool) -> Self {
        Self {
            colname: colname.into(),
            type_name,
            is_not_null,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTableStmt {
    pub name: RelationName,
    pub cols: Vec<ColumnDef>,
    pub if_not_exists: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlterTableSubtype {
    AddColumn,
    AlterColumnType,
    DropColumn,
    DropNotNull,
    SetNotNull,
    /// A sub-command the catalog does not model, e.g. `ADD CONSTRAINT`.
    Unsupported(String),
}

impl AlterTableSubtype {
    pub fn is_implemented(&self) -> bool {
        !matches!(self, AlterTableSubtype::Unsupported(_))
    }

    /// Whether the sub-command operates on a column that must already exist.
    pub fn targets_existing_column(&self) -> bool {
        matches!(
            self,
            AlterTableSubtype::AlterColumnType
                | AlterTableSubtype::DropColumn
                | AlterTableSubtype::DropNotNull
                | AlterTableSubtype::SetNotNull
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlterTableCmd {
    pub subtype: AlterTableSubtype,
    /// Column the command refers to, for column-targeting subtypes.
    pub name: Option<String>,
    /// New column definition for `AddColumn`, new type for `AlterColumnType`.
    pub def: Option<ColumnDef>,
    pub missing_ok: bool,
}

impl AlterTableCmd {
    pub fn add_column(def: ColumnDef) -> Self {
        Self {
            subtype: AlterTableSubtype::AddColumn,
            name: Some(def.colname.clone()),
            def: Some(def),
            missing_ok: false,
        }
    }

    pub fn alter_column_type(name: impl Into<String>, type_name: TypeName) -> Self {
        let name = name.into();
        Self {
            subtype: AlterTableSubtype::AlterColumnType,
            def: Some(ColumnDef::new(name.clone(), type_name, false)),
            name: Some(name),
            missing_ok: false,
        }
    }

    pub fn drop_column(name: impl Into<String>, missing_ok: bool) -> Self {
        Self {
            subtype: AlterTableSubtype::DropColumn,
            name: Some(name.into()),
            def: None,
            missing_ok,
        }
    }

    pub fn set_not_null(name: impl Into<String>) -> Self {
        Self {
            subtype: AlterTableSubtype::SetNotNull,
            name: Some(name.into()),
            def: None,
            missing_ok: false,
        }
    }

    pub fn drop_not_null(name: impl Into<String>) -> Self {
        Self {
            subtype: AlterTableSubtype::DropNotNull,
            name: Some(name.into()),
            def: None,
            missing_ok: false,
        }
    }

    pub fn unsupported(description: impl Into<String>) -> Self {
        Self {
            subtype: AlterTableSubtype::Unsupported(description.into()),
            name: None,
            def: None,
            missing_ok: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlterTableStmt {
    pub table: RelationName,
    pub cmds: Vec<AlterTableCmd>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropTableStmt {
    pub tables: Vec<RelationName>,
    pub if_exists: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateSchemaStmt {
    pub name: String,
    pub if_not_exists: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropSchemaStmt {
    pub names: Vec<String>,
    pub if_exists: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameTableStmt {
    pub table: RelationName,
    pub new_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameColumnStmt {
    pub table: RelationName,
    pub col: String,
    pub new_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumAsInner)]
pub enum DDLStatement {
    CreateTable(CreateTableStmt),
    AlterTable(AlterTableStmt),
    DropTable(DropTableStmt),
    CreateSchema(CreateSchemaStmt),
    DropSchema(DropSchemaStmt),
    RenameTable(RenameTableStmt),
    RenameColumn(RenameColumnStmt),
}
