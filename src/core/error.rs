use std::{error::Error, fmt::Display};

#[derive(Clone, Debug)]
pub struct SQLError {
    pub kind: ErrorKind,
    pub message: String,
}

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    /// No such schema or table. Callers implementing `IF EXISTS` test for
    /// this kind specifically.
    NotFound,
    AlreadyExists,
    /// An `ALTER TABLE` sub-command names a column the table doesn't have.
    ColumnNotFound,
    CatalogError,
    IoError,
}

impl Error for SQLError {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "Parse Error"),
            ErrorKind::NotFound => write!(f, "Not Found"),
            ErrorKind::AlreadyExists => write!(f, "Already Exists"),
            ErrorKind::ColumnNotFound => write!(f, "Column Not Found"),
            ErrorKind::CatalogError => write!(f, "Catalog Error"),
            ErrorKind::IoError => write!(f, "IO Error"),
        }
    }
}

impl Display for SQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<std::io::Error> for SQLError {
    fn from(e: std::io::Error) -> Self {
        SQLError::new(ErrorKind::IoError, e.to_string())
    }
}

impl SQLError {
    pub fn new(kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: message.as_ref().to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn schema_not_found(schema: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("schema \"{}\" does not exist", schema),
        )
    }

    pub fn table_not_found(table: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("relation \"{}\" does not exist", table),
        )
    }

    pub fn schema_exists(schema: &str) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!("schema \"{}\" already exists", schema),
        )
    }

    pub fn table_exists(table: &str) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!("relation \"{}\" already exists", table),
        )
    }

    pub fn column_not_found(table: &str, column: &str) -> Self {
        Self::new(
            ErrorKind::ColumnNotFound,
            format!(
                "column \"{}\" of relation \"{}\" does not exist",
                column, table
            ),
        )
    }

    pub fn column_exists(table: &str, column: &str) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!(
                "column \"{}\" of relation \"{}\" already exists",
                column, table
            ),
        )
    }

    /// The PostgreSQL SQLSTATE matching this error, when there is one.
    pub fn code(&self) -> Option<&'static str> {
        match self.kind {
            ErrorKind::NotFound if self.message.starts_with("schema") => Some("3F000"),
            ErrorKind::NotFound => Some("42P01"),
            ErrorKind::AlreadyExists if self.message.starts_with("schema") => Some("42P06"),
            ErrorKind::AlreadyExists if self.message.starts_with("column") => Some("42701"),
            ErrorKind::AlreadyExists => Some("42P07"),
            ErrorKind::ColumnNotFound => Some("42703"),
            ErrorKind::ParseError => Some("42601"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguished() {
        assert!(SQLError::table_not_found("users").is_not_found());
        assert!(SQLError::schema_not_found("s").is_not_found());
        assert!(!SQLError::column_not_found("users", "id").is_not_found());
        assert!(!SQLError::table_exists("users").is_not_found());
    }

    #[test]
    fn test_sqlstate_codes() {
        assert_eq!(SQLError::schema_not_found("s").code(), Some("3F000"));
        assert_eq!(SQLError::table_not_found("t").code(), Some("42P01"));
        assert_eq!(SQLError::table_exists("t").code(), Some("42P07"));
        assert_eq!(SQLError::schema_exists("s").code(), Some("42P06"));
        assert_eq!(SQLError::column_exists("t", "c").code(), Some("42701"));
        assert_eq!(SQLError::column_not_found("t", "c").code(), Some("42703"));
        assert_eq!(SQLError::new(ErrorKind::CatalogError, "boom").code(), None);
    }

    #[test]
    fn test_display() {
        let err = SQLError::column_not_found("users", "email");
        assert_eq!(
            err.to_string(),
            "Column Not Found: column \"email\" of relation \"users\" does not exist"
        );
    }
}
