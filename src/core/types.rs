use std::{collections::HashMap, fmt::Display};

use sqlparser::ast::{DataType, ObjectName, TimezoneInfo};

use crate::sql::ddl::normalize_ident;

lazy_static! {
    /// Spellings of the PostgreSQL built-in types, keyed by the name as it
    /// appears in DDL and mapping to the `pg_catalog` name.
    static ref TYPE_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        for (alias, canonical) in [
            ("int", "int4"),
            ("integer", "int4"),
            ("int4", "int4"),
            ("smallint", "int2"),
            ("int2", "int2"),
            ("bigint", "int8"),
            ("int8", "int8"),
            ("real", "float4"),
            ("float4", "float4"),
            ("float", "float8"),
            ("double", "float8"),
            ("double precision", "float8"),
            ("float8", "float8"),
            ("boolean", "bool"),
            ("bool", "bool"),
            ("character varying", "varchar"),
            ("varchar", "varchar"),
            ("character", "bpchar"),
            ("char", "bpchar"),
            ("decimal", "numeric"),
            ("numeric", "numeric"),
            ("timestamp", "timestamp"),
            ("timestamp without time zone", "timestamp"),
            ("timestamp with time zone", "timestamptz"),
            ("timestamptz", "timestamptz"),
            ("time", "time"),
            ("time without time zone", "time"),
            ("time with time zone", "timetz"),
            ("timetz", "timetz"),
            ("char varying", "varchar"),
            ("dec", "numeric"),
            ("serial", "serial4"),
            ("serial4", "serial4"),
            ("bigserial", "serial8"),
            ("serial8", "serial8"),
            ("smallserial", "serial2"),
            ("serial2", "serial2"),
        ] {
            m.insert(alias, canonical);
        }
        m
    };
}

/// A column type as declared in DDL: an optionally schema-qualified base
/// name plus the number of array dimensions. Type modifiers such as the
/// length in `varchar(20)` are not retained.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub schema: Option<String>,
    pub name: String,
    pub array_dims: usize,
}

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            array_dims: 0,
        }
    }

    pub fn array_of(mut self, dims: usize) -> Self {
        self.array_dims = dims;
        self
    }

    pub fn is_array(&self) -> bool {
        self.array_dims > 0
    }

    /// Name of the type in `pg_catalog` if this is a known built-in alias,
    /// otherwise the name as written.
    pub fn canonical_name(&self) -> &str {
        if self.schema.is_some() && self.schema.as_deref() != Some("pg_catalog") {
            return &self.name;
        }
        match TYPE_ALIASES.get(self.name.as_str()) {
            Some(canonical) => canonical,
            None => &self.name,
        }
    }

    fn from_object_name(name: &ObjectName) -> Self {
        let mut parts = name.0.iter().map(normalize_ident).collect::<Vec<_>>();
        let name = parts.pop().unwrap_or_default();
        Self {
            schema: parts.pop(),
            name,
            array_dims: 0,
        }
    }
}

impl From<&DataType> for TypeName {
    fn from(data_type: &DataType) -> Self {
        let name = match data_type {
            DataType::Array(Some(inner)) => {
                let mut elem = TypeName::from(inner.as_ref());
                elem.array_dims += 1;
                return elem;
            }
            DataType::Custom(name, _) => return TypeName::from_object_name(name),

            DataType::Array(None) => "array",
            DataType::Character(_) => "character",
            DataType::Char(_) => "char",
            DataType::CharacterVarying(_) => "character varying",
            DataType::CharVarying(_) => "char varying",
            DataType::Varchar(_) => "varchar",
            DataType::Nvarchar(_) => "nvarchar",
            DataType::Uuid => "uuid",
            DataType::CharacterLargeObject(_) => "character large object",
            DataType::CharLargeObject(_) => "char large object",
            DataType::Clob(_) => "clob",
            DataType::Binary(_) => "binary",
            DataType::Varbinary(_) => "varbinary",
            DataType::Blob(_) => "blob",
            DataType::Numeric(_) => "numeric",
            DataType::Decimal(_) => "decimal",
            DataType::BigNumeric(_) => "bignumeric",
            DataType::BigDecimal(_) => "bigdecimal",
            DataType::Dec(_) => "dec",
            DataType::Float(_) => "float",
            DataType::TinyInt(_) => "tinyint",
            DataType::UnsignedTinyInt(_) => "tinyint unsigned",
            DataType::SmallInt(_) => "smallint",
            DataType::UnsignedSmallInt(_) => "smallint unsigned",
            DataType::MediumInt(_) => "mediumint",
            DataType::UnsignedMediumInt(_) => "mediumint unsigned",
            DataType::Int(_) => "int",
            DataType::Integer(_) => "integer",
            DataType::UnsignedInt(_) => "int unsigned",
            DataType::UnsignedInteger(_) => "integer unsigned",
            DataType::BigInt(_) => "bigint",
            DataType::UnsignedBigInt(_) => "bigint unsigned",
            DataType::Real => "real",
            DataType::Double => "double",
            DataType::DoublePrecision => "double precision",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Time(_, tz) => match tz {
                TimezoneInfo::None => "time",
                TimezoneInfo::WithTimeZone => "time with time zone",
                TimezoneInfo::WithoutTimeZone => "time without time zone",
                TimezoneInfo::Tz => "timetz",
            },
            DataType::Datetime(_) => "datetime",
            DataType::Timestamp(_, tz) => match tz {
                TimezoneInfo::None => "timestamp",
                TimezoneInfo::WithTimeZone => "timestamp with time zone",
                TimezoneInfo::WithoutTimeZone => "timestamp without time zone",
                TimezoneInfo::Tz => "timestamptz",
            },
            DataType::Interval => "interval",
            DataType::JSON => "json",
            DataType::Regclass => "regclass",
            DataType::Text => "text",
            DataType::String => "string",
            DataType::Bytea => "bytea",
            DataType::Enum(_) => "enum",
            DataType::Set(_) => "set",
        };

        TypeName::new(name)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.name)?;
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
