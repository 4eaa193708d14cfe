//! Declarative description of every stored entity.
//!
//! Each table is an [`EntityDef`]: its fields (type, nullability, uniqueness,
//! default, enumerated domain) plus its outgoing relations as plain data.
//! The definitions are the contract the migration log must produce; the
//! schema integration tests compare them against `information_schema`.
//!
//! Relations are resolved once into a [`RelationRegistry`], which validates
//! them and renders joins at query time.

pub mod entities;
pub mod registry;

pub use entities::ALL_ENTITIES;
pub use registry::{registry, JoinKind, RegistryError, RelationRegistry};

/// Column storage type, as reported by `information_schema.columns.data_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Uuid,
    Text,
    Boolean,
    Integer,
    Real,
    Timestamptz,
}

impl SqlType {
    /// Name as reported by `information_schema.columns.data_type`.
    pub fn information_schema_name(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Timestamptz => "timestamp with time zone",
        }
    }
}

/// A column default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// A string literal, e.g. `'member'`.
    Text(&'static str),
    /// A raw expression such as `now()`, `true` or `60`.
    Expr(&'static str),
}

impl ColumnDefault {
    /// The default as PostgreSQL reports it in `column_default`.
    pub fn normalized(&self) -> String {
        match self {
            Self::Text(value) => format!("'{value}'::text"),
            Self::Expr(expr) => (*expr).to_string(),
        }
    }
}

/// A stored field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<ColumnDefault>,
    /// Closed value set enforced by a `ck_<table>_<column>` constraint.
    pub domain: Option<&'static [&'static str]>,
}

impl FieldDef {
    /// A `NOT NULL` field with no default.
    pub const fn required(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            unique: false,
            default: None,
            domain: None,
        }
    }

    /// A nullable field with no default.
    pub const fn optional(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            nullable: true,
            ..Self::required(name, sql_type)
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn default_text(self, value: &'static str) -> Self {
        Self {
            default: Some(ColumnDefault::Text(value)),
            ..self
        }
    }

    pub const fn default_expr(self, expr: &'static str) -> Self {
        Self {
            default: Some(ColumnDefault::Expr(expr)),
            ..self
        }
    }

    pub const fn domain(self, values: &'static [&'static str]) -> Self {
        Self {
            domain: Some(values),
            ..self
        }
    }
}

/// How many rows sit on each side of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The foreign key lives on the source table.
    BelongsTo,
    /// The foreign key lives on the target table and is unique there.
    HasOne,
    /// The foreign key lives on the target table.
    HasMany,
    /// Linked through a join table holding keys to both sides.
    ManyToMany,
}

/// Referential action applied when the referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePolicy {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl CascadePolicy {
    /// Rule name as reported by `information_schema.referential_constraints`.
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// An outgoing relation of an entity.
///
/// For `BelongsTo`, `foreign_key` is a column of the source table. For
/// `HasOne`/`HasMany` it is a column of the target table. For `ManyToMany`
/// the `through` table holds `foreign_key` (pointing at the source) and
/// `other_key` (pointing at the target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    pub alias: &'static str,
    pub cardinality: Cardinality,
    pub target: &'static str,
    pub foreign_key: &'static str,
    pub through: Option<&'static str>,
    pub other_key: Option<&'static str>,
    pub on_delete: CascadePolicy,
    pub on_update: CascadePolicy,
}

impl RelationDef {
    pub const fn belongs_to(
        alias: &'static str,
        target: &'static str,
        foreign_key: &'static str,
        on_delete: CascadePolicy,
    ) -> Self {
        Self {
            alias,
            cardinality: Cardinality::BelongsTo,
            target,
            foreign_key,
            through: None,
            other_key: None,
            on_delete,
            on_update: CascadePolicy::Cascade,
        }
    }

    pub const fn has_one(
        alias: &'static str,
        target: &'static str,
        foreign_key: &'static str,
        on_delete: CascadePolicy,
    ) -> Self {
        Self {
            cardinality: Cardinality::HasOne,
            ..Self::belongs_to(alias, target, foreign_key, on_delete)
        }
    }

    pub const fn has_many(
        alias: &'static str,
        target: &'static str,
        foreign_key: &'static str,
        on_delete: CascadePolicy,
    ) -> Self {
        Self {
            cardinality: Cardinality::HasMany,
            ..Self::belongs_to(alias, target, foreign_key, on_delete)
        }
    }

    pub const fn many_to_many(
        alias: &'static str,
        target: &'static str,
        through: &'static str,
        foreign_key: &'static str,
        other_key: &'static str,
    ) -> Self {
        Self {
            alias,
            cardinality: Cardinality::ManyToMany,
            target,
            foreign_key,
            through: Some(through),
            other_key: Some(other_key),
            on_delete: CascadePolicy::Cascade,
            on_update: CascadePolicy::Cascade,
        }
    }
}

/// A stored entity: table name, fields, composite uniques and relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDef {
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
    /// Multi-column unique constraints, in column order.
    pub unique_together: &'static [&'static [&'static str]],
    pub relations: &'static [RelationDef],
}

impl EntityDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, alias: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.alias == alias)
    }

    /// Every `BelongsTo` relation, i.e. every foreign key stored on this table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &RelationDef> {
        self.relations
            .iter()
            .filter(|r| r.cardinality == Cardinality::BelongsTo)
    }
}

/// Implemented by row structs that map onto a stored entity.
pub trait Entity {
    /// The stored definition for this row type.
    fn definition() -> &'static EntityDef;

    fn table() -> &'static str {
        Self::definition().table
    }
}
