//! Central resolution of entity relations.
//!
//! Entities only describe their relations as data. [`RelationRegistry::resolve`]
//! checks the whole graph once (targets exist, keys exist and are UUIDs,
//! aliases are unique per entity, every has-one/has-many has a matching
//! belongs-to with the same delete policy) and then answers join and
//! cascade questions without further lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::entities::ALL_ENTITIES;
use super::{CascadePolicy, Cardinality, EntityDef, RelationDef, SqlType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Table {0} is defined more than once")]
    DuplicateEntity(&'static str),

    #[error("Relation {table}.{alias} is defined more than once")]
    DuplicateAlias {
        table: &'static str,
        alias: &'static str,
    },

    #[error("Relation {table}.{alias} targets unknown table {target}")]
    UnknownTarget {
        table: &'static str,
        alias: &'static str,
        target: &'static str,
    },

    #[error("Relation {table}.{alias} uses key {key_table}.{column}, which is not a UUID field")]
    BadForeignKey {
        table: &'static str,
        alias: &'static str,
        key_table: &'static str,
        column: &'static str,
    },

    #[error("Relation {table}.{alias} has no matching belongs-to on {target}.{column}")]
    MissingInverse {
        table: &'static str,
        alias: &'static str,
        target: &'static str,
        column: &'static str,
    },

    #[error("Relation {table}.{alias} declares {declared:?} but {target}.{column} uses {actual:?}")]
    PolicyMismatch {
        table: &'static str,
        alias: &'static str,
        target: &'static str,
        column: &'static str,
        declared: CascadePolicy,
        actual: CascadePolicy,
    },

    #[error("No relation {alias} on table {table}")]
    UnknownRelation { table: String, alias: String },
}

/// SQL join flavour used when rendering a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

/// A foreign key pointing at a table, seen from the referenced side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: CascadePolicy,
}

/// Validated relation graph over a fixed set of entities.
#[derive(Debug)]
pub struct RelationRegistry {
    entities: HashMap<&'static str, &'static EntityDef>,
    relations: HashMap<&'static str, HashMap<&'static str, &'static RelationDef>>,
    inbound: HashMap<&'static str, Vec<InboundKey>>,
}

static REGISTRY: OnceLock<RelationRegistry> = OnceLock::new();

/// The registry over [`ALL_ENTITIES`], resolved on first use.
///
/// # Panics
///
/// Panics if the built-in definitions do not resolve; the unit tests in this
/// module guarantee they do.
pub fn registry() -> &'static RelationRegistry {
    REGISTRY.get_or_init(|| {
        RelationRegistry::resolve(ALL_ENTITIES).expect("built-in entity definitions must resolve")
    })
}

impl RelationRegistry {
    /// Validate and index the relations of `defs`.
    pub fn resolve(defs: &[&'static EntityDef]) -> Result<Self, RegistryError> {
        let mut entities = HashMap::new();
        for def in defs {
            if entities.insert(def.table, *def).is_some() {
                return Err(RegistryError::DuplicateEntity(def.table));
            }
        }

        let mut relations: HashMap<&'static str, HashMap<&'static str, &'static RelationDef>> =
            HashMap::new();
        let mut inbound: HashMap<&'static str, Vec<InboundKey>> = HashMap::new();

        for def in defs {
            for rel in def.relations {
                let by_alias = relations.entry(def.table).or_default();
                if by_alias.insert(rel.alias, rel).is_some() {
                    return Err(RegistryError::DuplicateAlias {
                        table: def.table,
                        alias: rel.alias,
                    });
                }
                let target = lookup(&entities, def.table, rel, rel.target)?;

                match rel.cardinality {
                    Cardinality::BelongsTo => {
                        require_uuid_key(def, rel, def, rel.foreign_key)?;
                        inbound.entry(target.table).or_default().push(InboundKey {
                            table: def.table,
                            column: rel.foreign_key,
                            on_delete: rel.on_delete,
                        });
                    }
                    Cardinality::HasOne | Cardinality::HasMany => {
                        require_uuid_key(def, rel, target, rel.foreign_key)?;
                        check_inverse(def, rel, target, rel.foreign_key)?;
                    }
                    Cardinality::ManyToMany => {
                        let through_table = rel.through.unwrap_or(rel.target);
                        let through = lookup(&entities, def.table, rel, through_table)?;
                        let other_key = rel.other_key.unwrap_or(rel.foreign_key);
                        require_uuid_key(def, rel, through, rel.foreign_key)?;
                        require_uuid_key(def, rel, through, other_key)?;
                        check_inverse(def, rel, through, rel.foreign_key)?;
                        check_link(def, rel, through, other_key, target.table)?;
                    }
                }
            }
        }

        Ok(Self {
            entities,
            relations,
            inbound,
        })
    }

    pub fn entity(&self, table: &str) -> Option<&'static EntityDef> {
        self.entities.get(table).copied()
    }

    pub fn relation(&self, table: &str, alias: &str) -> Option<&'static RelationDef> {
        self.relations.get(table)?.get(alias).copied()
    }

    /// Foreign keys on other tables that reference `table`, sorted by table
    /// then column.
    pub fn inbound_keys(&self, table: &str) -> Vec<InboundKey> {
        let mut keys = self.inbound.get(table).cloned().unwrap_or_default();
        keys.sort_by(|a, b| (a.table, a.column).cmp(&(b.table, b.column)));
        keys
    }

    /// Tables whose rows are removed when a row of `table` is deleted,
    /// following cascades transitively. Sorted, without `table` itself.
    pub fn cascade_closure(&self, table: &str) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        let mut stack = vec![table.to_string()];
        while let Some(current) = stack.pop() {
            for key in self.inbound_keys(&current) {
                if key.on_delete == CascadePolicy::Cascade
                    && key.table != table
                    && !seen.contains(&key.table)
                {
                    seen.push(key.table);
                    stack.push(key.table.to_string());
                }
            }
        }
        seen.sort_unstable();
        seen
    }

    /// Render the join for `table.alias`, with `table` referenced by its own
    /// name and the target aliased as `alias`.
    ///
    /// Aliases are emitted quoted since some (`user`) are reserved words.
    /// Callers selecting from the joined row must quote the alias too.
    pub fn join(&self, table: &str, alias: &str, kind: JoinKind) -> Result<String, RegistryError> {
        let rel = self
            .relation(table, alias)
            .ok_or_else(|| RegistryError::UnknownRelation {
                table: table.to_string(),
                alias: alias.to_string(),
            })?;
        let join = kind.keyword();
        let target = rel.target;
        let fk = rel.foreign_key;
        let alias = quote_ident(alias);

        Ok(match rel.cardinality {
            Cardinality::BelongsTo => {
                format!("{join} {target} AS {alias} ON {alias}.id = {table}.{fk}")
            }
            Cardinality::HasOne | Cardinality::HasMany => {
                format!("{join} {target} AS {alias} ON {alias}.{fk} = {table}.id")
            }
            Cardinality::ManyToMany => {
                let through = rel.through.unwrap_or(target);
                let other = rel.other_key.unwrap_or(fk);
                let link = quote_ident(&format!("{}_link", rel.alias));
                format!(
                    "{join} {through} AS {link} ON {link}.{fk} = {table}.id \
                     {join} {target} AS {alias} ON {alias}.id = {link}.{other}"
                )
            }
        })
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn lookup(
    entities: &HashMap<&'static str, &'static EntityDef>,
    table: &'static str,
    rel: &'static RelationDef,
    target: &'static str,
) -> Result<&'static EntityDef, RegistryError> {
    entities
        .get(target)
        .copied()
        .ok_or(RegistryError::UnknownTarget {
            table,
            alias: rel.alias,
            target,
        })
}

fn require_uuid_key(
    owner: &EntityDef,
    rel: &RelationDef,
    key_table: &EntityDef,
    column: &'static str,
) -> Result<(), RegistryError> {
    match key_table.field(column) {
        Some(field) if field.sql_type == SqlType::Uuid => Ok(()),
        _ => Err(RegistryError::BadForeignKey {
            table: owner.table,
            alias: rel.alias,
            key_table: key_table.table,
            column,
        }),
    }
}

/// `child` must hold a belongs-to on `column` pointing back at `owner`, with
/// the delete policy `rel` declares.
fn check_inverse(
    owner: &EntityDef,
    rel: &RelationDef,
    child: &EntityDef,
    column: &'static str,
) -> Result<(), RegistryError> {
    let inverse = child
        .foreign_keys()
        .find(|fk| fk.foreign_key == column && fk.target == owner.table)
        .ok_or(RegistryError::MissingInverse {
            table: owner.table,
            alias: rel.alias,
            target: child.table,
            column,
        })?;
    if inverse.on_delete != rel.on_delete {
        return Err(RegistryError::PolicyMismatch {
            table: owner.table,
            alias: rel.alias,
            target: child.table,
            column,
            declared: rel.on_delete,
            actual: inverse.on_delete,
        });
    }
    Ok(())
}

/// The join table of a many-to-many must reference the far side on `column`.
fn check_link(
    owner: &EntityDef,
    rel: &RelationDef,
    through: &EntityDef,
    column: &'static str,
    far: &'static str,
) -> Result<(), RegistryError> {
    if through
        .foreign_keys()
        .any(|fk| fk.foreign_key == column && fk.target == far)
    {
        Ok(())
    } else {
        Err(RegistryError::MissingInverse {
            table: owner.table,
            alias: rel.alias,
            target: through.table,
            column,
        })
    }
}
