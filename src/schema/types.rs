//! Column type lattice and schema definitions
//!
//! Types form a total order used for widening:
//!
//! ```text
//! MISSING < BOOL < INT < FLOAT < STRING
//! ```

use std::fmt;

/// Column type, ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    /// No value observed
    Missing,
    /// `0` or `1`
    Bool,
    /// Signed integer text
    Int,
    /// Decimal text with a point
    Float,
    /// Anything else
    String,
}

impl FieldType {
    /// Returns the type name as printed by queries
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Missing => "MISSING",
            FieldType::Bool => "BOOL",
            FieldType::Int => "INT",
            FieldType::Float => "FLOAT",
            FieldType::String => "STRING",
        }
    }

    /// Returns the wider of the two types
    pub fn widen(self, other: FieldType) -> FieldType {
        self.max(other)
    }

    /// Returns whether a value of type `observed` fits in a column of this type
    pub fn admits(&self, observed: FieldType) -> bool {
        observed <= *self
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Result of classifying one raw field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The field belongs to a lattice type
    Typed(FieldType),
    /// The field cannot appear in a well-formed row
    Invalid,
}

impl Classification {
    /// Returns the lattice type, if any
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Classification::Typed(t) => Some(*t),
            Classification::Invalid => None,
        }
    }

    /// Returns whether the field is missing
    pub fn is_missing(&self) -> bool {
        *self == Classification::Typed(FieldType::Missing)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Typed(t) => write!(f, "{}", t),
            Classification::Invalid => write!(f, "INVALID"),
        }
    }
}

/// Finalized column schema.
///
/// Built once by [`SchemaBuilder::finalize`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<FieldType>,
}

impl Schema {
    /// Creates a schema from explicit column types
    pub fn new(columns: Vec<FieldType>) -> Self {
        Self { columns }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Type of column `index`, if in range
    pub fn column_type(&self, index: usize) -> Option<FieldType> {
        self.columns.get(index).copied()
    }

    /// All column types in order
    pub fn columns(&self) -> &[FieldType] {
        &self.columns
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.columns.iter().map(|t| t.type_name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Running schema under inference.
///
/// Width grows monotonically to the widest row observed; each column only
/// ever widens.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    columns: Vec<FieldType>,
}

impl SchemaBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Current width
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Widens column `index` with an observed classification.
    ///
    /// Unseen columns start at `Missing`. `Invalid` grows the width but
    /// contributes no type.
    pub fn observe(&mut self, index: usize, observed: Classification) {
        if self.columns.len() <= index {
            self.columns.resize(index + 1, FieldType::Missing);
        }
        if let Some(t) = observed.field_type() {
            self.columns[index] = self.columns[index].widen(t);
        }
    }

    /// Freezes the builder into a schema
    pub fn finalize(self) -> Schema {
        Schema::new(self.columns)
    }
}
