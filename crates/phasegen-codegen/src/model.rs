//! Validated render models
//!
//! A phase schema is checked as a whole and turned into plain string models
//! before any template runs, so a bad schema never produces partial output.

use crate::error::CodegenError;
use crate::naming::{self, IdentifierRules};
use phasegen_core::{Column, DataType, Phase, Provenance, Schema, Table};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Phase module file names taken by generated non-table modules
const RESERVED_MODULES: &[&str] = &["mod", "tables"];

/// Type names a binding module or the registry already has in scope
const RESERVED_TYPES: &[&str] = &[
    "PhaseTable",
    "FieldValue",
    "FieldCoercionError",
    "TableRecord",
    "TableRegistry",
    "TableDescriptor",
    "DynRecord",
    "UnknownTableError",
    "ValueMap",
    "Decimal",
    "NaiveDateTime",
    "Option",
    "Result",
    "String",
    "Vec",
    "Box",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnModel {
    /// Source column name
    pub name: String,
    pub name_literal: String,
    pub field: String,
    pub getter: String,
    pub setter: String,
    pub rust_type: String,
    pub getter_type: String,
    pub getter_body: String,
    pub value_expr: String,
    pub parse_fields: String,
    pub parse_map: String,
    /// Initializer inside `from_previous`
    pub from_previous: String,
    pub summary: String,
    /// Description lines, each either empty or starting with a space
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousModel {
    /// e.g. `phase1`
    pub phase: String,
    /// Path of the prior record type relative to the binding module
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModel {
    /// Source table name
    pub name: String,
    pub name_literal: String,
    pub owner_literal: String,
    pub owner: String,
    pub module: String,
    pub file_stem: String,
    pub type_name: String,
    pub provenance: String,
    pub docs: Vec<String>,
    pub columns: Vec<ColumnModel>,
    pub field_names: String,
    pub new_params: String,
    pub needs_decimal: bool,
    pub needs_timestamp: bool,
    pub previous: Option<PreviousModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseModel {
    pub ordinal: u32,
    /// e.g. `phase2`
    pub module: String,
    pub header: String,
    pub tables: Vec<TableModel>,
}

impl PhaseModel {
    /// Validate `phase` and build its render model
    ///
    /// `prior` is the schema of the previous phase, used to decide which
    /// tables get a `from_previous` constructor.
    pub fn build(phase: &Phase, prior: Option<&Schema>) -> Result<Self, CodegenError> {
        let rules = IdentifierRules::new().map_err(|e| CodegenError::Template(e.to_string()))?;
        validate_schema(phase.ordinal, &phase.schema, &rules)?;

        let tables = phase
            .schema
            .tables()
            .map(|table| TableModel::build(phase.ordinal, table, prior))
            .collect();

        Ok(Self {
            ordinal: phase.ordinal,
            module: phase.module_name(),
            header: header(&phase.schema),
            tables,
        })
    }
}

/// First line of every generated file
pub fn header(schema: &Schema) -> String {
    format!(
        "// @generated by phasegen from schema {} {}. Do not edit.",
        schema.name, schema.version
    )
}

/// Reject anything the binding templates cannot express
pub fn validate_schema(phase: u32, schema: &Schema, rules: &IdentifierRules) -> Result<(), CodegenError> {
    if schema.is_empty() {
        return Err(CodegenError::Validation {
            phase,
            table: None,
            message: "phase has no tables".to_string(),
        });
    }

    let mut modules: BTreeMap<String, &str> = BTreeMap::new();
    let mut types: BTreeMap<String, &str> = BTreeMap::new();

    for table in schema.tables() {
        validate_table(phase, table, rules)?;

        let stem = naming::unraw(&naming::module_ident(&table.name)).to_string();
        if RESERVED_MODULES.contains(&stem.as_str()) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("module name '{}' is reserved for generated code", stem),
            ));
        }
        if let Some(other) = modules.insert(stem.clone(), &table.name) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("module name '{}' collides with table '{}'", stem, other),
            ));
        }

        let type_name = naming::pascal_case(&table.name);
        if RESERVED_TYPES.contains(&type_name.as_str()) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("type name '{}' is reserved for generated code", type_name),
            ));
        }
        if let Some(other) = types.insert(type_name.clone(), &table.name) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("type name '{}' collides with table '{}'", type_name, other),
            ));
        }
    }

    Ok(())
}

fn validate_table(phase: u32, table: &Table, rules: &IdentifierRules) -> Result<(), CodegenError> {
    if !rules.is_valid(&table.name) {
        return Err(CodegenError::validation(
            phase,
            &table.name,
            "table name is not a valid identifier",
        ));
    }
    if table.columns.is_empty() {
        return Err(CodegenError::validation(phase, &table.name, "table has no columns"));
    }

    let mut names = BTreeSet::new();
    let mut fields = BTreeMap::new();
    let mut methods: BTreeMap<String, String> = BTreeMap::new();

    for column in &table.columns {
        if !rules.is_valid(&column.name) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("column '{}' is not a valid identifier", column.name),
            ));
        }
        if !names.insert(column.name.as_str()) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("duplicate column '{}'", column.name),
            ));
        }
        if let Some(other) = fields.insert(naming::field_ident(&column.name), column.name.as_str()) {
            return Err(CodegenError::validation(
                phase,
                &table.name,
                format!("columns '{}' and '{}' map to the same field", other, column.name),
            ));
        }

        for method in [naming::getter_ident(&column.name), naming::setter_ident(&column.name)] {
            if let Some(other) = methods.insert(naming::unraw(&method).to_string(), column.name.clone()) {
                return Err(CodegenError::validation(
                    phase,
                    &table.name,
                    format!(
                        "accessor '{}' of column '{}' collides with column '{}'",
                        naming::unraw(&method),
                        column.name,
                        other
                    ),
                ));
            }
        }
    }

    Ok(())
}

impl TableModel {
    fn build(ordinal: u32, table: &Table, prior: Option<&Schema>) -> Self {
        let module = naming::module_ident(&table.name);
        let file_stem = naming::unraw(&module).to_string();
        let type_name = naming::pascal_case(&table.name);

        let prior_table = prior
            .filter(|_| !matches!(table.provenance, Provenance::Renamed { .. }))
            .and_then(|schema| schema.table(&table.name));

        let previous = prior_table.map(|_| PreviousModel {
            phase: format!("phase{}", ordinal.saturating_sub(1)),
            path: format!(
                "super::super::phase{}::{}::{}",
                ordinal.saturating_sub(1),
                module,
                type_name
            ),
        });

        let columns: Vec<ColumnModel> = table
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let shared = prior_table
                    .and_then(|t| t.find_column(&column.name))
                    .is_some_and(|c| c.data_type == column.data_type);
                ColumnModel::build(index, column, shared, ordinal)
            })
            .collect();

        let field_names = table
            .columns
            .iter()
            .map(|c| naming::string_literal(&c.name))
            .collect::<Vec<_>>()
            .join(", ");

        let new_params = columns
            .iter()
            .map(|c| format!("{}: Option<{}>", c.field, c.rust_type))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name: table.name.clone(),
            name_literal: naming::string_literal(&table.name),
            owner_literal: naming::string_literal(&table.owner),
            owner: table.owner.clone(),
            module,
            file_stem,
            type_name,
            provenance: provenance_note(&table.provenance),
            docs: doc_lines(&table.description),
            needs_decimal: table.columns.iter().any(|c| matches!(c.data_type, DataType::Decimal { .. })),
            needs_timestamp: table.columns.iter().any(|c| c.data_type == DataType::Timestamp),
            columns,
            field_names,
            new_params,
            previous,
        }
    }
}

impl ColumnModel {
    fn build(index: usize, column: &Column, shared_with_prior: bool, ordinal: u32) -> Self {
        let field = naming::field_ident(&column.name);
        let getter = naming::getter_ident(&column.name);
        let name_literal = naming::string_literal(&column.name);
        let is_string = matches!(column.data_type, DataType::Varchar { .. });

        let (parser, extra) = match column.data_type {
            DataType::Int => ("int", String::new()),
            DataType::BigInt => ("bigint", String::new()),
            DataType::Decimal { scale } => ("decimal", format!(", {}", scale)),
            DataType::Varchar { length } => ("varchar", format!(", {}", length)),
            DataType::Boolean => ("boolean", String::new()),
            DataType::Timestamp => ("timestamp", String::new()),
        };

        let rust_type = match column.data_type {
            DataType::Int => "i32",
            DataType::BigInt => "i64",
            DataType::Decimal { .. } => "Decimal",
            DataType::Varchar { .. } => "String",
            DataType::Boolean => "bool",
            DataType::Timestamp => "NaiveDateTime",
        };

        let (getter_type, getter_body, value_expr) = if is_string {
            (
                "Option<&str>".to_string(),
                format!("self.{}.as_deref()", field),
                format!("FieldValue::from(self.{}.clone())", field),
            )
        } else {
            (
                format!("Option<{}>", rust_type),
                format!("self.{}", field),
                format!("FieldValue::from(self.{})", field),
            )
        };

        let from_previous = match (shared_with_prior, is_string) {
            (false, _) => "None".to_string(),
            (true, false) => format!("previous.{}()", getter),
            (true, true) => format!("previous.{}().map(str::to_string)", getter),
        };

        let mut summary = format!("`{}` {}", column.name, column.data_type);
        if column.newly_generated {
            summary.push_str(&format!(", new in phase{}", ordinal));
        }

        Self {
            name: column.name.clone(),
            parse_fields: format!(
                "coerce::{}(Self::TABLE_NAME, {}, coerce::field(fields, {}){})?",
                parser, name_literal, index, extra
            ),
            parse_map: format!(
                "coerce::{}(Self::TABLE_NAME, {}, coerce::map_field(Self::TABLE_NAME, {}, map)?.as_deref(){})?",
                parser, name_literal, name_literal, extra
            ),
            name_literal,
            setter: naming::setter_ident(&column.name),
            field,
            getter,
            rust_type: rust_type.to_string(),
            getter_type,
            getter_body,
            value_expr,
            from_previous,
            summary,
            docs: doc_lines(&column.description),
        }
    }
}

fn provenance_note(provenance: &Provenance) -> String {
    match provenance {
        Provenance::Raw => "Raw export table.".to_string(),
        Provenance::CarriedForward { from_phase } => format!("Carried forward from phase{}.", from_phase),
        Provenance::Extension { phase } => format!("Added by an extension rule in phase{}.", phase),
        Provenance::Renamed { from_table, from_phase } => {
            format!("Renamed from `{}` in phase{}.", from_table, from_phase)
        }
    }
}

/// Description text as doc-comment bodies: `""` or `" text"`
fn doc_lines(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                String::new()
            } else {
                format!(" {}", line)
            }
        })
        .collect()
}
