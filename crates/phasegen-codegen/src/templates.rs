//! Source templates for generated modules

use crate::error::CodegenError;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

pub const BINDING: &str = "binding.rs";
pub const REGISTRY: &str = "registry.rs";
pub const PHASE_MOD: &str = "phase_mod.rs";
pub const ROOT_MOD: &str = "root_mod.rs";

const BINDING_TEMPLATE: &str = r#"{{ header }}
//! `{{ t.name }}` table, {{ phase }}
{% if t.docs %}
//!
{% endif %}
{% for line in t.docs %}
//!{{ line }}
{% endfor %}

use {{ runtime }}::{coerce, FieldCoercionError, FieldValue, TableRecord, ValueMap};
{% if t.needs_decimal %}
use {{ runtime }}::Decimal;
{% endif %}
{% if t.needs_timestamp %}
use {{ runtime }}::NaiveDateTime;
{% endif %}

/// Record of `{{ t.name }}`, owned by `{{ t.owner }}`
///
/// {{ t.provenance }}
#[derive(Debug, Clone, PartialEq, Default)]
pub struct {{ t.type_name }} {
{% for c in t.columns %}
    /// {{ c.summary }}
{% for line in c.docs %}
    ///{{ line }}
{% endfor %}
    {{ c.field }}: Option<{{ c.rust_type }}>,
{% endfor %}
}

impl {{ t.type_name }} {
    pub const TABLE_NAME: &'static str = {{ t.name_literal }};
    pub const OWNER: &'static str = {{ t.owner_literal }};
    pub const FIELD_NAMES: &'static [&'static str] = &[{{ t.field_names }}];

    #[allow(clippy::too_many_arguments)]
    pub fn new({{ t.new_params }}) -> Self {
        Self {
{% for c in t.columns %}
            {{ c.field }},
{% endfor %}
        }
    }

    /// Parse one raw row laid out in `FIELD_NAMES` order
    ///
    /// Empty fields and missing trailing fields are unset.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, FieldCoercionError> {
        coerce::check_arity(Self::TABLE_NAME, fields.len(), Self::FIELD_NAMES.len())?;
        Ok(Self {
{% for c in t.columns %}
            {{ c.field }}: {{ c.parse_fields }},
{% endfor %}
        })
    }

    /// Build from name-keyed values; missing keys and nulls are unset
    pub fn from_map(map: &ValueMap) -> Result<Self, FieldCoercionError> {
        Ok(Self {
{% for c in t.columns %}
            {{ c.field }}: {{ c.parse_map }},
{% endfor %}
        })
    }
{% if t.previous %}

    /// Carry a {{ t.previous.phase }} record forward; columns new in {{ phase }} are unset
    pub fn from_previous(previous: &{{ t.previous.path }}) -> Self {
        Self {
{% for c in t.columns %}
            {{ c.field }}: {{ c.from_previous }},
{% endfor %}
        }
    }
{% endif %}
{% for c in t.columns %}

    pub fn {{ c.getter }}(&self) -> {{ c.getter_type }} {
        {{ c.getter_body }}
    }

    pub fn {{ c.setter }}(&mut self, value: Option<{{ c.rust_type }}>) {
        self.{{ c.field }} = value;
    }
{% endfor %}
}

impl TableRecord for {{ t.type_name }} {
    fn table_name(&self) -> &'static str {
        Self::TABLE_NAME
    }

    fn owner(&self) -> &'static str {
        Self::OWNER
    }

    fn field_names(&self) -> &'static [&'static str] {
        Self::FIELD_NAMES
    }

    fn fields_as_ordered_values(&self) -> Vec<FieldValue> {
        vec![
{% for c in t.columns %}
            {{ c.value_expr }},
{% endfor %}
        ]
    }
}
"#;

const REGISTRY_TEMPLATE: &str = r#"{{ header }}
//! Table registry for {{ phase }}

use {{ runtime }}::{DynRecord, FieldCoercionError, TableDescriptor, TableRegistry, UnknownTableError};

/// Tables the identity subsystem treats as identity tables
pub const IDENTITY_TABLES: &[&str] = &[{{ identity_tables }}];

/// Every table in {{ phase }}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseTable {
{% for t in tables %}
    {{ t.type_name }},
{% endfor %}
}

static DESCRIPTORS: [TableDescriptor; {{ tables | length }}] = [
{% for t in tables %}
    TableDescriptor {
        name: {{ t.name_literal }},
        type_name: "{{ t.type_name }}",
        owner: {{ t.owner_literal }},
        field_names: super::{{ t.module }}::{{ t.type_name }}::FIELD_NAMES,
        decode: decode_{{ t.file_stem }},
    },
{% endfor %}
];
{% for t in tables %}

fn decode_{{ t.file_stem }}(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::{{ t.module }}::{{ t.type_name }}::from_fields(fields)?))
}
{% endfor %}

impl PhaseTable {
    /// Every table, in source-name order
    pub const ALL: &'static [PhaseTable] = &[
{% for t in tables %}
        PhaseTable::{{ t.type_name }},
{% endfor %}
    ];

    pub fn source_name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor().type_name
    }

    pub fn descriptor(&self) -> &'static TableDescriptor {
        &DESCRIPTORS[*self as usize]
    }

    pub fn from_source_name(name: &str) -> Result<Self, UnknownTableError> {
        match name {
{% for t in tables %}
            {{ t.name_literal }} => Ok(PhaseTable::{{ t.type_name }}),
{% endfor %}
            _ => Err(UnknownTableError::new(name)),
        }
    }
}

impl TableRegistry for PhaseTable {
    fn all() -> &'static [Self] {
        Self::ALL
    }

    fn source_name(&self) -> &'static str {
        PhaseTable::source_name(self)
    }

    fn descriptor(&self) -> &'static TableDescriptor {
        PhaseTable::descriptor(self)
    }

    fn from_source_name(name: &str) -> Result<Self, UnknownTableError> {
        PhaseTable::from_source_name(name)
    }
}
"#;

const PHASE_MOD_TEMPLATE: &str = r#"{{ header }}
//! Table bindings for {{ phase }}

pub mod tables;
{% for t in tables %}
pub mod {{ t.module }};
{% endfor %}

pub use tables::{PhaseTable, IDENTITY_TABLES};
{% for t in tables %}
pub use {{ t.module }}::{{ t.type_name }};
{% endfor %}
"#;

const ROOT_MOD_TEMPLATE: &str = r#"{{ header }}
//! Generated table bindings, one module per phase

{% for phase in phases %}
pub mod {{ phase }};
{% endfor %}
"#;

/// Template environment shared by every generator
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, CodegenError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.add_template(BINDING, BINDING_TEMPLATE)?;
        env.add_template(REGISTRY, REGISTRY_TEMPLATE)?;
        env.add_template(PHASE_MOD, PHASE_MOD_TEMPLATE)?;
        env.add_template(ROOT_MOD, ROOT_MOD_TEMPLATE)?;

        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, CodegenError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}
