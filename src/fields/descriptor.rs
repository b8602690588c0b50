//! Static field metadata: type tags, ranges, table columns

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::value::FieldValue;

/// Closed set of field types understood by the dispatcher.
///
/// Anything outside the set is kept verbatim in `Other` so that templates
/// coming from newer backends still load and fall back to a read-only view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Str,
    Int,
    Float,
    Bool,
    Dict,
    NestedDict,
    File,
    Prompt,
    Code,
    Table,
    Link,
    Any,
    Other(String),
}

impl TypeTag {
    /// Parse a template type string. Matching ignores case and underscores,
    /// so `NestedDict` and `nested_dict` are the same tag.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "str" | "string" | "text" => TypeTag::Str,
            "int" | "integer" => TypeTag::Int,
            "float" => TypeTag::Float,
            "bool" | "boolean" => TypeTag::Bool,
            "dict" => TypeTag::Dict,
            "nesteddict" => TypeTag::NestedDict,
            "file" => TypeTag::File,
            "prompt" => TypeTag::Prompt,
            "code" => TypeTag::Code,
            "table" => TypeTag::Table,
            "link" => TypeTag::Link,
            "any" => TypeTag::Any,
            _ => TypeTag::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Dict => "dict",
            TypeTag::NestedDict => "NestedDict",
            TypeTag::File => "file",
            TypeTag::Prompt => "prompt",
            TypeTag::Code => "code",
            TypeTag::Table => "table",
            TypeTag::Link => "link",
            TypeTag::Any => "Any",
            TypeTag::Other(raw) => raw,
        }
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        TypeTag::Any
    }
}

impl From<String> for TypeTag {
    fn from(raw: String) -> Self {
        TypeTag::parse(&raw)
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}

/// Numeric bounds for int/float fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(default = "RangeSpec::unbounded_min")]
    pub min: f64,
    #[serde(default = "RangeSpec::unbounded_max")]
    pub max: f64,
    #[serde(default)]
    pub step: Option<f64>,
}

impl RangeSpec {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max, step: None }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    fn unbounded_min() -> f64 {
        f64::NEG_INFINITY
    }

    fn unbounded_max() -> f64 {
        f64::INFINITY
    }

    /// Clamp to the nearest bound. An inverted range clamps to `min` first
    /// instead of panicking the way `f64::clamp` would.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Cell type of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    #[serde(alias = "text", alias = "string")]
    Str,
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "boolean")]
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub default: Option<Value>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            kind,
            default: None,
        }
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Value a freshly added row gets in this column
    pub fn default_cell(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.kind {
            ColumnKind::Str => Value::String(String::new()),
            ColumnKind::Int => Value::from(0),
            ColumnKind::Float => Value::from(0.0),
            ColumnKind::Bool => Value::Bool(false),
        }
    }
}

/// Everything the dispatcher needs to pick and configure a widget.
///
/// Immutable for the lifetime of an editing surface. Deserializes from the
/// field objects found in a node template, so the template key names are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", alias = "field_type", default)]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// Options are suggestions; free-text values are accepted too
    #[serde(default)]
    pub combobox: bool,
    #[serde(default, alias = "is_list")]
    pub list: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default, alias = "range_spec")]
    pub range: Option<RangeSpec>,
    #[serde(default)]
    pub password: bool,
    #[serde(default, alias = "refresh_button")]
    pub refreshable: bool,
    #[serde(default, alias = "file_types", alias = "fileTypes")]
    pub suffixes: Vec<String>,
    /// Field may be bound to a global variable instead of a literal value
    #[serde(default)]
    pub load_from_db: bool,
    #[serde(default, deserialize_with = "deserialize_table_schema")]
    pub table_schema: Vec<ColumnSpec>,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    /// Link label for `link` fields
    #[serde(default)]
    pub text: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            ..Default::default()
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_combobox(mut self, combobox: bool) -> Self {
        self.combobox = combobox;
        self
    }

    pub fn with_list(mut self, list: bool) -> Self {
        self.list = list;
        self
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_load_from_db(mut self, load_from_db: bool) -> Self {
        self.load_from_db = load_from_db;
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.table_schema = columns;
        self
    }

    pub fn label(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }

    /// Options list, treating an empty list the same as no options
    pub fn present_options(&self) -> Option<&[String]> {
        self.options.as_deref().filter(|options| !options.is_empty())
    }

    /// The value a field of this shape is reset to when it becomes disabled
    pub fn empty_value(&self) -> FieldValue {
        match self.type_tag {
            TypeTag::Int => FieldValue::Int(0),
            TypeTag::Float => FieldValue::Float(0.0),
            TypeTag::Bool => FieldValue::Bool(false),
            TypeTag::Dict | TypeTag::NestedDict => {
                if self.list {
                    FieldValue::Records(vec![Map::new()])
                } else {
                    FieldValue::Map(Map::new())
                }
            }
            TypeTag::Table => FieldValue::Records(Vec::new()),
            // Nothing selected / no files: no placeholder entry
            TypeTag::Str if self.list && self.present_options().is_some() => FieldValue::List(Vec::new()),
            TypeTag::File if self.list => FieldValue::List(Vec::new()),
            _ => {
                if self.list {
                    FieldValue::List(vec![String::new()])
                } else {
                    FieldValue::Text(String::new())
                }
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableSchemaRepr {
    Columns(Vec<ColumnSpec>),
    Wrapped { columns: Vec<ColumnSpec> },
    Missing(serde::de::IgnoredAny),
}

fn deserialize_table_schema<'de, D>(deserializer: D) -> Result<Vec<ColumnSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TableSchemaRepr::deserialize(deserializer)? {
        TableSchemaRepr::Columns(columns) | TableSchemaRepr::Wrapped { columns } => columns,
        TableSchemaRepr::Missing(_) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_parsing() {
        assert_eq!(TypeTag::parse("str"), TypeTag::Str);
        assert_eq!(TypeTag::parse("NestedDict"), TypeTag::NestedDict);
        assert_eq!(TypeTag::parse("nested_dict"), TypeTag::NestedDict);
        assert_eq!(TypeTag::parse("Any"), TypeTag::Any);
        assert_eq!(TypeTag::parse("DataFrame"), TypeTag::Other("DataFrame".to_string()));
    }

    #[test]
    fn test_descriptor_from_template_json() {
        let json = r#"{
            "type": "int",
            "range_spec": {"min": 0, "max": 10, "step": 1, "step_type": "int"},
            "display_name": "Max Items",
            "refresh_button": true
        }"#;
        let descriptor: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.type_tag, TypeTag::Int);
        assert_eq!(descriptor.range, Some(RangeSpec::new(0.0, 10.0).with_step(1.0)));
        assert!(descriptor.refreshable);
        assert_eq!(descriptor.label(), "Max Items");
        assert!(!descriptor.combobox);

        let json = r#"{"type": "str", "options": ["a", "b"], "combobox": true}"#;
        let descriptor: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(descriptor.combobox);
    }

    #[test]
    fn test_table_schema_shapes() {
        let flat: FieldDescriptor =
            serde_json::from_str(r#"{"type": "table", "table_schema": [{"name": "a"}]}"#).unwrap();
        let wrapped: FieldDescriptor = serde_json::from_str(
            r#"{"type": "table", "table_schema": {"columns": [{"name": "a", "type": "int"}]}}"#,
        )
        .unwrap();
        let missing: FieldDescriptor =
            serde_json::from_str(r#"{"type": "table", "table_schema": null}"#).unwrap();

        assert_eq!(flat.table_schema[0].kind, ColumnKind::Str);
        assert_eq!(wrapped.table_schema[0].kind, ColumnKind::Int);
        assert!(missing.table_schema.is_empty());
    }

    #[test]
    fn test_unexpected_table_schema_is_ignored() {
        for schema in ["{}", "\"columns\"", "42"] {
            let json = format!(r#"{{"type": "table", "table_schema": {}}}"#, schema);
            let descriptor: FieldDescriptor = serde_json::from_str(&json).unwrap();
            assert!(descriptor.table_schema.is_empty(), "schema {schema}");
        }
    }

    #[test]
    fn test_range_clamp() {
        let range = RangeSpec::new(0.0, 10.0);
        assert_eq!(range.clamp(15.0), 10.0);
        assert_eq!(range.clamp(-5.0), 0.0);
        assert_eq!(range.clamp(3.5), 3.5);
    }

    #[test]
    fn test_empty_values() {
        let text = FieldDescriptor::new("a", TypeTag::Str);
        assert_eq!(text.empty_value(), FieldValue::Text(String::new()));
        assert_eq!(
            text.clone().with_list(true).empty_value(),
            FieldValue::List(vec![String::new()])
        );
        assert_eq!(
            text.clone().with_list(true).with_options(["a"]).empty_value(),
            FieldValue::List(Vec::new())
        );
        assert_eq!(
            FieldDescriptor::new("f", TypeTag::File).with_list(true).empty_value(),
            FieldValue::List(Vec::new())
        );
        assert_eq!(FieldDescriptor::new("b", TypeTag::Dict).empty_value(), FieldValue::Map(Map::new()));
        assert_eq!(FieldDescriptor::new("c", TypeTag::Int).empty_value(), FieldValue::Int(0));
        assert_eq!(FieldDescriptor::new("d", TypeTag::Bool).empty_value(), FieldValue::Bool(false));
    }
}
