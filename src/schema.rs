//! Declared parameter and body specifications.
//!
//! Everything a route knows about its inputs is declared here at
//! registration time: the declared type of each parameter, its wire alias,
//! default, and validation constraints, plus the field layout of a record
//! body. Nothing in this module is inferred per-request; classification of a
//! spec as path, query, or body happens once when the route is registered.

use regex::Regex;
use serde_json::Value;

/// One member of a declared enumeration.
///
/// The symbolic tag and the wire value are independent: `tag` is the name a
/// handler matches on, `wire` is the string that appears in the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    tag: String,
    wire: String,
}

impl EnumMember {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn wire(&self) -> &str {
        &self.wire
    }
}

/// A named, fixed set of string constants a parameter may take.
///
/// ```rust
/// use routetable::schema::EnumSpec;
///
/// let models = EnumSpec::new("ModelName", &[("a", "abc"), ("b", "def"), ("c", "ghi")]);
/// assert_eq!(models.member_for_wire("abc").unwrap().tag(), "a");
/// assert_eq!(models.member_for_tag("c").unwrap().wire(), "ghi");
/// assert!(models.member_for_wire("a").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpec {
    name: String,
    members: Vec<EnumMember>,
}

impl EnumSpec {
    pub fn new(name: &str, members: &[(&str, &str)]) -> Self {
        EnumSpec {
            name: name.to_owned(),
            members: members
                .iter()
                .map(|(tag, wire)| EnumMember {
                    tag: (*tag).to_owned(),
                    wire: (*wire).to_owned(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lookup by wire value, the form that appears in requests.
    pub fn member_for_wire(&self, wire: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.wire == wire)
    }

    /// Lookup by symbolic tag.
    pub fn member_for_tag(&self, tag: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.tag == tag)
    }

    /// All wire values, in declaration order.
    pub fn wires(&self) -> Vec<String> {
        self.members.iter().map(|m| m.wire.clone()).collect()
    }
}

/// Declared type of a parameter or body field.
#[derive(Debug, Clone)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
    /// Repeated query key, collected in URL occurrence order.
    StrList,
    Enum(EnumSpec),
}

/// Optional validation constraints on string-typed values.
///
/// `deprecated` is descriptive metadata only and never affects matching or
/// validation.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub deprecated: bool,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && self.max_length.is_none() && self.pattern.is_none()
    }
}

/// A declared route parameter.
///
/// Whether it resolves as a path or query parameter is decided at
/// registration: a spec whose name appears in the route pattern is a path
/// parameter, anything else is read from the query string under its wire
/// name (the alias when one is declared, the name otherwise).
///
/// ```rust
/// use routetable::schema::ParamSpec;
///
/// let q = ParamSpec::str_list("q").alias("veg").min_length(3);
/// assert_eq!(q.wire_name(), "veg");
/// ```
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    alias: Option<String>,
    ty: ParamType,
    default: Option<Value>,
    required: bool,
    constraints: Constraints,
}

impl ParamSpec {
    fn new(name: &str, ty: ParamType) -> Self {
        ParamSpec {
            name: name.to_owned(),
            alias: None,
            ty,
            default: None,
            required: true,
            constraints: Constraints::default(),
        }
    }

    pub fn str(name: &str) -> Self {
        Self::new(name, ParamType::Str)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, ParamType::Float)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, ParamType::Bool)
    }

    pub fn str_list(name: &str) -> Self {
        Self::new(name, ParamType::StrList)
    }

    pub fn enumerated(name: &str, spec: EnumSpec) -> Self {
        Self::new(name, ParamType::Enum(spec))
    }

    /// Absent is acceptable; the parameter is simply not bound.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Absent falls back to `value`. Implies optional.
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// The key to read from the query string, when it differs from `name`.
    pub fn alias(mut self, wire: &str) -> Self {
        self.alias = Some(wire.to_owned());
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self
    }

    /// Regular expression the value must satisfy.
    ///
    /// Panics on an invalid expression; constraints are only built while the
    /// route table is being assembled at startup.
    pub fn pattern(mut self, re: &str) -> Self {
        let compiled = Regex::new(re)
            .unwrap_or_else(|e| panic!("invalid constraint pattern '{}': {}", re, e));
        self.constraints.pattern = Some(compiled);
        self
    }

    /// Advertised-only flag; has no effect on matching or validation.
    pub fn deprecated(mut self) -> Self {
        self.constraints.deprecated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used on the wire: the alias when declared, else the name.
    pub fn wire_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

/// One field of a record body.
#[derive(Debug, Clone)]
pub struct BodyField {
    name: String,
    ty: ParamType,
    required: bool,
    default: Option<Value>,
}

impl BodyField {
    fn new(name: &str, ty: ParamType) -> Self {
        BodyField {
            name: name.to_owned(),
            ty,
            required: true,
            default: None,
        }
    }

    pub fn str(name: &str) -> Self {
        Self::new(name, ParamType::Str)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, ParamType::Float)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, ParamType::Bool)
    }

    /// Absent or null binds the declared default, `null` when none is given.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The declared field layout of a request body.
///
/// A route with a body schema parses the entire payload as a JSON object and
/// validates it field by field with the same primitive rules used for path
/// and query values.
#[derive(Debug, Clone)]
pub struct BodySchema {
    name: String,
    fields: Vec<BodyField>,
}

impl BodySchema {
    pub fn new(name: &str) -> Self {
        BodySchema {
            name: name.to_owned(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: BodyField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[BodyField] {
        &self.fields
    }
}
