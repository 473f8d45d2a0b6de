//! Declarative enum configuration and its call-site over type-level resolution.
//!
//! A [`Config`] may be attached to a variant set (type level) and,
//! independently, to each field of a containing structure that holds one of
//! its values (call-site level). [`resolve`] picks exactly one of them per
//! call; the two levels are never merged field by field.
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ------------------------------ Projection -------------------------------- //

/// External representation of a variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectionKind {
    /// A designated alternate-name field, e.g. `Monday`.
    Alias,
    /// The declared identifier, e.g. `MONDAY`.
    Name,
    /// Zero-based declaration position.
    Ordinal,
    /// A designated value field, e.g. `Lunes`.
    #[default]
    Value,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 4] = [Self::Alias, Self::Name, Self::Ordinal, Self::Value];

    /// The field role a projection reads from, if any.
    pub fn role(self) -> Option<Role> {
        match self {
            Self::Alias => Some(Role::Alias),
            Self::Value => Some(Role::Value),
            Self::Name | Self::Ordinal => None,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias => f.pad("ALIAS"),
            Self::Name => f.pad("NAME"),
            Self::Ordinal => f.pad("ORDINAL"),
            Self::Value => f.pad("VALUE"),
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown projection `{s}` (expected alias, name, ordinal or value)"))
    }
}

/// Role a data field can play for a variant set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Alias,
    Value,
}

impl Role {
    pub const ALL: [Role; 2] = [Self::Alias, Self::Value];

    /// Field name looked up by convention when nothing else designates one.
    pub fn conventional_field_name(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Value => "value",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Alias => 0,
            Self::Value => 1,
        }
    }
}

// -------------------------------- Config ---------------------------------- //

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub projection: ProjectionKind,
    pub case_insensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_field_name: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_field_name: Option<Cow<'static, str>>,
}

static DEFAULT_CONFIG: Config = Config::DEFAULT;

impl Config {
    /// `{ VALUE, case-sensitive, no explicit fields }`
    pub const DEFAULT: Config = Config {
        projection: ProjectionKind::Value,
        case_insensitive: false,
        value_field_name: None,
        alias_field_name: None,
    };

    pub fn new(projection: ProjectionKind) -> Self {
        Self { projection, ..Self::DEFAULT }
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_value_field(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.value_field_name = Some(name.into());
        self
    }

    pub fn with_alias_field(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.alias_field_name = Some(name.into());
        self
    }

    /// Explicitly designated field for `role`. An empty name counts as unset.
    pub fn field_name(&self, role: Role) -> Option<&str> {
        let name = match role {
            Role::Alias => self.alias_field_name.as_deref(),
            Role::Value => self.value_field_name.as_deref(),
        };
        name.filter(|name| !name.is_empty())
    }
}

// ------------------------------- Resolution ------------------------------- //

/// Which level an [`EffectiveConfig`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Site,
    Type,
    Default,
}

/// The single configuration governing one serialize or deserialize call.
#[derive(Clone, Copy, Debug)]
pub struct EffectiveConfig<'a> {
    config: &'a Config,
    source: ConfigSource,
}

impl<'a> EffectiveConfig<'a> {
    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn source(&self) -> ConfigSource {
        self.source
    }

    pub fn field_name(&self, role: Role) -> Option<&'a str> {
        self.config.field_name(role)
    }
}

impl Deref for EffectiveConfig<'_> {
    type Target = Config;

    fn deref(&self) -> &Config {
        self.config
    }
}

/// Call-site config wins in its entirety, then the type-level config, then
/// [`Config::DEFAULT`].
pub fn resolve<'a>(type_config: Option<&'a Config>, site_config: Option<&'a Config>) -> EffectiveConfig<'a> {
    match (site_config, type_config) {
        (Some(config), _) => EffectiveConfig { config, source: ConfigSource::Site },
        (None, Some(config)) => EffectiveConfig { config, source: ConfigSource::Type },
        (None, None) => EffectiveConfig { config: &DEFAULT_CONFIG, source: ConfigSource::Default },
    }
}

// ------------------------------- Tests ------------------------------------ //
