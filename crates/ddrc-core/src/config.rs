//! `[ddr]` configuration documents.
//!
//! A configuration is an INI file whose `[ddr]` section lists timing and
//! geometry parameters:
//!
//! ```text
//! [ddr]
//! TYPE = ddr3
//! ROW = 13
//! COL = 10
//! tRAS = 35,ns
//! tRFC = "160000,ps"
//! tWTR = 4,tck
//! tXP = -1,tck
//! ```
//!
//! Keys are case-insensitive and stored upper-case. A value is a bare token
//! or `value,unit`; unknown units are kept as raw values and passed through
//! unconverted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dram::DramType;
use crate::error::{CoreError, Result};
use crate::timing::{TimingConverter, NOT_APPLICABLE};

/// Name of the section holding DDR parameters.
pub const DDR_SECTION: &str = "ddr";

/// Key that selects the DRAM type explicitly.
pub const TYPE_KEY: &str = "TYPE";

/// Unit attached to a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Nanoseconds,
    Picoseconds,
    Cycles,
    /// No unit, or one that is not recognized.
    Raw,
}

impl Unit {
    /// Parse a unit token. Anything other than `ns`, `ps` or `tck` is raw.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "ns" => Unit::Nanoseconds,
            "ps" => Unit::Picoseconds,
            "tck" => Unit::Cycles,
            _ => Unit::Raw,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Nanoseconds => "ns",
            Unit::Picoseconds => "ps",
            Unit::Cycles => "tck",
            Unit::Raw => "raw",
        };
        f.write_str(s)
    }
}

/// A parameter value as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    /// Text that is not an integer. Only an error when read numerically.
    Text(String),
}

impl ParamValue {
    fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(v) => ParamValue::Int(v),
            Err(_) => ParamValue::Text(token.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// One parameter: value plus unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub value: ParamValue,
    pub unit: Unit,
}

impl Param {
    fn parse(raw: &str) -> Self {
        let stripped = raw.trim().trim_matches('"');
        let parts: Vec<&str> = stripped.split(',').collect();
        match parts.as_slice() {
            [value, unit] => Param {
                value: ParamValue::parse(value),
                unit: Unit::from_token(unit),
            },
            _ => Param {
                value: ParamValue::parse(stripped),
                unit: Unit::Raw,
            },
        }
    }

    fn int(&self, key: &str) -> Result<i64> {
        match &self.value {
            ParamValue::Int(v) => Ok(*v),
            ParamValue::Text(s) => Err(CoreError::InvalidValue {
                key: key.to_string(),
                value: s.clone(),
            }),
        }
    }
}

/// How the DRAM type of a [`ConfigModel`] was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSource {
    /// Given by the caller or by a `TYPE` key.
    Explicit,
    /// Matched from an external identifier such as the file path.
    Inferred,
    /// Nothing matched; DDR2 was assumed.
    Defaulted,
}

/// Parsed `[ddr]` section plus the resolved DRAM type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigModel {
    params: BTreeMap<String, Param>,
    dram_type: DramType,
    type_source: TypeSource,
}

impl ConfigModel {
    /// Parse a document, taking the DRAM type from its `TYPE` key.
    ///
    /// Without a `TYPE` key the type defaults to DDR2.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_inner(text, None, None)
    }

    /// Parse a document with a caller-supplied DRAM type.
    ///
    /// The explicit type wins over any `TYPE` key in the document.
    pub fn parse_with_type(text: &str, dram_type: DramType) -> Result<Self> {
        Self::parse_inner(text, Some(dram_type), None)
    }

    /// Parse a document, falling back to substring matching on `identifier`
    /// (usually the file path) when the document has no `TYPE` key.
    pub fn parse_with_identifier(text: &str, identifier: &str) -> Result<Self> {
        Self::parse_inner(text, None, Some(identifier))
    }

    fn parse_inner(
        text: &str,
        explicit: Option<DramType>,
        identifier: Option<&str>,
    ) -> Result<Self> {
        let params = parse_section(text, DDR_SECTION)?;
        let (dram_type, type_source) = resolve_type(&params, explicit, identifier)?;
        match type_source {
            TypeSource::Defaulted => tracing::warn!(
                "no DRAM type given or detected, assuming {}",
                dram_type
            ),
            _ => tracing::info!(%dram_type, source = ?type_source, "DRAM type resolved"),
        }
        Ok(Self {
            params,
            dram_type,
            type_source,
        })
    }

    pub fn dram_type(&self) -> DramType {
        self.dram_type
    }

    pub fn type_source(&self) -> TypeSource {
        self.type_source
    }

    /// Look up a parameter by case-insensitive name.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.get(&key.to_ascii_uppercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all parameters in key order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Raw integer value of a parameter, ignoring its unit.
    pub fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key) {
            Some(param) => param.int(&key.to_ascii_uppercase()),
            None => Ok(default),
        }
    }

    /// Value of a parameter in picoseconds.
    ///
    /// Returns `default` when the key is absent and the sentinel `-1` when
    /// the stored value is the sentinel. Raw values pass through unconverted.
    pub fn get_ps(&self, key: &str, converter: &TimingConverter, default: i64) -> Result<i64> {
        let Some(param) = self.get(key) else {
            return Ok(default);
        };
        let value = param.int(&key.to_ascii_uppercase())?;
        if value == NOT_APPLICABLE {
            return Ok(NOT_APPLICABLE);
        }
        Ok(match param.unit {
            Unit::Nanoseconds => TimingConverter::ns_to_ps(value),
            Unit::Picoseconds => value,
            Unit::Cycles => converter.cycles_to_ps(value),
            Unit::Raw => value,
        })
    }
}

/// Extract one section of an INI document as canonical key/value pairs.
fn parse_section(text: &str, wanted: &str) -> Result<BTreeMap<String, Param>> {
    let mut params = BTreeMap::new();
    let mut found = false;
    let mut in_wanted = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(CoreError::Syntax {
                    line: line_no,
                    detail: "unterminated section header".into(),
                });
            };
            in_wanted = name.trim() == wanted;
            found |= in_wanted;
            continue;
        }

        let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
            return Err(CoreError::Syntax {
                line: line_no,
                detail: format!("expected 'key = value', found '{line}'"),
            });
        };
        if !in_wanted {
            continue;
        }

        let key = line[..split].trim();
        if key.is_empty() {
            return Err(CoreError::Syntax {
                line: line_no,
                detail: "empty key".into(),
            });
        }
        let key = key.to_ascii_uppercase();
        let param = Param::parse(&line[split + 1..]);
        if params.insert(key.clone(), param).is_some() {
            return Err(CoreError::Syntax {
                line: line_no,
                detail: format!("duplicate key {key}"),
            });
        }
    }

    if !found {
        return Err(CoreError::MissingSection {
            section: wanted.to_string(),
        });
    }
    Ok(params)
}

#[allow(deprecated)]
fn resolve_type(
    params: &BTreeMap<String, Param>,
    explicit: Option<DramType>,
    identifier: Option<&str>,
) -> Result<(DramType, TypeSource)> {
    if let Some(ty) = explicit {
        return Ok((ty, TypeSource::Explicit));
    }
    if let Some(param) = params.get(TYPE_KEY) {
        let ty = param.value.to_string().parse::<DramType>()?;
        return Ok((ty, TypeSource::Explicit));
    }
    if let Some(ty) = identifier.and_then(DramType::detect_from_identifier) {
        return Ok((ty, TypeSource::Inferred));
    }
    Ok((DramType::Ddr2, TypeSource::Defaulted))
}
