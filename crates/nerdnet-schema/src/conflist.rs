//! Parsing and validation of CNI configuration documents.
//!
//! Two on-disk forms exist. A single-plugin document (`.conf`, `.json`) is
//! one plugin object with a `type`. A list document (`.conflist`) carries a
//! `name`, an optional `cniVersion`, and a non-empty ordered `plugins` array.
//! Both are normalized into [`NetworkConfigList`].

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("no name")]
    MissingName,
    #[error("field '{field}' must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("no 'plugins' key")]
    MissingPlugins,
    #[error("no plugins in list")]
    EmptyPlugins,
    #[error("missing 'type'")]
    MissingType,
    #[error("plugin {index}: {source}")]
    Plugin {
        index: usize,
        #[source]
        source: Box<ParseError>,
    },
}

/// One plugin stage: its `type` plus the complete object it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConf {
    pub plugin_type: String,
    pub body: Map<String, Value>,
}

/// A single-plugin network document.
#[derive(Debug, Clone, PartialEq)]
pub struct NetConf {
    pub name: String,
    pub cni_version: String,
    pub plugin: PluginConf,
}

/// An ordered list of plugin stages under one network name.
///
/// `bytes` is the serialized body the list was parsed from. For list files
/// it is the file content unchanged; for wrapped single-plugin documents it
/// is the re-serialized list.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfigList {
    pub name: String,
    pub cni_version: String,
    pub plugins: Vec<PluginConf>,
    pub bytes: Vec<u8>,
}

impl NetworkConfigList {
    /// Wrap a single-plugin document into a one-stage list.
    pub fn from_conf(conf: NetConf) -> Result<Self, ParseError> {
        let mut doc = Map::new();
        doc.insert("cniVersion".to_owned(), Value::String(conf.cni_version.clone()));
        doc.insert("name".to_owned(), Value::String(conf.name.clone()));
        doc.insert(
            "plugins".to_owned(),
            Value::Array(vec![Value::Object(conf.plugin.body.clone())]),
        );
        let bytes = serde_json::to_vec(&Value::Object(doc))?;
        Ok(Self {
            name: conf.name,
            cni_version: conf.cni_version,
            plugins: vec![conf.plugin],
            bytes,
        })
    }

    /// Plugin types in invocation order, e.g. `["bridge", "portmap", "firewall", "tuning"]`.
    pub fn required_plugins(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.plugin_type.as_str()).collect()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parse a list document.
pub fn parse_conflist(bytes: &[u8]) -> Result<NetworkConfigList, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(doc) = value else {
        return Err(ParseError::NotAnObject);
    };

    let name = match doc.get("name") {
        None => return Err(ParseError::MissingName),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "name",
                expected: "string",
            })
        }
    };
    let cni_version = optional_string(&doc, "cniVersion")?;

    let plugins = match doc.get("plugins") {
        None => return Err(ParseError::MissingPlugins),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "plugins",
                expected: "array",
            })
        }
    };
    if plugins.is_empty() {
        return Err(ParseError::EmptyPlugins);
    }

    let plugins = plugins
        .iter()
        .enumerate()
        .map(|(index, item)| {
            plugin_from_value(item).map_err(|e| ParseError::Plugin {
                index,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NetworkConfigList {
        name,
        cni_version,
        plugins,
        bytes: bytes.to_vec(),
    })
}

/// Parse a single-plugin document.
pub fn parse_conf(bytes: &[u8]) -> Result<NetConf, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let plugin = plugin_from_value(&value)?;
    let name = optional_string(&plugin.body, "name")?;
    let cni_version = optional_string(&plugin.body, "cniVersion")?;
    Ok(NetConf {
        name,
        cni_version,
        plugin,
    })
}

fn plugin_from_value(value: &Value) -> Result<PluginConf, ParseError> {
    let Value::Object(body) = value else {
        return Err(ParseError::NotAnObject);
    };
    let plugin_type = match body.get("type") {
        Some(Value::String(t)) if !t.is_empty() => t.clone(),
        Some(Value::String(_)) | None => return Err(ParseError::MissingType),
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "type",
                expected: "string",
            })
        }
    };
    Ok(PluginConf {
        plugin_type,
        body: body.clone(),
    })
}

fn optional_string(doc: &Map<String, Value>, field: &'static str) -> Result<String, ParseError> {
    match doc.get(field) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::InvalidField {
            field,
            expected: "string",
        }),
    }
}
