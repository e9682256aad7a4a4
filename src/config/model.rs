// src/config/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{APP_NAME, AppPayload, Command, ExecApp};
use crate::errors::{ExecfileError, Result};
use crate::types::OutputFormat;

/// An Execfile after adaptation.
///
/// Mirrors a document like:
///
/// ```text
/// {
///     exec ./migrate.sh
///     exec notify-send bye { shutdown }
/// }
///
/// example.com {
///     exec /deploy ./deploy.sh { timeout 5m }
/// }
/// ```
///
/// - `apps` holds encoded app payloads by name; the global block feeds the
///   `exec` app.
/// - `routes` holds one entry per site-block `exec`, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptedConfig {
    pub apps: BTreeMap<String, AppPayload>,
    pub routes: Vec<Route>,
}

/// A route-scoped `exec` handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Site addresses of the enclosing block.
    pub addresses: Vec<String>,
    /// Request matcher (`*`, `/path`, `@name`), if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub handler: Command,
}

#[derive(Serialize)]
struct Rendered<'a> {
    routes: &'a [Route],
    apps: BTreeMap<&'a str, Value>,
}

impl AdaptedConfig {
    /// The decoded `exec` app; empty when the document had no global block.
    pub fn exec_app(&self) -> Result<ExecApp> {
        match self.apps.get(APP_NAME) {
            Some(payload) => ExecApp::from_payload(payload),
            None => Ok(ExecApp::default()),
        }
    }

    pub fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.rendered()?)?)
    }

    /// Render as JSON or TOML.
    pub fn render(&self, format: OutputFormat, pretty: bool) -> Result<String> {
        let rendered = self.rendered()?;
        let text = match (format, pretty) {
            (OutputFormat::Json, false) => serde_json::to_string(&rendered)?,
            (OutputFormat::Json, true) => serde_json::to_string_pretty(&rendered)?,
            (OutputFormat::Toml, false) => toml::to_string(&rendered)?,
            (OutputFormat::Toml, true) => toml::to_string_pretty(&rendered)?,
        };
        Ok(text)
    }

    fn rendered(&self) -> Result<Rendered<'_>> {
        let mut apps = BTreeMap::new();
        for (name, payload) in &self.apps {
            let value: Value = serde_json::from_slice(&payload.value)
                .map_err(|e| ExecfileError::Internal(format!("decoding {name} app: {e}")))?;
            apps.insert(name.as_str(), value);
        }
        Ok(Rendered {
            apps,
            routes: &self.routes,
        })
    }
}
