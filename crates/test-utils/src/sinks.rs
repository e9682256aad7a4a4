use std::fmt;

use execfile::errors::Result;
use execfile::sink::WriterOpener;
use execfile::syntax::Dispenser;
use serde_json::{Map, Value};

/// Minimal third-party style sink: `tag <label>`.
///
/// Register it with `registry.register("tag", TagWriter::from_dispenser)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWriter {
    pub label: String,
}

impl TagWriter {
    pub fn from_dispenser(d: &mut Dispenser) -> Result<Box<dyn WriterOpener>> {
        let label = d.single_arg()?;
        Ok(Box::new(TagWriter { label }))
    }
}

impl fmt::Display for TagWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag:{}", self.label)
    }
}

impl WriterOpener for TagWriter {
    fn module_name(&self) -> &str {
        "tag"
    }

    fn writer_key(&self) -> String {
        self.to_string()
    }

    fn options(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        map.insert("label".to_string(), Value::String(self.label.clone()));
        Ok(map)
    }
}
