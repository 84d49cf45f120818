//! Result sinks: printed trees or a JSON file keyed by date

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::domain::{format_date, pre_order_travel, BunchMap, SimplePrintVisitor};
use crate::infrastructure::error::{InfraError, InfraResult};

/// Where a run's bunch map goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// Print every tree to stdout
    Print,
    /// Write one JSON document to the path
    File(PathBuf),
}

/// Deliver the bunch map to its target.
pub fn sink_result(target: &SinkTarget, bunch_map: &BunchMap) -> InfraResult<()> {
    match target {
        SinkTarget::Print => {
            let stdout = io::stdout();
            print_bunch_map(bunch_map, stdout.lock())
                .map_err(|e| InfraError::io("print node trees", e))
        }
        SinkTarget::File(path) => write_json_file(bunch_map, path),
    }
}

/// Print each day's tree in pre-order, preceded by its date.
pub fn print_bunch_map<W: Write>(bunch_map: &BunchMap, mut out: W) -> io::Result<()> {
    for (date, bunch) in bunch_map {
        writeln!(out, "{}", format_date(*date))?;
        let mut visitor = SimplePrintVisitor::new(&mut out);
        pre_order_travel(bunch, &mut visitor)?;
    }
    out.flush()
}

/// `{ "YYYY-MM-DD": <bunch as dict>, ... }`
pub fn bunch_map_to_value(bunch_map: &BunchMap) -> Value {
    let result: Map<String, Value> = bunch_map
        .iter()
        .map(|(date, bunch)| (format_date(*date), bunch.to_value()))
        .collect();
    Value::Object(result)
}

/// Serialize all trees into one JSON document at `path`.
#[instrument(level = "debug", skip(bunch_map))]
pub fn write_json_file(bunch_map: &BunchMap, path: &Path) -> InfraResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
        }
    }
    let file = File::create(path)
        .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    let value = bunch_map_to_value(bunch_map);
    serde_json::to_writer(&mut writer, &value).map_err(|e| InfraError::Serialize {
        context: format!("write {}", path.display()),
        source: e,
    })?;
    writer
        .flush()
        .map_err(|e| InfraError::io(format!("flush {}", path.display()), e))?;

    debug!(days = bunch_map.len(), "node trees serialized");
    info!(path = %path.display(), "wrote node trees");
    Ok(())
}
