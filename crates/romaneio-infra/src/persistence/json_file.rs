//! JSON map files shared by the file repositories

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use romaneio_types::Result;

/// Load an id-keyed map, empty when the file does not exist yet
pub(crate) fn load_records<T: DeserializeOwned>(path: &Path) -> Result<HashMap<String, T>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn write_records<T: Serialize>(path: &Path, records: &HashMap<String, T>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}
