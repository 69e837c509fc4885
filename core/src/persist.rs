use crate::SearchIndex;
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// Serialize the artifact as compact JSON. Output is byte-stable for equal input.
pub fn to_json(index: &SearchIndex) -> Result<String> {
    Ok(serde_json::to_string(index)?)
}

pub fn save_index(path: &Path, index: &SearchIndex) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let json = to_json(index)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_index(path: &Path) -> Result<SearchIndex> {
    let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let index: SearchIndex = serde_json::from_str(&buf).with_context(|| format!("parsing {}", path.display()))?;
    Ok(index)
}
