//! JSON export of role structures and distance matrices.
//!
//! ```text
//! Equivalence   → [0, 1, 1, 2]
//! Ranking       → {"order":{"actors":3,"pairs":[[0,0],[0,1],...]}}
//! DistanceMatrix→ {"actors":2,"cells":[0,3,0,0]}
//! ```
//!
//! Everything serializable goes through the same two entry points; the
//! per-type formats are fixed by each type's serde attributes.

use std::io::Write;

use serde::Serialize;

use crate::Result;

/// Serialize `value` into a compact JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Write `value` as pretty-printed JSON, followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
