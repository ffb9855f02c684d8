// src/io/reporting.rs

use crate::error::Result;
use crate::simulation::engine::HistoryRecord;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the simulation history to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - The history records produced by the simulation engine.
pub fn write_simulation_log<P: AsRef<Path>>(file_path: P, data: &[HistoryRecord]) -> Result<()> {
    let path = file_path.as_ref();
    write_history(std::fs::File::create(path)?, data)?;

    info!(rows = data.len(), path = %path.display(), "exported simulation history");
    Ok(())
}

/// Serializes `data` as CSV (header row first) into any writer.
pub fn write_history<W: Write>(writer: W, data: &[HistoryRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let records = vec![
            HistoryRecord {
                timestep: 0,
                product: 0,
                demand: 5,
                unmet: 0,
                inventory: 5,
                forecast_today: 5,
                forecast_tomorrow: 6,
                decayed: false,
            },
            HistoryRecord {
                timestep: 1,
                product: 0,
                demand: 7,
                unmet: 2,
                inventory: 0,
                forecast_today: 5,
                forecast_tomorrow: 6,
                decayed: false,
            },
        ];

        let mut buf = Vec::new();
        write_history(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "timestep,product,demand,unmet,inventory,forecast_today,forecast_tomorrow,decayed"
        );
        assert_eq!(lines[2], "1,0,7,2,0,5,6,false");
        assert_eq!(lines.len(), 3);
    }
}
