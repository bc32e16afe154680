// src/output.rs

use crate::error::{ExtractError, Result};
use crate::leaders::{LeaderTable, RecordRow, OUTPUT_COLUMNS};
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};
use tempfile::{Builder, NamedTempFile};
use tracing::{info, instrument};

/// Writes `leaders` as CSV to `path`, replacing whatever is there.
///
/// Rows go to a temp file next to `path` which is renamed into place once
/// fully flushed, so a failed run never leaves a truncated file behind.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = leaders.rows.len()))]
pub fn write_csv(path: &Path, leaders: &LeaderTable) -> Result<()> {
    let write_err = |source: io::Error| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = create_temp(dir).map_err(write_err)?;
    // an existing target keeps its mode
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    {
        let mut w = BufWriter::new(tmp.as_file());
        write_records(&mut w, &leaders.rows).map_err(write_err)?;
        w.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!("wrote csv");
    Ok(())
}

/// Temp file with the mode a plain `File::create` would get (0666 less umask).
#[cfg(unix)]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}

/// Header plus one line per record. No index column.
pub fn write_records<W: Write>(mut w: W, rows: &[RecordRow]) -> io::Result<()> {
    write_row(&mut w, &OUTPUT_COLUMNS)?;
    for row in rows {
        let hr = row.hr.map(format_number).unwrap_or_default();
        write_row(&mut w, &[row.year_id.as_str(), row.player.as_str(), hr.as_str()])?;
    }
    Ok(())
}

/// Float form, always with a fractional part: `50` → `50.0`.
///
/// Unlike pandas, whole-number columns without missing values are not
/// written as integers; the column keeps one shape whatever the data.
/// Exponents carry an explicit sign (`1e+16`).
pub fn format_number(v: f64) -> String {
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(field) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            w.write_all(field.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn record(year: &str, player: &str, hr: Option<f64>) -> RecordRow {
        RecordRow {
            year_id: year.into(),
            player: player.into(),
            hr,
        }
    }

    fn render(rows: &[RecordRow]) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_missing_marker() {
        let out = render(&[
            record("1990", "Player A", Some(50.0)),
            record("1991", "Player B", None),
        ]);
        assert_eq!(out, "yearID,player,HR\n1990,Player A,50.0\n1991,Player B,\n");
    }

    #[test]
    fn quotes_when_needed() {
        let out = render(&[record("1927", "Ruth, Babe \"Bambino\"", Some(60.0))]);
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "1927,\"Ruth, Babe \"\"Bambino\"\"\",60.0"
        );
    }

    #[test]
    fn numbers_keep_a_fraction() {
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(73.0), "73.0");
        assert_eq!(format_number(61.5), "61.5");
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale contents that are longer than the new file\n").unwrap();

        let leaders = LeaderTable {
            rows: vec![record("2001", "Barry Bonds", Some(73.0))],
            ..LeaderTable::default()
        };
        write_csv(&path, &leaders).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "yearID,player,HR\n2001,Barry Bonds,73.0\n"
        );
        // only the target remains; the temp file was renamed, not left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let fresh = dir.path().join("fresh.csv");
        let plain = dir.path().join("plain.csv");
        write_csv(&fresh, &LeaderTable::default()).unwrap();
        fs::write(&plain, "").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&fresh), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn existing_file_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_csv(&path, &LeaderTable::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "yearID,player,HR\n");
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.csv");
        let err = write_csv(&path, &LeaderTable::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Write { .. }));
        assert!(!path.exists());
    }
}
