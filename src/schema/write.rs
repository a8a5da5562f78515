use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use super::Table;
use crate::error::PipelineError;

/// Write `table` as quote-all CSV to `dest`, atomically.
///
/// - the parent directory is created if missing
/// - rows go to a hidden temp file next to `dest`, which is flushed and synced
/// - the temp file is then renamed over `dest`
///
/// On any failure `dest` keeps its previous contents and the temp file is removed.
#[instrument(level = "info", skip(table), fields(rows = table.len()))]
pub fn write_table(table: &Table, dest: &Path) -> Result<(), PipelineError> {
    // 1) Make sure the directory exists; "" means the working directory
    let dir: PathBuf = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| PipelineError::write(&dir, e))?;

    // 2) Temp file in the same directory so the rename stays on one volume
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            PipelineError::write(
                dest,
                io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"),
            )
        })?;
    let prefix = format!(".{}.", file_name);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    // tempfile defaults to 0600; publish with the same umask-governed mode as File::create
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(&dir)
        .map_err(|e| PipelineError::write(&dir, e))?;
    debug!(tmp = ?tmp.path(), "writing temp file");

    // 3) Serialize: header + rows, every field quoted, '\n' terminators
    {
        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(tmp.as_file_mut());
        let tmp_err = |e: csv::Error| PipelineError::write(dest, io::Error::from(e));
        wtr.write_record(table.schema().columns()).map_err(tmp_err)?;
        for row in table.rows() {
            wtr.write_record(row.cells()).map_err(tmp_err)?;
        }
        wtr.flush().map_err(|e| PipelineError::write(dest, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| PipelineError::write(dest, e))?;

    // 4) Publish
    tmp.persist(dest)
        .map_err(|e| PipelineError::write(dest, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, CANDIDATE_COLUMNS};
    use tempfile::tempdir;

    fn table_with(rows: &[&[&str]]) -> Table {
        let schema = Schema::new(["a", "b", "c"]);
        let mut t = Table::empty(schema);
        for r in rows {
            t.push_cells(r.iter().map(|s| s.to_string()).collect());
        }
        t
    }

    #[test]
    fn quotes_every_field() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        write_table(&table_with(&[&["1", "", "x,y"]]), &dest).unwrap();

        let text = fs::read_to_string(&dest).unwrap();
        assert_eq!(text, "\"a\",\"b\",\"c\"\n\"1\",\"\",\"x,y\"\n");
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("data").join("nested").join("candidates.csv");
        write_table(&Table::empty(Schema::candidates()), &dest).unwrap();

        let text = fs::read_to_string(&dest).unwrap();
        let header = CANDIDATE_COLUMNS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(text, format!("{header}\n"));
    }

    #[test]
    fn replaces_existing_file_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        fs::write(&dest, "old contents").unwrap();

        write_table(&table_with(&[&["1", "2", "3"]]), &dest).unwrap();

        assert!(fs::read_to_string(&dest).unwrap().starts_with("\"a\""));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(leftovers, vec!["out.csv".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn published_file_has_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("candidates.csv");
        write_table(&Table::empty(Schema::candidates()), &dest).unwrap();

        let plain = dir.path().join("plain.csv");
        fs::write(&plain, "x").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dest), mode(&plain));
    }

    #[test]
    fn failed_publish_keeps_previous_file() {
        let dir = tempdir().unwrap();
        // a directory where the file should go makes the rename fail
        let dest = dir.path().join("out.csv");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep"), "x").unwrap();

        let err = write_table(&table_with(&[&["1", "2", "3"]]), &dest).unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
        assert!(dest.join("keep").exists());

        let temps = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(temps, 0);
    }

    #[test]
    fn uncreatable_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "plain file").unwrap();

        let err = write_table(
            &Table::empty(Schema::candidates()),
            &blocker.join("candidates.csv"),
        )
        .unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn hostile_values_round_trip_through_a_csv_reader() {
        use crate::process::sanitize::{clean_text, SanitizeOptions};

        let nasty = [
            "comma, inside",
            "\"quoted\" text",
            "line\nbreak",
            "carriage\r\nreturn",
            "sep\u{2028}arator",
            "nul\u{0000}byte",
            "\"",
        ];
        let opts = SanitizeOptions::default();
        let mut t = Table::empty(Schema::new(["a", "b", "c"]));
        for v in nasty {
            let cleaned = clean_text(v, opts);
            assert!(!cleaned.contains('\n') && !cleaned.contains('\r'));
            t.push_cells(vec![cleaned.clone(), v.to_string(), cleaned]);
        }

        let dir = tempdir().unwrap();
        let dest = dir.path().join("nasty.csv");
        write_table(&t, &dest).unwrap();

        let mut rdr = csv::Reader::from_path(&dest).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), 3);
        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), nasty.len());
        for (row, raw) in rows.iter().zip(nasty) {
            assert_eq!(row.len(), 3);
            assert_eq!(&row[1], raw);
            assert_eq!(&row[0], &row[2]);
        }

        // sanitized values alone keep one physical line per row
        let mut clean = Table::empty(Schema::new(["a"]));
        for v in nasty {
            clean.push_cells(vec![clean_text(v, opts)]);
        }
        let dest = dir.path().join("clean.csv");
        write_table(&clean, &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert_eq!(text.lines().count(), nasty.len() + 1);
    }
}
