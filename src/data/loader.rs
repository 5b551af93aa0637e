// ============================================================
// Layer 4 — CSV Loader and Writer
// ============================================================
// Reads tweet rows from CSV and writes predicted labels back.
//
// Expected input layout (header row required):
//
//   id,text,label        ← training file
//   id,text              ← test file
//
// Columns are located by header name. If a header is missing
// the conventional position is used instead (id=0, text=1,
// label=2), which matches files exported without names.
//
// The writer re-reads the input file and appends a `label`
// column, so every original column and the original row
// order survive untouched.
//
// Errors (missing file, malformed row, label outside {0,1})
// are returned to the caller. There is no partial load.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::{Path, PathBuf};

use crate::domain::sample::{Label, Sample};
use crate::domain::traits::SampleSource;

/// Positions of the columns we care about
#[derive(Debug, Clone, Copy)]
struct Columns {
    id:    usize,
    text:  usize,
    label: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, want_label: bool) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let label = if want_label {
            Some(find("label").unwrap_or(2))
        } else {
            None
        };
        Self {
            id:   find("id").unwrap_or(0),
            text: find("text").unwrap_or(1),
            label,
        }
    }
}

/// Loads samples from a CSV file.
/// Implements the SampleSource trait from Layer 3.
pub struct CsvSampleLoader {
    path:       PathBuf,
    with_label: bool,
}

impl CsvSampleLoader {
    /// Loader for a labelled (training) file
    pub fn labelled(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), with_label: true }
    }

    /// Loader for an unlabelled (test) file
    pub fn unlabelled(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), with_label: false }
    }
}

impl SampleSource for CsvSampleLoader {
    fn load_all(&self) -> Result<Vec<Sample>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open CSV '{}'", self.path.display()))?;

        let headers = reader.headers()?.clone();
        let cols    = Columns::locate(&headers, self.with_label);

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record
                .with_context(|| format!("Bad CSV row {} in '{}'", row + 1, self.path.display()))?;
            samples.push(parse_record(&record, cols, row + 1)?);
        }

        tracing::info!(
            "Loaded {} rows from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }
}

fn parse_record(record: &StringRecord, cols: Columns, row: usize) -> Result<Sample> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| anyhow!("row {row}: missing '{name}' column"))
    };

    let id   = field(cols.id, "id")?;
    let text = field(cols.text, "text")?;

    let label = match cols.label {
        Some(idx) => {
            let raw: u8 = field(idx, "label")?
                .trim()
                .parse()
                .with_context(|| format!("row {row}: label is not an integer"))?;
            Some(Label::try_from(raw).with_context(|| format!("row {row}"))?)
        }
        None => None,
    };

    Ok(Sample::new(id, text, label))
}

/// Copy `input` to `output`, appending a `label` column holding
/// `labels[i]` for data row `i`.
///
/// Fails if the number of labels differs from the number of rows,
/// since the labels would no longer line up with their tweets.
pub fn write_with_labels(
    input:  impl AsRef<Path>,
    output: impl AsRef<Path>,
    labels: &[Label],
) -> Result<()> {
    let input  = input.as_ref();
    let output = output.as_ref();

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("Cannot open CSV '{}'", input.display()))?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .with_context(|| format!("Cannot create CSV '{}'", output.display()))?;

    // An existing label column is replaced rather than duplicated
    let headers   = reader.headers()?.clone();
    let label_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("label"));

    let mut out_headers = strip_column(&headers, label_col);
    out_headers.push_field("label");
    writer.write_record(&out_headers)?;

    let mut written = 0usize;
    for record in reader.records() {
        let record = record?;
        let label  = labels.get(written).ok_or_else(|| {
            anyhow!(
                "'{}' has more rows than the {} predicted labels",
                input.display(),
                labels.len()
            )
        })?;

        let mut out = strip_column(&record, label_col);
        out.push_field(&u8::from(*label).to_string());
        writer.write_record(&out)?;
        written += 1;
    }

    if written != labels.len() {
        return Err(anyhow!(
            "'{}' has {} rows but {} labels were predicted",
            input.display(),
            written,
            labels.len()
        ));
    }

    writer.flush()?;
    tracing::info!("Wrote {} predictions to '{}'", written, output.display());
    Ok(())
}

fn strip_column(record: &StringRecord, col: Option<usize>) -> StringRecord {
    record
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != col)
        .map(|(_, f)| f)
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_labelled_rows_in_order() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "id,text,label\n1,\"good, really\",1\n2,bad,0\n3,,0\n").unwrap();

        let samples = CsvSampleLoader::labelled(&path).load_all().unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].text, "good, really");
        assert_eq!(samples[0].label, Some(Label::Positive));
        assert_eq!(samples[1].label, Some(Label::Negative));
        assert_eq!(samples[2].text, "");
    }

    #[test]
    fn test_columns_found_by_name() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "label,text,id\n1,hello,a\n").unwrap();

        let samples = CsvSampleLoader::labelled(&path).load_all().unwrap();
        assert_eq!(samples[0].id, "a");
        assert_eq!(samples[0].text, "hello");
        assert_eq!(samples[0].label, Some(Label::Positive));
    }

    #[test]
    fn test_unlabelled_file_has_no_labels() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.csv");
        fs::write(&path, "id,text\n10,hi\n").unwrap();

        let samples = CsvSampleLoader::unlabelled(&path).load_all().unwrap();
        assert_eq!(samples[0].label, None);
    }

    #[test]
    fn test_invalid_label_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, "id,text,label\n1,hi,7\n").unwrap();

        assert!(CsvSampleLoader::labelled(&path).load_all().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(CsvSampleLoader::labelled("no/such/file.csv").load_all().is_err());
    }

    #[test]
    fn test_write_with_labels_appends_column() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("test.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,text\n5,\"a, b\"\n6,c\n").unwrap();

        write_with_labels(&input, &output, &[Label::Positive, Label::Negative]).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "id,text,label\n5,\"a, b\",1\n6,c,0\n");
    }

    #[test]
    fn test_write_with_labels_replaces_existing_label() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("test.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,label,text\n1,,x\n").unwrap();

        write_with_labels(&input, &output, &[Label::Positive]).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "id,text,label\n1,x,1\n");
    }

    #[test]
    fn test_write_with_labels_rejects_count_mismatch() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("test.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,text\n1,x\n2,y\n").unwrap();

        assert!(write_with_labels(&input, &output, &[Label::Positive]).is_err());
        assert!(write_with_labels(&input, &output, &[Label::Positive; 3]).is_err());
    }
}
