use std::io::Read;
use std::path::Path;

use log::{debug, info};

use super::model::{FileFormat, RawFile};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw experiment from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.txt` – KinTek: whitespace/tab-delimited matrix
/// * `.csv` – ProDataCSV: comma-delimited matrix
///
/// Both layouts share the same shape: the first row holds the wavelengths
/// (optionally preceded by a corner label such as `Time`), every following
/// row starts with a time point and continues with one value per wavelength.
pub fn load_file(path: &Path) -> Result<RawFile, ParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let raw = match ext.as_str() {
        "txt" => {
            let text = std::fs::read_to_string(path)?;
            parse_kintek(&name, &text)?
        }
        "csv" => {
            let file = std::fs::File::open(path)?;
            parse_prodata_csv(&name, file)?
        }
        other => return Err(ParseError::UnsupportedFormat(other.to_string())),
    };

    let (n, m) = raw.shape();
    info!("Loaded {} file {name}: {n} time points x {m} wavelengths", raw.format());
    Ok(raw)
}

// ---------------------------------------------------------------------------
// KinTek loader
// ---------------------------------------------------------------------------

/// KinTek layout: any run of spaces/tabs separates cells.
pub fn parse_kintek(name: &str, text: &str) -> Result<RawFile, ParseError> {
    let rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let cells = line.split_whitespace().map(str::to_string).collect();
            (i + 1, cells)
        })
        .collect();
    build_raw_file(name, FileFormat::KinTek, rows)
}

// ---------------------------------------------------------------------------
// ProDataCSV loader
// ---------------------------------------------------------------------------

/// ProDataCSV layout: comma-separated cells, trailing empty cells ignored.
pub fn parse_prodata_csv<R: Read>(name: &str, input: R) -> Result<RawFile, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        rows.push((line, cells));
    }
    build_raw_file(name, FileFormat::ProDataCsv, rows)
}

// ---------------------------------------------------------------------------
// Shared matrix assembly
// ---------------------------------------------------------------------------

/// Turn tokenised `(line number, cells)` rows into a validated [`RawFile`].
fn build_raw_file(
    name: &str,
    format: FileFormat,
    rows: Vec<(usize, Vec<String>)>,
) -> Result<RawFile, ParseError> {
    let mut rows = rows.into_iter().filter(|(_, cells)| !cells.is_empty());

    let (header_line, header) = rows.next().ok_or(ParseError::EmptyFile)?;
    let w = parse_header(header_line, &header)?;

    let mut t = Vec::new();
    let mut z = Vec::new();
    for (line, cells) in rows {
        if cells.len() != w.len() + 1 {
            return Err(ParseError::InconsistentRowLength {
                line,
                expected: w.len() + 1,
                found: cells.len(),
            });
        }
        let mut values = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| parse_cell(cell, line, col + 1));
        // First cell is the time point, the rest is one matrix row.
        let time = values.next().ok_or(ParseError::EmptyFile)??;
        let row = values.collect::<Result<Vec<f64>, _>>()?;
        t.push(time);
        z.push(row);
    }

    if t.is_empty() {
        return Err(ParseError::EmptyFile);
    }
    debug!("{name}: parsed {} rows", t.len());

    RawFile::new(name, format, t, w, z).map_err(|e| ParseError::MalformedHeader {
        line: header_line,
        reason: e.to_string(),
    })
}

/// Parse the wavelength header, dropping a leading corner label.
fn parse_header(line: usize, header: &[String]) -> Result<Vec<f64>, ParseError> {
    let first_is_label = header
        .first()
        .is_some_and(|c| c.is_empty() || c.parse::<f64>().is_err());
    let cells = if first_is_label { &header[1..] } else { header };

    if cells.is_empty() {
        return Err(ParseError::MalformedHeader {
            line,
            reason: "no wavelengths".to_string(),
        });
    }

    cells
        .iter()
        .map(|c| {
            c.parse::<f64>().map_err(|_| ParseError::MalformedHeader {
                line,
                reason: format!("'{c}' is not a wavelength"),
            })
        })
        .collect()
}

fn parse_cell(cell: &str, line: usize, column: usize) -> Result<f64, ParseError> {
    cell.parse::<f64>().map_err(|_| ParseError::NonNumericCell {
        line,
        column,
        text: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINTEK: &str = "Time\t400\t450\t500\n\
                          0.0\t0.1\t0.2\t0.3\n\
                          0.5\t0.4\t0.5\t0.6\n";

    #[test]
    fn kintek_shape_follows_header_and_rows() {
        let raw = parse_kintek("a.txt", KINTEK).unwrap();
        assert_eq!(raw.wavelengths(), &[400.0, 450.0, 500.0]);
        assert_eq!(raw.times(), &[0.0, 0.5]);
        assert_eq!(raw.shape(), (2, 3));
        assert_eq!(raw.matrix()[1], vec![0.4, 0.5, 0.6]);
        assert_eq!(raw.format(), FileFormat::KinTek);
    }

    #[test]
    fn kintek_accepts_header_without_corner_label() {
        let text = "  400   450\n0  1  2\n\n1  3  4\n";
        let raw = parse_kintek("b.txt", text).unwrap();
        assert_eq!(raw.wavelengths(), &[400.0, 450.0]);
        assert_eq!(raw.times(), &[0.0, 1.0]);
    }

    #[test]
    fn csv_with_empty_corner_and_trailing_commas() {
        let text = ",400,450,\n0,1,2,\n1,3,4,\n";
        let raw = parse_prodata_csv("c.csv", text.as_bytes()).unwrap();
        assert_eq!(raw.wavelengths(), &[400.0, 450.0]);
        assert_eq!(raw.matrix(), &[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(raw.format(), FileFormat::ProDataCsv);
    }

    #[test]
    fn empty_input_is_empty_file() {
        assert!(matches!(parse_kintek("e", ""), Err(ParseError::EmptyFile)));
        assert!(matches!(parse_kintek("e", "\n  \n"), Err(ParseError::EmptyFile)));
        assert!(matches!(
            parse_kintek("e", "Time 400 500\n"),
            Err(ParseError::EmptyFile)
        ));
    }

    #[test]
    fn non_numeric_wavelength_is_malformed_header() {
        let err = parse_kintek("h", "Time 400 abc\n0 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));

        let err = parse_kintek("h", "Time\n0\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn short_row_is_inconsistent() {
        let err = parse_kintek("r", "Time 400 500\n0 1 2\n1 3\n").unwrap_err();
        match err {
            ParseError::InconsistentRowLength {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_cell_reports_position() {
        let err = parse_prodata_csv("n", "t,400,500\n0,1,x\n".as_bytes()).unwrap_err();
        match err {
            ParseError::NonNumericCell { line, column, text } => {
                assert_eq!(line, 2);
                assert_eq!(column, 3);
                assert_eq!(text, "x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(ext) if ext == "parquet"));
    }
}
