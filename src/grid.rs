//! Numeric frame grids read from delimited text exports.
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};
use log::debug;
use ndarray::{s, Array2, ArrayView2};

use crate::error::{Error, Result};

/// Layout of a frame export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFormat {
    /// Cell separator, `;` for the exporter's CSV output.
    pub delimiter: u8,
    /// Leading lines that carry no pixel values. The
    /// exporter writes one line of column labels.
    pub header_lines: usize,
}

impl Default for GridFormat {
    fn default() -> Self {
        GridFormat {
            delimiter: b';',
            header_lines: 1,
        }
    }
}

/// A frame as a `rows x cols` grid of pixel values.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    values: Array2<f64>,
}

impl Frame {
    pub fn from_array(values: Array2<f64>) -> Self {
        Frame { values }
    }

    pub fn from_path<P: AsRef<Path>>(path: P, format: &GridFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io(path))?;
        Self::from_reader(BufReader::new(file), format, path)
    }

    /// Parse a grid, dropping every column that is empty in
    /// all rows. `source` only names the input in error
    /// messages.
    ///
    /// All rows must have the same number of cells, and
    /// every cell of a kept column must be a finite number.
    pub fn from_reader<R: Read, P: Into<PathBuf>>(
        rdr: R,
        format: &GridFormat,
        source: P,
    ) -> Result<Self> {
        let source = source.into();
        let mut reader = ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(rdr);

        let mut cells: Vec<Vec<Option<f64>>> = vec![];
        let mut lines: Vec<usize> = vec![];
        for record in reader.records().skip(format.header_lines) {
            let record = record.map_err(Error::csv(&source))?;
            let line = record.position().map_or(0, |p| p.line() as usize);

            if let Some(expected) = cells.first().map(Vec::len) {
                if record.len() != expected {
                    return Err(Error::RaggedGrid {
                        path: source,
                        row: cells.len(),
                        expected,
                        found: record.len(),
                    });
                }
            }

            let row = record
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    if cell.is_empty() {
                        return Ok(None);
                    }
                    cell.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(Some)
                        .ok_or_else(|| Error::Parse {
                            path: source.clone(),
                            line,
                            column: col.to_string(),
                            value: cell.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            cells.push(row);
            lines.push(line);
        }

        let width = cells.first().map_or(0, Vec::len);
        let kept: Vec<usize> = (0..width)
            .filter(|&col| cells.iter().any(|row| row[col].is_some()))
            .collect();
        if kept.len() < width {
            debug!(
                "{}: dropped {} empty column(s)",
                source.display(),
                width - kept.len()
            );
        }

        let mut values = Array2::zeros((cells.len(), kept.len()));
        for (r, (row, line)) in cells.iter().zip(&lines).enumerate() {
            for (c, &col) in kept.iter().enumerate() {
                values[(r, c)] = row[col].ok_or_else(|| Error::Parse {
                    path: source.clone(),
                    line: *line,
                    column: col.to_string(),
                    value: String::new(),
                })?;
            }
        }
        Ok(Frame { values })
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// The frame turned by 180 degrees: rows and cells
    /// within each row in reverse order.
    pub fn rotated_180(&self) -> Frame {
        Frame {
            values: self.values.slice(s![..;-1, ..;-1]).to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calibration::ZoneBounds, stats::ZoneStatistics};
    use ndarray::array;

    const NO_HEADER: GridFormat = GridFormat {
        delimiter: b';',
        header_lines: 0,
    };

    fn parse(src: &str) -> Result<Frame> {
        Frame::from_reader(src.as_bytes(), &NO_HEADER, "frame.csv")
    }

    #[test]
    fn reads_semicolon_grid() {
        let frame = parse("1;2;3\n4;5;6\n").unwrap();
        assert_eq!(frame.dim(), (2, 3));
        assert_eq!(frame.values(), array![[1., 2., 3.], [4., 5., 6.]]);
    }

    #[test]
    fn drops_fully_empty_columns() {
        let with_trailing = parse("1;2;3;\n4;5;6;\n").unwrap();
        let with_inner = parse("1;;2;3\n4; ;5;6\n").unwrap();
        let plain = parse("1;2;3\n4;5;6\n").unwrap();
        assert_eq!(with_trailing, plain);
        assert_eq!(with_inner, plain);
    }

    #[test]
    fn partial_empty_column_is_parse_error() {
        assert!(matches!(parse("1;2\n;4\n"), Err(Error::Parse { .. })));
    }

    #[test]
    fn non_numeric_cell_is_parse_error() {
        match parse("1;2\n3;warm\n") {
            Err(Error::Parse { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "warm");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        match parse("1;2;3\n4;5\n") {
            Err(Error::RaggedGrid {
                row,
                expected,
                found,
                ..
            }) => {
                assert_eq!((row, expected, found), (1, 3, 2));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn non_finite_cell_is_parse_error() {
        for cell in &["NaN", "inf", "-inf"] {
            match parse(&format!("1;2;{}\n", cell)) {
                Err(Error::Parse { value, column, .. }) => {
                    assert_eq!(value, *cell);
                    assert_eq!(column, "2");
                }
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn default_skips_label_line() {
        let format = GridFormat::default();
        let frame = Frame::from_reader("a;b\n1;2\n".as_bytes(), &format, "frame.csv").unwrap();
        assert_eq!(frame.values(), array![[1., 2.]]);
    }

    #[test]
    fn first_zone_row_is_second_text_line() {
        let src = "1;1;\n2;2;\n3;3;\n";
        let frame =
            Frame::from_reader(src.as_bytes(), &GridFormat::default(), "frame.csv").unwrap();
        assert_eq!(frame.dim(), (2, 2));

        let stats = ZoneStatistics::of_zone(frame.values(), "zone1", ZoneBounds::new(0, 1, 0, 2));
        assert_eq!(stats.unwrap().mean, 2.);

        let unskipped = parse(src).unwrap();
        assert_eq!(unskipped.dim(), (3, 2));
    }

    #[test]
    fn rotation_reverses_both_axes() {
        let frame = Frame::from_array(array![[1., 2., 3.], [4., 5., 6.]]);
        let rotated = frame.rotated_180();
        assert_eq!(rotated.values(), array![[6., 5., 4.], [3., 2., 1.]]);
        assert_eq!(rotated.rotated_180(), frame);
    }
}
