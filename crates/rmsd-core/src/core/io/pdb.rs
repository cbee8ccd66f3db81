use crate::core::models::coordinates::{CoordinateSet, ShapeError};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("no coordinate records found")]
    NoCoordinates,
    #[error("inconsistent ensemble: {0}")]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
    #[error("MODEL record opened before the previous model was closed")]
    NestedModel,
    #[error("ENDMDL record without a matching MODEL")]
    UnmatchedEndmdl,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    // Records may end short of the column range, so clamp instead of failing.
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Reads a multi-model PDB trajectory into a [`CoordinateSet`].
///
/// Each `MODEL`/`ENDMDL` block becomes one conformation; a trailing
/// unterminated model is accepted. Files without `MODEL` records are read
/// as a single conformation, which the shape validation then rejects as
/// too small for pairwise work. Only the first alternate location (blank
/// or `A`) of each atom is taken.
///
/// # Arguments
///
/// * `reader` - The PDB text source.
/// * `selection` - Optional atom-name filter (e.g. `"CA"`); `None` keeps
///   every ATOM/HETATM record.
///
/// # Return
///
/// The validated coordinate set, or a [`PdbError`] describing the first
/// offending line or the shape inconsistency across models.
pub fn read_coordinate_set(
    reader: &mut impl BufRead,
    selection: Option<&str>,
) -> Result<CoordinateSet, PdbError> {
    let mut models: Vec<Vec<Point3<f64>>> = Vec::new();
    let mut current: Option<Vec<Point3<f64>>> = None;
    let mut implicit: Vec<Point3<f64>> = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        match slice_and_trim(&line, 0, 6) {
            "MODEL" => {
                if current.is_some() {
                    return Err(PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::NestedModel,
                    });
                }
                current = Some(Vec::new());
            }
            "ENDMDL" => match current.take() {
                Some(model) => models.push(model),
                None => {
                    return Err(PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::UnmatchedEndmdl,
                    });
                }
            },
            "ATOM" | "HETATM" => {
                if line.len() < 54 {
                    return Err(PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::LineTooShort,
                    });
                }

                let name = slice_and_trim(&line, 12, 16);
                if let Some(wanted) = selection {
                    if name != wanted {
                        continue;
                    }
                }
                let alt_loc = slice_and_trim(&line, 16, 17);
                if !(alt_loc.is_empty() || alt_loc == "A") {
                    continue;
                }

                let x = parse_coordinate(&line, line_num, 30, 38)?;
                let y = parse_coordinate(&line, line_num, 38, 46)?;
                let z = parse_coordinate(&line, line_num, 46, 54)?;

                let point = Point3::new(x, y, z);
                match current.as_mut() {
                    Some(model) => model.push(point),
                    None => implicit.push(point),
                }
            }
            "END" => break,
            _ => {}
        }
    }

    // A trailing model without ENDMDL still counts.
    if let Some(model) = current {
        models.push(model);
    }
    if models.is_empty() && !implicit.is_empty() {
        models.push(implicit);
    }
    if models.iter().all(|m| m.is_empty()) {
        return Err(PdbError::NoCoordinates);
    }

    Ok(CoordinateSet::new(models)?)
}

/// Opens a PDB file and reads it via [`read_coordinate_set`].
pub fn read_coordinate_set_from_path(
    path: impl AsRef<Path>,
    selection: Option<&str>,
) -> Result<CoordinateSet, PdbError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_coordinate_set(&mut reader, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    fn atom_line(serial: usize, name: &str, alt: char, x: f64, y: f64, z: f64) -> String {
        format!(
            "ATOM  {serial:>5} {name:<4}{alt}ALA A{resseq:>4}    {x:>8.3}{y:>8.3}{z:>8.3}",
            resseq = serial,
        )
    }

    fn two_model_trajectory() -> String {
        let mut text = String::from("REMARK generated for reader tests\n");
        text.push_str("MODEL        1\n");
        text.push_str(&atom_line(1, "N", ' ', 0.0, 0.0, 0.0));
        text.push('\n');
        text.push_str(&atom_line(2, "CA", ' ', 1.5, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\n");
        text.push_str("MODEL        2\n");
        text.push_str(&atom_line(1, "N", ' ', 5.0, 0.0, 0.0));
        text.push('\n');
        text.push_str(&atom_line(2, "CA", ' ', 6.5, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\n");
        text.push_str("END\n");
        text
    }

    #[test]
    fn reads_every_atom_of_each_model() {
        let set = read_coordinate_set(&mut Cursor::new(two_model_trajectory()), None).unwrap();

        assert_eq!(set.conformation_count(), 2);
        assert_eq!(set.atoms_per_conformation(), 2);
        assert_eq!(set.conformation(1).unwrap()[0], Point3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn selection_filters_by_atom_name() {
        let set = read_coordinate_set(&mut Cursor::new(two_model_trajectory()), Some("CA")).unwrap();

        assert_eq!(set.atoms_per_conformation(), 1);
        assert_eq!(set.conformation(0).unwrap()[0], Point3::new(1.5, 0.0, 0.0));
        assert_eq!(set.conformation(1).unwrap()[0], Point3::new(6.5, 0.0, 0.0));
    }

    #[test]
    fn later_alternate_locations_are_skipped() {
        let mut text = String::from("MODEL        1\n");
        text.push_str(&atom_line(1, "CA", 'A', 1.0, 0.0, 0.0));
        text.push('\n');
        text.push_str(&atom_line(1, "CA", 'B', 9.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\nMODEL        2\n");
        text.push_str(&atom_line(1, "CA", ' ', 2.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\n");

        let set = read_coordinate_set(&mut Cursor::new(text), None).unwrap();

        assert_eq!(set.atoms_per_conformation(), 1);
        assert_eq!(set.conformation(0).unwrap()[0].x, 1.0);
    }

    #[test]
    fn trailing_model_without_endmdl_is_kept() {
        let mut text = String::from("MODEL        1\n");
        text.push_str(&atom_line(1, "CA", ' ', 1.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\nMODEL        2\n");
        text.push_str(&atom_line(1, "CA", ' ', 2.0, 0.0, 0.0));
        text.push('\n');

        let set = read_coordinate_set(&mut Cursor::new(text), None).unwrap();
        assert_eq!(set.conformation_count(), 2);
    }

    #[test]
    fn ragged_models_surface_a_shape_error() {
        let mut text = String::from("MODEL        1\n");
        text.push_str(&atom_line(1, "CA", ' ', 1.0, 0.0, 0.0));
        text.push('\n');
        text.push_str(&atom_line(2, "CB", ' ', 2.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\nMODEL        2\n");
        text.push_str(&atom_line(1, "CA", ' ', 3.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\n");

        let result = read_coordinate_set(&mut Cursor::new(text), None);
        assert!(matches!(
            result,
            Err(PdbError::Shape(ShapeError::RaggedConformation {
                index: 1,
                atoms: 1,
                expected: 2,
            }))
        ));
    }

    #[test]
    fn single_model_files_are_too_small_for_pairwise_work() {
        let mut text = String::new();
        text.push_str(&atom_line(1, "CA", ' ', 1.0, 0.0, 0.0));
        text.push('\n');
        text.push_str(&atom_line(2, "CB", ' ', 2.0, 0.0, 0.0));
        text.push('\n');

        let result = read_coordinate_set(&mut Cursor::new(text), None);
        assert!(matches!(
            result,
            Err(PdbError::Shape(ShapeError::TooFewConformations(1)))
        ));
    }

    #[test]
    fn structural_record_errors_carry_line_numbers() {
        let nested = "MODEL        1\nMODEL        2\n";
        let result = read_coordinate_set(&mut Cursor::new(nested), None);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 2,
                kind: PdbParseErrorKind::NestedModel,
            })
        ));

        let unmatched = "ENDMDL\n";
        let result = read_coordinate_set(&mut Cursor::new(unmatched), None);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::UnmatchedEndmdl,
            })
        ));
    }

    #[test]
    fn malformed_atom_records_are_rejected() {
        let short = "ATOM      1  CA  ALA A   1      11.104\n";
        let result = read_coordinate_set(&mut Cursor::new(short), None);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort,
            })
        ));

        let mut bad = atom_line(1, "CA", ' ', 1.0, 0.0, 0.0);
        bad.replace_range(30..38, "  xx.yyy");
        bad.push('\n');
        let result = read_coordinate_set(&mut Cursor::new(bad), None);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidFloat { .. },
            })
        ));
    }

    #[test]
    fn end_record_terminates_reading() {
        let mut text = two_model_trajectory();
        text.push_str("MODEL        3\n");
        text.push_str(&atom_line(1, "N", ' ', 9.0, 0.0, 0.0));
        text.push('\n');
        text.push_str("ENDMDL\n");

        let set = read_coordinate_set(&mut Cursor::new(text), None).unwrap();
        assert_eq!(set.conformation_count(), 2);
    }

    #[test]
    fn files_without_coordinates_are_rejected() {
        let result = read_coordinate_set(&mut Cursor::new("REMARK empty\nEND\n"), None);
        assert!(matches!(result, Err(PdbError::NoCoordinates)));

        // Selection that matches nothing leaves only empty models behind.
        let result = read_coordinate_set(&mut Cursor::new(two_model_trajectory()), Some("ZZ"));
        assert!(matches!(result, Err(PdbError::NoCoordinates)));
    }

    #[test]
    fn reads_from_a_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.pdb");
        let mut file = File::create(&path).unwrap();
        file.write_all(two_model_trajectory().as_bytes()).unwrap();

        let set = read_coordinate_set_from_path(&path, Some("CA")).unwrap();
        assert_eq!(set.conformation_count(), 2);
    }
}
