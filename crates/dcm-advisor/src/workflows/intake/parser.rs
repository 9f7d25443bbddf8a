use super::normalizer::normalize_header;
use super::BatchImportError;
use crate::workflows::myelopathy::{PatientField, PatientInput};
use std::io::Read;

/// One non-blank data row, numbered from 1 in file order.
#[derive(Debug)]
pub(crate) struct RawRow {
    pub(crate) row: usize,
    pub(crate) input: PatientInput,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<PatientField>> = csv_reader
        .headers()?
        .iter()
        .map(|header| PatientField::from_column(&normalize_header(header)))
        .collect();

    let missing: Vec<String> = PatientField::ordered()
        .into_iter()
        .filter(|field| field.is_required_column() && !columns.contains(&Some(*field)))
        .map(|field| field.column().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(BatchImportError::MissingColumns { columns: missing });
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut input = PatientInput::default();
        for (column, cell) in columns.iter().zip(record.iter()) {
            if let Some(field) = column {
                input.set(*field, Some(cell.to_string()));
            }
        }

        rows.push(RawRow {
            row: rows.len() + 1,
            input,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "age,sex,mjoa,duration_months,t2_signal,levels,canal_ratio";

    #[test]
    fn reports_every_missing_required_column() {
        let error = parse_rows(Cursor::new("age,sex,mjoa,opll\n60,M,14,no\n"))
            .expect_err("header rejected");

        match error {
            BatchImportError::MissingColumns { columns } => assert_eq!(
                columns,
                vec!["duration_months", "t2_signal", "levels", "canal_ratio"]
            ),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn skips_blank_rows_and_keeps_short_ones() {
        let csv = format!("{HEADER},smoker\n60,M,14,6,none,2,<50%,yes\n,,,,,,,\n\n71,F,12\n");
        let rows = parse_rows(Cursor::new(csv)).expect("rows parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].input.smoker.as_deref(), Some("yes"));
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[1].input.mjoa.as_deref(), Some("12"));
        assert_eq!(rows[1].input.levels, None);
    }

    #[test]
    fn matches_headers_regardless_of_case_and_order() {
        let csv = "\u{feff}Canal_Ratio,LEVELS,T2_Signal,Duration_Months,MJOA,Sex,Age,Unused\n\
>60%,3,bright,10,11,F,58,ignored\n";
        let rows = parse_rows(Cursor::new(csv)).expect("rows parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].input.canal_ratio.as_deref(), Some(">60%"));
        assert_eq!(rows[0].input.age.as_deref(), Some("58"));
    }
}
