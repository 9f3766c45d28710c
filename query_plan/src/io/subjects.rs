//! Reads `subjects.csv`. Sorting by ascending `comp_price + transfer_price`
//! and computing the catalog-wide price averages both happen inside
//! `Catalog::new`, not here — this module only parses rows.

use std::path::Path;

use serde::Deserialize;

use query_plan_domain::catalog::Subject;

use crate::error::ReadError;

#[derive(Debug, Deserialize)]
struct SubjectRow {
    subject: String,
    comp_price: u64,
    transfer_price: u64,
}

pub fn read_subjects(path: &Path) -> Result<Vec<Subject>, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;

    let mut subjects = Vec::new();
    for result in reader.deserialize::<SubjectRow>() {
        let row = result.map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;
        subjects.push(Subject::new(row.subject, row.comp_price, row.transfer_price));
    }
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_subject_rows() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "subject,comp_price,transfer_price\nX,3,4\nY,1,1\n").unwrap();
        let subjects = read_subjects(f.path()).unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].id.0, "X");
        assert_eq!(subjects[1].comp_price, 1);
    }
}
