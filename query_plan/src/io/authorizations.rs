//! Reads `authorizations.csv`. A subject missing from this file is left
//! out of the returned map entirely; `Catalog::authorization` defaults an
//! absent subject to "sees nothing" rather than this reader inventing an
//! empty row for every subject up front.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use query_plan_domain::catalog::{parse_attribute_set, Authorization, SubjectId};

use crate::error::ReadError;

#[derive(Debug, Deserialize)]
struct AuthorizationRow {
    subject: String,
    #[serde(default)]
    plain: String,
    #[serde(default)]
    enc: String,
}

pub fn read_authorizations(path: &Path) -> Result<HashMap<SubjectId, Authorization>, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;

    let mut authorizations = HashMap::new();
    for result in reader.deserialize::<AuthorizationRow>() {
        let row = result.map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;
        let auth = Authorization::new(parse_attribute_set(&row.plain), parse_attribute_set(&row.enc));
        authorizations.insert(SubjectId::from(row.subject), auth);
    }
    Ok(authorizations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_columns_default_to_empty_sets() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "subject,plain,enc\nX,N,S\nY,,\n").unwrap();
        let auths = read_authorizations(f.path()).unwrap();
        assert_eq!(auths[&SubjectId::from("X")].plain, parse_attribute_set("N"));
        assert!(auths[&SubjectId::from("Y")].plain.is_empty());
        assert!(auths[&SubjectId::from("Y")].enc.is_empty());
    }
}
