//! Row types for the CSV config tables, deserialized by header name.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One row of `SchemeUnits.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitRow {
    pub scheme_id: String,
    pub unit_id: String,
    pub unit_title: String,
    pub half_term: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file: Option<String>,
}

/// One row of `Objectives.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveRow {
    pub scheme_id: String,
    pub unit_id: String,
    pub objective: String,
}

/// One row of `Keywords.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRow {
    pub scheme_id: String,
    pub unit_id: String,
    pub keyword: String,
}

/// One row of `Assessments.csv`, question by question.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRow {
    pub scheme_id: String,
    pub unit_id: String,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub marks: Option<u32>,
}

/// One row of `SetsSchemes.csv`: which scheme a teaching group follows.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRow {
    pub teaching_group: String,
    pub scheme_id: String,
}

/// One row of `HalfTerms.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct HalfTermRow {
    pub half_term: u32,
    #[serde(default)]
    pub title: String,
    pub long_title: String,
    pub code: String,
    pub weeks: u32,
}

pub fn read_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = fs_err::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        let row = row.with_context(|| format!("Bad row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unit_rows_by_header_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SchemeUnits.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "scheme_id,unit_id,unit_title,half_term,type,file").unwrap();
        writeln!(file, "8c,a1,Algebra 1,1,learn,").unwrap();
        writeln!(file, "8c,t1,Autumn test,2,assess,tests/aut.pdf").unwrap();

        let rows: Vec<UnitRow> = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit_title, "Algebra 1");
        assert_eq!(rows[0].file, None);
        assert_eq!(rows[1].file.as_deref(), Some("tests/aut.pdf"));
    }

    #[test]
    fn question_rows_tolerate_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assessments.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "scheme_id,unit_id,q").unwrap();
        writeln!(file, "8c,t1,1a").unwrap();

        let rows: Vec<QuestionRow> = read_rows(&path).unwrap();
        assert_eq!(rows[0].q, "1a");
        assert_eq!(rows[0].topic, "");
        assert_eq!(rows[0].marks, None);
    }

    #[test]
    fn bad_row_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HalfTerms.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "half_term,long_title,code,weeks").unwrap();
        writeln!(file, "one,Autumn 1,aut1,7").unwrap();

        let err = read_rows::<HalfTermRow>(&path).unwrap_err();
        assert!(err.to_string().contains("HalfTerms.csv"));
    }
}
