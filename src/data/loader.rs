use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, JobDataset, JobPosting};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a job postings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` / `.xlsm` / `.xlsb` / `.ods` – first worksheet, header row first
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Location": "...", "Company": "...", ... }, ...]`
/// * `.parquet` – one column per field
///
/// A missing file fails with [`DashboardError::NotFound`]. No column is
/// required; whatever is absent just disables the matching filter or chart.
pub fn load_file(path: &Path) -> Result<JobDataset> {
    if !path.is_file() {
        return Err(DashboardError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => load_workbook(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(DashboardError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} postings from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

/// Whether a load error means the source file does not exist.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::NotFound { .. })
    )
}

fn posting_from_row(headers: &[String], values: impl IntoIterator<Item = CellValue>) -> JobPosting {
    JobPosting::from_cells(headers.iter().cloned().zip(values))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First worksheet; the first row holds the headers. Fully empty rows are skipped.
fn load_workbook(path: &Path) -> Result<JobDataset> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(JobDataset::default()),
    };

    let postings = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| posting_from_row(&headers, row.iter().map(workbook_cell)))
        .collect();

    Ok(JobDataset::new(postings, &headers))
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; every other row is one posting.
/// Short rows are allowed and leave the trailing cells null. Cells of the
/// known text columns are kept verbatim; other cells get their type guessed.
fn load_csv(path: &Path) -> Result<JobDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let is_text: Vec<bool> = headers
        .iter()
        .map(|h| Column::from_header(h).is_some_and(Column::is_text))
        .collect();

    let mut postings = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let values = record.iter().enumerate().map(|(i, raw)| {
            if is_text.get(i).copied().unwrap_or(false) {
                CellValue::text(raw)
            } else {
                CellValue::guess(raw)
            }
        });
        postings.push(posting_from_row(&headers, values));
    }

    Ok(JobDataset::new(postings, &headers))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Location": "Cairo", "Company": "Acme", "Job Title": "Engineer", "Salary": 9000 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<JobDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut postings = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        postings.push(JobPosting::from_cells(
            obj.iter().map(|(k, v)| (k.clone(), json_to_cell(v))),
        ));
    }

    Ok(JobDataset::new(postings, &headers))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field (strings, ints, floats,
/// bools). Files written by Pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`) both work.
fn load_parquet(path: &Path) -> Result<JobDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut postings = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(decode_text_column)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let values = columns.iter().map(|col| extract_cell(col, row));
            postings.push(posting_from_row(&headers, values));
        }
    }

    Ok(JobDataset::new(postings, &headers))
}

/// Dictionary-encoded (pandas `category`) and view string columns are cast
/// to plain `Utf8`; everything else passes through.
fn decode_text_column(col: &ArrayRef) -> Result<ArrayRef> {
    let needs_cast = match col.data_type() {
        DataType::Utf8View => true,
        DataType::Dictionary(_, values) => matches!(
            values.as_ref(),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        ),
        _ => false,
    };
    if needs_cast {
        cast(col, &DataType::Utf8)
            .with_context(|| format!("casting {:?} column to text", col.data_type()))
    } else {
        Ok(Arc::clone(col))
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        other => {
            log::warn!("Unsupported parquet column type {other:?}, treating as null");
            CellValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use arrow::array::{DictionaryArray, StringArray};
    use arrow::datatypes::{Field, Int32Type, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempdir().expect("tempdir");
        let err = load_file(&tmp.path().join("wuzzuf_jobs.xlsx")).expect_err("missing file");
        assert!(is_not_found(&err));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.txt");
        fs::write(&path, "Location\nCairo\n").expect("write");
        let err = load_file(&path).expect_err("unsupported");
        assert!(!is_not_found(&err));
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn csv_trims_text_columns_and_keeps_order() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(
            &path,
            "Job Title,Company,Location,Experience,Salary\n\
             \" Engineer \",  Acme ,Cairo ,2-4 Yrs,9000\n\
             Analyst,Beta,Giza,,\n",
        )
        .expect("write csv");

        let ds = load_file(&path).expect("load csv");
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.column_names,
            ["Job Title", "Company", "Location", "Experience Required", "Salary"]
        );
        let first = &ds.postings[0];
        assert_eq!(first.text(Column::JobTitle), Some("Engineer"));
        assert_eq!(first.text(Column::Company), Some("Acme"));
        assert_eq!(first.text(Column::Location), Some("Cairo"));
        assert_eq!(first.text(Column::Experience), Some("2-4 Yrs"));
        assert_eq!(first.salary(), Some(9000.0));
        assert_eq!(ds.postings[1].text(Column::Experience), None);
        assert_eq!(ds.postings[1].salary(), None);
    }

    #[test]
    fn csv_text_columns_are_not_reinterpreted() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(
            &path,
            "Location,Company,Job Title,Salary\n\
             00123,Infinity,1e3,1e3\n",
        )
        .expect("write csv");

        let ds = load_file(&path).expect("load csv");
        let posting = &ds.postings[0];
        assert_eq!(posting.text(Column::Location), Some("00123"));
        assert_eq!(posting.text(Column::Company), Some("Infinity"));
        assert_eq!(posting.text(Column::JobTitle), Some("1e3"));
        assert_eq!(posting.salary(), Some(1000.0));
    }

    #[test]
    fn workbook_first_sheet_loads() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("wuzzuf_jobs.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["City", "Company", "Job Title", "Experience", "Salary"]
            .into_iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, header).expect("header");
        }
        sheet.write_string(1, 0, " Cairo ").expect("cell");
        sheet.write_string(1, 1, "Acme").expect("cell");
        sheet.write_string(1, 2, "Engineer").expect("cell");
        sheet.write_number(1, 3, 3.0).expect("cell");
        sheet.write_number(1, 4, 9000.0).expect("cell");
        // Row 2 stays empty and is skipped.
        sheet.write_string(3, 0, "Giza").expect("cell");
        sheet.write_string(3, 2, "Analyst").expect("cell");
        sheet.write_string(3, 3, "Entry Level").expect("cell");
        sheet.write_string(3, 4, "Confidential").expect("cell");
        workbook.save(&path).expect("save workbook");

        let ds = load_file(&path).expect("load workbook");
        assert_eq!(ds.len(), 2);
        assert!(ds.has_column(Column::Location));
        assert!(ds.has_column(Column::Experience));

        let first = &ds.postings[0];
        assert_eq!(first.text(Column::Location), Some("Cairo"));
        assert_eq!(first.text(Column::JobTitle), Some("Engineer"));
        assert_eq!(first.text(Column::Experience), Some("3"));
        assert_eq!(first.salary(), Some(9000.0));

        let second = &ds.postings[1];
        assert_eq!(second.text(Column::Location), Some("Giza"));
        assert_eq!(second.text(Column::Company), None);
        assert_eq!(second.text(Column::Experience), Some("Entry Level"));
        assert_eq!(second.salary(), None);
    }

    #[test]
    fn csv_without_optional_columns_loads() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("titles.csv");
        fs::write(&path, "Job Title\nEngineer\n").expect("write csv");
        let ds = load_file(&path).expect("load csv");
        assert_eq!(ds.len(), 1);
        assert!(!ds.has_column(Column::Location));
        assert!(!ds.has_column(Column::Salary));
    }

    #[test]
    fn json_records_load() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.json");
        fs::write(
            &path,
            r#"[{"Location":" Cairo","Company":"Acme","Salary":12000},
                {"Location":null,"Company":"Beta"}]"#,
        )
        .expect("write json");
        let ds = load_file(&path).expect("load json");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.postings[0].text(Column::Location), Some("Cairo"));
        assert_eq!(ds.postings[0].salary(), Some(12000.0));
        assert_eq!(ds.postings[1].text(Column::Location), None);
        assert!(ds.has_column(Column::Salary));
    }

    #[test]
    fn json_must_be_an_array() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.json");
        fs::write(&path, r#"{"Location":"Cairo"}"#).expect("write json");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn parquet_columns_load() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("Location", DataType::Utf8, true),
            Field::new("Salary", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Cairo "), None])),
                Arc::new(Int64Array::from(vec![Some(7000), Some(9500)])),
            ],
        )
        .expect("batch");
        let file = fs::File::create(&path).expect("create");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close");

        let ds = load_file(&path).expect("load parquet");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.postings[0].text(Column::Location), Some("Cairo"));
        assert_eq!(ds.postings[1].text(Column::Location), None);
        assert_eq!(ds.postings[1].salary(), Some(9500.0));
    }

    #[test]
    fn parquet_dictionary_text_loads() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.parquet");
        let schema = Arc::new(Schema::new(vec![Field::new(
            "Location",
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
            true,
        )]));
        let cities: DictionaryArray<Int32Type> = vec!["Cairo", "Giza", "Cairo"].into_iter().collect();
        let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(cities)]).expect("batch");
        let file = fs::File::create(&path).expect("create");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close");

        let ds = load_file(&path).expect("load parquet");
        let cities: Vec<_> = ds.postings.iter().map(|p| p.text(Column::Location)).collect();
        assert_eq!(cities, [Some("Cairo"), Some("Giza"), Some("Cairo")]);
    }

    #[test]
    fn view_columns_cast_to_text() {
        let view: ArrayRef = Arc::new(arrow::array::StringViewArray::from(vec![Some("Alex"), None]));
        let decoded = decode_text_column(&view).expect("cast view");
        assert_eq!(decoded.data_type(), &DataType::Utf8);
        assert_eq!(extract_cell(&decoded, 0), CellValue::String("Alex".into()));
        assert_eq!(extract_cell(&decoded, 1), CellValue::Null);

        let ints: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        let passed = decode_text_column(&ints).expect("no cast");
        assert!(Arc::ptr_eq(&passed, &ints));
    }
}
