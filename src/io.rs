//! CSV loaders and writers for annotation, expression and metadata tables.
//!
//! Loaders return [`anyhow::Result`] so that csv and filesystem failures carry
//! the path that caused them. Domain failures are [`PathwayError`] values
//! wrapped in the returned error.

use std::{fs::File, io::Read, io::Write, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    annotation::AnnotationRecord,
    error::PathwayError,
    matrix::{ExpressionMatrix, Matrix},
    metadata::SampleMetadata,
};

/// Accepted headers for the gene column of an annotation table
const GENE_HEADERS: &[&str] = &["gene", "gene_id", "ensembl", "ensemble"];

/// Accepted headers for the pathway column of an annotation table
const PATHWAY_HEADERS: &[&str] = &["pathway", "pathways", "pathway_id"];

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Unable to open {}", path.display()))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Locate a column by any of its accepted names, ignoring case
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// Header of the row-label column written by [`write_matrix`]
pub const PATHWAY_HEADER: &str = "pathway";

/// Read gene-to-pathway records from a CSV file
pub fn read_annotation<P: AsRef<Path>>(path: P) -> Result<Vec<AnnotationRecord>> {
    let path = path.as_ref();
    annotation_from_reader(open(path)?)
        .with_context(|| format!("Unable to read annotation table {}", path.display()))
}

/// Read gene-to-pathway records from CSV data
///
/// When the first row names a gene and a pathway column, columns are matched
/// by header name and may appear in either order. When it names neither, the
/// table is headerless with the gene in the first column and the pathway in
/// the second. A header naming only one of the two is rejected.
pub fn annotation_from_reader<R: Read>(reader: R) -> Result<Vec<AnnotationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut first = csv::StringRecord::new();
    if !reader.read_record(&mut first)? {
        return Err(PathwayError::MissingInput("annotation table is empty".to_string()).into());
    }

    let (gene_col, pathway_col, first_is_data) = match (
        find_column(&first, GENE_HEADERS),
        find_column(&first, PATHWAY_HEADERS),
    ) {
        (Some(gene_col), Some(pathway_col)) => (gene_col, pathway_col, false),
        (None, None) if first.len() >= 2 => (0, 1, true),
        (Some(_), None) | (None, None) => {
            return Err(PathwayError::MissingColumn(PATHWAY_HEADERS.join("|")).into());
        }
        (None, Some(_)) => {
            return Err(PathwayError::MissingColumn(GENE_HEADERS.join("|")).into());
        }
    };

    let mut records = Vec::new();
    let data_rows = first_is_data.then_some(Ok(first)).into_iter().chain(reader.records());
    for (line, row) in data_rows.enumerate() {
        let row = row?;
        let gene = row.get(gene_col).unwrap_or_default();
        let pathway = row.get(pathway_col).unwrap_or_default();
        if gene.is_empty() || pathway.is_empty() {
            return Err(PathwayError::InvalidValue(format!(
                "empty gene or pathway on record {}",
                line + 1
            ))
            .into());
        }
        records.push(AnnotationRecord::new(gene.to_string(), pathway.to_string()));
    }
    info!("Loaded {} annotation records", records.len());
    Ok(records)
}

/// Read a genes x samples matrix from a CSV file
pub fn read_expression<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let path = path.as_ref();
    expression_from_reader(open(path)?)
        .with_context(|| format!("Unable to read expression table {}", path.display()))
}

/// Read a genes x samples matrix from CSV data
///
/// The first column holds the gene ids, the remaining headers are sample ids.
pub fn expression_from_reader<R: Read>(reader: R) -> Result<ExpressionMatrix> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(PathwayError::MissingInput("expression table is empty".to_string()).into());
    }
    let sample_ids = headers.iter().skip(1).map(String::from).collect::<Vec<_>>();

    let mut gene_ids = Vec::new();
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        let gene = row.get(0).unwrap_or_default().to_string();
        let values = row
            .iter()
            .skip(1)
            .zip(&sample_ids)
            .map(|(value, sample)| {
                value.parse::<f64>().with_context(|| {
                    format!("Invalid value '{value}' for gene '{gene}' in sample '{sample}'")
                })
            })
            .collect::<Result<Vec<_>>>()?;
        gene_ids.push(gene);
        rows.push(values);
    }
    let matrix = ExpressionMatrix::new(gene_ids, sample_ids, rows)?;
    info!(
        "Loaded expression for {} genes across {} samples",
        matrix.n_rows(),
        matrix.n_columns()
    );
    Ok(matrix)
}

/// Read sample group labels from a CSV file
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<SampleMetadata> {
    let path = path.as_ref();
    metadata_from_reader(open(path)?)
        .with_context(|| format!("Unable to read sample metadata {}", path.display()))
}

/// Read sample group labels from CSV data
///
/// The first column is the sample id and the second the group label, which is
/// kept as a string whatever it looks like.
pub fn metadata_from_reader<R: Read>(reader: R) -> Result<SampleMetadata> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(PathwayError::MissingInput("metadata table is empty".to_string()).into());
    }
    if headers.len() < 2 {
        return Err(PathwayError::MissingColumn("group label".to_string()).into());
    }

    let mut samples = Vec::new();
    for row in reader.records() {
        let row = row?;
        let sample = row.get(0).unwrap_or_default().to_string();
        let label = row.get(1).unwrap_or_default().to_string();
        samples.push((sample, label));
    }
    let meta = SampleMetadata::new(samples)?;
    info!("Loaded group labels for {} samples", meta.len());
    Ok(meta)
}

/// Write a pathway expression matrix as CSV
///
/// The header is [`PATHWAY_HEADER`] followed by the sample ids.
pub fn write_matrix<W: Write>(matrix: &Matrix, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let header = std::iter::once(PATHWAY_HEADER)
        .chain(matrix.column_ids().iter().map(|c| c.as_str()));
    writer.write_record(header)?;
    for (row_id, values) in matrix.rows() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(row_id.to_string());
        record.extend(values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
