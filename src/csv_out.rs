use std::io::Write;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::Dataset;

pub fn write_csv<W: Write>(writer: W, dataset: &Dataset, delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    writer.write_record(&dataset.headers)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_to_string(dataset: &Dataset, delimiter: u8) -> Result<String, ExtractError> {
    let mut buffer = Vec::<u8>::new();
    write_csv(&mut buffer, dataset, delimiter)?;
    String::from_utf8(buffer)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

#[cfg(test)]
mod tests {
    use super::write_csv_to_string;
    use crate::model::Dataset;

    #[test]
    fn writes_header_then_rows_with_quoting() {
        let dataset = Dataset {
            headers: vec!["Description".to_string(), "2024".to_string()],
            rows: vec![
                vec!["Revenue, net".to_string(), "1200".to_string()],
                vec!["Net loss".to_string(), "-45".to_string()],
            ],
        };
        let csv = write_csv_to_string(&dataset, b',').expect("csv should render");
        assert_eq!(csv, "Description,2024\n\"Revenue, net\",1200\nNet loss,-45\n");
    }

    #[test]
    fn honors_custom_delimiter() {
        let dataset = Dataset {
            headers: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec!["1".to_string(), "2".to_string()]],
        };
        let csv = write_csv_to_string(&dataset, b'\t').expect("csv should render");
        assert_eq!(csv, "a\tb\n1\t2\n");
    }
}
