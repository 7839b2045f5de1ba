/// Tests for CSV export
#[cfg(test)]
mod tests {
    use crate::report::export::*;
    use crate::types::{ColumnDescriptor, Record};
    use chrono::{Local, TimeZone};
    use serde_json::json;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![ColumnDescriptor::text("kecamatan", "Kec"), ColumnDescriptor::text("desa", "Desa")]
    }

    /// Records what it was asked to save
    #[derive(Default)]
    struct RecordingSaver {
        saved: RefCell<Vec<(String, String, String)>>,
    }

    impl FileSaver for RecordingSaver {
        fn save(&self, content: &str, filename: &str, content_type: &str) -> io::Result<PathBuf> {
            self.saved.borrow_mut().push((content.to_string(), filename.to_string(), content_type.to_string()));
            Ok(PathBuf::from(filename))
        }
    }

    struct FailingSaver;

    impl FileSaver for FailingSaver {
        fn save(&self, _content: &str, _filename: &str, _content_type: &str) -> io::Result<PathBuf> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only medium"))
        }
    }

    #[test]
    fn test_quotes_are_doubled() {
        let rows = vec![record(json!({ "kecamatan": "A", "desa": "Say \"Hi\"" }))];
        let text = to_delimited_text(&rows, &columns());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#""Kec","Desa""#);
        assert_eq!(lines[1], r#""A","Say ""Hi""""#);
    }

    #[test]
    fn test_numbers_unquoted_and_missing_blank() {
        let columns = vec![
            ColumnDescriptor::text("desa", ""),
            ColumnDescriptor::number("jumlah", "Jumlah"),
            ColumnDescriptor::text("kode", "Kode"),
            ColumnDescriptor::text("catatan", "Catatan"),
        ];
        let rows = vec![record(json!({ "desa": "Cibodas", "jumlah": 12, "kode": "0012", "catatan": null }))];
        let text = to_delimited_text(&rows, &columns);
        assert_eq!(text, "\"desa\",\"Jumlah\",\"Kode\",\"Catatan\"\n\"Cibodas\",12,\"0012\",\"\"");
    }

    #[test]
    fn test_text_cells_keep_surrounding_whitespace() {
        let columns = vec![ColumnDescriptor::text("desa", "Desa"), ColumnDescriptor::number("n", "N")];
        let rows = vec![record(json!({ "desa": "  Padded  ", "n": 1.0 }))];
        assert_eq!(to_delimited_text(&rows, &columns), "\"Desa\",\"N\"\n\"  Padded  \",1");
    }

    #[test]
    fn test_fractional_numbers_written_in_full() {
        let columns = vec![ColumnDescriptor::number("ikg", "IKG")];
        let rows = vec![record(json!({ "ikg": 0.25 })), record(json!({ "ikg": -3.0 }))];
        assert_eq!(to_delimited_text(&rows, &columns), "\"IKG\"\n0.25\n-3");
    }

    #[test]
    fn test_export_reads_key_not_data_key() {
        let columns = vec![ColumnDescriptor::number("total", "Total").with_data_key("jumlah")];
        let rows = vec![record(json!({ "total": 1, "jumlah": 99 }))];
        assert_eq!(to_delimited_text(&rows, &columns), "\"Total\"\n1");
    }

    #[test]
    fn test_no_rows_gives_empty_text() {
        let rows: Vec<Record> = vec![];
        assert_eq!(to_delimited_text(&rows, &columns()), "");
    }

    #[test]
    fn test_build_export_filename_sanitizes_category() {
        let name = build_export_filename("IKG (Indeks Kesulitan Geografis)");
        assert_eq!(name, "data_ikgindekskesulitangeografis");
        assert!(name.trim_start_matches("data_").chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_export_timestamp_is_compact() {
        let now = Local.with_ymd_and_hms(2024, 9, 17, 8, 15, 2).unwrap();
        assert_eq!(export_timestamp(now), "20240917-081502");
    }

    #[test]
    fn test_export_table_hands_csv_to_saver() {
        let rows = vec![record(json!({ "kecamatan": "Lembang", "desa": "Cibodas" }))];
        let saver = RecordingSaver::default();
        let now = Local.with_ymd_and_hms(2024, 9, 17, 8, 15, 2).unwrap();

        let outcome = export_table_at(&rows, &columns(), "data_pendidikan", &saver, now);

        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from("data_pendidikan_20240917-081502.csv")));
        let saved = saver.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "\"Kec\",\"Desa\"\n\"Lembang\",\"Cibodas\"");
        assert_eq!(saved[0].2, CSV_CONTENT_TYPE);
    }

    #[test]
    fn test_export_table_skips_empty_input() {
        let saver = RecordingSaver::default();
        let rows = vec![record(json!({ "desa": "Cibodas" }))];
        let none: Vec<Record> = vec![];

        assert_eq!(export_table(&none, &columns(), "x", &saver), ExportOutcome::Skipped(SkipReason::NoRows));
        assert_eq!(export_table(&rows, &[], "x", &saver), ExportOutcome::Skipped(SkipReason::NoColumns));
        assert!(saver.saved.borrow().is_empty(), "Nothing should reach the saver");
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let rows = vec![record(json!({ "desa": "Cibodas" }))];
        match export_table(&rows, &columns(), "x", &FailingSaver) {
            ExportOutcome::Failed(message) => assert!(message.contains("read-only")),
            other => panic!("Expected a failed outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_disk_saver_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DiskSaver::new(dir.path());

        let first = saver.save("a", "data_x.csv", CSV_CONTENT_TYPE).unwrap();
        let second = saver.save("b", "data_x.csv", CSV_CONTENT_TYPE).unwrap();

        assert_eq!(first, dir.path().join("data_x.csv"));
        assert_eq!(second, dir.path().join("data_x-2.csv"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "b");

        // Only the two exports remain; temporary files are gone
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn test_disk_saver_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2024");
        let saver = DiskSaver::new(&nested);
        let path = saver.save("x", "data.csv", CSV_CONTENT_TYPE).unwrap();
        assert!(path.starts_with(&nested));
    }
}
