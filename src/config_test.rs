/// Tests for config module
#[cfg(test)]
mod tests {
    use crate::cli::CliArgs;
    use crate::compare::Sensitivity;
    use crate::config::{ColumnRegistry, build_table_plan, infer_columns, normalize_category};
    use crate::types::{ColumnType, Record, SortItem, SortState};
    use serde_json::json;
    use std::path::PathBuf;

    const REGISTRY: &str = r#"
[compare]
locale = "id"
sensitivity = "accent"

[[category]]
name = "Sarana Pendidikan"
default_sort = ["kecamatan:asc", "desa:asc"]
columns = [
  { key = "kecamatan", label = "Kecamatan" },
  { key = "desa", label = "Desa" },
  { key = "jumlah_sd", label = "Jumlah SD", type = "number" },
  { key = "sd", label = "SD (alias)", type = "number", dataKey = "jumlah_sd" },
]

[[category]]
name = "IKG (Indeks Kesulitan Geografis)"
columns = [{ key = "ikg", label = "IKG", type = "number" }]
"#;

    fn base_args(registry: &std::path::Path) -> CliArgs {
        CliArgs {
            data: PathBuf::from("desa.json"),
            columns: Some(registry.to_path_buf()),
            category: Some("sarana   PENDIDIKAN".to_string()),
            sort: vec![],
            click: vec![],
            indicator: None,
            top: 10,
            export: false,
            output_dir: None,
            locale: None,
            sensitivity: None,
            limit: None,
            json: false,
            console_width: None,
        }
    }

    fn write_registry() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), REGISTRY).unwrap();
        file
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Sarana   Pendidikan "), "sarana_pendidikan");
        assert_eq!(normalize_category("IKG"), "ikg");
    }

    #[test]
    fn test_registry_lookup_is_normalized() {
        let registry = ColumnRegistry::from_toml_str(REGISTRY).unwrap();
        let columns = registry.columns_for("sarana pendidikan");
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[2].column_type, ColumnType::Number);
        assert_eq!(columns[3].data_key(), "jumlah_sd");
        assert_eq!(
            registry.default_sort_for("Sarana Pendidikan"),
            SortState::new(vec![SortItem::asc("kecamatan"), SortItem::asc("desa")])
        );
    }

    #[test]
    fn test_unknown_category_is_empty_not_error() {
        let registry = ColumnRegistry::from_toml_str(REGISTRY).unwrap();
        assert!(registry.columns_for("Kesehatan").is_empty());
        assert!(registry.default_sort_for("Kesehatan").is_empty());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let dup_category = "[[category]]\nname = \"A\"\n[[category]]\nname = \" a \"\n";
        assert!(ColumnRegistry::from_toml_str(dup_category).is_err());

        let dup_column = "[[category]]\nname = \"A\"\ncolumns = [{ key = \"x\" }, { key = \"x\" }]\n";
        assert!(ColumnRegistry::from_toml_str(dup_column).is_err());

        let bad_sort = "[[category]]\nname = \"A\"\ndefault_sort = [\"x:up\"]\n";
        assert!(ColumnRegistry::from_toml_str(bad_sort).is_err());
    }

    #[test]
    fn test_plan_uses_category_default_sort() {
        let registry = write_registry();
        let plan = build_table_plan(&base_args(registry.path()), &[]).expect("Should build plan");

        assert_eq!(plan.columns.len(), 4);
        assert_eq!(plan.sort_state, SortState::new(vec![SortItem::asc("kecamatan"), SortItem::asc("desa")]));
        assert_eq!(plan.compare.sensitivity, Sensitivity::Accent);
        assert_eq!(plan.export_basename, "data_saranapendidikan");
        assert!(plan.export_dir.is_none());
    }

    #[test]
    fn test_plan_replays_clicks() {
        let registry = write_registry();
        let mut args = base_args(registry.path());

        args.click = vec!["jumlah_sd".to_string()];
        let plan = build_table_plan(&args, &[]).unwrap();
        assert_eq!(plan.sort_state, SortState::single(SortItem::asc("jumlah_sd")));

        args.click = vec!["jumlah_sd".to_string(), "jumlah_sd".to_string()];
        let plan = build_table_plan(&args, &[]).unwrap();
        assert_eq!(plan.sort_state, SortState::single(SortItem::desc("jumlah_sd")));

        args.click = vec!["jumlah_sd".to_string(), "jumlah_sd".to_string(), "jumlah_sd".to_string()];
        let plan = build_table_plan(&args, &[]).unwrap();
        let default_state = SortState::new(vec![SortItem::asc("kecamatan"), SortItem::asc("desa")]);
        assert_eq!(plan.sort_state, default_state, "Third click should restore the default ordering");
    }

    #[test]
    fn test_explicit_sort_and_overrides() {
        let registry = write_registry();
        let args = CliArgs {
            sort: vec!["jumlah_sd:desc".to_string(), "desa".to_string()],
            locale: Some("en".to_string()),
            sensitivity: Some("variant".to_string()),
            export: true,
            output_dir: Some(PathBuf::from("exports")),
            ..base_args(registry.path())
        };
        let plan = build_table_plan(&args, &[]).unwrap();

        assert_eq!(plan.sort_state, SortState::new(vec![SortItem::desc("jumlah_sd"), SortItem::asc("desa")]));
        assert_eq!(plan.compare.locale, "en");
        assert_eq!(plan.compare.sensitivity, Sensitivity::Variant);
        assert_eq!(plan.export_dir, Some(PathBuf::from("exports")));
    }

    #[test]
    fn test_clicks_replay_on_top_of_explicit_sort() {
        let registry = write_registry();
        let args = CliArgs {
            sort: vec!["jumlah_sd:asc".to_string()],
            click: vec!["jumlah_sd".to_string()],
            ..base_args(registry.path())
        };
        let plan = build_table_plan(&args, &[]).unwrap();
        assert_eq!(plan.sort_state, SortState::single(SortItem::desc("jumlah_sd")));

        let args = CliArgs { click: vec!["jumlah_sd".to_string(); 2], ..args };
        let plan = build_table_plan(&args, &[]).unwrap();
        assert_eq!(
            plan.sort_state,
            SortState::new(vec![SortItem::asc("kecamatan"), SortItem::asc("desa")]),
            "Cycling back to rest should land on the category default"
        );
    }

    #[test]
    fn test_invalid_sort_item_is_an_error() {
        let registry = write_registry();
        let args = CliArgs { sort: vec!["desa:sideways".to_string()], ..base_args(registry.path()) };
        assert!(build_table_plan(&args, &[]).is_err());
    }

    #[test]
    fn test_columns_inferred_without_registry() {
        let rows: Vec<Record> =
            vec![json!({ "desa": "Cibodas", "jumlah_sd": 2 }).as_object().cloned().unwrap()];
        let columns = infer_columns(&rows);
        let desa = columns.iter().find(|c| c.key == "desa").unwrap();
        let jumlah = columns.iter().find(|c| c.key == "jumlah_sd").unwrap();
        assert_eq!(desa.column_type, ColumnType::Text);
        assert_eq!(jumlah.column_type, ColumnType::Number);

        let args = CliArgs { columns: None, category: None, ..base_args(std::path::Path::new("unused.toml")) };
        let plan = build_table_plan(&args, &rows).unwrap();
        assert_eq!(plan.columns.len(), 2);
        assert!(plan.sort_state.is_empty());
        assert_eq!(plan.category, "data");
    }

    #[test]
    fn test_inferred_columns_follow_dataset_field_order() {
        let rows: Vec<Record> =
            vec![serde_json::from_str(r#"{"kecamatan": "Lembang", "desa": "Cibodas", "jumlah_sd": 2, "bidan": 1}"#).unwrap()];
        let keys: Vec<String> = infer_columns(&rows).into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["kecamatan", "desa", "jumlah_sd", "bidan"]);
    }
}
