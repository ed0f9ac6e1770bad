use gridline::engine::{
    Column, ExportFormat, FilterFacet, MemoryStore, Notification, PageSelection, Row, RowId,
    SortOrder, TableMode, TableOptions, TableView, Value,
};

fn job_columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID"),
        Column::new("name", "Name"),
        Column::new("status", "Status"),
        Column::new("owner", "Owner").exportable(false),
    ]
}

fn jobs(count: i64) -> Vec<Row> {
    (1..=count)
        .map(|i| {
            Row::new()
                .with("id", i)
                .with("name", format!("job {:02}", i))
                .with("status", if i % 3 == 0 { "paused" } else { "active" })
                .with("owner", "ops")
        })
        .collect()
}

fn new_table(options: TableOptions) -> TableView {
    TableView::new(options, None)
}

#[test]
fn scenario_sort_by_name() {
    let mut table = new_table(TableOptions {
        columns: vec![Column::new("id", "ID"), Column::new("name", "Name")],
        ..Default::default()
    });
    table.set_rows(vec![
        Row::new().with("id", 1).with("name", "b"),
        Row::new().with("id", 2).with("name", "a"),
    ]);

    table.set_sort("name", SortOrder::Asc);
    assert_eq!(table.page_ids(), vec![RowId::Int(2), RowId::Int(1)]);

    table.set_sort("name", SortOrder::Desc);
    assert_eq!(table.page_ids(), vec![RowId::Int(1), RowId::Int(2)]);
}

#[test]
fn scenario_facet_plus_search() {
    let mut table = new_table(TableOptions {
        columns: vec![Column::new("status", "Status"), Column::new("name", "Name")],
        filters: vec![FilterFacet::new("status", "Status")
            .option("active", "Active")
            .option("paused", "Paused")],
        ..Default::default()
    });
    table.set_rows(vec![
        Row::new().with("id", 1).with("status", "active").with("name", "alpha"),
        Row::new().with("id", 2).with("status", "active").with("name", "beta"),
        Row::new().with("id", 3).with("status", "paused").with("name", "alpha"),
    ]);

    table.set_filter("status", Value::from("active"));
    table.set_search("al");

    assert_eq!(table.page_ids(), vec![RowId::Int(1)]);
}

#[test]
fn scenario_hide_all_but_one_column() {
    let mut table = new_table(TableOptions {
        columns: job_columns(),
        ..Default::default()
    });

    assert!(table.hide_column("id"));
    assert!(table.hide_column("name"));
    assert!(table.hide_column("status"));
    assert!(!table.hide_column("owner"));

    let visible = table.visible_columns();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].field, "owner");
    assert_eq!(table.state().order_by, "owner");
}

#[test]
fn scenario_csv_quoting() {
    let mut table = new_table(TableOptions {
        columns: vec![Column::new("quote", "Quote")],
        ..Default::default()
    });
    table.set_rows(vec![Row::new().with("id", 1).with("quote", r#"He said, "hi""#)]);

    let artifact = table.export(ExportFormat::Csv).unwrap();
    let body = artifact.contents.lines().nth(1).unwrap();
    assert_eq!(body, r#""He said, ""hi""""#);
}

#[test]
fn scenario_select_all_on_middle_page() {
    let mut table = new_table(TableOptions {
        columns: job_columns(),
        page_size: 10,
        ..Default::default()
    });
    table.set_rows(jobs(25));
    table.set_page(1);

    let notifications = table.select_all_visible();
    let expected: Vec<RowId> = (11..=20).map(RowId::Int).collect();
    assert_eq!(notifications, vec![Notification::SelectionChanged(expected.clone())]);
    assert_eq!(table.selected_ids(), expected);
    assert_eq!(table.view().selection.page_state, PageSelection::All);
}

#[test]
fn sort_mirror_law_with_ties() {
    let rows: Vec<Row> = [("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5), ("a", 6)]
        .iter()
        .map(|(group, id)| Row::new().with("id", *id).with("group", *group))
        .collect();

    let mut table = new_table(TableOptions {
        columns: vec![Column::new("id", "ID"), Column::new("group", "Group")],
        page_size: 50,
        ..Default::default()
    });
    table.set_rows(rows);

    table.set_sort("group", SortOrder::Asc);
    let asc = table.page_ids();
    table.set_sort("group", SortOrder::Desc);
    let desc = table.page_ids();

    let ids = |v: &[i64]| v.iter().map(|&i| RowId::Int(i)).collect::<Vec<_>>();
    assert_eq!(asc, ids(&[1, 3, 6, 2, 5, 4]));
    assert_eq!(desc, ids(&[4, 2, 5, 1, 3, 6]));
}

#[test]
fn structured_export_round_trip() {
    let mut table = new_table(TableOptions {
        title: "Jobs".to_string(),
        columns: job_columns(),
        ..Default::default()
    });
    table.set_rows(jobs(7));

    let artifact = table.export(ExportFormat::Json).unwrap();
    assert_eq!(artifact.file_name, "jobs.json");

    let parsed: serde_json::Value = serde_json::from_str(&artifact.contents).unwrap();
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 7);
    for record in records {
        let keys: Vec<&str> = record
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["id", "name", "status"]);
    }
}

#[test]
fn reconcile_twice_notifies_once() {
    let mut table = new_table(TableOptions {
        columns: job_columns(),
        ..Default::default()
    });
    table.set_rows(jobs(10));
    table.toggle_selection(RowId::Int(9));
    table.toggle_selection(RowId::Int(3));

    assert_eq!(
        table.set_rows(jobs(5)),
        vec![Notification::SelectionChanged(vec![RowId::Int(3)])]
    );
    assert!(table.set_rows(jobs(5)).is_empty());
}

#[test]
fn preferences_survive_instances() {
    let store = MemoryStore::new();
    let options = TableOptions {
        columns: job_columns(),
        persist_key: Some("jobs-table".to_string()),
        ..Default::default()
    };

    {
        let mut table = TableView::new(options.clone(), Some(Box::new(store.clone())));
        table.set_rows(jobs(20));
        table.set_sort("name", SortOrder::Desc);
        table.set_rows_per_page(5);
        table.hide_column("owner");
        table.toggle_selection(RowId::Int(1));
    }

    let blob = store.get("jobs-table").unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(json["order"], "desc");
    assert_eq!(json["orderBy"], "name");
    assert_eq!(json["rowsPerPage"], 5);
    assert_eq!(json["hiddenColumns"], serde_json::json!(["owner"]));
    assert!(json.get("selected").is_none());

    let mut table = TableView::new(options, Some(Box::new(store)));
    table.set_rows(jobs(20));
    assert_eq!(table.state().order, SortOrder::Desc);
    assert_eq!(table.view().page_rows.len(), 5);
    assert!(table.selected_ids().is_empty());
    assert_eq!(table.mode(), TableMode::Populated);
}

#[test]
fn malformed_preferences_fall_back_to_defaults() {
    let store = MemoryStore::new();
    store.insert("jobs-table", r#"{"order": "sideways"}"#);

    let table = TableView::new(
        TableOptions {
            columns: job_columns(),
            persist_key: Some("jobs-table".to_string()),
            default_sort_field: Some("status".to_string()),
            default_sort_order: SortOrder::Desc,
            ..Default::default()
        },
        Some(Box::new(store)),
    );

    assert_eq!(table.state().order_by, "status");
    assert_eq!(table.state().order, SortOrder::Desc);
}
