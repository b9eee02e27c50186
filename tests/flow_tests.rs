mod common;

use std::fs;

use common::{answers, files_with_extension, TestEnv, KITCHEN_QUOTE};
use jobdocs::cli::run_menu;
use jobdocs_core::{storage::DocumentStorage, DecodeMode};
use jobdocs_domain::{Document, PricingMode, TotalSource};
use jobdocs_storage_csv::{CsvDocumentStorage, ReceiptLedger};
use rstest::rstest;

const EXIT: &[&str] = &["5"];

fn load(path: &std::path::Path) -> Document {
    CsvDocumentStorage::new()
        .load_document(path, DecodeMode::Strict)
        .expect("load document")
        .document
}

#[test]
fn standard_quote_is_saved_as_csv_and_html() {
    let env = TestEnv::new();
    let mut context = env.context(&answers(&[KITCHEN_QUOTE, EXIT]));
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    assert!(dir.ends_with("J0001 - Kitchen_Remodel"));
    assert!(dir.join("J0001_quote_03-15-2024.csv").is_file());
    let html_path = dir.join("J0001_quote_Kitchen_Remodel_03-15-2024.html");
    let html = fs::read_to_string(&html_path).expect("html written");
    assert!(html.contains("Kitchen Remodel"));
    assert!(html.contains("$625.00"));

    let document = load(&dir.join("J0001_quote_03-15-2024.csv"));
    assert_eq!(document.client_name, "Pat Doe");
    assert_eq!(document.lines.len(), 2);
    assert!(document.lines.iter().all(|line| line.section == "Demo"));
    assert_eq!(document.lines[0].worker_type, "Labor");
    assert_eq!(document.lines[1].worker_type, "Material");
    assert_eq!(document.totals.subtotal, 625.0);
    assert_eq!(document.totals.grand_total, 625.0);
}

#[rstest]
#[case("abc")]
#[case("-5")]
#[case("")]
fn bad_amounts_are_asked_again(#[case] bad: &str) {
    let env = TestEnv::new();
    let mut context = env.context(&[
        "1",
        "",
        "Porch",
        "Lee",
        "3 Pine Rd",
        "1",
        "2",
        "Rebuild steps",
        "",
        bad,
        "450",
        "",
        "4",
        "",
        "5",
    ]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let document = load(&dir.join("J0001_quote_03-15-2024.csv"));
    assert_eq!(document.lines.len(), 1);
    assert_eq!(document.lines[0].section, "");
    assert_eq!(document.totals.grand_total, 450.0);
}

#[test]
fn time_and_materials_invoice_uses_role_rates() {
    let env = TestEnv::new();
    let mut context = env.context(&[
        "2",
        "",
        "Fence",
        "Kim",
        "9 Elm St",
        "1",
        // contractor at the default rate
        "2",
        "Set posts",
        "1",
        "",
        "3",
        // laborer at a custom rate
        "2",
        "Haul debris",
        "3",
        "n",
        "60",
        "2",
        "3",
        "Posts",
        "4",
        "15",
        "4",
        // no receipts
        "",
        "",
        // one allowance
        "Gate hardware",
        "2",
        "10.50",
        "",
        "5",
    ]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let document = load(&dir.join("J0001_invoice_03-15-2024.csv"));
    assert_eq!(document.pricing, PricingMode::Standard);
    let rates: Vec<(&str, f64, f64)> = document
        .lines
        .iter()
        .map(|line| (line.worker_type.as_str(), line.quantity, line.unit_rate))
        .collect();
    assert_eq!(
        rates,
        vec![
            ("Contractor", 3.0, 80.0),
            ("Laborer", 2.0, 60.0),
            ("Material", 4.0, 15.0)
        ]
    );
    assert_eq!(document.totals.subtotal, 420.0);
    assert_eq!(document.totals.receipts_total, 0.0);
    assert_eq!(document.allowances.len(), 1);
    assert_eq!(document.allowances_total(), 21.0);

    let html = fs::read_to_string(dir.join("J0001_invoice_Fence_03-15-2024.html")).unwrap();
    assert!(html.contains("Gate hardware"));
    assert!(!html.contains("Receipts Total"));
}

#[test]
fn fixed_invoice_bills_receipts_logged_on_the_way() {
    let env = TestEnv::new();
    let mut context = env.context(&[
        "2",
        "",
        "Deck Repair",
        "Sam Lee",
        "4 Oak Ave",
        "2",
        "2",
        "Replace deck boards",
        "",
        "3",
        // log one receipt
        "y",
        "",
        "Lumber Yard",
        "03-10-2024",
        "120.50",
        "n",
        // include every receipt in the file
        "y",
        "1",
        "",
        "2000",
        "5",
    ]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let ledger = ReceiptLedger::new(dir.join("J0001_receipts.csv"));
    let loaded = ledger.load().expect("receipts");
    assert_eq!(loaded.receipts.len(), 1);
    assert_eq!(loaded.receipts[0].item, "Lumber Yard");

    let document = load(&dir.join("J0001_invoice_03-15-2024.csv"));
    assert_eq!(document.pricing, PricingMode::Fixed);
    assert!(document.lines.iter().all(|line| line.is_scope_only()));
    assert_eq!(document.totals.subtotal, 2000.0);
    assert_eq!(document.totals.subtotal_source, TotalSource::Manual);
    assert_eq!(document.totals.receipts_total, 120.5);
    assert_eq!(document.totals.grand_total, 2120.5);

    let html = fs::read_to_string(dir.join("J0001_invoice_Deck_Repair_03-15-2024.html")).unwrap();
    assert!(html.contains("Lumber Yard"));
}

#[test]
fn sections_can_be_reordered_before_saving() {
    let env = TestEnv::new();
    let mut context = env.context(&[
        "1",
        "",
        "Bath",
        "Ana",
        "7 Lake Dr",
        "1",
        "1",
        "Tile",
        "2",
        "Set tile",
        "",
        "300",
        "",
        "1",
        "Plumbing",
        "2",
        "Move drain",
        "",
        "200",
        "",
        "4",
        "y",
        "1,1",
        "2,1",
        "",
        "5",
    ]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let document = load(&dir.join("J0001_quote_03-15-2024.csv"));
    let sections: Vec<&str> = document
        .lines
        .iter()
        .map(|line| line.section.as_str())
        .collect();
    assert_eq!(sections, vec!["Plumbing", "Tile"]);
}

#[test]
fn a_document_without_lines_is_not_saved() {
    let env = TestEnv::new();
    let mut context = env.context(&["1", "", "Shed", "Bo", "1 Hill Rd", "1", "4", "5"]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    assert!(files_with_extension(&dir, "csv").is_empty());
    assert!(files_with_extension(&dir, "html").is_empty());
}

#[test]
fn logged_receipts_are_sorted_by_date() {
    let env = TestEnv::new();
    let mut context = env.context(&[
        "3",
        "J0007",
        "Paint",
        "03-12-2024",
        "40",
        "Brushes",
        "not a date",
        "12.50",
        "Tape",
        "03-01-2024",
        "$8",
        "",
        "5",
    ]);
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0007");
    assert!(dir.ends_with("J0007"));
    let loaded = ReceiptLedger::new(dir.join("J0007_receipts.csv"))
        .load()
        .expect("receipts");
    let rows: Vec<(&str, &str)> = loaded
        .receipts
        .iter()
        .map(|receipt| (receipt.item.as_str(), receipt.date.as_str()))
        .collect();
    // the malformed date fell back to today
    assert_eq!(
        rows,
        vec![
            ("Tape", "03-01-2024"),
            ("Paint", "03-12-2024"),
            ("Brushes", "03-15-2024")
        ]
    );
}

#[test]
fn receipts_go_to_the_existing_job_folder() {
    let env = TestEnv::new();
    let mut context = env.context(&answers(&[
        KITCHEN_QUOTE,
        &["3", "j0001", "Hinges", "", "9.99", ""],
        EXIT,
    ]));
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    assert!(dir.join("J0001_receipts.csv").is_file());
}

#[test]
fn editing_a_quote_keeps_a_backup_and_renames_the_revision() {
    let env = TestEnv::new();
    let mut context = env.context(&answers(&[
        KITCHEN_QUOTE,
        &[
            "4", "J0001", "", "", "", "Pat Smith", "", "", "", "", "700", "1",
        ],
        EXIT,
    ]));
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let original = load(&dir.join("J0001_quote_03-15-2024_original.csv"));
    assert_eq!(original.client_name, "Pat Doe");
    assert!(dir
        .join("J0001_quote_Kitchen_Remodel_03-15-2024_original.html")
        .is_file());
    assert!(!dir.join("J0001_quote_03-15-2024.csv").exists());

    let revised = load(&dir.join("J0001_quote_03-15-2024_revised.csv"));
    assert_eq!(revised.client_name, "Pat Smith");
    assert_eq!(revised.project_name, "Kitchen Remodel");
    assert_eq!(revised.totals.subtotal, 625.0);
    assert_eq!(revised.totals.grand_total, 700.0);
    assert_eq!(revised.totals.grand_total_source, TotalSource::Manual);
    assert!(dir
        .join("J0001_quote_Kitchen_Remodel_03-15-2024_revised.html")
        .is_file());
}

#[test]
fn declining_the_edit_leaves_the_quote_alone() {
    let env = TestEnv::new();
    let mut context = env.context(&answers(&[
        KITCHEN_QUOTE,
        &["4", "J0001", "", "n"],
        EXIT,
    ]));
    run_menu(&mut context).expect("menu");

    let dir = env.job_dir("J0001");
    let document = load(&dir.join("J0001_quote_03-15-2024.csv"));
    assert_eq!(document.totals.grand_total, 625.0);
    assert!(dir.join("J0001_quote_03-15-2024_original.csv").is_file());
}

#[test]
fn editing_a_quote_without_job_id_row_uses_the_entered_id() {
    let env = TestEnv::new();
    let dir = env.jobs_root().join("J0005 - Fence");
    fs::create_dir_all(&dir).unwrap();
    let csv_path = dir.join("J0005_quote_03-15-2024.csv");
    fs::write(
        &csv_path,
        "DocType,quote\r\nProject,Fence\r\nClient,Kim\r\nAddress,9 Elm St\r\nDate,03-15-2024\r\n\
         ReceiptsTotal,0.0\r\n\r\n\
         Section,Description,FullDescription,WorkerType,Hours/Qty,Rate/UnitPrice,LineTotal\r\n\
         ,Posts,,Material,4.0,15.0,60.0\r\n\r\n\
         Subtotal,,,,,,60.0\r\nGrandTotal,,,,,,60.0\r\n",
    )
    .unwrap();

    let mut context = env.context(&answers(&[
        &["4", "J0005", "", "", "", "", "", "", "", "", "", "3"],
        EXIT,
    ]));
    run_menu(&mut context).expect("menu");

    let document = load(&csv_path);
    assert_eq!(document.job_id.as_str(), "J0005");
    assert_eq!(document.totals.subtotal, 60.0);
    assert!(dir.join("J0005_quote_Fence_03-15-2024.html").is_file());
    let stray: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("_quote"))
        .collect();
    assert!(stray.is_empty());
}

#[test]
fn input_ending_mid_flow_ends_the_session() {
    let env = TestEnv::new();
    let mut context = env.context(&["1", "", "Garage"]);
    assert!(run_menu(&mut context).is_ok());
}
