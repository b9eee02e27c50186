use std::fs;

use chrono::NaiveDate;
use jobdocs_core::{CoreError, ParseWarning};
use jobdocs_domain::{DocType, Document, JobId, Receipt};
use jobdocs_storage_csv::{
    apply_suffix, backup_originals, copy_logo, document_paths, new_receipts_path, quote_files,
    receipt_files, FolderListing, JobFolders, ReceiptLedger,
};
use tempfile::tempdir;

#[test]
fn job_ids_continue_from_folders_and_counter() {
    let dir = tempdir().expect("tempdir");
    let jobs = JobFolders::new(dir.path().join("ContractorJobs")).expect("jobs root");

    assert_eq!(jobs.next_job_id().unwrap().as_str(), "J0001");

    fs::create_dir(jobs.root().join("J0007 - Deck")).unwrap();
    assert_eq!(jobs.next_job_id().unwrap().as_str(), "J0008");

    fs::write(jobs.counter_path(), "41\n").unwrap();
    assert_eq!(jobs.next_job_id().unwrap().as_str(), "J0042");
    assert_eq!(fs::read_to_string(jobs.counter_path()).unwrap(), "42");
}

#[test]
fn exhausted_job_counter_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let jobs = JobFolders::new(dir.path()).expect("jobs root");
    fs::write(jobs.counter_path(), u32::MAX.to_string()).unwrap();

    assert!(matches!(jobs.next_job_id(), Err(CoreError::Storage(_))));
    assert_eq!(
        fs::read_to_string(jobs.counter_path()).unwrap(),
        u32::MAX.to_string()
    );
}

#[test]
fn job_folders_are_named_and_found_by_id() {
    let dir = tempdir().expect("tempdir");
    let jobs = JobFolders::new(dir.path()).expect("jobs root");
    let id = JobId::from_number(3);

    let named = jobs.job_folder(&id, Some("Bathroom Remodel")).unwrap();
    let bare = jobs.job_folder(&id, None).unwrap();
    jobs.job_folder(&JobId::from_number(4), Some("Other")).unwrap();

    assert!(named.ends_with("J0003 - Bathroom_Remodel"));
    assert!(bare.ends_with("J0003"));
    assert_eq!(jobs.find_job_folders(&id).unwrap(), vec![bare, named]);
    assert!(jobs
        .find_job_folders(&JobId::from_number(9))
        .unwrap()
        .is_empty());
}

#[test]
fn document_files_follow_the_naming_scheme() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
    let mut document = Document::new(DocType::Invoice, JobId::from_number(5), date);
    document.project_name = "Garage Door".into();

    let (csv, html) = document_paths(std::path::Path::new("/jobs/J0005"), &document);
    assert!(csv.ends_with("J0005_invoice_01-09-2025.csv"));
    assert!(html.ends_with("J0005_invoice_Garage_Door_01-09-2025.html"));
}

#[test]
fn listing_and_quote_files_read_the_folder() {
    let dir = tempdir().expect("tempdir");
    for name in [
        "J0001_quote_03-01-2025.csv",
        "J0001_quote_02-01-2025.csv",
        "J0001_quote_Deck_03-01-2025.html",
        "J0001_receipts.csv",
        "notes.txt",
    ] {
        fs::write(dir.path().join(name), "x").unwrap();
    }
    fs::create_dir(dir.path().join("photos")).unwrap();

    let listing = FolderListing::read(dir.path()).unwrap();
    assert_eq!(listing.quote_count(), 3);
    assert_eq!(listing.others, vec!["notes.txt"]);

    let quotes = quote_files(dir.path()).unwrap();
    assert_eq!(
        quotes,
        vec![
            dir.path().join("J0001_quote_02-01-2025.csv"),
            dir.path().join("J0001_quote_03-01-2025.csv"),
        ]
    );
}

#[test]
fn originals_are_backed_up_once() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("J0001_quote_03-01-2025.csv");
    let html = dir.path().join("J0001_quote_03-01-2025_print.html");
    fs::write(&csv, "first").unwrap();
    fs::write(&html, "<p>first</p>").unwrap();

    let report = backup_originals(&csv, None);
    assert_eq!(report.created.len(), 2);
    assert!(report.failures.is_empty());

    fs::write(&csv, "second").unwrap();
    let again = backup_originals(&csv, None);
    assert!(again.created.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("J0001_quote_03-01-2025_original.csv")).unwrap(),
        "first"
    );
    assert!(dir
        .path()
        .join("J0001_quote_03-01-2025_print_original.html")
        .exists());
}

#[test]
fn the_documents_own_page_is_backed_up_too() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("J0001_quote_03-01-2025.csv");
    let page = dir.path().join("J0001_quote_Deck_03-01-2025.html");
    fs::write(&csv, "data").unwrap();
    fs::write(&page, "<p>deck</p>").unwrap();

    let report = backup_originals(&csv, Some(&page));
    assert_eq!(
        report.created,
        vec![
            dir.path().join("J0001_quote_03-01-2025_original.csv"),
            dir.path().join("J0001_quote_Deck_03-01-2025_original.html"),
        ]
    );
    assert!(backup_originals(&csv, Some(&dir.path().join("absent.html")))
        .created
        .is_empty());
}

#[test]
fn suffixes_rename_files_in_place() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("J0001_quote_03-01-2025.csv");
    fs::write(&path, "x").unwrap();

    let renamed = apply_suffix(&path, "_revised");
    assert_eq!(renamed, dir.path().join("J0001_quote_03-01-2025_revised.csv"));
    assert!(renamed.exists());

    let missing = dir.path().join("gone.csv");
    assert_eq!(apply_suffix(&missing, "_new"), missing);
}

#[test]
fn logo_is_copied_once() {
    let dir = tempdir().expect("tempdir");
    let logo = dir.path().join("logo.png");
    let job = dir.path().join("J0001");
    fs::create_dir(&job).unwrap();
    fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();

    let copied = copy_logo(&logo, &job).unwrap();
    assert_eq!(copied, Some(job.join("logo.png")));
    assert!(copy_logo(&dir.path().join("absent.png"), &job).is_err());
}

#[test]
fn receipts_are_appended_and_reorganized() {
    let dir = tempdir().expect("tempdir");
    let id = JobId::from_number(2);
    let path = new_receipts_path(dir.path(), &id);
    assert!(path.ends_with("J0002_receipts.csv"));

    let ledger = ReceiptLedger::new(&path);
    ledger
        .append(&Receipt::new("J0002", "Lumber", "03-02-2025", 120.0))
        .unwrap();
    ledger
        .append(&Receipt::new("J0002", "Caulk", "someday", 6.5))
        .unwrap();
    ledger
        .append(&Receipt::new("J0002", "Drywall", "02-27-2025", 310.25))
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("JobID,Item,Date,Cost\r\n"));
    assert_eq!(text.matches("JobID").count(), 1);

    assert_eq!(ledger.reorganize().unwrap(), 3);
    let loaded = ledger.load().unwrap();
    assert!(loaded.warnings.is_empty());
    let items: Vec<&str> = loaded.receipts.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, vec!["Drywall", "Lumber", "Caulk"]);
    assert_eq!(loaded.receipts[0].cost, 310.25);

    assert_eq!(
        new_receipts_path(dir.path(), &id),
        dir.path().join("J0002_receipts_2.csv")
    );
    assert_eq!(receipt_files(dir.path(), &id).unwrap(), vec![path]);
}

#[test]
fn unreadable_receipt_rows_are_skipped_but_kept_on_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("J0003_receipts.csv");
    fs::write(
        &path,
        "JobID,Item,Date,Cost\r\nJ0003,Tape,01-05-2025,$4.00\r\nJ0003\r\n\r\nJ0003,Nails,01-04-2025,9\r\n",
    )
    .unwrap();
    let ledger = ReceiptLedger::new(&path);

    let loaded = ledger.load().unwrap();
    let rows: Vec<(&str, f64)> = loaded
        .receipts
        .iter()
        .map(|r| (r.item.as_str(), r.cost))
        .collect();
    assert_eq!(rows, vec![("Tape", 4.0), ("Nails", 9.0)]);
    assert!(matches!(
        loaded.warnings.as_slice(),
        [ParseWarning::SkippedRow { row: 3, .. }]
    ));

    ledger.reorganize().unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Tape"));
    assert!(text.find("Nails") < text.find("Tape"));
}

#[test]
fn receipt_with_unreadable_cost_is_kept_at_zero() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("J0003_receipts.csv");
    fs::write(
        &path,
        "JobID,Item,Date,Cost\r\nJ0003,Grout,01-02-2025,1\r\nJ0003,Sealer,01-03-2025,TBD\r\n",
    )
    .unwrap();

    let loaded = ReceiptLedger::new(&path).load().unwrap();
    assert_eq!(loaded.receipts.len(), 2);
    assert_eq!(loaded.receipts[1].item, "Sealer");
    assert_eq!(loaded.receipts[1].cost, 0.0);
    assert!(matches!(
        loaded.warnings.as_slice(),
        [ParseWarning::InvalidNumber { row: 3, field: "Cost", .. }]
    ));
}

#[test]
fn missing_receipts_file_loads_empty_with_warning() {
    let dir = tempdir().expect("tempdir");
    let loaded = ReceiptLedger::new(dir.path().join("none.csv")).load().unwrap();
    assert!(loaded.receipts.is_empty());
    assert!(matches!(
        loaded.warnings.as_slice(),
        [ParseWarning::MissingFile { .. }]
    ));
}
