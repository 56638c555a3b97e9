//! Scan, persist and query a small C# tree through the library API.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use codevision::{
    IndexPersistence, ProjectIndexer, RelevantCode, Retriever, Settings, StorageError, TargetKind,
    catalog,
};
use tempfile::TempDir;

fn indexer() -> ProjectIndexer {
    let mut settings = Settings::default();
    settings.indexing.parallel_threads = 2;
    ProjectIndexer::new(Arc::new(settings))
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

#[test]
fn test_two_file_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    write(&root, "A.cs", "class A { void Foo(){ Bar(); } }");
    write(&root, "B.cs", "class B { void Bar(){ if(true){} } }");

    let persistence = IndexPersistence::new(temp_dir.path().join("index"));
    let report = indexer().scan_and_save(&root, &persistence).unwrap();
    assert_eq!(report.files_indexed, 2);

    let index = persistence.load().unwrap();
    let retriever = Retriever::new(&index);

    let RelevantCode::Found(bundle) = retriever.relevant_code("Foo", TargetKind::Method) else {
        panic!("Foo should be found");
    };
    assert_eq!(bundle.files, vec!["A.cs"]);
    assert!(bundle.source.contains("// File: A.cs"));
    assert!(bundle.source.contains("void Foo()"));
    assert!(!bundle.source.contains("class B"));
    assert_eq!(bundle.related, BTreeSet::from(["Bar".to_string()]));

    assert_eq!(index.files["B.cs"].complexity.per_method["B.Bar"], 2);
    assert_eq!(
        catalog(&index),
        vec!["A.Foo", "B.Bar", "class:A", "class:B"]
    );
}

#[test]
fn test_rescan_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    write(
        &root,
        "Orders/OrderService.cs",
        r#"
using System;
using System.Linq;

namespace Shop.Orders
{
    public class OrderService : IOrderService
    {
        private readonly int _limit = 10;
        public string Name { get; set; }

        public decimal Total(int[] items)
        {
            decimal sum = 0;
            foreach (var item in items)
            {
                if (item > _limit && item < 100) { sum += item; }
                else { sum -= 1; }
            }
            return sum > 0 ? sum : Normalize(sum);
        }

        private decimal Normalize(decimal value) => Math.Abs(value);
    }
}
"#,
    );
    write(&root, "Program.cs", "class Program { static void Main(){ new OrderService().Total(null); } }");

    let persistence = IndexPersistence::new(temp_dir.path().join("index"));
    indexer().scan_and_save(&root, &persistence).unwrap();
    let first = fs::read(persistence.index_file()).unwrap();
    indexer().scan_and_save(&root, &persistence).unwrap();
    let second = fs::read(persistence.index_file()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_cycle_closure() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "Cycle.cs",
        "class Cycle { void A(){ B(); } void B(){ C(); } void C(){ A(); } }",
    );

    let index = indexer().scan(root).unwrap().index;
    let related = Retriever::new(&index).related_symbols("A");
    assert_eq!(related, BTreeSet::from(["B".to_string(), "C".to_string()]));
}

#[test]
fn test_ambiguous_class_unions_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Billing/Handler.cs", "class Handler { public void Run(){ Charge(); } }");
    write(root, "Shipping/Handler.cs", "class Handler { public void Run(){ Ship(); } }");

    let index = indexer().scan(root).unwrap().index;
    let retriever = Retriever::new(&index);

    let RelevantCode::Found(bundle) = retriever.relevant_code("Handler", TargetKind::Class) else {
        panic!("Handler should be found");
    };
    assert_eq!(
        bundle.files,
        vec!["Billing/Handler.cs", "Shipping/Handler.cs"]
    );
    assert!(bundle.source.contains("Charge()"));
    assert!(bundle.source.contains("Ship()"));

    // Method lookup unions both declarations too
    let RelevantCode::Found(bundle) = retriever.relevant_code("run", TargetKind::Method) else {
        panic!("Run should be found");
    };
    assert_eq!(bundle.files.len(), 2);
    assert_eq!(
        bundle.related,
        BTreeSet::from(["Charge".to_string(), "Ship".to_string()])
    );
}

#[test]
fn test_not_found_is_distinct() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Leaf.cs", "class Leaf { void Alone(){ } }");

    let index = indexer().scan(root).unwrap().index;
    let retriever = Retriever::new(&index);

    assert_eq!(
        retriever.relevant_code("Ghost", TargetKind::Method),
        RelevantCode::NotFound
    );
    assert!(matches!(
        retriever.relevant_code("Alone", TargetKind::Method),
        RelevantCode::Found(ref bundle) if bundle.related.is_empty()
    ));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Good.cs", "class Good { void Run(){ } }");
    fs::write(root.join("Latin1.cs"), b"class Caf\xe9 { }").unwrap();

    let report = indexer().scan(root).unwrap();
    assert_eq!(report.files_indexed, 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].message.contains("UTF-8"));
}

#[test]
fn test_unbalanced_method_still_listed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Broken.cs", "class Broken { void Good(){ } void Half(){ if (x) { ");

    let index = indexer().scan(root).unwrap().index;
    let record = &index.files["Broken.cs"];
    assert!(record.declares_method("Half"));
    assert_eq!(record.complexity.per_method["Broken.Half"], 1);
}

#[test]
fn test_corrupt_index_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    write(&root, "A.cs", "class A { void Foo(){ Bar(); } }");

    let persistence = IndexPersistence::new(temp_dir.path().join("index"));
    indexer().scan_and_save(&root, &persistence).unwrap();

    let full = fs::read_to_string(persistence.index_file()).unwrap();
    fs::write(persistence.index_file(), &full[..full.len() / 3]).unwrap();

    assert!(matches!(
        persistence.load(),
        Err(StorageError::Corrupt { .. })
    ));
}
