//! Flat, sorted listing of the classes and methods in an index.

use std::collections::BTreeSet;

use crate::storage::Index;

/// Prefix marking class entries in the catalog.
pub const CLASS_PREFIX: &str = "class:";

/// `class:<Name>` for every class and `<Class>.<method>` for every method
/// with a known enclosing class. Sorted, without duplicates.
pub fn catalog(index: &Index) -> Vec<String> {
    let mut entries = BTreeSet::new();
    for record in index.files.values() {
        for class in &record.classes {
            entries.insert(format!("{CLASS_PREFIX}{class}"));
        }
        for method in record.methods.iter().filter(|m| m.class.is_some()) {
            entries.insert(method.qualified_name());
        }
    }
    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::extract;
    use crate::storage::FileRecord;

    #[test]
    fn test_catalog_entries() {
        let mut index = Index::new("/p");
        for (path, source) in [
            ("B.cs", "class Beta { Beta(){ } void Run(){ } }"),
            ("A.cs", "class Alpha { void Run(){ } void Run(int x){ } }"),
            ("A2.cs", "class Alpha { void Stop(){ } }"),
        ] {
            index.insert(path.to_string(), FileRecord::from_extraction(source, extract(source)));
        }

        assert_eq!(
            catalog(&index),
            vec![
                "Alpha.Run",
                "Alpha.Stop",
                "Beta.Run",
                "class:Alpha",
                "class:Beta",
            ]
        );
    }

    #[test]
    fn test_empty_catalog() {
        assert!(catalog(&Index::new("/p")).is_empty());
    }
}
