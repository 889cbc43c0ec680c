//! Customer registry loading from CSV.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::RegistryError;
use crate::models::customer::Customer;

/// Load the customer registry.
///
/// The file must carry a header row with `id`, `name` and `emails` columns;
/// `emails` is a `;`-separated list. Any unreadable file or malformed row is
/// fatal: no partial registry is usable for matching.
pub fn load_registry(path: &Path) -> Result<Vec<Customer>, RegistryError> {
    let file = File::open(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut customers = Vec::new();

    for (idx, record) in reader.deserialize::<Customer>().enumerate() {
        // Row 1 is the header.
        let row = idx + 2;
        let customer = record.map_err(|e| RegistryError::Row {
            row,
            reason: e.to_string(),
        })?;
        validate(&customer, row)?;
        customers.push(customer);
    }

    info!("loaded {} customers from {}", customers.len(), path.display());
    Ok(customers)
}

fn validate(customer: &Customer, row: usize) -> Result<(), RegistryError> {
    if customer.id.trim().is_empty() {
        return Err(RegistryError::MissingField { row, field: "id" });
    }
    if customer.name.trim().is_empty() {
        return Err(RegistryError::MissingField { row, field: "name" });
    }
    if customer.emails.is_empty() {
        return Err(RegistryError::MissingField { row, field: "emails" });
    }
    Ok(())
}

/// First registry record whose id equals the extracted identifier.
///
/// The registry is not assumed sorted or deduplicated; first match wins.
pub fn find_by_id<'a>(customers: &'a [Customer], id: &str) -> Option<&'a Customer> {
    customers.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_valid_registry() {
        let (_dir, path) = write_csv(
            "id,name,emails\n\
             123.456.789-01,Acme Ltda,billing@acme.com;fin@acme.com\n\
             11.222.333/0001-44,Beta SA,beta@beta.com\n",
        );

        let customers = load_registry(&path).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].id, "123.456.789-01");
        assert_eq!(
            customers[0].emails,
            vec!["billing@acme.com".to_string(), "fin@acme.com".to_string()]
        );
    }

    #[test]
    fn blank_id_fails_with_named_field() {
        let (_dir, path) = write_csv("id,name,emails\n ,Acme,x@y.com\n");
        let err = load_registry(&path).unwrap_err();
        match err {
            RegistryError::MissingField { row, field } => {
                assert_eq!(row, 2);
                assert_eq!(field, "id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_email_list_fails_with_named_field() {
        let (_dir, path) = write_csv("id,name,emails\n123.456.789-01,Acme,; ;\n");
        let err = load_registry(&path).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingField { field: "emails", .. }
        ));
    }

    #[test]
    fn missing_column_fails_as_malformed_row() {
        let (_dir, path) = write_csv("id,name\n123.456.789-01,Acme\n");
        let err = load_registry(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Row { .. }));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = load_registry(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, RegistryError::Read { .. }));
    }

    #[test]
    fn first_match_wins_on_duplicate_ids() {
        let customers = vec![
            Customer {
                id: "1".into(),
                name: "first".into(),
                emails: vec!["a@a".into()],
            },
            Customer {
                id: "1".into(),
                name: "second".into(),
                emails: vec!["b@b".into()],
            },
        ];
        assert_eq!(find_by_id(&customers, "1").unwrap().name, "first");
        assert!(find_by_id(&customers, "2").is_none());
    }
}
