//! CSV ingestion - The only write path into the sale records table.
//!
//! Loading happens in two phases. First every row of the source is validated into a
//! typed [`product_sale::Model`]; nothing touches the database until the whole file
//! parses. Then the records are inserted one by one inside a single database
//! transaction. The first malformed row or duplicate `id` aborts the batch, and the
//! transaction is rolled back so no rows are committed.

use crate::{
    entities::{ProductSale, product_sale},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use tracing::{debug, info, instrument};

/// Date format used by the source feed, e.g. `14-03-2025`.
pub const SOURCE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Column headers the source feed must provide.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "id",
    "date",
    "name",
    "category",
    "price",
    "quantity",
    "total sales",
    "customer name",
    "customer location",
    "payment method",
    "status",
];

/// Outcome of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Always `"products loaded"` on success
    pub status: String,
    /// Number of records committed
    pub rows_loaded: u64,
}

/// One row as it appears in the source file.
#[derive(Debug, Deserialize)]
struct SourceRow {
    id: String,
    date: String,
    name: String,
    category: String,
    price: f64,
    quantity: i32,
    #[serde(rename = "total sales")]
    total_sales: i64,
    #[serde(rename = "customer name")]
    customer_name: String,
    #[serde(rename = "customer location")]
    customer_location: String,
    #[serde(rename = "payment method")]
    payment_method: String,
    status: String,
}

impl SourceRow {
    fn into_record(self, line: u64) -> Result<product_sale::Model> {
        let parse_err = |message: String| Error::Parse { line, message };

        if self.id.is_empty() {
            return Err(parse_err("id is empty".to_string()));
        }
        if self.name.is_empty() {
            return Err(parse_err("name is empty".to_string()));
        }
        let date = NaiveDate::parse_from_str(&self.date, SOURCE_DATE_FORMAT).map_err(|e| {
            parse_err(format!(
                "invalid date '{}', expected DD-MM-YYYY: {e}",
                self.date
            ))
        })?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(parse_err(format!("invalid price {}", self.price)));
        }
        if self.quantity < 0 {
            return Err(parse_err(format!("negative quantity {}", self.quantity)));
        }
        if self.total_sales < 0 {
            return Err(parse_err(format!(
                "negative total sales {}",
                self.total_sales
            )));
        }

        Ok(product_sale::Model {
            id: self.id,
            date,
            name: self.name,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            total_sales: self.total_sales,
            customer_name: self.customer_name,
            customer_location: self.customer_location,
            payment_method: self.payment_method,
            status: self.status,
        })
    }
}

/// Parses and validates a whole CSV document into sale records.
///
/// # Errors
/// Returns `Error::Parse` naming the offending line for a missing column, an
/// unreadable row, a bad date or a non-numeric or negative number. Returns
/// `Error::DuplicateKey` if the same `id` appears twice in the document.
pub fn parse_sales_csv(data: &[u8]) -> Result<Vec<product_sale::Model>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| Error::Parse {
            line: 1,
            message: format!("unreadable header: {e}"),
        })?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(Error::Parse {
            line: 1,
            message: format!("missing column '{missing}'"),
        });
    }

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| Error::Parse {
            line: e.position().map_or(0, csv::Position::line),
            message: e.to_string(),
        })?;
        let line = row.position().map_or(0, csv::Position::line);
        let source: SourceRow = row.deserialize(Some(&headers)).map_err(|e| Error::Parse {
            line,
            message: e.to_string(),
        })?;
        let record = source.into_record(line)?;

        if !seen.insert(record.id.clone()) {
            return Err(Error::DuplicateKey { id: record.id });
        }
        records.push(record);
    }

    debug!("Validated {} rows", records.len());
    Ok(records)
}

/// Inserts validated records in one transaction.
///
/// An `id` that already exists in the store fails the whole batch with
/// `Error::DuplicateKey`; nothing is committed in that case.
///
/// # Errors
/// Returns `Error::DuplicateKey` on a collision and `Error::Database` if the store fails.
#[instrument(skip(db, records), fields(rows = records.len()))]
pub async fn insert_sales<C>(db: &C, records: Vec<product_sale::Model>) -> Result<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut inserted = 0;

    for record in records {
        if ProductSale::find_by_id(record.id.clone())
            .one(&txn)
            .await?
            .is_some()
        {
            // Dropping `txn` rolls back everything inserted so far.
            return Err(Error::DuplicateKey { id: record.id });
        }

        let row = product_sale::ActiveModel {
            id: Set(record.id),
            date: Set(record.date),
            name: Set(record.name),
            category: Set(record.category),
            price: Set(record.price),
            quantity: Set(record.quantity),
            total_sales: Set(record.total_sales),
            customer_name: Set(record.customer_name),
            customer_location: Set(record.customer_location),
            payment_method: Set(record.payment_method),
            status: Set(record.status),
        };
        ProductSale::insert(row).exec_without_returning(&txn).await?;
        inserted += 1;
    }

    txn.commit().await?;
    Ok(inserted)
}

/// Validates and loads a CSV document held in memory.
///
/// # Errors
/// See [`parse_sales_csv`] and [`insert_sales`].
pub async fn ingest_csv<C>(db: &C, data: &[u8]) -> Result<IngestSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let records = parse_sales_csv(data)?;
    let rows_loaded = insert_sales(db, records).await?;
    info!("Loaded {} sale records", rows_loaded);

    Ok(IngestSummary {
        status: "products loaded".to_string(),
        rows_loaded,
    })
}

/// Reads the CSV file at `path` and loads it into the store.
///
/// Not idempotent: running it twice against the same file fails the second time
/// with `Error::DuplicateKey`.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read, otherwise see [`ingest_csv`].
#[instrument(skip(db))]
pub async fn ingest_csv_file<C>(db: &C, path: &Path) -> Result<IngestSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let data = tokio::fs::read(path).await?;
    debug!("Read {} bytes from {:?}", data.len(), path);
    ingest_csv(db, &data).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::product::list_all_products;
    use crate::test_utils::*;

    const HEADER: &str = "id,date,name,category,price,quantity,total sales,customer name,customer location,payment method,status";

    fn csv_of(rows: &[&str]) -> Vec<u8> {
        let mut doc = String::from(HEADER);
        for row in rows {
            doc.push('\n');
            doc.push_str(row);
        }
        doc.push('\n');
        doc.into_bytes()
    }

    #[test]
    fn test_parse_valid_rows() {
        let data = csv_of(&[
            "1001,14-03-2025,Smartphone,Electronics,699.5,2,1399,Ava Stone,Paris,Credit Card,Completed",
            "1002, 01-12-2025 ,Jeans,Clothing,40,3,120,Ben Ode,Lyon,PayPal,Pending",
        ]);

        let records = parse_sales_csv(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1001");
        assert_eq!(records[0].date, date(2025, 3, 14));
        assert_eq!(records[0].price, 699.5);
        assert_eq!(records[0].total_sales, 1399);
        assert_eq!(records[0].customer_location, "Paris");
        assert_eq!(records[1].date, date(2025, 12, 1));
        assert_eq!(records[1].payment_method, "PayPal");
    }

    #[test]
    fn test_parse_rejects_iso_date() {
        let data = csv_of(&[
            "1,14-03-2025,A,Books,1,1,1,X,Y,Cash,Completed",
            "2,2025-03-14,B,Books,1,1,1,X,Y,Cash,Completed",
        ]);

        let err = parse_sales_csv(&data).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_rejects_non_numeric_price() {
        let data = csv_of(&["1,14-03-2025,A,Books,cheap,1,1,X,Y,Cash,Completed"]);
        assert!(matches!(
            parse_sales_csv(&data),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_negative_quantity() {
        let data = csv_of(&["1,14-03-2025,A,Books,5,-1,1,X,Y,Cash,Completed"]);
        assert!(matches!(parse_sales_csv(&data), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_column() {
        let data = b"id,date,name\n1,14-03-2025,A\n";
        let err = parse_sales_csv(data).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_parse_rejects_repeated_id() {
        let data = csv_of(&[
            "7,14-03-2025,A,Books,1,1,1,X,Y,Cash,Completed",
            "7,15-03-2025,B,Books,1,1,1,X,Y,Cash,Completed",
        ]);
        assert!(matches!(
            parse_sales_csv(&data),
            Err(Error::DuplicateKey { id }) if id == "7"
        ));
    }

    #[tokio::test]
    async fn test_ingest_csv_loads_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let data = csv_of(&[
            "1,14-03-2025,A,Books,10,1,10,X,Y,Cash,Completed",
            "2,15-03-2025,B,Toys,20,2,40,Z,Y,Cash,Completed",
        ]);

        let summary = ingest_csv(&db, &data).await?;
        assert_eq!(summary.status, "products loaded");
        assert_eq!(summary.rows_loaded, 2);
        assert_eq!(list_all_products(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_row_commits_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let data = csv_of(&[
            "1,14-03-2025,A,Books,10,1,10,X,Y,Cash,Completed",
            "2,not-a-date,B,Toys,20,2,40,Z,Y,Cash,Completed",
            "3,16-03-2025,C,Toys,20,2,40,Z,Y,Cash,Completed",
        ]);

        let result = ingest_csv(&db, &data).await;
        assert!(matches!(result, Err(Error::Parse { line: 3, .. })));
        assert!(list_all_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reingest_fails_on_duplicate_and_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        seed_sales(&db, vec![test_sale("2")]).await?;

        let data = csv_of(&[
            "1,14-03-2025,A,Books,10,1,10,X,Y,Cash,Completed",
            "2,15-03-2025,B,Toys,20,2,40,Z,Y,Cash,Completed",
        ]);
        let result = ingest_csv(&db, &data).await;
        assert!(matches!(result, Err(Error::DuplicateKey { id }) if id == "2"));

        let stored = list_all_products(&db).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "2");
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_csv_file_reads_from_disk() -> Result<()> {
        let db = setup_test_db().await?;
        let path = std::env::temp_dir().join(format!(
            "sales-analytics-ingest-{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            csv_of(&["1,14-03-2025,A,Books,10,1,10,X,Y,Cash,Completed"]),
        )?;

        let summary = ingest_csv_file(&db, &path).await;
        std::fs::remove_file(&path)?;
        assert_eq!(summary?.rows_loaded, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_csv_file_missing_is_io_error() -> Result<()> {
        let db = setup_test_db().await?;
        let result = ingest_csv_file(&db, Path::new("no/such/feed.csv")).await;
        assert!(matches!(result, Err(Error::Io(_))));
        Ok(())
    }
}
