//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoOrderStore`, an [`OrderStore`] backed by a single
//! `bookorders` collection.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! book-orders = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! - `_id` holds the order UUID as a string
//! - `createdAt` / `updatedAt` are BSON dates, so `$year` / `$month` can
//!   bucket them server-side
//! - `copies` is an `Int32`, `orderValue` an `Int64`
//! - `notes` is omitted when the order has none
//!
//! Sums and groupings run as aggregation pipelines. Sorting appends
//! `createdAt` then `_id` so paging stays stable across equal keys.

use crate::core::order::{BookOrder, NewOrder, OrderPatch, OrderStatus};
use crate::core::query::{OrderSort, SortField, SortOrder};
use crate::core::store::{
    GroupKey, GroupValue, NumericField, OrderFilter, OrderGroup, OrderStore, StoreError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database, IndexModel};
use uuid::Uuid;

const BACKEND: &str = "mongodb";

/// Collection holding every order
pub const COLLECTION: &str = "bookorders";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn bson_date(at: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn corrupted(message: impl Into<String>) -> StoreError {
    StoreError::Backend {
        backend: BACKEND,
        message: format!("corrupted order document: {}", message.into()),
    }
}

/// Convert an order into its stored document
fn order_to_document(order: &BookOrder) -> Document {
    let mut doc = doc! {
        "_id": uuid_bson(&order.id),
        "name": order.name.as_str(),
        "email": order.email.as_str(),
        "mobile": order.mobile.as_str(),
        "copies": order.copies as i32,
        "city": order.city.as_str(),
        "status": order.status.as_str(),
        "orderValue": order.order_value,
        "createdAt": bson_date(&order.created_at),
        "updatedAt": bson_date(&order.updated_at),
    };
    if let Some(notes) = &order.notes {
        doc.insert("notes", notes.as_str());
    }
    doc
}

/// Read an integer stored as any BSON numeric type
fn bson_to_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

fn get_text(doc: &Document, key: &str) -> Result<String, StoreError> {
    doc.get_str(key)
        .map(str::to_string)
        .map_err(|e| corrupted(format!("{}: {}", key, e)))
}

fn get_integer(doc: &Document, key: &str) -> Result<i64, StoreError> {
    doc.get(key)
        .and_then(bson_to_i64)
        .ok_or_else(|| corrupted(format!("{} is not an integer", key)))
}

fn get_date(doc: &Document, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let millis = doc
        .get_datetime(key)
        .map_err(|e| corrupted(format!("{}: {}", key, e)))?
        .timestamp_millis();
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| corrupted(format!("{} is out of range", key)))
}

/// Convert a stored document back into an order
fn document_to_order(doc: &Document) -> Result<BookOrder, StoreError> {
    let id = get_text(doc, "_id")?;
    let id = Uuid::parse_str(&id).map_err(|e| corrupted(format!("_id: {}", e)))?;

    let status = get_text(doc, "status")?;
    let status = OrderStatus::parse(&status)
        .ok_or_else(|| corrupted(format!("unknown status `{}`", status)))?;

    let copies = get_integer(doc, "copies")?;
    let copies = u32::try_from(copies).map_err(|_| corrupted("copies out of range"))?;

    let notes = match doc.get("notes") {
        None | Some(Bson::Null) => None,
        Some(_) => Some(get_text(doc, "notes")?),
    };

    Ok(BookOrder {
        id,
        name: get_text(doc, "name")?,
        email: get_text(doc, "email")?,
        mobile: get_text(doc, "mobile")?,
        copies,
        city: get_text(doc, "city")?,
        status,
        notes,
        order_value: get_integer(doc, "orderValue")?,
        created_at: get_date(doc, "createdAt")?,
        updated_at: get_date(doc, "updatedAt")?,
    })
}

/// Case-insensitive literal substring match
fn contains_ci(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// Translate a filter into a query document
fn filter_document(filter: &OrderFilter) -> Document {
    let mut clauses: Vec<Document> = Vec::new();

    if let Some(search) = &filter.search {
        let pattern = contains_ci(search);
        clauses.push(doc! {
            "$or": [
                { "name": pattern.clone() },
                { "email": pattern.clone() },
                { "city": pattern.clone() },
                { "mobile": pattern },
            ]
        });
    }

    if let Some(city) = &filter.city {
        clauses.push(doc! { "city": contains_ci(city) });
    }

    let mut window = Document::new();
    if let Some(from) = &filter.created_from {
        window.insert("$gte", bson_date(from));
    }
    if let Some(to) = &filter.created_to {
        window.insert("$lte", bson_date(to));
    }
    if !window.is_empty() {
        clauses.push(doc! { "createdAt": window });
    }

    match clauses.len() {
        0 => Document::new(),
        1 => clauses.remove(0),
        _ => doc! { "$and": clauses },
    }
}

fn sort_key(field: SortField) -> &'static str {
    match field {
        SortField::Id => "_id",
        other => other.as_str(),
    }
}

/// Translate a sort into a sort document.
///
/// Ties fall back to `createdAt` then `_id`, both ascending whatever the
/// requested direction, so equal keys list oldest first as in memory.
fn sort_document(sort: OrderSort) -> Document {
    let direction = match sort.order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };

    let mut doc = Document::new();
    doc.insert(sort_key(sort.field), direction);
    for key in ["createdAt", "_id"] {
        if !doc.contains_key(key) {
            doc.insert(key, 1);
        }
    }
    doc
}

fn numeric_path(field: NumericField) -> String {
    format!("${}", field.as_str())
}

fn group_id(key: GroupKey) -> Bson {
    match key {
        GroupKey::City => Bson::String("$city".to_string()),
        GroupKey::YearMonth => Bson::Document(doc! {
            "year": { "$year": "$createdAt" },
            "month": { "$month": "$createdAt" },
        }),
    }
}

fn group_from_document(key: GroupKey, doc: &Document) -> Result<OrderGroup, StoreError> {
    let value = match key {
        GroupKey::City => GroupValue::City(get_text(doc, "_id")?),
        GroupKey::YearMonth => {
            let id = doc
                .get_document("_id")
                .map_err(|e| corrupted(format!("group _id: {}", e)))?;
            let year = get_integer(id, "year")?;
            let month = get_integer(id, "month")?;
            GroupValue::Month {
                year: i32::try_from(year).map_err(|_| corrupted("year out of range"))?,
                month: u32::try_from(month).map_err(|_| corrupted("month out of range"))?,
            }
        }
    };

    Ok(OrderGroup {
        key: value,
        count: u64::try_from(get_integer(doc, "count")?)
            .map_err(|_| corrupted("count out of range"))?,
        sum: get_integer(doc, "sum")?,
    })
}

/// Build the `$set` / `$unset` update for a patch
fn update_document(patch: OrderPatch, now: &DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": bson_date(now) };
    let mut unset = Document::new();

    if let Some(name) = patch.name {
        set.insert("name", name);
    }
    if let Some(email) = patch.email {
        set.insert("email", email);
    }
    if let Some(mobile) = patch.mobile {
        set.insert("mobile", mobile);
    }
    if let Some(copies) = patch.copies {
        set.insert("copies", copies as i32);
    }
    if let Some(city) = patch.city {
        set.insert("city", city);
    }
    if let Some(status) = patch.status {
        set.insert("status", status.as_str());
    }
    match patch.notes {
        Some(Some(notes)) => {
            set.insert("notes", notes);
        }
        Some(None) => {
            unset.insert("notes", "");
        }
        None => {}
    }
    if let Some(order_value) = patch.order_value {
        set.insert("orderValue", order_value);
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

/// Classify a driver error
fn store_error(context: &str, err: mongodb::error::Error) -> StoreError {
    tracing::warn!(error = %err, "{}", context);

    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Unavailable {
            backend: BACKEND,
            message: format!("{}: {}", context, err),
        },
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == 11000 => {
            StoreError::Constraint(write.message.clone())
        }
        _ => StoreError::Backend {
            backend: BACKEND,
            message: format!("{}: {}", context, err),
        },
    }
}

// ---------------------------------------------------------------------------
// MongoOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use bookorders::storage::MongoOrderStore;
///
/// let store = MongoOrderStore::connect("mongodb://localhost:27017", "bookorders").await?;
/// let order = store.find_by_id(&id).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    database: Database,
}

impl MongoOrderStore {
    /// Create a store over an existing database handle
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to `uri`, use `database` and make sure the indexes exist
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| store_error("Failed to create MongoDB client", e))?;
        let store = Self::new(client.database(database));
        store.ensure_indexes().await?;
        tracing::info!(database, "connected to MongoDB");
        Ok(store)
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create the indexes used by listing, filtering and reporting:
    /// - `createdAt` descending (default sort, recent window, monthly buckets)
    /// - `email`
    /// - `city`
    /// - `status`
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
            IndexModel::builder().keys(doc! { "email": 1 }).build(),
            IndexModel::builder().keys(doc! { "city": 1 }).build(),
            IndexModel::builder().keys(doc! { "status": 1 }).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| store_error("Failed to create indexes on bookorders", e))?;

        Ok(())
    }

    /// Insert a fully formed order, keeping its id and timestamps
    pub async fn seed(&self, order: BookOrder) -> Result<(), StoreError> {
        self.collection()
            .insert_one(order_to_document(&order))
            .await
            .map_err(|e| store_error("Failed to seed order", e))?;
        Ok(())
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| store_error("Failed to run aggregation", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| store_error("Failed to collect aggregation results", e))
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, order: NewOrder) -> Result<BookOrder, StoreError> {
        let order = BookOrder::from_new(Uuid::new_v4(), order, Utc::now());
        let doc = order_to_document(&order);

        self.collection()
            .insert_one(&doc)
            .await
            .map_err(|e| store_error("Failed to insert order", e))?;
        tracing::debug!(order_id = %order.id, "order stored");

        // Timestamps come back at the stored millisecond precision
        document_to_order(&doc)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<BookOrder, StoreError> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| store_error("Failed to get order", e))?
            .ok_or(StoreError::NotFound { id: *id })?;

        document_to_order(&doc)
    }

    async fn update_by_id(&self, id: &Uuid, patch: OrderPatch) -> Result<BookOrder, StoreError> {
        let doc = self
            .collection()
            .find_one_and_update(doc! { "_id": uuid_bson(id) }, update_document(patch, &Utc::now()))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| store_error("Failed to update order", e))?
            .ok_or(StoreError::NotFound { id: *id })?;

        document_to_order(&doc)
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<(), StoreError> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| store_error("Failed to delete order", e))?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound { id: *id });
        }
        tracing::debug!(order_id = %id, "order removed");
        Ok(())
    }

    async fn query(
        &self,
        filter: &OrderFilter,
        sort: OrderSort,
        skip: usize,
        take: Option<usize>,
    ) -> Result<(Vec<BookOrder>, u64), StoreError> {
        let filter = filter_document(filter);

        let total = self
            .collection()
            .count_documents(filter.clone())
            .await
            .map_err(|e| store_error("Failed to count orders", e))?;

        let collection = self.collection();
        let mut find = collection
            .find(filter)
            .sort(sort_document(sort))
            .skip(skip as u64);
        if let Some(take) = take {
            find = find.limit(take as i64);
        }

        let docs: Vec<Document> = find
            .await
            .map_err(|e| store_error("Failed to query orders", e))?
            .try_collect()
            .await
            .map_err(|e| store_error("Failed to collect orders", e))?;

        let orders = docs
            .iter()
            .map(document_to_order)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((orders, total))
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        self.collection()
            .count_documents(doc! {})
            .await
            .map_err(|e| store_error("Failed to count orders", e))
    }

    async fn count_where(&self, filter: &OrderFilter) -> Result<u64, StoreError> {
        self.collection()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| store_error("Failed to count orders", e))
    }

    async fn sum(&self, field: NumericField) -> Result<i64, StoreError> {
        let results = self
            .aggregate(vec![doc! {
                "$group": { "_id": Bson::Null, "sum": { "$sum": numeric_path(field) } }
            }])
            .await?;

        match results.first() {
            Some(doc) => get_integer(doc, "sum"),
            None => Ok(0),
        }
    }

    async fn group_by(
        &self,
        key: GroupKey,
        sum: NumericField,
    ) -> Result<Vec<OrderGroup>, StoreError> {
        let results = self
            .aggregate(vec![doc! {
                "$group": {
                    "_id": group_id(key),
                    "count": { "$sum": 1 },
                    "sum": { "$sum": numeric_path(sum) },
                }
            }])
            .await?;

        results
            .iter()
            .map(|doc| group_from_document(key, doc))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| store_error("MongoDB ping failed", e))?;
        Ok(())
    }
}
