//! Multi-step writes shared by the screens and the CLI commands.

use log::info;

use super::{Filter, RecordStore, StoreError, StoreResult};
use crate::model::{Angel, Attribute, Status, join_items};

/// Location of an angel whose bag is at the distribution site.
pub const ON_SITE: &str = "on_site";

/// Record the items still missing for an angel and put it on hold.
///
/// With nothing missing the angel is marked complete instead, which is the
/// one way to take an angel off hold. Either way the bag is on site.
pub async fn put_on_hold(
    store: &dyn RecordStore,
    id: &str,
    missing: &[String],
) -> StoreResult<Angel> {
    if !store.exists(id).await? {
        return Err(StoreError::NotFound(id.to_string()));
    }
    let status = if join_items(missing).is_empty() {
        Status::Complete
    } else {
        Status::Hold
    };

    store
        .update(id, Attribute::Missing, &join_items(missing))
        .await?;
    store.update(id, Attribute::Status, status.as_str()).await?;
    store.update(id, Attribute::Location, ON_SITE).await?;
    info!("Angel {} is now {} ({} missing)", id, status, missing.len());
    store.get(id).await
}

/// Up to `count` angels nobody has started on yet, lowest ids first.
pub async fn available(store: &dyn RecordStore, count: usize) -> StoreResult<Vec<Angel>> {
    store
        .query(&Filter::status(Status::NotStarted).with_limit(count))
        .await
}

/// Hand angels over to `requestee`: each goes OUT with the requestee
/// recorded as its location. Returns the updated angels.
pub async fn lend(
    store: &dyn RecordStore,
    ids: &[String],
    requestee: &str,
) -> StoreResult<Vec<Angel>> {
    let requestee = requestee.trim();
    if requestee.is_empty() {
        return Err(StoreError::MissingValue(Attribute::Location));
    }

    let mut lent = Vec::with_capacity(ids.len());
    for id in ids {
        store.update(id, Attribute::Location, requestee).await?;
        store.update(id, Attribute::Status, Status::Out.as_str()).await?;
        lent.push(store.get(id).await?);
    }
    info!("Lent {} angels to {}", lent.len(), requestee);
    Ok(lent)
}
