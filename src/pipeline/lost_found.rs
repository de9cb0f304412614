// Lost-and-found board: posting, editing, claiming and archiving listings.
//
// Listings are never scored. A poster may change their own listings; an
// administrator may change any of them.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::db::models::{ItemEdit, ItemStatus, LostFoundItem, NewLostFoundItem};
use crate::db::queries::now_timestamp;
use crate::db::Database;

/// Who is asking to change a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(i64),
    Admin,
}

impl Actor {
    pub fn may_modify(&self, item: &LostFoundItem) -> bool {
        match self {
            Actor::Admin => true,
            Actor::User(user_id) => *user_id == item.user_id,
        }
    }
}

/// Validate and store a new listing.
pub async fn post_item(db: &Arc<dyn Database>, item: NewLostFoundItem) -> Result<LostFoundItem> {
    item.validate()?;
    let item_id = db.insert_item(&item).await?;
    info!(
        item_id,
        user_id = item.user_id,
        status = item.status.as_str(),
        category = item.category.as_str(),
        "Lost-and-found item posted"
    );
    match db.get_item(item_id).await? {
        Some(stored) => Ok(stored),
        None => anyhow::bail!("Item #{item_id} vanished after insert"),
    }
}

/// Replace a listing's editable fields.
pub async fn edit_item(
    db: &Arc<dyn Database>,
    item_id: i64,
    actor: Actor,
    edit: ItemEdit,
) -> Result<LostFoundItem> {
    let item = load_for_change(db, item_id, actor).await?;
    let updated = item.edited(edit)?;
    save(db, &updated).await?;
    info!(item_id, "Lost-and-found item edited");
    Ok(updated)
}

/// Move a listing to another live status, e.g. mark a found item claimed.
pub async fn change_item_status(
    db: &Arc<dyn Database>,
    item_id: i64,
    actor: Actor,
    status: ItemStatus,
) -> Result<LostFoundItem> {
    let item = load_for_change(db, item_id, actor).await?;
    let from = item.status;
    let updated = item.with_status(status)?;
    save(db, &updated).await?;
    info!(
        item_id,
        from = from.as_str(),
        to = status.as_str(),
        "Lost-and-found item status changed"
    );
    Ok(updated)
}

/// Take a listing off the public board.
pub async fn archive_item(
    db: &Arc<dyn Database>,
    item_id: i64,
    actor: Actor,
) -> Result<LostFoundItem> {
    let item = load_for_change(db, item_id, actor).await?;
    let updated = item.archived(now_timestamp())?;
    save(db, &updated).await?;
    info!(item_id, admin = (actor == Actor::Admin), "Lost-and-found item archived");
    Ok(updated)
}

async fn load_for_change(
    db: &Arc<dyn Database>,
    item_id: i64,
    actor: Actor,
) -> Result<LostFoundItem> {
    let Some(item) = db.get_item(item_id).await? else {
        anyhow::bail!("Item #{item_id} not found");
    };
    if !actor.may_modify(&item) {
        warn!(item_id, ?actor, owner = item.user_id, "Refused change to another user's item");
        anyhow::bail!("Item #{item_id} belongs to another user");
    }
    Ok(item)
}

async fn save(db: &Arc<dyn Database>, item: &LostFoundItem) -> Result<()> {
    if !db.update_item(item).await? {
        anyhow::bail!("Item #{} not found", item.id);
    }
    Ok(())
}
