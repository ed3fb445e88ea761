pub mod error;
pub mod storage;

pub use error::{StoreError, StoreResult};
pub use storage::{get_data_path, JsonStore, TripDocument, FORMAT_VERSION};

use crate::records::{Record, TripRecords};

/// Read access to stored activity records, one kind at a time.
pub trait RecordStore {
    fn read_all<R: Record>(&self) -> StoreResult<Vec<R>>;
}

/// Materialize every activity collection, one read per kind.
pub fn load_records<S: RecordStore>(store: &S) -> StoreResult<TripRecords> {
    Ok(TripRecords {
        rules: store.read_all()?,
        inquiries: store.read_all()?,
        bets: store.read_all()?,
        drinks: store.read_all()?,
        side_bets: store.read_all()?,
        mvp_votes: store.read_all()?,
        quotes: store.read_all()?,
        photos: store.read_all()?,
    })
}

/// An in-memory snapshot is a store too.
impl RecordStore for TripRecords {
    fn read_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        Ok(R::collection(self).to_vec())
    }
}
