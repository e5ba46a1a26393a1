use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::UserSummary;
use crate::error::RepoError;
use crate::ports::UserRepository;

/// User summaries resolved in one batch, keyed by ID.
pub(crate) struct Directory {
    entries: HashMap<Uuid, UserSummary>,
}

impl Directory {
    /// Resolve every distinct ID with a single repository call.
    pub(crate) async fn load(
        users: &dyn UserRepository,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<Self, RepoError> {
        let wanted: Vec<Uuid> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        if wanted.is_empty() {
            return Ok(Self {
                entries: HashMap::new(),
            });
        }

        let entries = users
            .find_many(&wanted)
            .await?
            .into_iter()
            .map(|user| (user.id, user.summary()))
            .collect();

        Ok(Self { entries })
    }

    pub(crate) fn get(&self, id: Uuid) -> UserSummary {
        self.entries
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UserSummary::unknown(id))
    }
}
