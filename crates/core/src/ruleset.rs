//! Ruleset reconciliation: prune stale `area:` rulesets, then converge the
//! platform onto the loaded area set.
//!
//! Pruning is best-effort — a failed list or delete is logged and skipped so
//! a permissions gap never blocks the sync phase. Create/update failures
//! during sync are fatal. The lookup-then-mutate sequence is not
//! transactional; a concurrent external mutator can still produce a
//! duplicate or lost update, which is accepted.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::Result;
use crate::payload::{build_payload, RulesetPayload, AREA_RULESET_PREFIX};
use crate::platform::RulesetStore;
use crate::schema::AreaDefinition;

/// Reconciles platform rulesets against the desired area set.
pub struct RulesetReconciler<'a> {
    store: &'a dyn RulesetStore,
    repository: String,
}

impl<'a> RulesetReconciler<'a> {
    /// `repository` is the `owner/repo` identifier carried in payloads.
    pub fn new(store: &'a dyn RulesetStore, repository: impl Into<String>) -> Self {
        Self {
            store,
            repository: repository.into(),
        }
    }

    /// Prune stale rulesets, then create or update one ruleset per area,
    /// in load order.
    pub async fn sync(&self, areas: &[AreaDefinition]) -> Result<()> {
        self.prune(areas).await;

        for area in areas {
            let payload = build_payload(area, &self.repository);
            self.create_or_update(&payload).await?;
        }

        Ok(())
    }

    /// Delete `area:`-named rulesets that no longer correspond to a loaded
    /// area. Never fatal: each failure is logged and skipped.
    async fn prune(&self, areas: &[AreaDefinition]) {
        let active: HashSet<String> = areas
            .iter()
            .map(|a| format!("{AREA_RULESET_PREFIX}{}", a.name))
            .collect();

        let existing = match self.store.list_rulesets().await {
            Ok(rulesets) => rulesets,
            Err(e) => {
                warn!(error = %e, "failed to list rulesets for stale cleanup, skipping prune");
                return;
            }
        };

        for ruleset in existing {
            if !ruleset.name.starts_with(AREA_RULESET_PREFIX) || active.contains(&ruleset.name) {
                continue;
            }
            info!(name = %ruleset.name, id = ruleset.id, "deleting stale ruleset");
            if let Err(e) = self.store.delete_ruleset(ruleset.id).await {
                warn!(name = %ruleset.name, id = ruleset.id, error = %e, "failed to delete stale ruleset");
            }
        }
    }

    /// Look up an existing ruleset by exact name; update it if found,
    /// create it otherwise. The list is re-fetched per call so rulesets
    /// created earlier in the same run are visible.
    async fn create_or_update(&self, payload: &RulesetPayload) -> Result<()> {
        let rulesets = self.store.list_rulesets().await?;

        match rulesets.iter().find(|r| r.name == payload.name) {
            Some(existing) => {
                self.store.update_ruleset(existing.id, payload).await?;
                info!(name = %payload.name, id = existing.id, "updated ruleset");
            }
            None => {
                self.store.create_ruleset(payload).await?;
                info!(name = %payload.name, "created ruleset");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AreaError;
    use crate::platform::PlatformRuleset;
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use std::sync::Mutex;

    fn area(name: &str) -> AreaDefinition {
        AreaDefinition {
            name: name.to_string(),
            description: None,
            file_patterns: vec![format!(".areas/{name}.yml")],
            reviewers: IndexMap::new(),
            bypass_rules: Vec::new(),
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Delete(u64),
        Create(String),
        Update(u64, String),
    }

    struct MockStore {
        rulesets: Mutex<Vec<PlatformRuleset>>,
        ops: Mutex<Vec<Op>>,
        fail_list: bool,
        fail_delete: bool,
        fail_create: bool,
    }

    impl MockStore {
        fn with_rulesets(rulesets: Vec<(u64, &str)>) -> Self {
            Self {
                rulesets: Mutex::new(
                    rulesets
                        .into_iter()
                        .map(|(id, name)| PlatformRuleset {
                            id,
                            name: name.to_string(),
                        })
                        .collect(),
                ),
                ops: Mutex::new(Vec::new()),
                fail_list: false,
                fail_delete: false,
                fail_create: false,
            }
        }
    }

    #[async_trait]
    impl RulesetStore for MockStore {
        async fn list_rulesets(&self) -> crate::error::Result<Vec<PlatformRuleset>> {
            if self.fail_list {
                return Err(AreaError::Platform("list denied".to_string()));
            }
            Ok(self.rulesets.lock().unwrap().clone())
        }

        async fn create_ruleset(&self, payload: &RulesetPayload) -> crate::error::Result<()> {
            if self.fail_create {
                return Err(AreaError::Platform("create denied".to_string()));
            }
            self.ops.lock().unwrap().push(Op::Create(payload.name.clone()));
            let mut rulesets = self.rulesets.lock().unwrap();
            let id = rulesets.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            rulesets.push(PlatformRuleset {
                id,
                name: payload.name.clone(),
            });
            Ok(())
        }

        async fn update_ruleset(
            &self,
            ruleset_id: u64,
            payload: &RulesetPayload,
        ) -> crate::error::Result<()> {
            self.ops
                .lock()
                .unwrap()
                .push(Op::Update(ruleset_id, payload.name.clone()));
            Ok(())
        }

        async fn delete_ruleset(&self, ruleset_id: u64) -> crate::error::Result<()> {
            if self.fail_delete {
                return Err(AreaError::Platform("delete denied".to_string()));
            }
            self.ops.lock().unwrap().push(Op::Delete(ruleset_id));
            self.rulesets.lock().unwrap().retain(|r| r.id != ruleset_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn prune_deletes_only_stale_area_rulesets() {
        let store = MockStore::with_rulesets(vec![
            (1, "area:docs"),
            (2, "area:stale"),
            (3, "unmanaged-rule"),
        ]);
        let areas = vec![area("docs")];

        RulesetReconciler::new(&store, "acme/widgets").sync(&areas).await.unwrap();

        let ops = store.ops.into_inner().unwrap();
        assert_eq!(ops, vec![Op::Delete(2), Op::Update(1, "area:docs".to_string())]);
    }

    #[tokio::test]
    async fn missing_ruleset_is_created() {
        let store = MockStore::with_rulesets(vec![(3, "unmanaged-rule")]);
        let areas = vec![area("docs")];

        RulesetReconciler::new(&store, "acme/widgets").sync(&areas).await.unwrap();

        let ops = store.ops.into_inner().unwrap();
        assert_eq!(ops, vec![Op::Create("area:docs".to_string())]);
    }

    #[tokio::test]
    async fn areas_are_synced_in_load_order() {
        let store = MockStore::with_rulesets(vec![(1, "area:beta")]);
        let areas = vec![area("beta"), area("alpha")];

        RulesetReconciler::new(&store, "acme/widgets").sync(&areas).await.unwrap();

        let ops = store.ops.into_inner().unwrap();
        assert_eq!(
            ops,
            vec![
                Op::Update(1, "area:beta".to_string()),
                Op::Create("area:alpha".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn list_failure_during_prune_is_not_fatal() {
        let mut store = MockStore::with_rulesets(vec![]);
        store.fail_list = true;
        let areas = vec![area("docs")];

        // prune is skipped, and the sync phase's list failure is fatal
        let err = RulesetReconciler::new(&store, "acme/widgets")
            .sync(&areas)
            .await
            .unwrap_err();
        assert!(matches!(err, AreaError::Platform(_)));
        assert!(store.ops.into_inner().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_failure_does_not_abort_the_run() {
        let mut store = MockStore::with_rulesets(vec![(2, "area:stale")]);
        store.fail_delete = true;
        let areas = vec![area("docs")];

        RulesetReconciler::new(&store, "acme/widgets").sync(&areas).await.unwrap();

        let ops = store.ops.into_inner().unwrap();
        assert_eq!(ops, vec![Op::Create("area:docs".to_string())]);
    }

    #[tokio::test]
    async fn create_failure_is_fatal() {
        let mut store = MockStore::with_rulesets(vec![]);
        store.fail_create = true;
        let areas = vec![area("docs")];

        let err = RulesetReconciler::new(&store, "acme/widgets")
            .sync(&areas)
            .await
            .unwrap_err();
        assert!(matches!(err, AreaError::Platform(_)));
    }

    #[tokio::test]
    async fn ruleset_created_earlier_in_the_run_is_visible_to_later_lookups() {
        let store = MockStore::with_rulesets(vec![]);
        // same name twice cannot happen through the loader, but the lookup
        // must see rulesets created by this same process
        let areas = vec![area("docs")];

        let reconciler = RulesetReconciler::new(&store, "acme/widgets");
        reconciler.sync(&areas).await.unwrap();
        reconciler.sync(&areas).await.unwrap();

        let ops = store.ops.into_inner().unwrap();
        assert_eq!(
            ops,
            vec![Op::Create("area:docs".to_string()), Op::Update(1, "area:docs".to_string())]
        );
    }
}
