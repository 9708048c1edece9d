//! Reconciliation engine - fetch, compare and apply with bounded parallelism
//!
//! Each resource goes through one cycle per batch:
//!
//! 1. take the per-identity token so no other cycle touches the same resource
//! 2. fetch the observed state from the provider
//! 3. [`plan`] the single corrective action
//! 4. make at most one mutating provider call
//!
//! Every provider call runs under `call_timeout`. A call that does not return
//! in time yields [`Outcome::Degraded`]; the abandoned call keeps the identity
//! token until it really returns.

use crate::context::{NoProgress, ProgressCallback};
use crate::diff::{Action, Disposition, plan};
use crate::error::{DesiredStateError, ProviderError};
use crate::instance::{DesiredResource, Instance};
use crate::lock::{IdentityGuard, IdentityLocks};
use crate::provider::{Provider, ProviderSet};
use crate::schema::SchemaRegistry;
use crate::types::{Outcome, ReconcileOptions, ReconcileReport, Rejection, ResourceReport};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Drives desired state onto the host through providers
pub struct Reconciler {
    registry: Arc<SchemaRegistry>,
    providers: ProviderSet,
    options: ReconcileOptions,
    locks: Arc<IdentityLocks>,
}

impl Reconciler {
    pub fn new(registry: Arc<SchemaRegistry>, providers: ProviderSet) -> Self {
        Self {
            registry,
            providers,
            options: ReconcileOptions::default(),
            locks: IdentityLocks::new(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Wait for provider calls abandoned after a timeout to return
    ///
    /// Those calls run outside the `jobs` limit and may still change the host
    /// after a batch returns. Returns `false` if any is still running after
    /// `wait`.
    pub fn wait_idle(&self, wait: Duration) -> bool {
        self.locks.wait_idle(wait)
    }

    /// Validate declarations into instances
    ///
    /// Nothing rejected here ever reaches a provider. A resource declared
    /// twice keeps its first valid declaration; an invalid one does not claim
    /// the identity.
    pub fn prepare(&self, desired: &[DesiredResource]) -> (Vec<Instance>, Vec<Rejection>) {
        let mut seen = HashSet::new();
        let mut instances = Vec::with_capacity(desired.len());
        let mut rejected = Vec::new();

        for item in desired {
            let reject = |error: DesiredStateError| {
                log::warn!("Rejected {} {}: {error}", item.type_name, item.identity);
                Rejection {
                    type_name: item.type_name.clone(),
                    identity: item.identity.clone(),
                    error,
                }
            };

            let instance = match item.resolve(&self.registry) {
                Ok(instance) => instance,
                Err(error) => {
                    rejected.push(reject(error));
                    continue;
                }
            };

            if seen.insert((item.type_name.as_str(), item.identity.as_str())) {
                instances.push(instance);
            } else {
                rejected.push(reject(DesiredStateError::Duplicate {
                    type_name: item.type_name.clone(),
                    identity: item.identity.clone(),
                }));
            }
        }

        (instances, rejected)
    }

    /// Reconcile a batch without progress reporting
    pub fn reconcile_batch(&self, desired: &[DesiredResource]) -> ReconcileReport {
        self.reconcile_batch_with_progress(desired, &NoProgress)
    }

    /// Reconcile a batch, reporting each cycle to `progress`
    ///
    /// Always returns a report: one resource's failure never stops the others.
    pub fn reconcile_batch_with_progress<P: ProgressCallback>(
        &self,
        desired: &[DesiredResource],
        progress: &P,
    ) -> ReconcileReport {
        let (instances, rejected) = self.prepare(desired);

        progress.on_batch_start(instances.len());
        let resources = self.run_cycles(&instances, progress);
        let report = ReconcileReport {
            resources,
            rejected,
        };
        progress.on_batch_complete(&report.summary());

        report
    }

    /// Run one cycle per instance, `jobs` at a time, keeping input order
    pub(crate) fn run_cycles<P: ProgressCallback>(
        &self,
        instances: &[Instance],
        progress: &P,
    ) -> Vec<ResourceReport> {
        let run = |instance: &Instance| {
            progress.on_resource_start(instance.type_name(), instance.identity());
            let report = self.reconcile(instance);
            progress.on_resource_complete(&report);
            report
        };

        if self.options.jobs <= 1 || instances.len() <= 1 {
            return instances.iter().map(&run).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
        {
            Ok(pool) => pool.install(|| instances.par_iter().map(&run).collect()),
            Err(e) => {
                log::warn!("Failed to create reconcile thread pool, running sequentially: {e}");
                instances.iter().map(&run).collect()
            }
        }
    }

    /// Run one reconciliation cycle for a desired instance
    pub fn reconcile(&self, desired: &Instance) -> ResourceReport {
        let type_name = desired.type_name();
        let identity = desired.identity();
        let report = |outcome: Outcome| ResourceReport::new(type_name, identity, outcome);

        let Some(guard) = self
            .locks
            .acquire(type_name, identity, self.options.lock_wait)
        else {
            log::warn!("Gave up waiting for running cycle of {type_name} {identity}");
            return report(Outcome::Degraded)
                .with_detail("another reconciliation of this resource is still running");
        };
        let guard = Arc::new(guard);

        let provider = match self.providers.get(type_name) {
            Ok(provider) => provider,
            Err(e) => {
                log::warn!("Cannot reconcile {type_name} {identity}: {e}");
                return report(Outcome::Degraded).with_detail(e.to_string());
            }
        };

        log::debug!("Fetching {type_name} {identity}");
        let fetched = {
            let provider = Arc::clone(&provider);
            let schema = Arc::clone(desired.schema());
            let id = identity.to_string();
            self.call(&guard, move || provider.fetch(&schema, &id))
        };
        let observed = match fetched {
            Ok(observed) => observed,
            Err(e) => {
                log::warn!("Could not fetch {type_name} {identity}: {e}");
                return report(Outcome::Degraded).with_detail(format!("fetch failed: {e}"));
            }
        };

        let action = match plan(desired, observed.as_ref()) {
            Disposition::InSync => {
                log::debug!("{type_name} {identity} is in sync");
                return report(Outcome::InSync);
            }
            Disposition::Apply(action) => action,
        };

        if self.options.dry_run {
            log::debug!("Dry run: would {} {type_name} {identity}", action.verb());
            return report(Outcome::Skipped)
                .with_action(action)
                .with_detail("dry run");
        }

        match self.apply(&guard, provider, desired, &action) {
            Ok(()) => {
                log::info!("Applied {} to {type_name} {identity}", action.verb());
                report(Outcome::Applied).with_action(action)
            }
            Err(e) if e.is_indeterminate() => {
                log::warn!("Could not {} {type_name} {identity}: {e}", action.verb());
                report(Outcome::Degraded)
                    .with_action(action)
                    .with_detail(e.to_string())
            }
            Err(e) => {
                log::warn!("Failed to {} {type_name} {identity}: {e}", action.verb());
                report(Outcome::Failed)
                    .with_action(action)
                    .with_detail(e.to_string())
            }
        }
    }

    fn apply(
        &self,
        guard: &Arc<IdentityGuard>,
        provider: Arc<dyn Provider>,
        desired: &Instance,
        action: &Action,
    ) -> Result<(), ProviderError> {
        let schema = Arc::clone(desired.schema());
        let identity = desired.identity().to_string();

        match action {
            Action::Create => {
                let desired = desired.clone();
                self.call(guard, move || provider.create(&schema, &desired))
            }
            Action::Update { changes } => {
                let changes = changes.clone();
                self.call(guard, move || provider.update(&schema, &identity, &changes))
            }
            Action::Destroy => self.call(guard, move || provider.destroy(&schema, &identity)),
        }
    }

    /// Run a provider call, bounded by `call_timeout`
    ///
    /// The helper thread owns a clone of the identity token and drops it only
    /// once the call has returned. On timeout the thread is left running; see
    /// [`Reconciler::wait_idle`].
    fn call<T, F>(&self, guard: &Arc<IdentityGuard>, op: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
    {
        let Some(timeout) = self.options.call_timeout else {
            return op();
        };

        let (tx, rx) = mpsc::channel();
        let token = Arc::clone(guard);
        thread::Builder::new()
            .name("provider-call".into())
            .spawn(move || {
                let result = op();
                drop(token);
                let _ = tx.send(result);
            })
            .map_err(|e| ProviderError::Unavailable(format!("could not start provider call: {e}")))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ProviderError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ProviderError::Host("provider call panicked".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::diff::ChangeSet;
    use crate::error::ValidationError;
    use crate::instance::{Ensure, EnsureSpec, RawAttributes};
    use crate::schema::Schema;
    use crate::types::ReconcileSummary;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory host with call counters and injectable failures
    #[derive(Default)]
    struct MockHost {
        objects: Mutex<BTreeMap<String, RawAttributes>>,
        fetch_error: Option<ProviderError>,
        apply_error: Option<ProviderError>,
        delay: Duration,
        creates: AtomicUsize,
        updates: AtomicUsize,
        destroys: AtomicUsize,
        last_update: Mutex<Vec<String>>,
    }

    impl MockHost {
        fn with(objects: &[(&str, &[(&str, &str)])]) -> Self {
            let host = Self::default();
            {
                let mut map = host.objects.lock().unwrap();
                for (id, attrs) in objects {
                    let mut raw: RawAttributes = attrs
                        .iter()
                        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                        .collect();
                    raw.insert("id".into(), (*id).to_string());
                    map.insert((*id).to_string(), raw);
                }
            }
            host
        }

        fn mutations(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
                + self.updates.load(Ordering::SeqCst)
                + self.destroys.load(Ordering::SeqCst)
        }

        fn pause(&self) {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        fn check_apply(&self) -> Result<(), ProviderError> {
            self.pause();
            match &self.apply_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    impl Provider for MockHost {
        fn fetch(
            &self,
            schema: &Arc<Schema>,
            identity: &str,
        ) -> Result<Option<Instance>, ProviderError> {
            if let Some(e) = &self.fetch_error {
                self.pause();
                return Err(e.clone());
            }
            let objects = self.objects.lock().unwrap();
            objects
                .get(identity)
                .map(|raw| Instance::build(schema, raw, EnsureSpec::default()))
                .transpose()
                .map_err(ProviderError::from)
        }

        fn create(&self, _schema: &Schema, desired: &Instance) -> Result<(), ProviderError> {
            self.check_apply()?;
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.objects
                .lock()
                .unwrap()
                .insert(desired.identity().to_string(), desired.to_raw());
            Ok(())
        }

        fn update(
            &self,
            _schema: &Schema,
            identity: &str,
            changes: &ChangeSet,
        ) -> Result<(), ProviderError> {
            self.check_apply()?;
            self.updates.fetch_add(1, Ordering::SeqCst);
            *self.last_update.lock().unwrap() =
                changes.attributes().iter().map(ToString::to_string).collect();
            let mut objects = self.objects.lock().unwrap();
            let raw = objects.entry(identity.to_string()).or_default();
            for change in changes {
                raw.insert(change.attribute.clone(), change.desired.to_string());
            }
            Ok(())
        }

        fn destroy(&self, _schema: &Schema, identity: &str) -> Result<(), ProviderError> {
            self.check_apply()?;
            self.destroys.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().remove(identity);
            Ok(())
        }
    }

    fn registry() -> Arc<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                Schema::builder("pool")
                    .attribute(Attribute::identity("id", "[0-9a-fA-F]+").unwrap())
                    .attribute(Attribute::numeric("quantity_used"))
                    .attribute(Attribute::text("contract"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn reconciler(host: &Arc<MockHost>, options: ReconcileOptions) -> Reconciler {
        let provider: Arc<dyn Provider> = host.clone();
        Reconciler::new(registry(), ProviderSet::new().with("pool", provider)).with_options(options)
    }

    fn fast() -> ReconcileOptions {
        ReconcileOptions {
            call_timeout: Some(Duration::from_secs(5)),
            lock_wait: Duration::from_millis(50),
            ..Default::default()
        }
    }

    fn desired(id: &str) -> DesiredResource {
        DesiredResource::new("pool", id)
    }

    fn one(reconciler: &Reconciler, item: DesiredResource) -> ResourceReport {
        let report = reconciler.reconcile_batch(&[item]);
        assert!(report.rejected.is_empty(), "unexpected rejection: {:?}", report.rejected);
        report.resources.into_iter().next().unwrap()
    }

    #[test]
    fn test_absent_and_missing_is_in_sync() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let report = one(&r, desired("abc").ensure(EnsureSpec::one(Ensure::Absent)));
        assert_eq!(report.outcome, Outcome::InSync);
        assert_eq!(host.mutations(), 0);
    }

    #[test]
    fn test_missing_resource_is_created() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let report = one(&r, desired("abc").attr("quantity_used", "1"));
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(report.action, Some(Action::Create));
        assert_eq!(host.creates.load(Ordering::SeqCst), 1);
        assert_eq!(host.objects.lock().unwrap()["abc"]["quantity_used"], "1");
    }

    #[test]
    fn test_present_resource_is_destroyed() {
        let host = Arc::new(MockHost::with(&[("abc", &[])]));
        let r = reconciler(&host, fast());
        let report = one(&r, desired("abc").ensure(EnsureSpec::one(Ensure::Absent)));
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(report.action, Some(Action::Destroy));
        assert!(host.objects.lock().unwrap().is_empty());
    }

    #[test]
    fn test_update_carries_only_the_difference() {
        let host = Arc::new(MockHost::with(&[(
            "abc",
            &[("quantity_used", "2"), ("contract", "ACME")],
        )]));
        let r = reconciler(&host, fast());
        let report = one(
            &r,
            desired("abc")
                .attr("quantity_used", "1")
                .attr("contract", "ACME"),
        );
        assert_eq!(report.outcome, Outcome::Applied);
        assert_eq!(*host.last_update.lock().unwrap(), vec!["quantity_used"]);
    }

    #[test]
    fn test_second_cycle_is_in_sync() {
        let host = Arc::new(MockHost::with(&[("abc", &[("quantity_used", "2")])]));
        let r = reconciler(&host, fast());
        let item = desired("abc").attr("quantity_used", "1");

        assert_eq!(one(&r, item.clone()).outcome, Outcome::Applied);
        assert_eq!(one(&r, item).outcome, Outcome::InSync);
        assert_eq!(host.updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_error_degrades_without_applying() {
        let host = Arc::new(MockHost {
            fetch_error: Some(ProviderError::Host("subscription-manager crashed".into())),
            ..Default::default()
        });
        let r = reconciler(&host, fast());
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert!(report.detail.unwrap().contains("fetch failed"));
        assert_eq!(host.mutations(), 0);
    }

    #[test]
    fn test_fetch_timeout_degrades() {
        let host = Arc::new(MockHost {
            fetch_error: Some(ProviderError::Host("late".into())),
            delay: Duration::from_millis(300),
            ..Default::default()
        });
        let r = reconciler(
            &host,
            ReconcileOptions {
                call_timeout: Some(Duration::from_millis(20)),
                ..fast()
            },
        );
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert!(report.detail.unwrap().contains("timed out"));
    }

    #[test]
    fn test_apply_error_fails() {
        let host = Arc::new(MockHost {
            apply_error: Some(ProviderError::Host("pool exhausted".into())),
            ..Default::default()
        });
        let r = reconciler(&host, fast());
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Failed);
        assert_eq!(report.action, Some(Action::Create));
        assert_eq!(
            report.detail.as_deref(),
            Some("provider error: pool exhausted")
        );
    }

    #[test]
    fn test_apply_timeout_degrades_and_keeps_token() {
        let host = Arc::new(MockHost {
            delay: Duration::from_millis(300),
            ..Default::default()
        });
        let r = reconciler(
            &host,
            ReconcileOptions {
                call_timeout: Some(Duration::from_millis(100)),
                ..fast()
            },
        );
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert!(r.locks.is_held("pool", "abc"));

        thread::sleep(Duration::from_millis(500));
        assert!(!r.locks.is_held("pool", "abc"));
        assert_eq!(host.creates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_busy_identity_degrades() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let _held = r
            .locks
            .acquire("pool", "abc", Duration::ZERO)
            .unwrap();
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert_eq!(host.mutations(), 0);
    }

    #[test]
    fn test_dry_run_plans_without_applying() {
        let host = Arc::new(MockHost::with(&[("abc", &[("quantity_used", "2")])]));
        let r = reconciler(
            &host,
            ReconcileOptions {
                dry_run: true,
                ..fast()
            },
        );
        let report = one(&r, desired("abc").attr("quantity_used", "1"));
        assert_eq!(report.outcome, Outcome::Skipped);
        assert!(matches!(report.action, Some(Action::Update { .. })));
        assert_eq!(host.mutations(), 0);
    }

    #[test]
    fn test_missing_provider_degrades() {
        let r = Reconciler::new(registry(), ProviderSet::new()).with_options(fast());
        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert!(report.detail.unwrap().contains("no provider registered"));
    }

    #[test]
    fn test_no_timeout_runs_inline() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(
            &host,
            ReconcileOptions {
                call_timeout: None,
                ..fast()
            },
        );
        assert_eq!(one(&r, desired("abc")).outcome, Outcome::Applied);
    }

    #[test]
    fn test_batch_rejects_without_aborting() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let report = r.reconcile_batch(&[
            desired("aa").attr("quantity_used", "1"),
            desired("bb").attr("quantity_used", "lots"),
            DesiredResource::new("widget", "cc"),
            desired("aa").attr("quantity_used", "9"),
            desired("dd"),
        ]);

        let reconciled: Vec<_> = report.resources.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(reconciled, vec!["aa", "dd"]);
        assert_eq!(report.rejected.len(), 3);
        assert!(matches!(report.rejected[0].error, DesiredStateError::Invalid(_)));
        assert!(matches!(report.rejected[1].error, DesiredStateError::UnknownType(_)));
        assert!(matches!(report.rejected[2].error, DesiredStateError::Duplicate { .. }));
        assert_eq!(host.objects.lock().unwrap()["aa"]["quantity_used"], "1");
    }

    #[test]
    fn test_wait_idle_after_abandoned_call() {
        let host = Arc::new(MockHost {
            delay: Duration::from_millis(200),
            ..Default::default()
        });
        let r = reconciler(
            &host,
            ReconcileOptions {
                call_timeout: Some(Duration::from_millis(20)),
                ..fast()
            },
        );

        let report = one(&r, desired("abc"));
        assert_eq!(report.outcome, Outcome::Degraded);
        assert!(!r.wait_idle(Duration::ZERO));
        assert!(r.wait_idle(Duration::from_secs(5)));
        assert!(host.objects.lock().unwrap().contains_key("abc"));
    }

    #[test]
    fn test_invalid_declaration_does_not_claim_identity() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let report = r.reconcile_batch(&[
            desired("ab").attr("quantity_used", "lots"),
            desired("ab").attr("quantity_used", "1"),
        ]);

        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].outcome, Outcome::Applied);
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(report.rejected[0].error, DesiredStateError::Invalid(_)));
        assert_eq!(host.objects.lock().unwrap()["ab"]["quantity_used"], "1");
    }

    #[test]
    fn test_bad_ensure_rejects_only_its_resource() {
        let host = Arc::new(MockHost::default());
        let r = reconciler(&host, fast());
        let report = r.reconcile_batch(&[
            desired("aa").ensure_raw(["latest"]),
            desired("bb").ensure_raw(Vec::<String>::new()),
            desired("cc").attr("quantity_used", "2"),
        ]);

        let reconciled: Vec<_> = report.resources.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(reconciled, vec!["cc"]);
        assert_eq!(report.resources[0].outcome, Outcome::Applied);
        assert_eq!(
            report.rejected[0].error,
            DesiredStateError::Invalid(ValidationError::InvalidEnsure("latest".into()))
        );
        assert_eq!(
            report.rejected[1].error,
            DesiredStateError::Invalid(ValidationError::EmptyEnsure)
        );
        assert!(host.objects.lock().unwrap().contains_key("cc"));
        assert!(!host.objects.lock().unwrap().contains_key("aa"));
    }

    #[test]
    fn test_parallel_batch_keeps_order_and_reports_progress() {
        #[derive(Default)]
        struct Counter {
            started: AtomicUsize,
            completed: AtomicUsize,
            batch: AtomicUsize,
            total: Mutex<Option<ReconcileSummary>>,
        }

        impl ProgressCallback for Counter {
            fn on_batch_start(&self, count: usize) {
                self.batch.store(count, Ordering::SeqCst);
            }
            fn on_resource_start(&self, _: &str, _: &str) {
                self.started.fetch_add(1, Ordering::SeqCst);
            }
            fn on_resource_complete(&self, _: &ResourceReport) {
                self.completed.fetch_add(1, Ordering::SeqCst);
            }
            fn on_batch_complete(&self, summary: &ReconcileSummary) {
                *self.total.lock().unwrap() = Some(summary.clone());
            }
        }

        let host = Arc::new(MockHost {
            delay: Duration::from_millis(10),
            ..Default::default()
        });
        let r = reconciler(
            &host,
            ReconcileOptions {
                jobs: 4,
                ..fast()
            },
        );
        let ids: Vec<String> = (0..12).map(|i| format!("{i:02x}")).collect();
        let items: Vec<_> = ids.iter().map(|id| desired(id)).collect();

        let counter = Counter::default();
        let report = r.reconcile_batch_with_progress(&items, &counter);

        let order: Vec<_> = report.resources.iter().map(|r| r.identity.clone()).collect();
        assert_eq!(order, ids);
        assert_eq!(counter.batch.load(Ordering::SeqCst), 12);
        assert_eq!(counter.started.load(Ordering::SeqCst), 12);
        assert_eq!(counter.completed.load(Ordering::SeqCst), 12);
        assert_eq!(counter.total.lock().unwrap().as_ref().unwrap().created, 12);
        assert_eq!(host.creates.load(Ordering::SeqCst), 12);
    }
}
