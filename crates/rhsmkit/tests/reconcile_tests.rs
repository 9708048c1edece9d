//! Reconciliation of entitlement pools against an in-memory host

use declarative::{
    Action, ChangeSet, DesiredResource, Ensure, EnsureSpec, Instance, Outcome, Provider,
    ProviderError, ProviderSet, RawAttributes, ReconcileOptions, Reconciler, ResourceReport,
    Schema, ValidationError,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const POOL: &str = "1a2b3c4d5e6f1234567890abcdef12345";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(String),
    Update(String, Vec<String>),
    Destroy(String),
}

#[derive(Default)]
struct Host {
    pools: Mutex<BTreeMap<String, RawAttributes>>,
    calls: Mutex<Vec<Call>>,
    stall_fetch: Option<Duration>,
}

impl Host {
    fn with_pool(attrs: &[(&str, &str)]) -> Self {
        let host = Self::default();
        let raw = attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .chain([("id".to_string(), POOL.to_string())])
            .collect();
        host.pools.lock().unwrap().insert(POOL.to_string(), raw);
        host
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Provider for Host {
    fn fetch(&self, schema: &Arc<Schema>, identity: &str) -> Result<Option<Instance>, ProviderError> {
        if let Some(stall) = self.stall_fetch {
            thread::sleep(stall);
        }
        let pools = self.pools.lock().unwrap();
        match pools.get(identity) {
            Some(raw) => Ok(Some(Instance::build(schema, raw, EnsureSpec::default())?)),
            None => Ok(None),
        }
    }

    fn create(&self, _: &Schema, desired: &Instance) -> Result<(), ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(desired.identity().to_string()));
        self.pools
            .lock()
            .unwrap()
            .insert(desired.identity().to_string(), desired.to_raw());
        Ok(())
    }

    fn update(&self, _: &Schema, identity: &str, changes: &ChangeSet) -> Result<(), ProviderError> {
        let names = changes.attributes().into_iter().map(String::from).collect();
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(identity.to_string(), names));
        let mut pools = self.pools.lock().unwrap();
        if let Some(raw) = pools.get_mut(identity) {
            for change in changes {
                raw.insert(change.attribute.clone(), change.desired.to_string());
            }
        }
        Ok(())
    }

    fn destroy(&self, _: &Schema, identity: &str) -> Result<(), ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Destroy(identity.to_string()));
        self.pools.lock().unwrap().remove(identity);
        Ok(())
    }
}

fn reconciler(host: &Arc<Host>, options: ReconcileOptions) -> Reconciler {
    let registry = Arc::new(rhsmkit::registry().unwrap());
    let provider: Arc<dyn Provider> = host.clone();
    Reconciler::new(registry, ProviderSet::new().with("pool", provider)).with_options(options)
}

fn run(host: &Arc<Host>, desired: DesiredResource) -> ResourceReport {
    let report = reconciler(host, ReconcileOptions::default()).reconcile_batch(&[desired]);
    assert!(report.rejected.is_empty());
    report.resources.into_iter().next().unwrap()
}

fn pool() -> DesiredResource {
    DesiredResource::new("pool", POOL)
}

#[test]
fn absent_pool_not_on_host_is_in_sync() {
    let host = Arc::new(Host::default());
    let report = run(&host, pool().ensure(EnsureSpec::one(Ensure::Absent)));
    assert_eq!(report.outcome, Outcome::InSync);
    assert!(host.calls().is_empty());
}

#[test]
fn missing_pool_is_created() {
    let host = Arc::new(Host::default());
    let report = run(&host, pool().attr("sku", "1234536789012"));
    assert_eq!(report.outcome, Outcome::Applied);
    assert_eq!(report.action, Some(Action::Create));
    assert_eq!(host.calls(), vec![Call::Create(POOL.to_string())]);
}

#[test]
fn quantity_change_updates_only_quantity() {
    let host = Arc::new(Host::with_pool(&[
        ("quantity_used", "2"),
        ("contract", "Fancy Widgets, LTD"),
        ("active", "True"),
    ]));
    let report = run(
        &host,
        pool()
            .attr("quantity_used", "1")
            .attr("contract", "Fancy Widgets, LTD")
            .attr("active", "true"),
    );
    assert_eq!(report.outcome, Outcome::Applied);
    assert_eq!(
        host.calls(),
        vec![Call::Update(POOL.to_string(), vec!["quantity_used".to_string()])]
    );
}

#[test]
fn fetch_timeout_is_degraded() {
    let host = Arc::new(Host {
        stall_fetch: Some(Duration::from_millis(300)),
        ..Default::default()
    });
    let options = ReconcileOptions {
        call_timeout: Some(Duration::from_millis(20)),
        ..Default::default()
    };
    let report = reconciler(&host, options).reconcile_batch(&[pool()]);
    assert_eq!(report.resources[0].outcome, Outcome::Degraded);
    assert!(host.calls().is_empty());
}

#[test]
fn second_cycle_is_in_sync() {
    let host = Arc::new(Host::with_pool(&[("quantity_used", "2")]));
    let reconciler = reconciler(&host, ReconcileOptions::default());
    let desired = [pool().attr("quantity_used", "1")];

    assert_eq!(reconciler.reconcile_batch(&desired).resources[0].outcome, Outcome::Applied);
    assert_eq!(reconciler.reconcile_batch(&desired).resources[0].outcome, Outcome::InSync);
    assert_eq!(host.calls().len(), 1);
}

#[test]
fn omitted_contract_never_drifts() {
    let host = Arc::new(Host::with_pool(&[("contract", "Someone Else"), ("sku", "42")]));
    let report = run(&host, pool().attr("sku", "42.0"));
    assert_eq!(report.outcome, Outcome::InSync);
}

#[test]
fn dates_compare_by_calendar_day() {
    let host = Arc::new(Host::with_pool(&[("starts", "2015-06-01"), ("ends", "05/24/2045")]));
    let report = run(
        &host,
        pool().attr("starts", "06/01/2015").attr("ends", "2045-05-24"),
    );
    assert_eq!(report.outcome, Outcome::InSync);
}

#[test]
fn either_disposition_accepted() {
    let either = EnsureSpec::any_of([Ensure::Absent, Ensure::Present]).unwrap();

    let empty = Arc::new(Host::default());
    assert_eq!(run(&empty, pool().ensure(either.clone())).outcome, Outcome::InSync);

    let present = Arc::new(Host::with_pool(&[("quantity_used", "3")]));
    let report = run(&present, pool().ensure(either).attr("quantity_used", "3"));
    assert_eq!(report.outcome, Outcome::InSync);
    assert!(present.calls().is_empty());
}

#[test]
fn invalid_pool_never_reaches_host() {
    let host = Arc::new(Host::default());
    let report = reconciler(&host, ReconcileOptions::default()).reconcile_batch(&[
        DesiredResource::new("pool", "not-hex"),
        pool().attr("system_type", "Physical"),
        pool().attr("quantity_used", "several"),
    ]);

    assert!(report.resources.is_empty());
    assert_eq!(report.rejected.len(), 3);
    let reasons: Vec<_> = report.rejected.iter().map(|r| &r.error).collect();
    assert!(matches!(
        reasons[0],
        declarative::DesiredStateError::Invalid(ValidationError::InvalidIdentity { .. })
    ));
    assert!(matches!(
        reasons[1],
        declarative::DesiredStateError::Invalid(ValidationError::NotInSet { .. })
    ));
    assert!(matches!(
        reasons[2],
        declarative::DesiredStateError::Invalid(ValidationError::NotNumeric { .. })
    ));
    assert!(host.calls().is_empty());
}
