// tests/orchestration_test.rs — Integration test: provider ordering, skipping and retry budgets

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use lucidra::infra::errors::ProviderError;
use lucidra::provider::retry::BackoffPolicy;
use lucidra::provider::{
    HttpTransport, OrchestrationClient, ProviderAdapter, ProviderDescriptor, ProviderRegistry,
    ProviderRequest,
};

/// Replays scripted responses per endpoint; an exhausted script fails with
/// a transport error. Records every endpoint it was asked to call.
#[derive(Default)]
struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    fn script(self, endpoint: &str, responses: Vec<Result<Value, ProviderError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), responses.into());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        _request: &ProviderRequest,
        _timeout: Duration,
    ) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.scripts
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ProviderError::Transport("connection refused".into())))
    }
}

/// Adapter that counts how often a request was built for it.
struct CountingAdapter {
    available: bool,
    builds: AtomicUsize,
}

impl CountingAdapter {
    fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            builds: AtomicUsize::new(0),
        })
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ProviderAdapter for CountingAdapter {
    fn is_available(&self) -> bool {
        self.available
    }

    fn build_request(&self, scenario: &str) -> ProviderRequest {
        self.builds.fetch_add(1, Ordering::SeqCst);
        ProviderRequest::new(json!({ "scenario": scenario }))
    }

    fn extract_text(&self, body: &Value) -> Result<String, ProviderError> {
        body["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::malformed("text missing"))
    }
}

fn provider(
    name: &str,
    priority: i32,
    retries: u32,
    adapter: Arc<CountingAdapter>,
) -> ProviderDescriptor {
    ProviderDescriptor::new(name, name, priority, adapter)
        .with_max_retries(retries)
        .with_timeout(Duration::from_secs(5))
}

fn client(
    providers: Vec<ProviderDescriptor>,
    transport: Arc<ScriptedTransport>,
) -> OrchestrationClient {
    let registry = Arc::new(ProviderRegistry::new(providers).unwrap());
    OrchestrationClient::new(registry, transport).with_backoff(BackoffPolicy::none())
}

fn ok(text: &str) -> Result<Value, ProviderError> {
    Ok(json!({ "text": text }))
}

#[tokio::test]
async fn test_all_failing_attempted_in_priority_order() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client(
        vec![
            provider("c", 3, 1, CountingAdapter::new(true)),
            provider("a", 1, 1, CountingAdapter::new(true)),
            provider("b", 2, 1, CountingAdapter::new(true)),
        ],
        transport.clone(),
    );

    let err = client.analyze("scenario", None).await.unwrap_err();

    assert_eq!(err.attempted, vec!["a", "b", "c"]);
    assert!(err.skipped.is_empty());
    assert_eq!(transport.calls(), vec!["a", "b", "c"]);
    let last = err.last_error.unwrap();
    assert_eq!(last.provider, "c");
    assert!(matches!(last.error, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_unavailable_provider_never_built() {
    let a = CountingAdapter::new(true);
    let b = CountingAdapter::new(false);
    let c = CountingAdapter::new(true);
    let transport = Arc::new(ScriptedTransport::default());
    let client = client(
        vec![
            provider("a", 1, 2, a.clone()),
            provider("b", 2, 2, b.clone()),
            provider("c", 3, 2, c.clone()),
        ],
        transport.clone(),
    );

    let err = client.analyze("scenario", None).await.unwrap_err();

    assert_eq!(b.builds(), 0);
    assert_eq!(a.builds(), 2);
    assert_eq!(c.builds(), 2);
    assert_eq!(err.attempted, vec!["a", "c"]);
    assert_eq!(err.skipped, vec!["b"]);
    assert!(!transport.calls().contains(&"b".to_string()));
}

#[tokio::test]
async fn test_retry_budget_is_exact() {
    let a = CountingAdapter::new(true);
    let transport = Arc::new(ScriptedTransport::default().script("b", vec![ok("from b")]));
    let client = client(
        vec![
            provider("a", 1, 3, a.clone()),
            provider("b", 2, 1, CountingAdapter::new(true)),
        ],
        transport.clone(),
    );

    let result = client.analyze("scenario", None).await.unwrap();

    assert_eq!(a.builds(), 3);
    assert_eq!(transport.calls(), vec!["a", "a", "a", "b"]);
    assert_eq!(result.provider, "b");
    assert_eq!(result.text, "from b");
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn test_success_after_timeout_stays_on_provider() {
    let transport = Arc::new(ScriptedTransport::default().script(
        "a",
        vec![
            Err(ProviderError::Timeout(Duration::from_secs(5))),
            ok("second time lucky"),
        ],
    ));
    let client = client(
        vec![
            provider("a", 1, 2, CountingAdapter::new(true)),
            provider("b", 2, 2, CountingAdapter::new(true)),
        ],
        transport.clone(),
    );

    let result = client.analyze("scenario", None).await.unwrap();

    assert_eq!(result.provider, "a");
    assert_eq!(result.attempts, 2);
    assert_eq!(transport.calls(), vec!["a", "a"]);
}

#[tokio::test]
async fn test_malformed_body_is_retried() {
    let transport = Arc::new(
        ScriptedTransport::default().script("a", vec![Ok(json!({ "nope": 1 })), ok("fine")]),
    );
    let client = client(vec![provider("a", 1, 2, CountingAdapter::new(true))], transport);

    let result = client.analyze("scenario", None).await.unwrap();
    assert_eq!(result.text, "fine");
    assert_eq!(result.attempts, 2);
}

#[tokio::test]
async fn test_preferred_provider_tried_first() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .script("a", vec![ok("from a")])
            .script("b", vec![ok("from b")]),
    );
    let client = client(
        vec![
            provider("a", 1, 1, CountingAdapter::new(true)),
            provider("b", 2, 1, CountingAdapter::new(true)),
        ],
        transport.clone(),
    );

    let result = client.analyze("scenario", Some("b")).await.unwrap();
    assert_eq!(result.provider, "b");
    assert_eq!(transport.calls(), vec!["b"]);
}

#[tokio::test]
async fn test_nothing_available() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client(
        vec![
            provider("a", 1, 2, CountingAdapter::new(false)),
            provider("b", 2, 2, CountingAdapter::new(false)),
        ],
        transport.clone(),
    );

    let err = client.analyze("scenario", None).await.unwrap_err();
    assert!(err.nothing_available());
    assert_eq!(err.skipped, vec!["a", "b"]);
    assert_eq!(err.to_string(), "no providers available");
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_attempt_bounded_by_provider_timeout() {
    let transport = Arc::new(ScriptedTransport {
        delay: Some(Duration::from_secs(5)),
        ..ScriptedTransport::default()
    });
    let slow = ProviderDescriptor::new("slow", "slow", 1, CountingAdapter::new(true))
        .with_max_retries(1)
        .with_timeout(Duration::from_millis(20));
    let client = client(vec![slow], transport);

    let started = std::time::Instant::now();
    let err = client.analyze("scenario", None).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(matches!(
        err.last_error.unwrap().error,
        ProviderError::Timeout(_)
    ));
}
