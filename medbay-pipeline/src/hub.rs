//! The registry facade driving the invocation state machine.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use medbay_audit::{AuditLogger, AuditOutcome, AuditRecord, Redactor, TracingSink};
use medbay_catalog::{ToolCatalog, ToolContext, ToolHandle};
use medbay_config::RuntimeConfig;
use medbay_security::{ActorContext, Authorizer, FlatPermissionAuthorizer};
use medbay_stores::DependencyBundle;
use serde_json::{Map, Value};
use tokio::time::timeout;
use tracing::debug;
use uuid::Uuid;

use crate::envelope::{ErrorKind, ResultEnvelope};
use crate::inject::assemble_arguments;

/// The single entry point all callers invoke tools through.
///
/// One invocation walks resolution, authorization, injection, deadline-bound
/// execution, and normalization, and produces exactly one audit record no
/// matter where it exits. Invocations are independent units of work; a hub
/// wrapped in an [`Arc`] can serve any number of them concurrently.
#[derive(Clone)]
pub struct ToolHub {
    catalog: Arc<ToolCatalog>,
    authorizer: Arc<dyn Authorizer>,
    bundle: DependencyBundle,
    audit: Arc<AuditLogger>,
    deadline: Duration,
}

impl fmt::Debug for ToolHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolHub")
            .field("catalog", &self.catalog)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

struct Attempt {
    invocation_id: Uuid,
    requested: String,
    actor_id: medbay_primitives::ActorId,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl ToolHub {
    /// Creates a hub over the supplied catalog and dependency bundle, with
    /// the flat-permission authorizer, a tracing audit sink, and a 30 second
    /// deadline.
    #[must_use]
    pub fn new(catalog: Arc<ToolCatalog>, bundle: DependencyBundle) -> Self {
        Self {
            catalog,
            authorizer: Arc::new(FlatPermissionAuthorizer),
            bundle,
            audit: Arc::new(AuditLogger::new(Redactor::default(), Arc::new(TracingSink))),
            deadline: Duration::from_secs(30),
        }
    }

    /// Substitutes the authorization engine.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Substitutes the audit logger.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Sets the default per-call deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Applies a loaded runtime configuration: the per-call deadline, and
    /// the sensitive-field patterns when the configuration declares any.
    #[must_use]
    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        if !config.sensitive_fields.is_empty() {
            let redactor = Redactor::new(config.sensitive_fields.iter().cloned());
            self.audit = Arc::new(self.audit.with_redactor(redactor));
        }
        self.with_deadline(config.deadline())
    }

    /// Returns the catalog, used by collaborator code at startup to register
    /// tools. Not exposed to remote callers.
    #[must_use]
    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    /// Returns the audit logger, for operational inspection.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    /// Returns the default per-call deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Invokes a tool by canonical name or alias under the default deadline.
    pub async fn invoke(
        &self,
        name: &str,
        args: Map<String, Value>,
        actor: &ActorContext,
    ) -> ResultEnvelope {
        self.invoke_with_deadline(name, args, actor, self.deadline)
            .await
    }

    /// Invokes a tool under an explicit deadline.
    ///
    /// Caller-level cancellation (e.g. a client disconnect mapped to a
    /// shorter deadline) feeds through this same mechanism rather than a
    /// separate path. On expiry the envelope reports `timeout` promptly; the
    /// tool body is not forcibly terminated and must cancel cooperatively if
    /// it performs long external I/O.
    pub async fn invoke_with_deadline(
        &self,
        name: &str,
        args: Map<String, Value>,
        actor: &ActorContext,
        deadline: Duration,
    ) -> ResultEnvelope {
        let attempt = Attempt {
            invocation_id: Uuid::new_v4(),
            requested: name.to_owned(),
            actor_id: actor.actor_id().clone(),
            started_at: Utc::now(),
            clock: Instant::now(),
        };

        // Resolving
        let Ok(handle) = self.catalog.resolve(name) else {
            let envelope = ResultEnvelope::error(
                ErrorKind::UnknownTool,
                format!("tool `{name}` is not registered"),
            );
            self.finish(&attempt, None, &args, AuditOutcome::failed("unknown_tool"), None)
                .await;
            return envelope;
        };
        let canonical = handle.descriptor().canonical_name().to_owned();
        debug!(invocation = %attempt.invocation_id, tool = %canonical, requested = name, "resolved");

        // Authorizing
        match self
            .authorizer
            .authorize(&canonical, handle.descriptor().required_permission(), actor)
            .await
        {
            Ok(decision) if decision.is_allow() => {}
            Ok(decision) => {
                let reason = decision.reason().unwrap_or("access denied").to_owned();
                self.finish(&attempt, Some(&canonical), &args, AuditOutcome::Denied, None)
                    .await;
                return ResultEnvelope::error(ErrorKind::Forbidden, reason);
            }
            // Fail closed when the backend cannot answer.
            Err(err) => {
                self.finish(&attempt, Some(&canonical), &args, AuditOutcome::Denied, None)
                    .await;
                return ResultEnvelope::error(ErrorKind::Forbidden, err.to_string());
            }
        }

        // Injecting
        let assembled = match assemble_arguments(handle.descriptor().parameters(), &args, actor) {
            Ok(assembled) => assembled,
            Err(err) => {
                self.finish(
                    &attempt,
                    Some(&canonical),
                    &args,
                    AuditOutcome::failed("missing_parameter"),
                    None,
                )
                .await;
                return ResultEnvelope::error(ErrorKind::MissingParameter, err.to_string());
            }
        };

        // Invoking, under the deadline; Normalizing on the way out.
        let (outcome, envelope) = self
            .run_tool(&handle, assembled.clone(), actor, deadline)
            .await;
        let result_view = envelope.payload().cloned();
        self.finish(&attempt, Some(&canonical), &assembled, outcome, result_view)
            .await;
        envelope
    }

    async fn run_tool(
        &self,
        handle: &ToolHandle,
        assembled: Map<String, Value>,
        actor: &ActorContext,
        deadline: Duration,
    ) -> (AuditOutcome, ResultEnvelope) {
        let ctx = ToolContext::new(
            assembled,
            self.bundle.storage(),
            self.bundle.vector(),
            actor.actor_id().clone(),
        );

        match timeout(deadline, handle.executor().call(ctx)).await {
            Ok(Ok(payload)) => (AuditOutcome::Success, ResultEnvelope::success(payload)),
            Ok(Err(err)) => (
                AuditOutcome::failed("tool_error"),
                ResultEnvelope::error(ErrorKind::ToolError, err.reason().to_owned()),
            ),
            Err(_) => (
                AuditOutcome::failed("timeout"),
                ResultEnvelope::error(
                    ErrorKind::Timeout,
                    format!(
                        "tool `{}` exceeded the {}ms deadline",
                        handle.descriptor().canonical_name(),
                        deadline.as_millis()
                    ),
                ),
            ),
        }
    }

    async fn finish(
        &self,
        attempt: &Attempt,
        canonical: Option<&str>,
        args: &Map<String, Value>,
        outcome: AuditOutcome,
        result: Option<Value>,
    ) {
        let duration_ms =
            u64::try_from(attempt.clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        let tool = canonical.unwrap_or(attempt.requested.as_str());

        let mut record = AuditRecord::new(
            attempt.invocation_id,
            attempt.actor_id.clone(),
            tool,
            outcome,
            attempt.started_at,
            duration_ms,
            Value::Object(args.clone()),
        );
        if tool != attempt.requested {
            record = record.with_requested_as(attempt.requested.clone());
        }
        if let Some(result) = result {
            record = record.with_result(result);
        }
        self.audit.record(record).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbay_audit::MemorySink;
    use medbay_catalog::{ToolDescriptor, ToolError, ToolResult};
    use medbay_primitives::{ActorId, ParamKind, ParameterSpec, Permission};
    use medbay_stores::{LocalVectorStore, VolatileStorage};
    use serde_json::json;

    fn bundle() -> DependencyBundle {
        DependencyBundle::new(
            Arc::new(VolatileStorage::new()),
            Arc::new(LocalVectorStore::new()),
        )
    }

    fn hub_with_sink() -> (ToolHub, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let audit = Arc::new(AuditLogger::new(
            Redactor::default(),
            Arc::clone(&sink) as Arc<dyn medbay_audit::AuditSink>,
        ));
        let hub = ToolHub::new(Arc::new(ToolCatalog::new()), bundle()).with_audit(audit);
        (hub, sink)
    }

    fn actor(id: &str) -> ActorContext {
        ActorContext::new(ActorId::new(id).unwrap())
    }

    fn echo(ctx: ToolContext) -> impl Future<Output = ToolResult<Value>> + Send {
        async move { Ok(Value::Object(ctx.args().clone())) }
    }

    #[tokio::test]
    async fn unknown_tool_yields_envelope_and_audit() {
        let (hub, sink) = hub_with_sink();
        let envelope = hub.invoke("does_not_exist", Map::new(), &actor("a")).await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::UnknownTool));
        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tool(), "does_not_exist");
        assert_eq!(records[0].outcome().label(), "unknown_tool");
    }

    #[tokio::test]
    async fn denied_invocation_never_runs_tool() {
        let (hub, sink) = hub_with_sink();
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let ran_probe = Arc::clone(&ran);
        hub.catalog()
            .register(
                ToolDescriptor::new("records.update")
                    .unwrap()
                    .with_permission(Permission::Write),
                move |_ctx: ToolContext| {
                    let ran = Arc::clone(&ran_probe);
                    async move {
                        ran.store(true, std::sync::atomic::Ordering::SeqCst);
                        Ok(Value::Null)
                    }
                },
            )
            .unwrap();

        let reader = actor("nurse-7").with_permission(Permission::Read);
        let envelope = hub.invoke("records.update", Map::new(), &reader).await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::Forbidden));
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome().label(), "denied");
    }

    #[tokio::test]
    async fn missing_parameter_fails_before_invocation() {
        let (hub, sink) = hub_with_sink();
        hub.catalog()
            .register(
                ToolDescriptor::new("records.search")
                    .unwrap()
                    .with_permission(Permission::None)
                    .with_parameters(vec![
                        ParameterSpec::required("query", ParamKind::String).unwrap(),
                    ]),
                echo,
            )
            .unwrap();

        let envelope = hub.invoke("records.search", Map::new(), &actor("a")).await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::MissingParameter));
        assert_eq!(sink.records().await[0].outcome().label(), "missing_parameter");
    }

    #[tokio::test]
    async fn tool_error_captured_at_boundary() {
        let (hub, _sink) = hub_with_sink();
        hub.catalog()
            .register(
                ToolDescriptor::new("always.fails")
                    .unwrap()
                    .with_permission(Permission::None),
                |_ctx: ToolContext| async move {
                    Err::<Value, _>(ToolError::new("backend exploded"))
                },
            )
            .unwrap();

        let envelope = hub.invoke("always.fails", Map::new(), &actor("a")).await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::ToolError));
        assert_eq!(envelope.message(), Some("backend exploded"));
    }

    #[tokio::test]
    async fn alias_invocation_audited_under_canonical_name() {
        let (hub, sink) = hub_with_sink();
        hub.catalog()
            .register(
                ToolDescriptor::new("records.search")
                    .unwrap()
                    .with_alias("search_records")
                    .unwrap()
                    .with_permission(Permission::None),
                echo,
            )
            .unwrap();

        let envelope = hub.invoke("search_records", Map::new(), &actor("a")).await;
        assert!(envelope.is_success());

        let records = sink.records().await;
        assert_eq!(records[0].tool(), "records.search");
        assert_eq!(records[0].requested_as(), Some("search_records"));
    }

    #[tokio::test]
    async fn actor_default_reaches_tool_body() {
        let (hub, _sink) = hub_with_sink();
        hub.catalog()
            .register(
                ToolDescriptor::new("notes.sign")
                    .unwrap()
                    .with_permission(Permission::None)
                    .with_parameters(vec![
                        ParameterSpec::required("author", ParamKind::String).unwrap(),
                    ]),
                echo,
            )
            .unwrap();

        let signer = actor("svc.notes").with_injected_param("author", json!("svc.notes"));
        let envelope = hub.invoke("notes.sign", Map::new(), &signer).await;
        assert_eq!(envelope.payload().unwrap()["author"], "svc.notes");
    }
}
