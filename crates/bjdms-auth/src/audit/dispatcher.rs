//! Bounded audit queue drained by a small worker pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use bjdms_core::config::audit::AuditConfig;
use bjdms_core::events::DomainEvent;
use bjdms_entity::audit::{AuditSink, CreateAuditLogEntry};

type SharedReceiver = Arc<Mutex<mpsc::Receiver<DomainEvent>>>;

/// Accepts audit events without blocking and writes them in the background.
///
/// When the queue is full the event is dropped and counted.
#[derive(Debug)]
pub struct AuditDispatcher {
    sender: mpsc::Sender<DomainEvent>,
    shutdown: watch::Sender<bool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    dropped: AtomicU64,
}

impl AuditDispatcher {
    /// Spawn the worker pool and return the dispatcher handle.
    pub fn start(sink: Arc<dyn AuditSink>, config: &AuditConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let receiver: SharedReceiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers.max(1))
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&receiver),
                    Arc::clone(&sink),
                    shutdown_rx.clone(),
                    config.write_timeout(),
                ))
            })
            .collect();

        info!(
            queue_capacity = config.queue_capacity,
            workers = config.workers,
            "Audit dispatcher started"
        );

        Self {
            sender,
            shutdown,
            workers: Mutex::new(workers),
            dropped: AtomicU64::new(0),
        }
    }

    /// Queue an event. Never blocks and never fails the caller.
    pub fn emit(&self, event: DomainEvent) {
        if *self.shutdown.borrow() {
            self.record_drop(event.payload.action(), "dispatcher stopped");
            return;
        }

        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.record_drop(event.payload.action(), "queue full");
            }
            Err(TrySendError::Closed(event)) => {
                self.record_drop(event.payload.action(), "queue closed");
            }
        }
    }

    /// Events discarded since startup.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting events, write what is queued, and wait for the workers.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);

        let handles: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Audit worker ended abnormally");
            }
        }

        info!(dropped = self.dropped_count(), "Audit dispatcher stopped");
    }

    fn record_drop(&self, action: &str, reason: &'static str) {
        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(action, reason, dropped_total = total, "Audit event dropped");
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: SharedReceiver,
    sink: Arc<dyn AuditSink>,
    mut shutdown: watch::Receiver<bool>,
    write_timeout: Duration,
) {
    debug!(worker_id, "Audit worker started");

    loop {
        let next = {
            let mut rx = receiver.lock().await;
            tokio::select! {
                biased;
                event = rx.recv() => event,
                _ = shutdown.changed() => None,
            }
        };

        match next {
            Some(event) => write(&*sink, event, write_timeout).await,
            None => break,
        }
    }

    // Drain whatever was queued before the stop signal.
    loop {
        let next = receiver.lock().await.try_recv().ok();
        match next {
            Some(event) => write(&*sink, event, write_timeout).await,
            None => break,
        }
    }

    debug!(worker_id, "Audit worker stopped");
}

async fn write(sink: &dyn AuditSink, event: DomainEvent, write_timeout: Duration) {
    let action = event.payload.action();
    let entry = to_entry(event);

    match tokio::time::timeout(write_timeout, sink.create_audit_log(entry)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(action, error = %e, "Audit write failed"),
        Err(_) => warn!(action, "Audit write timed out"),
    }
}

fn to_entry(event: DomainEvent) -> CreateAuditLogEntry {
    CreateAuditLogEntry {
        user_id: event.actor_id,
        action: event.payload.action().to_string(),
        entity: event.payload.entity().to_string(),
        entity_id: Some(event.payload.subject_id()),
        metadata: event.payload.metadata(),
        ip_address: event.ip_address,
        user_agent: event.user_agent,
        occurred_at: event.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bjdms_core::events::{AuthEvent, LoginFailureReason};
    use uuid::Uuid;

    use crate::testing::RecordingAuditSink;

    fn failed_login(user_id: Uuid) -> DomainEvent {
        DomainEvent::new(
            None,
            AuthEvent::LoginFailed {
                user_id,
                reason: LoginFailureReason::InvalidPassword,
                failed_attempts: Some(2),
            },
        )
        .with_client(Some("10.0.0.1".to_string()), Some("curl/8".to_string()))
    }

    #[tokio::test]
    async fn events_are_written_with_client_details() {
        let sink = Arc::new(RecordingAuditSink::new());
        let dispatcher = AuditDispatcher::start(sink.clone(), &AuditConfig::default());
        let user_id = Uuid::new_v4();

        dispatcher.emit(failed_login(user_id));
        dispatcher.shutdown().await;

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.action, "login_failed");
        assert_eq!(entry.entity, "user");
        assert_eq!(entry.entity_id, Some(user_id));
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.metadata["reason"], "invalid_password");
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert_eq!(dispatcher.dropped_count(), 0);
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let sink = Arc::new(RecordingAuditSink::slow(Duration::from_millis(50)));
        let config = AuditConfig {
            queue_capacity: 1,
            workers: 1,
            write_timeout_ms: 1000,
        };
        let dispatcher = AuditDispatcher::start(sink.clone(), &config);

        for _ in 0..3 {
            dispatcher.emit(failed_login(Uuid::new_v4()));
        }
        assert!(dispatcher.dropped_count() >= 1);

        dispatcher.shutdown().await;
        let written = sink.entries().await.len() as u64;
        assert_eq!(written + dispatcher.dropped_count(), 3);
    }

    #[tokio::test]
    async fn emit_after_shutdown_is_counted() {
        let sink = Arc::new(RecordingAuditSink::new());
        let dispatcher = AuditDispatcher::start(sink.clone(), &AuditConfig::default());
        dispatcher.shutdown().await;

        dispatcher.emit(failed_login(Uuid::new_v4()));
        assert_eq!(dispatcher.dropped_count(), 1);
        assert!(sink.entries().await.is_empty());
    }
}
