use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::DataValue;
use crate::Error;
use crate::MonitoredItemNotification;
use crate::Variant;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

pub fn change_record(
    client_handle: u32,
    value: f64,
) -> MonitoredItemNotification {
    MonitoredItemNotification {
        client_handle,
        value: DataValue::new(Variant::Double(value)),
    }
}

/// Error handler that forwards every reported error into a channel
pub fn error_collector() -> (
    impl Fn(u32, Error) + Send + Sync + 'static,
    mpsc::UnboundedReceiver<(u32, Error)>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = move |subscription_id: u32, error: Error| {
        let _ = tx.send((subscription_id, error));
    };
    (handler, rx)
}

/// Waits until `condition` holds, polling every millisecond
pub async fn wait_until(
    timeout: Duration,
    mut condition: impl FnMut() -> bool,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    condition()
}
