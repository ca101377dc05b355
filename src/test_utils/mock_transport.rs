use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::CreateMonitoredItemsResponse;
use crate::DeleteMonitoredItemsResponse;
use crate::HandleAllocator;
use crate::MockTransport;
use crate::MockTransportSubscription;
use crate::MonitorConfig;
use crate::MonitoredItemCreateRequest;
use crate::MonitoredItemCreateResult;
use crate::NodeMonitor;
use crate::PublishNotification;
use crate::ResponseHeader;
use crate::StatusCode;
use crate::Subscription;
use crate::TransportSubscription;

/// First monitored item id handed out by [`expect_monitor_ok`]
pub const FIRST_ITEM_ID: u32 = 1000;

/// Slot the mocked transport stores the notification sink into
pub type NotificationSink = Arc<Mutex<Option<mpsc::Sender<PublishNotification>>>>;

pub fn create_result(
    status_code: StatusCode,
    monitored_item_id: u32,
    request: &MonitoredItemCreateRequest,
) -> MonitoredItemCreateResult {
    MonitoredItemCreateResult {
        status_code,
        monitored_item_id,
        revised_sampling_interval: request.requested_parameters.sampling_interval,
        revised_queue_size: request.requested_parameters.queue_size,
    }
}

/// Accept every create request, assigning sequential item ids
pub fn expect_monitor_ok(mock: &mut MockTransportSubscription) {
    let next_id = Arc::new(AtomicU32::new(FIRST_ITEM_ID));
    mock.expect_monitor().returning(move |_, requests| {
        Ok(CreateMonitoredItemsResponse {
            header: ResponseHeader::default(),
            results: requests
                .iter()
                .map(|r| create_result(StatusCode::GOOD, next_id.fetch_add(1, Ordering::SeqCst), r))
                .collect(),
        })
    });
}

/// Accept every delete request
pub fn expect_unmonitor_ok(mock: &mut MockTransportSubscription) {
    mock.expect_unmonitor().returning(|item_ids| {
        Ok(DeleteMonitoredItemsResponse {
            header: ResponseHeader::default(),
            results: vec![StatusCode::GOOD; item_ids.len()],
        })
    });
}

pub fn mock_subscription(subscription_id: u32) -> MockTransportSubscription {
    let mut mock = MockTransportSubscription::new();
    mock.expect_id().return_const(subscription_id);
    mock
}

/// Subscription over `mock` without a registry or notification pump
pub fn standalone_subscription(mock: MockTransportSubscription) -> Subscription {
    Subscription::new(
        Arc::new(mock),
        Arc::new(HandleAllocator::new(100)),
        Arc::new(MonitorConfig::default()),
    )
}

/// Registry whose transport hands out `subscription` once and keeps the
/// notification sink so the test can act as the publishing side.
pub fn mock_monitor(
    subscription: MockTransportSubscription,
    config: MonitorConfig,
) -> (NodeMonitor, NotificationSink) {
    let sink: NotificationSink = Arc::new(Mutex::new(None));
    let slot = sink.clone();

    let mut transport = MockTransport::new();
    transport
        .expect_subscribe()
        .times(1)
        .return_once(move |_, notifications| {
            *slot.lock() = Some(notifications);
            Ok(Arc::new(subscription) as Arc<dyn TransportSubscription>)
        });

    let monitor = NodeMonitor::with_config(Arc::new(transport), config).expect("valid config");
    (monitor, sink)
}

pub fn sink_sender(sink: &NotificationSink) -> mpsc::Sender<PublishNotification> {
    sink.lock().clone().expect("transport subscribed")
}
