use super::*;
use crate::DispatchError;
use crate::Error;

#[test]
fn status_code_severity() {
    assert!(StatusCode::GOOD.is_ok());
    assert!(!StatusCode::GOOD.is_bad());
    assert!(StatusCode::BAD_NODE_ID_UNKNOWN.is_bad());
    assert!(!StatusCode::BAD_NODE_ID_UNKNOWN.is_ok());

    let uncertain = StatusCode(0x4000_0000);
    assert!(uncertain.is_uncertain());
    assert!(!uncertain.is_ok());
    assert!(!uncertain.is_bad());
}

#[test]
fn status_code_display_includes_known_names() {
    assert_eq!(
        StatusCode::BAD_NODE_ID_UNKNOWN.to_string(),
        "BadNodeIdUnknown (0x80340000)"
    );
    assert_eq!(StatusCode(0x8123_0000).to_string(), "0x81230000");
}

#[test]
fn change_message_exposes_exactly_one_side() {
    let node = NodeId::string(2, "A");
    let change = DataChangeMessage::Change {
        node_id: node.clone(),
        value: DataValue::new(Variant::Double(1.5)),
    };
    assert_eq!(change.node_id(), Some(&node));
    assert_eq!(
        change.value().and_then(|v| v.value.clone()),
        Some(Variant::Double(1.5))
    );
    assert!(change.error().is_none());
    assert!(!change.is_error());

    let failed = DataChangeMessage::Error(Error::Dispatch(DispatchError::HandleNotFound(7)));
    assert!(failed.node_id().is_none());
    assert!(failed.value().is_none());
    assert!(failed.is_error());
    assert_eq!(
        failed.error().map(|e| e.to_string()),
        Some("client handle 7 not found".to_string())
    );
}

#[test]
fn monitor_request_builder_defaults_to_reporting() {
    let params = MonitoringParameters {
        sampling_interval: 250.0,
        queue_size: 1,
        discard_oldest: false,
    };
    let request = MonitorRequest::new(NodeId::numeric(0, 2258))
        .with_mode(MonitoringMode::Sampling)
        .with_parameters(params);

    assert_eq!(MonitorRequest::new(NodeId::numeric(0, 1)).monitoring_mode, MonitoringMode::Reporting);
    assert_eq!(request.monitoring_mode, MonitoringMode::Sampling);
    assert_eq!(request.monitoring_parameters, Some(params));
}

#[test]
fn notification_kind_names() {
    assert_eq!(
        NotificationData::DataChange(DataChangeNotification::default()).kind(),
        "DataChangeNotification"
    );
    assert_eq!(
        NotificationData::StatusChange(StatusCode::BAD_TIMEOUT).kind(),
        "StatusChangeNotification"
    );
    assert_eq!(NotificationData::Event(vec![]).kind(), "EventNotificationList");
}
