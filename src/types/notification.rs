use crate::DataValue;
use crate::StatusCode;
use crate::TransportError;

/// A single per-item change record inside a data change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredItemNotification {
    pub client_handle: u32,
    pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataChangeNotification {
    pub monitored_items: Vec<MonitoredItemNotification>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNotification {
    pub client_handle: u32,
    pub fields: Vec<DataValue>,
}

/// Payload kinds a publish response may carry
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationData {
    DataChange(DataChangeNotification),
    Event(Vec<EventNotification>),
    StatusChange(StatusCode),
}

impl NotificationData {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationData::DataChange(_) => "DataChangeNotification",
            NotificationData::Event(_) => "EventNotificationList",
            NotificationData::StatusChange(_) => "StatusChangeNotification",
        }
    }
}

/// Raw notification as emitted by the transport into the notification sink.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishNotification {
    pub subscription_id: u32,
    pub data: Result<NotificationData, TransportError>,
}

impl PublishNotification {
    pub fn data_change(
        subscription_id: u32,
        monitored_items: Vec<MonitoredItemNotification>,
    ) -> Self {
        Self {
            subscription_id,
            data: Ok(NotificationData::DataChange(DataChangeNotification {
                monitored_items,
            })),
        }
    }

    pub fn error(
        subscription_id: u32,
        error: TransportError,
    ) -> Self {
        Self {
            subscription_id,
            data: Err(error),
        }
    }
}
