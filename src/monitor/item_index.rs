use std::collections::HashMap;

use crate::MonitoredItem;
use crate::NodeId;

/// Live item set of a subscription, indexed three ways.
///
/// `handles` and `items` always describe the same items; `nodes` maps the
/// canonical node string to the ids of every item watching that node.
/// All three are only changed together through [`insert`](Self::insert)
/// and [`remove`](Self::remove).
#[derive(Debug, Default)]
pub(crate) struct ItemIndex {
    handles: HashMap<u32, NodeId>,
    items: HashMap<u32, MonitoredItem>,
    nodes: HashMap<String, Vec<u32>>,
}

impl ItemIndex {
    pub(crate) fn node_for_handle(
        &self,
        handle: u32,
    ) -> Option<&NodeId> {
        self.handles.get(&handle)
    }

    pub(crate) fn get(
        &self,
        item_id: u32,
    ) -> Option<&MonitoredItem> {
        self.items.get(&item_id)
    }

    pub(crate) fn get_mut(
        &mut self,
        item_id: u32,
    ) -> Option<&mut MonitoredItem> {
        self.items.get_mut(&item_id)
    }

    /// Items watching `node`, in insertion order
    pub(crate) fn items_for_node(
        &self,
        node: &NodeId,
    ) -> Vec<&MonitoredItem> {
        self.nodes
            .get(&node.to_string())
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn insert(
        &mut self,
        item: MonitoredItem,
    ) {
        if let Some(previous) = self.items.get(&item.id).cloned() {
            self.remove(previous.id);
        }
        self.handles.insert(item.handle, item.node_id.clone());
        self.nodes
            .entry(item.node_id.to_string())
            .or_default()
            .push(item.id);
        self.items.insert(item.id, item);
    }

    pub(crate) fn remove(
        &mut self,
        item_id: u32,
    ) -> Option<MonitoredItem> {
        let item = self.items.remove(&item_id)?;
        self.handles.remove(&item.handle);

        let key = item.node_id.to_string();
        if let Some(ids) = self.nodes.get_mut(&key) {
            ids.retain(|id| *id != item_id);
            if ids.is_empty() {
                self.nodes.remove(&key);
            }
        }
        Some(item)
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<MonitoredItem> {
        let mut items: Vec<MonitoredItem> = self.items.values().cloned().collect();
        items.sort_by_key(|item| item.handle);
        items
    }
}
