use super::ItemIndex;
use crate::MonitoredItem;
use crate::NodeId;

fn item(
    id: u32,
    handle: u32,
    node: &str,
) -> MonitoredItem {
    MonitoredItem {
        id,
        handle,
        node_id: node.parse().expect("valid node id"),
        revised_sampling_interval: 0.0,
        revised_queue_size: 10,
    }
}

#[test]
fn test_insert_populates_every_index() {
    let mut index = ItemIndex::default();
    index.insert(item(1, 101, "ns=1;s=A"));

    let node: NodeId = "ns=1;s=A".parse().unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.node_for_handle(101), Some(&node));
    assert_eq!(index.get(1).map(|i| i.handle()), Some(101));
    assert_eq!(index.items_for_node(&node).len(), 1);
}

#[test]
fn test_node_watched_twice_resolves_to_both_items() {
    let mut index = ItemIndex::default();
    index.insert(item(1, 101, "ns=1;s=A"));
    index.insert(item(2, 102, "ns=1;s=A"));

    let node: NodeId = "ns=1;s=A".parse().unwrap();
    let ids: Vec<u32> = index.items_for_node(&node).iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(index.len(), 2);

    index.remove(1);
    let ids: Vec<u32> = index.items_for_node(&node).iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![2]);
    assert!(index.node_for_handle(101).is_none());
    assert!(index.node_for_handle(102).is_some());
}

#[test]
fn test_remove_clears_every_index() {
    let mut index = ItemIndex::default();
    index.insert(item(1, 101, "i=2258"));

    let removed = index.remove(1).expect("item present");
    assert_eq!(removed.handle(), 101);
    assert_eq!(index.len(), 0);
    assert!(index.get(1).is_none());
    assert!(index.node_for_handle(101).is_none());
    assert!(index.items_for_node(&NodeId::numeric(0, 2258)).is_empty());
    assert!(index.remove(1).is_none());
}

#[test]
fn test_reinserting_an_item_id_replaces_the_old_entry() {
    let mut index = ItemIndex::default();
    index.insert(item(1, 101, "ns=1;s=A"));
    index.insert(item(1, 105, "ns=1;s=B"));

    assert_eq!(index.len(), 1);
    assert!(index.node_for_handle(101).is_none());
    assert!(index
        .items_for_node(&"ns=1;s=A".parse().unwrap())
        .is_empty());
    assert_eq!(index.get(1).map(|i| i.handle()), Some(105));
}

#[test]
fn test_string_forms_resolve_to_the_same_node() {
    let mut index = ItemIndex::default();
    index.insert(item(1, 101, "ns=0;i=2258"));

    assert_eq!(index.items_for_node(&"i=2258".parse().unwrap()).len(), 1);
}

#[test]
fn test_snapshot_is_ordered_by_handle() {
    let mut index = ItemIndex::default();
    index.insert(item(7, 103, "ns=1;s=C"));
    index.insert(item(5, 101, "ns=1;s=A"));
    index.insert(item(6, 102, "ns=1;s=B"));

    let handles: Vec<u32> = index.snapshot().iter().map(|i| i.handle()).collect();
    assert_eq!(handles, vec![101, 102, 103]);
}
