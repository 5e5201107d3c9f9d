use assert_matches::assert_matches;

use queue_cell::*;

fn ticket(token: &str, doctor_id: u32) -> Ticket {
    Ticket::new(token.to_string(), PatientDetails::named(token), 1, doctor_id)
}

fn order(store: &QueueStore, doctor_id: u32) -> Vec<String> {
    store.partition(doctor_id).map(|t| t.token.clone()).collect()
}

#[test]
fn test_insert_keeps_partition_order() {
    let mut store = QueueStore::new(1);
    store.insert(ticket("Q-100", 11)).unwrap();
    store.insert(ticket("Q-101", 12)).unwrap();
    store.insert(ticket("Q-102", 11)).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(order(&store, 11), vec!["Q-100", "Q-102"]);
    assert_eq!(order(&store, 12), vec!["Q-101"]);
    assert_eq!(order(&store, 99), Vec::<String>::new());
}

#[test]
fn test_insert_rejects_duplicate_token() {
    let mut store = QueueStore::new(1);
    store.insert(ticket("Q-100", 11)).unwrap();

    let result = store.insert(ticket("Q-100", 12));
    assert_matches!(result, Err(QueueError::DuplicateToken { hospital_id: 1, token }) if token == "Q-100");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_find_by_token() {
    let mut store = QueueStore::new(1);
    store.insert(ticket("Q-100", 11)).unwrap();

    assert_eq!(store.find_by_token("Q-100").map(|t| t.doctor_id), Some(11));
    assert!(store.find_by_token("Q-999").is_none());
    assert!(store.contains_token("Q-100"));
}
