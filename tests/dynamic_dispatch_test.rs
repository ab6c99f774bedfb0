use settleup::application::ledger::LedgerService;
use settleup::domain::participant::Participant;
use settleup::domain::ports::LedgerStoreBox;
use settleup::infrastructure::in_memory::InMemoryLedgerStore;

#[tokio::test]
async fn test_store_as_trait_object() {
    let store: LedgerStoreBox = Box::new(InMemoryLedgerStore::new());
    let alice = Participant::new("Alice", None).unwrap();

    // Verify Send + Sync by moving the boxed store into a task
    let handle = tokio::spawn(async move {
        store.save_participants(&[alice]).await.unwrap();
        store.load().await.unwrap()
    });

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.participants.len(), 1);
    assert_eq!(snapshot.participants[0].name, "Alice");
}

#[tokio::test]
async fn test_ledger_service_moves_across_tasks() {
    let shared = InMemoryLedgerStore::new();
    let mut ledger = LedgerService::open(Box::new(shared.clone())).await.unwrap();

    let handle = tokio::spawn(async move {
        ledger.add_participant("Alice", None).await.unwrap();
        ledger
    });
    let ledger = handle.await.unwrap();

    let reopened = LedgerService::open(Box::new(shared)).await.unwrap();
    assert_eq!(reopened.participants(), ledger.participants());
}
